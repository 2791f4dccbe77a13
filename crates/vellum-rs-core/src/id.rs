//! Record identity generation.

use uuid::Uuid;

/// Generate a fresh record identifier.
///
/// UUID v7 combines millisecond time with random bits, so identifiers
/// stay unique across uncoordinated concurrent invocations and sort
/// roughly by creation time.
pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}
