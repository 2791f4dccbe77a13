//! Local version-control store for model prompts.
//!
//! Records are immutable JSON files keyed by id; parent pointers form a
//! forest of prompt lineages, and a shared tag index provides the inverted
//! tag -> ids mapping. Everything here is synchronous filesystem I/O.

pub mod error;
pub mod id;
pub mod lineage;
pub mod outdated;
pub mod search;
pub mod store;
pub mod tags;
pub mod types;

/// Store error type.
pub use error::StoreError;
/// Record identity generation.
pub use id::new_record_id;
/// Lineage view types.
pub use lineage::{Lineage, LineageNode};
/// Outdated-variant report entry.
pub use outdated::OutdatedEntry;
/// Searchable field selector.
pub use search::SearchField;
/// The record store handle.
pub use store::PromptStore;
/// Tag inverted index.
pub use tags::TagIndex;
/// Record model and metadata types.
pub use types::{
    CiInfo, CiStatus, DEFAULT_BRANCH, MetadataPatch, PromptRecord, PromptSource, RecordDraft,
    RecordMetadata, TestResult, UsageMetrics,
};
