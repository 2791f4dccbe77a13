//! Staleness check for variants whose parent changed after them.

use crate::error::StoreError;
use crate::store::PromptStore;
use crate::types::PromptRecord;
use log::warn;
use std::collections::HashMap;

/// One outdated variant reported by [`PromptStore::check_outdated`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutdatedEntry {
    /// The variant that appears outdated.
    pub record: PromptRecord,
    /// Its parent at the time of the check.
    pub parent: PromptRecord,
    /// Human-readable explanation.
    pub reason: String,
}

impl PromptStore {
    /// Report records whose parent's `created_at` is strictly later than
    /// their own.
    ///
    /// Records are immutable through this API, so the comparison is a
    /// heuristic: it only fires when a parent was overwritten in place
    /// under the same id (or the store was edited by hand), not when a
    /// replacement was saved under a new id. Dangling parents are skipped
    /// with a warning.
    pub fn check_outdated(&self) -> Result<Vec<OutdatedEntry>, StoreError> {
        let records = self.load_all_joined()?;
        let by_id: HashMap<&str, &PromptRecord> = records
            .iter()
            .map(|record| (record.id.as_str(), record))
            .collect();

        let mut entries = Vec::new();
        for record in &records {
            let Some(parent_id) = &record.parent_id else {
                continue;
            };
            let Some(parent) = by_id.get(parent_id.as_str()) else {
                warn!(
                    "dangling parent reference skipped by outdated check (record_id={}, parent_id={parent_id})",
                    record.id
                );
                continue;
            };
            if parent.created_at > record.created_at {
                entries.push(OutdatedEntry {
                    record: record.clone(),
                    parent: (*parent).clone(),
                    reason: format!(
                        "parent {} was updated at {}, after this variant was created at {}",
                        parent.id, parent.created_at, record.created_at
                    ),
                });
            }
        }
        entries.sort_by(|a, b| a.record.created_at.cmp(&b.record.created_at));
        Ok(entries)
    }
}
