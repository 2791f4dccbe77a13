//! Temporary store fixtures.

use tempfile::TempDir;
use vellum_rs_core::{PromptStore, RecordDraft};

/// A [`PromptStore`] rooted in a temp directory that lives as long as
/// the fixture.
pub struct TempStore {
    /// Keeps the backing directory alive.
    pub dir: TempDir,
    /// Open store handle.
    pub store: PromptStore,
}

impl TempStore {
    /// Create an empty store in a fresh temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PromptStore::open(dir.path()).expect("open store");
        Self { dir, store }
    }

    /// Create a record with the given text and tags.
    pub fn seed(&self, text: &str, tags: &[&str]) -> String {
        self.store
            .create(RecordDraft {
                text: text.to_string(),
                tags: tags.iter().map(|tag| tag.to_string()).collect(),
                ..RecordDraft::default()
            })
            .expect("seed record")
            .id
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}
