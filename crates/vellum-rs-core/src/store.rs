//! File-backed record store: one JSON file per record plus the shared
//! tag index.

use crate::error::StoreError;
use crate::id::new_record_id;
use crate::tags::{TagIndex, TagMap, tags_for_id};
use crate::types::{DEFAULT_BRANCH, MetadataPatch, PromptRecord, RecordDraft};
use chrono::Utc;
use log::{debug, info, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const RECORDS_DIR: &str = "records";

/// Record store handle rooted at a store directory (e.g. `.vellum`).
///
/// The handle owns no global state; every command constructs one from
/// config and passes it along. All operations are synchronous filesystem
/// I/O against `records/<id>.json` files and the tag index.
pub struct PromptStore {
    root: PathBuf,
    records_dir: PathBuf,
    tags: TagIndex,
}

impl PromptStore {
    /// Open a store, idempotently creating the backing layout.
    ///
    /// Safe to call repeatedly and from concurrent invocations; directory
    /// and index-seed creation both tolerate racing peers.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        let records_dir = root.join(RECORDS_DIR);
        fs::create_dir_all(&records_dir)?;
        let tags = TagIndex::new(&root);
        tags.init()?;
        info!("opened prompt store (root={})", root.display());
        Ok(Self {
            root,
            records_dir,
            tags,
        })
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The tag index backing this store.
    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    /// Create a new immutable record from a draft.
    ///
    /// The record file is durable before the tag index is touched; a
    /// failed index update leaves the store repairable via
    /// [`PromptStore::rebuild_tag_index`] rather than failing the call.
    pub fn create(&self, draft: RecordDraft) -> Result<PromptRecord, StoreError> {
        if draft.text.is_empty() {
            return Err(StoreError::Validation("prompt text is empty".to_string()));
        }
        if let Some(parent_id) = &draft.parent_id
            && !self.record_exists(parent_id)
        {
            return Err(StoreError::NotFound(parent_id.clone()));
        }

        let record = PromptRecord {
            id: new_record_id(),
            text: draft.text,
            response: draft.response,
            model: draft.model,
            created_at: Utc::now(),
            parent_id: draft.parent_id,
            branch: draft.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            metadata: draft.metadata,
            tags: dedup_tags(draft.tags),
        };

        self.write_record(&record)?;
        info!(
            "record created (id={}, parent_set={}, tags={})",
            record.id,
            record.parent_id.is_some(),
            record.tags.len()
        );

        if let Err(err) = self.tags.add_tags(&record.id, &record.tags) {
            warn!(
                "tag index update failed after record write; run reindex (id={}): {err}",
                record.id
            );
        }
        Ok(record)
    }

    /// Fetch a record by id, with tags joined from the index.
    pub fn get(&self, id: &str) -> Result<PromptRecord, StoreError> {
        let mut record = self.read_record(id)?;
        record.tags = self.tags.tags_for(id)?;
        Ok(record)
    }

    /// List records newest-first, optionally filtered by exact tag
    /// membership; `limit` caps the result after filtering.
    pub fn list(
        &self,
        limit: usize,
        tag_filter: Option<&str>,
    ) -> Result<Vec<PromptRecord>, StoreError> {
        let mut records = self.load_all()?;
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let map = self.tags.load()?;
        if let Some(tag) = tag_filter {
            let tagged = map.get(tag).cloned().unwrap_or_default();
            records.retain(|record| tagged.contains(&record.id));
        }
        records.truncate(limit);
        for record in &mut records {
            record.tags = tags_for_id(&map, &record.id);
        }
        Ok(records)
    }

    /// Merge a metadata patch into a record and persist the result.
    pub fn update_metadata(
        &self,
        id: &str,
        patch: MetadataPatch,
    ) -> Result<PromptRecord, StoreError> {
        let mut record = self.read_record(id)?;
        record.metadata.merge(patch);
        self.write_record(&record)?;
        debug!("record metadata updated (id={id})");
        record.tags = self.tags.tags_for(id)?;
        Ok(record)
    }

    /// Number of records currently stored.
    pub fn record_count(&self) -> Result<usize, StoreError> {
        let mut count = 0;
        for entry in fs::read_dir(&self.records_dir)? {
            let entry = entry?;
            if entry.path().extension().and_then(|ext| ext.to_str()) == Some("json") {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Rebuild the tag index from the tags stored in each record file.
    ///
    /// Returns the number of records scanned.
    pub fn rebuild_tag_index(&self) -> Result<usize, StoreError> {
        let records = self.load_all()?;
        let mut map = TagMap::new();
        for record in &records {
            for tag in &record.tags {
                map.entry(tag.clone())
                    .or_default()
                    .insert(record.id.clone());
            }
        }
        self.tags.replace(map)?;
        info!("tag index rebuilt (records={})", records.len());
        Ok(records.len())
    }

    /// Whether a record file exists for the id.
    pub fn record_exists(&self, id: &str) -> bool {
        valid_id(id) && self.record_path(id).exists()
    }

    /// All records as persisted, without joining index tags.
    pub(crate) fn load_all(&self) -> Result<Vec<PromptRecord>, StoreError> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.records_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            let record: PromptRecord = serde_json::from_str(&contents)?;
            records.push(record);
        }
        Ok(records)
    }

    /// All records with tags joined from a single index read.
    pub(crate) fn load_all_joined(&self) -> Result<Vec<PromptRecord>, StoreError> {
        let mut records = self.load_all()?;
        let map = self.tags.load()?;
        for record in &mut records {
            record.tags = tags_for_id(&map, &record.id);
        }
        Ok(records)
    }

    pub(crate) fn read_record(&self, id: &str) -> Result<PromptRecord, StoreError> {
        if !valid_id(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let contents = match fs::read_to_string(self.record_path(id)) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persist a record with write-to-temp-then-rename discipline, so a
    /// concurrent reader sees either the old or the new file, never a
    /// partial one.
    pub(crate) fn write_record(&self, record: &PromptRecord) -> Result<(), StoreError> {
        let path = self.record_path(&record.id);
        let temp_path = self.records_dir.join(format!("{}.json.tmp", record.id));
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            let contents = serde_json::to_string_pretty(record)?;
            file.write_all(contents.as_bytes())?;
        }
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.records_dir.join(format!("{id}.json"))
    }
}

/// Ids are opaque but must stay inside the records directory.
fn valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}

/// Drop empty tags and duplicates while preserving first-seen order.
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
        .collect()
}
