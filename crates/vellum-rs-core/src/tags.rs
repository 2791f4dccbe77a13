//! Inverted tag index shared by every store invocation.

use crate::error::StoreError;
use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Persisted index shape: tag -> unique record ids.
pub type TagMap = BTreeMap<String, BTreeSet<String>>;

const INDEX_FILENAME: &str = "tags.json";
const LOCK_FILENAME: &str = "tags.json.lock";
const TEMP_FILENAME: &str = "tags.json.tmp";

/// How long to keep retrying for the cross-process lock.
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);
/// Lock files older than this belong to a dead process and are broken.
const LOCK_STALE_AFTER: Duration = Duration::from_secs(10);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Tag inverted index backed by a single JSON file.
///
/// Mutations are read-modify-write cycles performed under an exclusive
/// lock file and published by atomic rename, so concurrent additions to
/// the same tag from separate invocations both survive. A missing index
/// file reads as an empty index.
pub struct TagIndex {
    path: PathBuf,
    lock_path: PathBuf,
    temp_path: PathBuf,
    /// Serializes writers within this process before the lock file is taken.
    local: Mutex<()>,
}

impl TagIndex {
    /// Create an index handle rooted at the store directory.
    pub fn new(store_root: impl AsRef<Path>) -> Self {
        let root = store_root.as_ref();
        Self {
            path: root.join(INDEX_FILENAME),
            lock_path: root.join(LOCK_FILENAME),
            temp_path: root.join(TEMP_FILENAME),
            local: Mutex::new(()),
        }
    }

    /// Path of the persisted index file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed an empty index file if none exists yet.
    pub fn init(&self) -> Result<(), StoreError> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(mut file) => {
                file.write_all(b"{}")?;
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Load the current index; a missing file is an empty index.
    pub fn load(&self) -> Result<TagMap, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(TagMap::new()),
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(TagMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Register tags for a record id. Duplicate pairs are no-ops.
    pub fn add_tags(&self, id: &str, tags: &[String]) -> Result<(), StoreError> {
        if tags.is_empty() {
            return Ok(());
        }
        self.mutate(|map| {
            for tag in tags {
                if tag.is_empty() {
                    continue;
                }
                map.entry(tag.clone())
                    .or_default()
                    .insert(id.to_string());
            }
        })
    }

    /// All tags carried by a record id, sorted.
    pub fn tags_for(&self, id: &str) -> Result<Vec<String>, StoreError> {
        Ok(tags_for_id(&self.load()?, id))
    }

    /// All record ids carrying a tag.
    pub fn ids_for_tag(&self, tag: &str) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.load()?.get(tag).cloned().unwrap_or_default())
    }

    /// Replace the whole index, e.g. after a rebuild from record files.
    pub fn replace(&self, map: TagMap) -> Result<(), StoreError> {
        self.mutate(|current| *current = map.clone())
    }

    /// Read-modify-write under the cross-process lock, published atomically.
    fn mutate(&self, apply: impl Fn(&mut TagMap)) -> Result<(), StoreError> {
        let _local = self.local.lock();
        let _lock = LockFile::acquire(&self.lock_path)?;
        let mut map = self.load()?;
        apply(&mut map);
        self.write_atomic(&map)
    }

    /// Write the index to the temp file and rename it into place.
    fn write_atomic(&self, map: &TagMap) -> Result<(), StoreError> {
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&self.temp_path)?;
            let contents = serde_json::to_string_pretty(map)?;
            file.write_all(contents.as_bytes())?;
        }
        fs::rename(&self.temp_path, &self.path)?;
        debug!("tag index written (tags={})", map.len());
        Ok(())
    }
}

/// Collect the sorted tags referencing an id from a loaded index.
pub fn tags_for_id(map: &TagMap, id: &str) -> Vec<String> {
    map.iter()
        .filter(|(_, ids)| ids.contains(id))
        .map(|(tag, _)| tag.clone())
        .collect()
}

/// Exclusive cross-process lock held while the index file is rewritten.
///
/// Acquisition creates the lock file with `create_new`; contenders retry
/// until [`LOCK_TIMEOUT`] and break locks older than [`LOCK_STALE_AFTER`].
struct LockFile {
    path: PathBuf,
}

impl LockFile {
    fn acquire(path: &Path) -> Result<Self, StoreError> {
        let started = Instant::now();
        loop {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(mut file) => {
                    let _ = write!(file, "{}", std::process::id());
                    return Ok(Self {
                        path: path.to_path_buf(),
                    });
                }
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                    if lock_is_stale(path) {
                        warn!("breaking stale tag index lock (path={})", path.display());
                        let _ = fs::remove_file(path);
                        continue;
                    }
                    if started.elapsed() >= LOCK_TIMEOUT {
                        return Err(StoreError::LockTimeout(LOCK_TIMEOUT));
                    }
                    std::thread::sleep(LOCK_RETRY_DELAY);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Whether a lock file has outlived the staleness horizon.
fn lock_is_stale(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    SystemTime::now()
        .duration_since(modified)
        .map(|age| age > LOCK_STALE_AFTER)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{TagIndex, TagMap};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn string_set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn missing_index_file_reads_as_empty() {
        let temp = tempdir().expect("tempdir");
        let index = TagIndex::new(temp.path());
        assert_eq!(index.load().expect("load"), TagMap::new());
        assert_eq!(index.tags_for("rec-1").expect("tags"), Vec::<String>::new());
    }

    #[test]
    fn add_tags_is_idempotent() {
        let temp = tempdir().expect("tempdir");
        let index = TagIndex::new(temp.path());
        index
            .add_tags("rec-1", &["alpha".to_string()])
            .expect("first add");
        index
            .add_tags("rec-1", &["alpha".to_string()])
            .expect("second add");

        assert_eq!(index.tags_for("rec-1").expect("tags"), vec!["alpha"]);
        assert_eq!(
            index.ids_for_tag("alpha").expect("ids"),
            string_set(&["rec-1"])
        );
    }

    #[test]
    fn tags_round_trip_through_the_index() {
        let temp = tempdir().expect("tempdir");
        let index = TagIndex::new(temp.path());
        index
            .add_tags("rec-1", &["x".to_string(), "y".to_string()])
            .expect("add");

        assert_eq!(index.tags_for("rec-1").expect("tags"), vec!["x", "y"]);
        assert_eq!(index.ids_for_tag("x").expect("ids"), string_set(&["rec-1"]));
        assert_eq!(index.ids_for_tag("z").expect("ids"), BTreeSet::new());
    }

    #[test]
    fn empty_tags_are_skipped() {
        let temp = tempdir().expect("tempdir");
        let index = TagIndex::new(temp.path());
        index
            .add_tags("rec-1", &[String::new(), "kept".to_string()])
            .expect("add");
        assert_eq!(index.tags_for("rec-1").expect("tags"), vec!["kept"]);
    }

    #[test]
    fn replace_swaps_the_whole_index() {
        let temp = tempdir().expect("tempdir");
        let index = TagIndex::new(temp.path());
        index
            .add_tags("rec-1", &["old".to_string()])
            .expect("add");

        let mut rebuilt = TagMap::new();
        rebuilt.insert("new".to_string(), string_set(&["rec-2"]));
        index.replace(rebuilt.clone()).expect("replace");

        assert_eq!(index.load().expect("load"), rebuilt);
    }

    #[test]
    fn stale_lock_is_broken() {
        let temp = tempdir().expect("tempdir");
        let index = TagIndex::new(temp.path());
        let lock_path = temp.path().join("tags.json.lock");
        std::fs::write(&lock_path, "999999").expect("write lock");
        let old = std::time::SystemTime::now() - std::time::Duration::from_secs(60);
        let file = std::fs::File::options()
            .write(true)
            .open(&lock_path)
            .expect("open lock");
        file.set_modified(old).expect("age lock");
        drop(file);

        index
            .add_tags("rec-1", &["alpha".to_string()])
            .expect("add past stale lock");
        assert_eq!(index.tags_for("rec-1").expect("tags"), vec!["alpha"]);
    }
}
