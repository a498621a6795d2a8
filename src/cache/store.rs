//! Entry Store Module
//!
//! Durable one-file-per-identifier storage. Each record lives at
//! `<dir>/<identifier>.json` as pretty-printed JSON.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::Builder;
use tracing::{debug, warn};

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

/// File extension of record files
pub const RECORD_EXTENSION: &str = "json";

/// Name prefix of in-flight write files
pub const TEMP_PREFIX: &str = ".filecache-";

/// Name suffix of in-flight write files
pub const TEMP_SUFFIX: &str = ".tmp";

// == Load Result ==
/// Outcome of reading a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult {
    /// No file exists for the identifier
    Absent,
    /// A file exists but could not be read or parsed
    Corrupt,
    /// The record was read successfully
    Found(CacheEntry),
}

// == Entry Store ==
/// File-backed record storage rooted at a single directory.
#[derive(Debug, Clone)]
pub struct EntryStore {
    /// Directory where record files are stored
    dir: PathBuf,
}

impl EntryStore {
    // == Constructor ==
    /// Creates a store over `dir`. Nothing is touched on disk until a write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of the record file for an identifier.
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", identifier, RECORD_EXTENSION))
    }

    /// Ensures the storage directory exists.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| CacheError::io(&self.dir, e))
    }

    // == Put ==
    /// Writes a record, replacing any previous one for the identifier.
    ///
    /// The record is written to a temporary file in the same directory and
    /// renamed over the target, so readers see either the old record or the
    /// complete new one.
    pub fn put(&self, identifier: &str, entry: &CacheEntry) -> Result<()> {
        self.ensure_dir()?;

        let json = serde_json::to_vec_pretty(entry)?;
        let path = self.path_for(identifier);

        let mut tmp = Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.dir)
            .map_err(|e| CacheError::io(&self.dir, e))?;
        tmp.write_all(&json)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| CacheError::io(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| CacheError::io(&path, e.error))?;

        debug!(identifier, bytes = json.len(), "record written");
        Ok(())
    }

    // == Get ==
    /// Reads the record for an identifier.
    ///
    /// Any failure other than a missing file is reported as `Corrupt`; a
    /// transient read error and malformed content are not told apart.
    pub fn get(&self, identifier: &str) -> LoadResult {
        let path = self.path_for(identifier);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadResult::Absent,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read record");
                return LoadResult::Corrupt;
            }
        };

        match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) => LoadResult::Found(entry),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unparsable record");
                LoadResult::Corrupt
            }
        }
    }

    // == Delete ==
    /// Removes the record for an identifier. A missing record is not an error.
    pub fn delete(&self, identifier: &str) -> Result<()> {
        let path = self.path_for(identifier);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io(path, e)),
        }
    }

    // == List Identifiers ==
    /// Lists the identifiers of all stored records, in directory order.
    ///
    /// A missing storage directory lists as empty. Temporary files from
    /// in-flight writes are skipped.
    pub fn list_identifiers(&self) -> Result<Vec<String>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io(&self.dir, e)),
        };

        let mut identifiers = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = match dir_entry {
                Ok(dir_entry) => dir_entry,
                Err(e) => {
                    warn!(dir = %self.dir.display(), error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            let path = dir_entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if dir_entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                identifiers.push(stem.to_string());
            }
        }

        Ok(identifiers)
    }

    // == Clear ==
    /// Removes every record.
    ///
    /// Not transactional: records removed before a failure stay removed, the
    /// remaining ones are still attempted, and the first error is returned.
    pub fn clear(&self) -> Result<()> {
        let mut first_error = None;

        for identifier in self.list_identifiers()? {
            if let Err(e) = self.delete(&identifier) {
                warn!(identifier = %identifier, error = %e, "failed to remove record during clear");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // == Stale Temp Files ==
    /// Removes write temp files last modified more than `max_age` ago.
    ///
    /// These are left behind when a process dies between creating the temp
    /// file and renaming it. Younger ones may belong to a write in progress
    /// and are kept. Returns how many were removed.
    pub fn remove_stale_temp_files(&self, max_age: Duration) -> usize {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(dir = %self.dir.display(), error = %e, "failed to scan for temporary files");
                }
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;
        for dir_entry in read_dir.flatten() {
            let name = dir_entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !is_temp_file_name(name) {
                continue;
            }

            let Ok(modified) = dir_entry.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            if now.duration_since(modified).unwrap_or_default() <= max_age {
                continue;
            }

            let path = dir_entry.path();
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove temporary file"),
            }
        }

        removed
    }

    // == Size ==
    /// On-disk size of a record, or `None` if it no longer exists.
    pub fn size_of(&self, identifier: &str) -> Option<u64> {
        fs::metadata(self.path_for(identifier)).ok().map(|m| m.len())
    }
}

fn is_temp_file_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (EntryStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = EntryStore::new(temp_dir.path());
        (store, temp_dir)
    }

    #[test]
    fn test_put_and_get() {
        let (store, _temp_dir) = create_test_store();
        let entry = CacheEntry::new("key1", json!({"value": 1}));

        store.put("abc", &entry).unwrap();

        assert_eq!(store.get("abc"), LoadResult::Found(entry));
    }

    #[test]
    fn test_put_creates_directory_if_missing() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("cache");
        let store = EntryStore::new(&nested);

        store.put("abc", &CacheEntry::new("k", json!(null))).unwrap();

        assert!(nested.join("abc.json").exists());
    }

    #[test]
    fn test_put_writes_readable_json() {
        let (store, temp_dir) = create_test_store();
        store.put("abc", &CacheEntry::new("my key", json!("hello"))).unwrap();

        let content = fs::read_to_string(temp_dir.path().join("abc.json")).unwrap();
        assert!(content.contains("\"key\": \"my key\""));
        assert!(content.contains("\"payload\": \"hello\""));
        assert!(content.contains("\"created_at\""));
    }

    #[test]
    fn test_put_overwrites_and_leaves_no_temp_files() {
        let (store, temp_dir) = create_test_store();
        store.put("abc", &CacheEntry::new("k", json!(1))).unwrap();
        store.put("abc", &CacheEntry::new("k", json!(2))).unwrap();

        match store.get("abc") {
            LoadResult::Found(entry) => assert_eq!(entry.payload, json!(2)),
            other => panic!("expected record, got {:?}", other),
        }
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_get_absent() {
        let (store, _temp_dir) = create_test_store();
        assert_eq!(store.get("missing"), LoadResult::Absent);
    }

    #[test]
    fn test_get_corrupt() {
        let (store, temp_dir) = create_test_store();
        fs::write(temp_dir.path().join("bad.json"), "{ truncated").unwrap();
        fs::write(temp_dir.path().join("foreign.json"), r#"{"data": 1, "timestamp": 2}"#).unwrap();

        assert_eq!(store.get("bad"), LoadResult::Corrupt);
        assert_eq!(store.get("foreign"), LoadResult::Corrupt);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (store, _temp_dir) = create_test_store();
        store.put("abc", &CacheEntry::new("k", json!(1))).unwrap();

        store.delete("abc").unwrap();
        store.delete("abc").unwrap();

        assert_eq!(store.get("abc"), LoadResult::Absent);
    }

    #[test]
    fn test_list_identifiers_skips_other_files() {
        let (store, temp_dir) = create_test_store();
        store.put("one", &CacheEntry::new("1", json!(1))).unwrap();
        store.put("two", &CacheEntry::new("2", json!(2))).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();
        fs::write(temp_dir.path().join(".tmpXYZ"), "partial").unwrap();
        fs::create_dir(temp_dir.path().join("sub.json")).unwrap();

        let mut ids = store.list_identifiers().unwrap();
        ids.sort();
        assert_eq!(ids, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_list_identifiers_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = EntryStore::new(temp_dir.path().join("never-created"));
        assert!(store.list_identifiers().unwrap().is_empty());
    }

    #[test]
    fn test_clear_removes_records_only() {
        let (store, temp_dir) = create_test_store();
        for id in ["a", "b", "c"] {
            store.put(id, &CacheEntry::new(id, json!(id))).unwrap();
        }
        fs::write(temp_dir.path().join("keep.txt"), "x").unwrap();

        store.clear().unwrap();

        assert!(store.list_identifiers().unwrap().is_empty());
        assert!(temp_dir.path().join("keep.txt").exists());
    }

    fn write_aged(path: &Path, age: Duration) {
        fs::write(path, "partial").unwrap();
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() - age)
            .unwrap();
    }

    #[test]
    fn test_put_temp_files_are_not_records() {
        assert!(is_temp_file_name(".filecache-a1B2c3.tmp"));
        assert!(!is_temp_file_name("abc.json"));
        assert!(!is_temp_file_name(".tmpXYZ"));
    }

    #[test]
    fn test_remove_stale_temp_files() {
        let (store, temp_dir) = create_test_store();
        store.put("abc", &CacheEntry::new("k", json!(1))).unwrap();
        let stale = temp_dir.path().join(".filecache-stale.tmp");
        let fresh = temp_dir.path().join(".filecache-fresh.tmp");
        let foreign = temp_dir.path().join("other.tmp");
        write_aged(&stale, Duration::from_secs(600));
        write_aged(&fresh, Duration::from_secs(0));
        write_aged(&foreign, Duration::from_secs(600));

        assert_eq!(store.remove_stale_temp_files(Duration::from_secs(60)), 1);

        assert!(!stale.exists());
        assert!(fresh.exists(), "a young temp file may be a write in progress");
        assert!(foreign.exists());
        assert!(matches!(store.get("abc"), LoadResult::Found(_)));
    }

    #[test]
    fn test_remove_stale_temp_files_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = EntryStore::new(temp_dir.path().join("never-created"));
        assert_eq!(store.remove_stale_temp_files(Duration::ZERO), 0);
    }

    #[test]
    fn test_size_of() {
        let (store, temp_dir) = create_test_store();
        store.put("abc", &CacheEntry::new("k", json!("v"))).unwrap();

        let expected = fs::metadata(temp_dir.path().join("abc.json")).unwrap().len();
        assert_eq!(store.size_of("abc"), Some(expected));
        assert_eq!(store.size_of("missing"), None);
    }
}
