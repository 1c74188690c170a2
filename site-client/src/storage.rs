// site-client/src/storage.rs
use crate::error::Result;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::NamedTempFile;

/// One step of a batched write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change<'a> {
    Put(&'a str, &'a str),
    Delete(&'a str),
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
    fn keys(&self) -> Vec<String>;

    /// Apply every change or none of them. Stores that can fail part way
    /// must override this.
    fn write_batch(&self, changes: &[Change<'_>]) -> Result<()> {
        for change in changes {
            match *change {
                Change::Put(key, value) => self.set(key, value)?,
                Change::Delete(key) => self.remove(key)?,
            }
        }
        Ok(())
    }
}

/// Process-lifetime store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

/// JSON object on disk, rewritten on every mutation
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file starts empty; a corrupt one is
    /// discarded with a warning.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable storage file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Opened storage file {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` on a copy, persist the copy, and only then adopt it
    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        f(&mut next);

        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    // Temp file in the target directory, then rename over the old file
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(&serde_json::to_vec_pretty(entries)?)?;
        temp.persist(&self.path).map_err(|e| {
            tracing::error!("Could not replace storage file {}: {}", self.path.display(), e.error);
            e.error
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        self.mutate(BTreeMap::clear)
    }

    fn write_batch(&self, changes: &[Change<'_>]) -> Result<()> {
        self.mutate(|entries| {
            for change in changes {
                match *change {
                    Change::Put(key, value) => {
                        entries.insert(key.to_string(), value.to_string());
                    }
                    Change::Delete(key) => {
                        entries.remove(key);
                    }
                }
            }
        })
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

/// Accessor over an optional backing store
#[derive(Clone, Default)]
pub struct Storage {
    backend: Option<Arc<dyn KeyValueStore>>,
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend: Some(backend) }
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Arc::new(FileStore::open(path)?)))
    }

    /// No backing store: reads yield `None`, writes are no-ops
    pub fn detached() -> Self {
        Self { backend: None }
    }

    pub fn is_attached(&self) -> bool {
        self.backend.is_some()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.backend.as_ref().and_then(|b| b.get(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        match &self.backend {
            Some(b) => b.set(key, value),
            None => Ok(()),
        }
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        match &self.backend {
            Some(b) => b.remove(key),
            None => Ok(()),
        }
    }

    pub fn clear(&self) -> Result<()> {
        match &self.backend {
            Some(b) => b.clear(),
            None => Ok(()),
        }
    }

    pub fn write_batch(&self, changes: &[Change<'_>]) -> Result<()> {
        match &self.backend {
            Some(b) => b.write_batch(changes),
            None => Ok(()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.backend.as_ref().map(|b| b.keys()).unwrap_or_default()
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("attached", &self.is_attached())
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let storage = Storage::memory();
        assert_eq!(storage.get("access"), None);

        storage.set("access", "abc").unwrap();
        assert_eq!(storage.get("access").as_deref(), Some("abc"));

        storage.remove("access").unwrap();
        assert_eq!(storage.get("access"), None);
    }

    #[test]
    fn test_double_clear_leaves_storage_empty() {
        let storage = Storage::memory();
        storage.set("access", "a").unwrap();
        storage.set("refresh", "r").unwrap();

        storage.clear().unwrap();
        assert!(storage.keys().is_empty());

        storage.clear().unwrap();
        assert!(storage.keys().is_empty());
        assert_eq!(storage.get("access"), None);
    }

    #[test]
    fn test_detached_is_inert() {
        let storage = Storage::detached();
        storage.set("access", "a").unwrap();
        assert_eq!(storage.get("access"), None);
        storage.clear().unwrap();
        storage.clear().unwrap();
        assert!(!storage.is_attached());
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        {
            let storage = Storage::file(&path).unwrap();
            storage.set("refresh", "r-1").unwrap();
            storage.set("user", "{\"id\":\"1\"}").unwrap();
        }

        let reopened = Storage::file(&path).unwrap();
        assert_eq!(reopened.get("refresh").as_deref(), Some("r-1"));
        assert_eq!(reopened.keys(), vec!["refresh", "user"]);

        reopened.clear().unwrap();
        reopened.clear().unwrap();
        assert!(Storage::file(&path).unwrap().keys().is_empty());
    }

    #[test]
    fn test_batch_applies_puts_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::file(dir.path().join("storage.json")).unwrap();
        storage.set("refresh", "stale").unwrap();

        storage
            .write_batch(&[Change::Put("access", "a"), Change::Delete("refresh"), Change::Put("user", "{}")])
            .unwrap();

        assert_eq!(storage.keys(), vec!["access", "user"]);
        let reopened = Storage::file(dir.path().join("storage.json")).unwrap();
        assert_eq!(reopened.keys(), vec!["access", "user"]);
    }

    #[test]
    fn test_failed_write_leaves_entries_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let store = FileStore::open(&path).unwrap();
        store.set("access", "old-a").unwrap();
        store.set("refresh", "old-r").unwrap();

        // A directory in place of the file makes every rename fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.clear().is_err());
        assert_eq!(store.keys(), vec!["access", "refresh"]);

        let failed = store.write_batch(&[Change::Put("access", "new-a"), Change::Put("refresh", "new-r")]);
        assert!(failed.is_err());
        assert_eq!(store.get("access").as_deref(), Some("old-a"));
        assert_eq!(store.get("refresh").as_deref(), Some("old-r"));

        // No stray temp files next to the target
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_file_store_discards_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let storage = Storage::file(&path).unwrap();
        assert!(storage.keys().is_empty());
    }
}
