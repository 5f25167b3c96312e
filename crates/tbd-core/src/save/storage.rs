//! Key-value storage backends for saved sessions.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

/// Durable string storage keyed by name.
pub trait Storage {
    /// Whether a value is stored under `key`.
    fn has(&self, key: &str) -> EngineResult<bool>;

    /// Stored value, if any.
    fn get(&self, key: &str) -> EngineResult<Option<String>>;

    /// Store a value, replacing the previous one.
    fn set(&mut self, key: &str, value: &str) -> EngineResult<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> EngineResult<()>;
}

/// Storage kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    offline: bool,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, as when the host denies access.
    pub fn offline() -> Self {
        Self {
            entries: HashMap::new(),
            offline: true,
        }
    }

    /// Take the store offline or bring it back.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check(&self) -> EngineResult<()> {
        if self.offline {
            Err(EngineError::StorageUnavailable(
                "storage is offline".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl Storage for MemoryStorage {
    fn has(&self, key: &str) -> EngineResult<bool> {
        self.check()?;
        Ok(self.entries.contains_key(key))
    }

    fn get(&self, key: &str) -> EngineResult<Option<String>> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> EngineResult<()> {
        self.check()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> EngineResult<()> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage writing one `<key>.json` file per key into a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store files under `dir`; it is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> EngineResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(EngineError::StorageUnavailable(format!(
                "invalid storage key '{key}'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn has(&self, key: &str) -> EngineResult<bool> {
        Ok(self.path(key)?.try_exists()?)
    }

    fn get(&self, key: &str) -> EngineResult<Option<String>> {
        match fs::read_to_string(self.path(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> EngineResult<()> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;

        // Temp file first, then rename over the old save
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> EngineResult<()> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(storage: &mut dyn Storage) {
        assert!(!storage.has("slot").unwrap());
        assert_eq!(storage.get("slot").unwrap(), None);

        storage.set("slot", "{\"a\":1}").unwrap();
        assert!(storage.has("slot").unwrap());
        assert_eq!(storage.get("slot").unwrap().as_deref(), Some("{\"a\":1}"));

        storage.set("slot", "{}").unwrap();
        assert_eq!(storage.get("slot").unwrap().as_deref(), Some("{}"));

        storage.remove("slot").unwrap();
        assert!(!storage.has("slot").unwrap());
        storage.remove("slot").unwrap();
    }

    #[test]
    fn memory_storage() {
        exercise(&mut MemoryStorage::new());
    }

    #[test]
    fn file_storage() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().join("saves"));
        exercise(&mut storage);
    }

    #[test]
    fn file_storage_replaces_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set("slot", "first").unwrap();
        storage.set("slot", "second").unwrap();

        assert_eq!(storage.get("slot").unwrap().as_deref(), Some("second"));
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["slot.json".to_string()]);
    }

    #[test]
    fn file_storage_rejects_path_keys() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.set("../escape", "x"),
            Err(EngineError::StorageUnavailable(_))
        ));
    }

    #[test]
    fn offline_storage_fails() {
        let mut storage = MemoryStorage::offline();
        assert!(matches!(
            storage.has("slot"),
            Err(EngineError::StorageUnavailable(_))
        ));
        assert!(storage.set("slot", "x").is_err());

        storage.set_offline(false);
        storage.set("slot", "x").unwrap();
        assert!(storage.has("slot").unwrap());
    }
}
