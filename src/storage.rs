use crate::error::{SgResult, SuggesterError};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Key-value blob storage for settings.
pub trait Persistence: Send + Sync {
    fn read_blob(&self, key: &str) -> SgResult<Option<String>>;
    fn write_blob(&self, key: &str, value: &str) -> SgResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(key: &str, value: &str) -> Self {
        let store = Self::default();
        if let Ok(mut map) = store.blobs.lock() {
            map.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl Persistence for MemoryStorage {
    fn read_blob(&self, key: &str) -> SgResult<Option<String>> {
        let map = self
            .blobs
            .lock()
            .map_err(|e| SuggesterError::Persistence(e.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn write_blob(&self, key: &str, value: &str) -> SgResult<()> {
        let mut map = self
            .blobs
            .lock()
            .map_err(|e| SuggesterError::Persistence(e.to_string()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per blob inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{}.json", safe))
    }
}

impl Persistence for FileStorage {
    fn read_blob(&self, key: &str) -> SgResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Writes through a temp file in the same directory, then renames it over
    /// the target so readers never see a half-written blob.
    fn write_blob(&self, key: &str, value: &str) -> SgResult<()> {
        fs::create_dir_all(&self.root)?;
        let mut temp = NamedTempFile::new_in(&self.root)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(self.path_for(key))
            .map_err(|e| SuggesterError::Io(e.error))?;
        Ok(())
    }
}
