use crate::error::{SgResult, SuggesterError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Source of raw dictionary text. The transport is opaque to the store.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch_text(&self, location: &str) -> SgResult<String>;
}

/// Serves word lists from a local mirror directory.
///
/// A location is resolved by its last path segment, so the upstream URL
/// `https://host/a/b/en.txt` reads `<root>/en.txt`.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        let name = location
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(location);
        self.root.join(name)
    }
}

#[async_trait]
impl SourceFetcher for FileFetcher {
    async fn fetch_text(&self, location: &str) -> SgResult<String> {
        let path = self.resolve(location);
        debug!("Reading word list from {:?}", path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SuggesterError::fetch(path.display().to_string(), e))
    }
}

/// In-memory fetcher keyed by location. Unknown locations fail like a 404.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    texts: Mutex<HashMap<String, String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, location: &str, text: &str) -> Self {
        self.insert(location, text);
        self
    }

    pub fn insert(&self, location: &str, text: &str) {
        if let Ok(mut map) = self.texts.lock() {
            map.insert(location.to_string(), text.to_string());
        }
    }
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    async fn fetch_text(&self, location: &str) -> SgResult<String> {
        let map = self
            .texts
            .lock()
            .map_err(|e| SuggesterError::fetch(location, e))?;
        map.get(location)
            .cloned()
            .ok_or_else(|| SuggesterError::fetch(location, "not found"))
    }
}
