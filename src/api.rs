use crate::config::{ConfigStore, TyperConfig};
use crate::dictionary::{
    default_catalog, Dictionary, DictionaryEntry, DictionaryStore, LoadSummary, SourceFetcher,
    DEFAULT_DICTIONARY,
};
use crate::error::{SgResult, SuggesterError};
use crate::ranking::{self, SortDirection, SortMethod, SortSpec};
use crate::storage::Persistence;
use crate::typist::{CancelToken, InputSink, TokioPacer, Typist, TypingOutcome};
use serde::Serialize;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How many suggestions a presentation layer shows by default.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 15;

/// Ranked matches for one query against one dictionary.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    pub query: String,
    pub dictionary: String,
    /// The sort actually applied, after any frequency fallback.
    pub applied: SortMethod,
    pub direction: SortDirection,
    pub entries: Vec<DictionaryEntry>,
}

impl Suggestions {
    fn from_ranked(query: &str, dict: &Dictionary, spec: SortSpec) -> Self {
        let ranked = ranking::query(query, dict, spec);
        Self {
            query: query.trim().to_string(),
            dictionary: dict.id.clone(),
            applied: ranked.applied,
            direction: spec.direction,
            entries: ranked.entries.into_iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first `n` entries, in rank order.
    pub fn top(&self, n: usize) -> &[DictionaryEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.word.as_str())
    }
}

/// Everything a presentation layer talks to: dictionaries, the active
/// selection and sort, the typer settings and the typing simulator.
pub struct Assistant {
    store: DictionaryStore,
    config: Mutex<ConfigStore>,
    typist: Typist,
    active: RwLock<String>,
    sort: RwLock<SortSpec>,
}

impl Assistant {
    pub fn new(store: DictionaryStore, config: ConfigStore, typist: Typist) -> Self {
        Self {
            store,
            config: Mutex::new(config),
            typist,
            active: RwLock::new(DEFAULT_DICTIONARY.to_string()),
            sort: RwLock::new(SortSpec::default()),
        }
    }

    /// The stock catalog, settings loaded from `storage`, real-time typing.
    pub fn with_defaults(fetcher: Arc<dyn SourceFetcher>, storage: Arc<dyn Persistence>) -> Self {
        Self::new(
            DictionaryStore::new(default_catalog(), fetcher),
            ConfigStore::open(storage),
            Typist::new(Arc::new(TokioPacer)),
        )
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    pub fn typist(&self) -> &Typist {
        &self.typist
    }

    // --- Dictionaries ---

    pub async fn load_dictionary(&self, id: &str) -> SgResult<Arc<Dictionary>> {
        self.store.load(id).await
    }

    pub async fn load_all_dictionaries(&self) -> LoadSummary {
        self.store.load_all().await
    }

    /// Ranked matches for `text` in dictionary `id`. An empty query yields no
    /// entries.
    pub fn query(&self, text: &str, id: &str, spec: SortSpec) -> SgResult<Suggestions> {
        let dict = self.store.get(id)?;
        Ok(Suggestions::from_ranked(text, &dict, spec))
    }

    pub fn active_dictionary(&self) -> String {
        self.active
            .read()
            .map(|a| a.clone())
            .unwrap_or_else(|_| DEFAULT_DICTIONARY.to_string())
    }

    /// Makes `id` the active dictionary. It need not be loaded yet.
    pub fn select_dictionary(&self, id: &str) -> SgResult<()> {
        if self.store.source(id).is_none() {
            return Err(SuggesterError::UnknownDictionary(id.to_string()));
        }
        let mut active = self
            .active
            .write()
            .map_err(|_| SuggesterError::UnknownDictionary(id.to_string()))?;
        *active = id.to_string();
        info!("Active dictionary: {}", id);
        Ok(())
    }

    pub fn sort(&self) -> SortSpec {
        self.sort.read().map(|s| *s).unwrap_or_default()
    }

    pub fn set_sort(&self, spec: SortSpec) {
        if let Ok(mut sort) = self.sort.write() {
            *sort = spec;
        }
    }

    /// Observer entry point. Returns `None` for an empty query or while the
    /// active dictionary is unavailable.
    pub fn on_query_changed(&self, text: &str) -> Option<Suggestions> {
        if text.trim().is_empty() {
            return None;
        }
        let id = self.active_dictionary();
        match self.query(text, &id, self.sort()) {
            Ok(s) => {
                debug!("{} matches for '{}' in {}", s.len(), s.query, id);
                Some(s)
            }
            Err(e) => {
                debug!("No suggestions for '{}': {}", text.trim(), e);
                None
            }
        }
    }

    /// Drives [`Assistant::on_query_changed`] from a feed of query strings
    /// until the sender side closes.
    pub async fn follow_queries<F>(&self, mut rx: mpsc::Receiver<String>, mut render: F)
    where
        F: FnMut(Suggestions),
    {
        while let Some(text) = rx.recv().await {
            if let Some(s) = self.on_query_changed(&text) {
                render(s);
            }
        }
        debug!("Query feed closed");
    }

    // --- Typing ---

    /// Types `word` with the settings in effect when the call starts.
    pub async fn simulate_typing<S>(
        &self,
        word: &str,
        sink: Option<&mut S>,
        cancel: &CancelToken,
    ) -> TypingOutcome
    where
        S: InputSink + ?Sized,
    {
        let config = self.get_config();
        self.typist.simulate(word, sink, &config, cancel).await
    }

    // --- Settings ---

    pub fn get_config(&self) -> TyperConfig {
        match self.config.lock() {
            Ok(c) => c.current(),
            Err(_) => {
                warn!("Settings lock poisoned; using defaults");
                TyperConfig::DEFAULT
            }
        }
    }

    pub fn get_config_value(&self, path: &str) -> SgResult<f64> {
        self.get_config().get(path)
    }

    /// Returns the value actually stored after clamping.
    pub fn set_config(&self, path: &str, value: f64) -> SgResult<f64> {
        let mut config = self
            .config
            .lock()
            .map_err(|e| SuggesterError::Persistence(e.to_string()))?;
        config.set(path, value)
    }

    pub fn reset_config(&self) -> TyperConfig {
        match self.config.lock() {
            Ok(mut c) => c.reset_to_defaults(),
            Err(_) => TyperConfig::DEFAULT,
        }
    }
}
