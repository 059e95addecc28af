use super::fetch::SourceFetcher;
use super::loader::build_dictionary;
use super::{Dictionary, DictionarySource};
use crate::error::{SgResult, SuggesterError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{OnceCell, SetError};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loading,
    Loaded(usize),
    Failed(String),
}

#[derive(Debug, Clone)]
enum SlotStatus {
    Pending,
    Loading,
    Failed(String),
}

/// One catalog entry. `cell` is populated at most once; concurrent loads of
/// the same id wait on the load already in flight.
#[derive(Debug, Clone)]
struct Slot {
    source: DictionarySource,
    cell: Arc<OnceCell<Arc<Dictionary>>>,
    status: SlotStatus,
}

/// Outcome of loading every dictionary in the catalog.
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub loaded: Vec<String>,
    pub failed: Vec<(String, SuggesterError)>,
}

impl LoadSummary {
    pub fn all_loaded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Named dictionaries and their load state.
///
/// Each dictionary is populated at most once; after that it is handed out as
/// a shared, immutable `Arc<Dictionary>`. Loads are independent: one failing
/// source never affects another. Cloning the store is cheap and every clone
/// sees the same dictionaries.
#[derive(Clone)]
pub struct DictionaryStore {
    slots: Arc<RwLock<HashMap<String, Slot>>>,
    order: Arc<Vec<String>>,
    fetcher: Arc<dyn SourceFetcher>,
    timeout: Duration,
}

impl DictionaryStore {
    pub fn new(catalog: Vec<DictionarySource>, fetcher: Arc<dyn SourceFetcher>) -> Self {
        let order = catalog.iter().map(|s| s.id.clone()).collect();
        let slots = catalog
            .into_iter()
            .map(|source| {
                (
                    source.id.clone(),
                    Slot {
                        source,
                        cell: Arc::new(OnceCell::new()),
                        status: SlotStatus::Pending,
                    },
                )
            })
            .collect();

        Self {
            slots: Arc::new(RwLock::new(slots)),
            order: Arc::new(order),
            fetcher,
            timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Dictionary ids in catalog order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn source(&self, id: &str) -> Option<DictionarySource> {
        let slots = self.slots.read().ok()?;
        slots.get(id).map(|s| s.source.clone())
    }

    pub fn state(&self, id: &str) -> Option<LoadState> {
        let slots = self.slots.read().ok()?;
        slots.get(id).map(|s| match (s.cell.get(), &s.status) {
            (Some(d), _) => LoadState::Loaded(d.len()),
            (None, SlotStatus::Pending) => LoadState::Pending,
            (None, SlotStatus::Loading) => LoadState::Loading,
            (None, SlotStatus::Failed(e)) => LoadState::Failed(e.clone()),
        })
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        matches!(self.state(id), Some(LoadState::Loaded(_)))
    }

    /// Returns a loaded dictionary.
    pub fn get(&self, id: &str) -> SgResult<Arc<Dictionary>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| SuggesterError::NotLoaded(id.to_string()))?;
        let slot = slots
            .get(id)
            .ok_or_else(|| SuggesterError::UnknownDictionary(id.to_string()))?;
        slot.cell
            .get()
            .cloned()
            .ok_or_else(|| SuggesterError::NotLoaded(id.to_string()))
    }

    /// Fetches and parses one dictionary. An already loaded dictionary is
    /// returned as-is without refetching, and a caller arriving while a load
    /// is in flight waits for that load instead of starting another.
    pub async fn load(&self, id: &str) -> SgResult<Arc<Dictionary>> {
        let (source, cell) = self.slot_handle(id)?;
        if let Some(dict) = cell.get() {
            info!("Dictionary already loaded: {}", id);
            return Ok(dict.clone());
        }

        let dict = cell
            .get_or_try_init(|| async {
                self.set_status(id, SlotStatus::Loading);
                info!("Loading dictionary '{}' from {}", id, source.location);
                let fetched =
                    tokio::time::timeout(self.timeout, self.fetcher.fetch_text(&source.location))
                        .await
                        .map_err(|_| {
                            SuggesterError::LoadTimeout(
                                id.to_string(),
                                self.timeout.as_millis() as u64,
                            )
                        })
                        .and_then(|r| r);
                let result = fetched.and_then(|text| build_dictionary(id, &text, source.format));
                self.settle(id, result)
            })
            .await?;
        Ok(dict.clone())
    }

    /// Installs a dictionary from text the host already has in hand.
    pub fn load_from_text(&self, id: &str, text: &str) -> SgResult<Arc<Dictionary>> {
        let (source, cell) = self.slot_handle(id)?;
        if let Some(dict) = cell.get() {
            return Ok(dict.clone());
        }
        let dict = self.settle(id, build_dictionary(id, text, source.format))?;
        match cell.set(dict) {
            Ok(()) => self.get(id),
            // A concurrent load populated the slot first; that copy stays.
            Err(SetError::AlreadyInitializedError(_)) => self.get(id),
            Err(SetError::InitializingError(_)) => Err(SuggesterError::fetch(
                source.location,
                "a load of this dictionary is already in flight",
            )),
        }
    }

    /// Loads every catalog entry concurrently. Individual failures are
    /// collected, never propagated.
    pub async fn load_all(&self) -> LoadSummary {
        let mut set = JoinSet::new();
        for id in self.order.iter().cloned() {
            let store = self.clone();
            set.spawn(async move {
                let result = store.load(&id).await;
                (id, result)
            });
        }

        let mut summary = LoadSummary::default();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((id, Ok(_))) => summary.loaded.push(id),
                Ok((id, Err(e))) => summary.failed.push((id, e)),
                Err(e) => error!("Dictionary load task aborted: {}", e),
            }
        }

        let rank = |id: &str| self.order.iter().position(|o| o == id);
        summary.loaded.sort_by_key(|id| rank(id.as_str()));
        summary.failed.sort_by_key(|(id, _)| rank(id.as_str()));

        if summary.all_loaded() {
            info!("All dictionaries loaded.");
        } else {
            warn!(
                "{} of {} dictionaries failed to load",
                summary.failed.len(),
                self.order.len()
            );
        }
        summary
    }

    fn slot_handle(
        &self,
        id: &str,
    ) -> SgResult<(DictionarySource, Arc<OnceCell<Arc<Dictionary>>>)> {
        let slots = self
            .slots
            .read()
            .map_err(|e| SuggesterError::fetch(id, e))?;
        let slot = slots
            .get(id)
            .ok_or_else(|| SuggesterError::UnknownDictionary(id.to_string()))?;
        Ok((slot.source.clone(), slot.cell.clone()))
    }

    fn set_status(&self, id: &str, status: SlotStatus) {
        if let Ok(mut slots) = self.slots.write() {
            if let Some(slot) = slots.get_mut(id) {
                slot.status = status;
            }
        }
    }

    /// Logs and records the outcome of one parse.
    fn settle(&self, id: &str, result: SgResult<Dictionary>) -> SgResult<Arc<Dictionary>> {
        match result {
            Ok(dict) => {
                info!("Dictionary loaded: {} ({} words)", id, dict.len());
                Ok(Arc::new(dict))
            }
            Err(e) => {
                error!("Error loading dictionary {}: {}", id, e);
                self.set_status(id, SlotStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }
}
