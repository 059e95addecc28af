use crate::error::{SgResult, SuggesterError};
use crate::storage::Persistence;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key the settings blob lives under.
pub const SETTINGS_KEY: &str = "bombPartyTyperSettings";

/// Upper bound for `typoChance` (percent).
pub const MAX_TYPO_CHANCE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayDistribution {
    pub mean: f64,
    pub std_dev: f64,
}

impl DelayDistribution {
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TyperConfig {
    // === KEYSTROKE RHYTHM (ms) ===
    pub base_delay: f64,
    pub distance_multiplier: f64,
    pub min_delay: f64,
    /// Fraction of the mean delay used as the standard deviation.
    pub delay_variation: f64,

    // === TYPOS ===
    /// Percent chance (0-100) per character.
    pub typo_chance: f64,
    pub typo_notice_delay: DelayDistribution,
    pub typo_backspace_delay: DelayDistribution,
    pub typo_recovery_delay: DelayDistribution,
}

impl TyperConfig {
    pub const DEFAULT: TyperConfig = TyperConfig {
        base_delay: 60.0,
        distance_multiplier: 12.5,
        min_delay: 15.0,
        delay_variation: 0.2,
        typo_chance: 2.0,
        typo_notice_delay: DelayDistribution::new(250.0, 60.0),
        typo_backspace_delay: DelayDistribution::new(100.0, 40.0),
        typo_recovery_delay: DelayDistribution::new(200.0, 50.0),
    };
}

impl Default for TyperConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

macro_rules! config_paths {
    ($($path:literal => $($field:ident).+),* $(,)?) => {
        /// Every dotted path accepted by [`TyperConfig::get`] and [`TyperConfig::set`].
        pub const CONFIG_PATHS: &[&str] = &[$($path),*];

        impl TyperConfig {
            pub fn get(&self, path: &str) -> SgResult<f64> {
                match path {
                    $($path => Ok(self.$($field).+),)*
                    _ => Err(SuggesterError::InvalidConfigPath(path.to_string())),
                }
            }

            fn slot_mut(&mut self, path: &str) -> Option<&mut f64> {
                match path {
                    $($path => Some(&mut self.$($field).+),)*
                    _ => None,
                }
            }
        }
    };
}

config_paths! {
    "baseDelay" => base_delay,
    "distanceMultiplier" => distance_multiplier,
    "minDelay" => min_delay,
    "delayVariation" => delay_variation,
    "typoChance" => typo_chance,
    "typoNoticeDelay.mean" => typo_notice_delay.mean,
    "typoNoticeDelay.stdDev" => typo_notice_delay.std_dev,
    "typoBackspaceDelay.mean" => typo_backspace_delay.mean,
    "typoBackspaceDelay.stdDev" => typo_backspace_delay.std_dev,
    "typoRecoveryDelay.mean" => typo_recovery_delay.mean,
    "typoRecoveryDelay.stdDev" => typo_recovery_delay.std_dev,
}

/// Clamps a settings value into its legal range. Non-finite input is rejected.
pub fn clamp_value(path: &str, value: f64) -> SgResult<f64> {
    if !value.is_finite() {
        return Err(SuggesterError::InvalidConfigValue {
            path: path.to_string(),
            value,
        });
    }
    let value = value.max(0.0);
    if path == "typoChance" {
        Ok(value.min(MAX_TYPO_CHANCE))
    } else {
        Ok(value)
    }
}

impl TyperConfig {
    /// Sets a dotted-path leaf and returns the value actually stored.
    pub fn set(&mut self, path: &str, value: f64) -> SgResult<f64> {
        let clamped = clamp_value(path, value)?;
        let slot = self
            .slot_mut(path)
            .ok_or_else(|| SuggesterError::InvalidConfigPath(path.to_string()))?;
        *slot = clamped;
        Ok(clamped)
    }

    /// Replaces out-of-range leaves: non-finite values fall back to the
    /// default, everything else is clamped.
    pub fn sanitized(mut self) -> Self {
        for path in CONFIG_PATHS {
            let Some(slot) = self.slot_mut(path) else {
                continue;
            };
            *slot = match clamp_value(path, *slot) {
                Ok(v) => v,
                Err(_) => {
                    warn!("Settings value '{}' is not finite; using default", path);
                    Self::DEFAULT.get(path).unwrap_or(0.0)
                }
            };
        }
        self
    }

    /// Parses a stored blob, deep-merging it over the defaults so a partial
    /// blob only overrides the keys it names.
    pub fn from_blob(blob: &str) -> SgResult<Self> {
        let patch: Value = serde_json::from_str(blob)?;
        let mut merged = serde_json::to_value(Self::DEFAULT)?;
        merge_json(&mut merged, patch);
        let config: TyperConfig = serde_json::from_value(merged)?;
        Ok(config.sanitized())
    }

    pub fn to_blob(&self) -> SgResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (k, v) in patch_map {
                match base_map.get_mut(&k) {
                    Some(existing) => merge_json(existing, v),
                    None => {
                        base_map.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

/// The live settings plus their persistence.
///
/// Storage failures are never fatal: they are logged and the in-memory value
/// stays authoritative.
pub struct ConfigStore {
    storage: Arc<dyn Persistence>,
    key: String,
    current: TyperConfig,
}

impl ConfigStore {
    pub fn new(storage: Arc<dyn Persistence>) -> Self {
        Self {
            storage,
            key: SETTINGS_KEY.to_string(),
            current: TyperConfig::DEFAULT,
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    /// Creates the store and immediately loads any saved settings.
    pub fn open(storage: Arc<dyn Persistence>) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    pub fn current(&self) -> TyperConfig {
        self.current
    }

    /// Reloads from storage. Missing, unreadable or corrupt blobs yield the
    /// defaults.
    pub fn load(&mut self) -> TyperConfig {
        self.current = match self.storage.read_blob(&self.key) {
            Ok(Some(blob)) => match TyperConfig::from_blob(&blob) {
                Ok(cfg) => {
                    info!("Loaded saved typer settings");
                    cfg
                }
                Err(e) => {
                    warn!("Error loading saved settings: {}", e);
                    TyperConfig::DEFAULT
                }
            },
            Ok(None) => {
                debug!("No saved typer settings; using defaults");
                TyperConfig::DEFAULT
            }
            Err(e) => {
                warn!("Settings storage unavailable: {}", e);
                TyperConfig::DEFAULT
            }
        };
        self.current
    }

    /// Persists `config` and adopts it. Returns whether the write succeeded.
    pub fn save(&mut self, config: TyperConfig) -> bool {
        self.current = config.sanitized();
        self.persist()
    }

    pub fn get(&self, path: &str) -> SgResult<f64> {
        self.current.get(path)
    }

    pub fn set(&mut self, path: &str, value: f64) -> SgResult<f64> {
        let stored = self.current.set(path, value)?;
        self.persist();
        Ok(stored)
    }

    pub fn reset_to_defaults(&mut self) -> TyperConfig {
        self.current = TyperConfig::DEFAULT;
        self.persist();
        self.current
    }

    fn persist(&self) -> bool {
        let blob = match self.current.to_blob() {
            Ok(b) => b,
            Err(e) => {
                warn!("Error serializing settings: {}", e);
                return false;
            }
        };
        match self.storage.write_blob(&self.key, &blob) {
            Ok(()) => {
                debug!("Saved typer settings");
                true
            }
            Err(e) => {
                warn!("Error saving settings: {}", e);
                false
            }
        }
    }
}
