use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuggesterError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to fetch '{location}': {reason}")]
    Fetch { location: String, reason: String },

    #[error("Loading dictionary '{0}' timed out after {1} ms")]
    LoadTimeout(String, u64),

    #[error("Unknown dictionary: {0}")]
    UnknownDictionary(String),

    #[error("Dictionary not loaded: {0}")]
    NotLoaded(String),

    #[error("Invalid keyboard layout: {0}")]
    InvalidLayout(String),

    #[error("Unknown config path: {0}")]
    InvalidConfigPath(String),

    #[error("Invalid value for '{path}': {value}")]
    InvalidConfigValue { path: String, value: f64 },

    #[error("Persistence Error: {0}")]
    Persistence(String),
}

impl SuggesterError {
    pub fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

pub type SgResult<T> = Result<T, SuggesterError>;
