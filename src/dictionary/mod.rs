pub mod fetch;
pub mod loader;
pub mod store;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub use fetch::{FileFetcher, SourceFetcher, StaticFetcher};
pub use loader::parse_dictionary;
pub use store::{DictionaryStore, LoadSummary};

/// Line-oriented word list formats.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DictionaryFormat {
    /// Comma separated, one header row, word in column 1, count in column 3.
    CsvWithHeader,
    /// One word per line, most common first.
    Ranked,
    /// One word per line, no frequency information.
    Flat,
}

impl DictionaryFormat {
    pub fn has_frequency(&self) -> bool {
        !matches!(self, Self::Flat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryEntry {
    pub word: String,
    pub frequency: u64,
    #[serde(skip)]
    lowered: String,
}

impl DictionaryEntry {
    pub fn new(word: impl Into<String>, frequency: u64) -> Self {
        let word = word.into();
        let lowered = word.to_lowercase();
        Self {
            word,
            frequency,
            lowered,
        }
    }

    /// Lower-cased form used for matching.
    pub fn key(&self) -> &str {
        &self.lowered
    }

    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }
}

/// A fully loaded, read-only word list.
#[derive(Debug, Clone)]
pub struct Dictionary {
    pub id: String,
    pub entries: Vec<DictionaryEntry>,
    pub has_frequency: bool,
}

impl Dictionary {
    pub fn new(id: impl Into<String>, entries: Vec<DictionaryEntry>, has_frequency: bool) -> Self {
        Self {
            id: id.into(),
            entries,
            has_frequency,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a dictionary comes from and how to parse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionarySource {
    pub id: String,
    pub location: String,
    pub format: DictionaryFormat,
}

impl DictionarySource {
    pub fn new(id: &str, location: &str, format: DictionaryFormat) -> Self {
        Self {
            id: id.to_string(),
            location: location.to_string(),
            format,
        }
    }
}

pub const DEFAULT_DICTIONARY: &str = "5k";

/// The three upstream word lists the suggester ships with.
pub fn default_catalog() -> Vec<DictionarySource> {
    vec![
        DictionarySource::new(
            "5k",
            "https://raw.githubusercontent.com/filiph/english_words/master/data/word-freq-top5000.csv",
            DictionaryFormat::CsvWithHeader,
        ),
        DictionarySource::new(
            "20k",
            "https://raw.githubusercontent.com/first20hours/google-10000-english/master/google-10000-english-usa.txt",
            DictionaryFormat::Ranked,
        ),
        DictionarySource::new(
            "273k",
            "https://raw.githubusercontent.com/kli512/bombparty-assist/refs/heads/main/bombparty/dictionaries/en.txt",
            DictionaryFormat::Flat,
        ),
    ]
}
