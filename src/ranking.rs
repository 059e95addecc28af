use crate::dictionary::{Dictionary, DictionaryEntry};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum_macros::{Display, EnumIter, EnumString};

/// Score for characters outside the letter table.
pub const DEFAULT_LETTER_SCORE: u32 = 13;

/// English letters from most (1) to least (26) common.
const LETTER_RANKS: &[u8; 26] = b"etaoinshrdlucmwfgypbvkjxqz";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortMethod {
    Frequency,
    Length,
    Rarity,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[strum(to_string = "asc", serialize = "ascending")]
    Ascending,
    #[strum(to_string = "desc", serialize = "descending")]
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub method: SortMethod,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn new(method: SortMethod, direction: SortDirection) -> Self {
        Self { method, direction }
    }

    /// The comparator actually used against `dict`. Frequency ranking on a
    /// dictionary without frequency data falls back to length; `self` is
    /// left untouched.
    pub fn effective_method(&self, dict: &Dictionary) -> SortMethod {
        if self.method == SortMethod::Frequency && !dict.has_frequency {
            SortMethod::Length
        } else {
            self.method
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortMethod::Frequency, SortDirection::Descending)
    }
}

/// Additive letter-commonness score: rarer letters add more.
pub fn rarity_score(word: &str) -> u32 {
    word.chars()
        .flat_map(char::to_lowercase)
        .map(letter_score)
        .sum()
}

fn letter_score(c: char) -> u32 {
    LETTER_RANKS
        .iter()
        .position(|&l| l as char == c)
        .map(|p| p as u32 + 1)
        .unwrap_or(DEFAULT_LETTER_SCORE)
}

/// Entries whose lower-cased word contains the trimmed, lower-cased query as
/// a literal substring, in dictionary order. An empty query matches nothing.
pub fn find_matches<'a>(query: &str, dict: &'a Dictionary) -> Vec<&'a DictionaryEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    dict.entries
        .iter()
        .filter(|e| e.key().contains(needle.as_str()))
        .collect()
}

fn descending_cmp(method: SortMethod, a: &DictionaryEntry, b: &DictionaryEntry) -> Ordering {
    match method {
        SortMethod::Frequency => b.frequency.cmp(&a.frequency),
        SortMethod::Length => b.len().cmp(&a.len()),
        SortMethod::Rarity => rarity_score(&b.word).cmp(&rarity_score(&a.word)),
    }
}

/// Stable sort by `method`. Ascending is the exact reverse of descending,
/// ties included.
pub fn rank(matches: &mut [&DictionaryEntry], method: SortMethod, direction: SortDirection) {
    if method == SortMethod::Rarity {
        // Score once per entry rather than once per comparison.
        let mut scored: Vec<(u32, &DictionaryEntry)> =
            matches.iter().map(|e| (rarity_score(&e.word), *e)).collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        for (slot, (_, e)) in matches.iter_mut().zip(scored) {
            *slot = e;
        }
    } else {
        matches.sort_by(|a, b| descending_cmp(method, a, b));
    }

    if direction == SortDirection::Ascending {
        matches.reverse();
    }
}

/// Matches for one query, ranked.
#[derive(Debug, Clone)]
pub struct Ranked<'a> {
    pub applied: SortMethod,
    pub entries: Vec<&'a DictionaryEntry>,
}

/// Find and rank in one step, applying the frequency fallback.
pub fn query<'a>(text: &str, dict: &'a Dictionary, spec: SortSpec) -> Ranked<'a> {
    let applied = spec.effective_method(dict);
    let mut entries = find_matches(text, dict);
    rank(&mut entries, applied, spec.direction);
    Ranked { applied, entries }
}

/// Splits `word` around the first case-insensitive occurrence of `query`:
/// `(before, matched, after)`. Returns `None` when it does not occur.
pub fn highlight<'w>(word: &'w str, query: &str) -> Option<(&'w str, &'w str, &'w str)> {
    let needle: Vec<char> = query.trim().chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }

    let indices: Vec<(usize, char)> = word.char_indices().collect();
    for start in 0..indices.len() {
        let mut matched = 0;
        let mut pos = start;
        while matched < needle.len() && pos < indices.len() {
            let mut lower = indices[pos].1.to_lowercase();
            if lower.len() != 1 || lower.next() != Some(needle[matched]) {
                break;
            }
            matched += 1;
            pos += 1;
        }
        if matched == needle.len() {
            let begin = indices[start].0;
            let end = indices.get(pos).map(|(i, _)| *i).unwrap_or(word.len());
            return Some((&word[..begin], &word[begin..end], &word[end..]));
        }
    }
    None
}
