use crate::error::{SgResult, SuggesterError};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Marker for "no key" in the letter lookup table.
const KEY_NOT_FOUND: u8 = u8::MAX;

/// Grid coordinates are `i8`, so rows and columns index from 0 to 127.
const MAX_GRID_SPAN: usize = i8::MAX as usize + 1;

/// Key indices share `u8` with [`KEY_NOT_FOUND`].
const MAX_KEYS: usize = KEY_NOT_FOUND as usize;

/// Standard QWERTY letter block, one string per physical row.
const QWERTY_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPosition {
    pub key: char,
    pub row: i8, // 0=Top, 1=Home, 2=Bottom
    pub col: i8,
}

impl KeyPosition {
    /// Chebyshev distance on the grid (max of row/col delta).
    pub fn chebyshev(&self, other: &KeyPosition) -> i8 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    /// Straight-line distance between key centres, in key units.
    pub fn euclidean(&self, other: &KeyPosition) -> f64 {
        let dr = f64::from(self.row - other.row);
        let dc = f64::from(self.col - other.col);
        (dr * dr + dc * dc).sqrt()
    }
}

/// Key positions plus the adjacency sets derived from them.
///
/// Built once and never mutated, so a single instance can be shared by every
/// simulator through [`KeyboardModel::shared`].
#[derive(Debug, Clone)]
pub struct KeyboardModel {
    keys: Vec<KeyPosition>,
    lookup: [u8; 26],
    adjacent: Vec<Vec<char>>,
}

impl KeyboardModel {
    /// Builds a model from rows of keys. Column indices restart at 0 on every
    /// row, matching the unstaggered grid the delay model measures on.
    ///
    /// Fails when the grid does not fit the model: more than 128 rows, a row
    /// longer than 128 keys, or more than 255 keys in total.
    pub fn from_rows(rows: &[&str]) -> SgResult<Self> {
        if rows.len() > MAX_GRID_SPAN {
            return Err(SuggesterError::InvalidLayout(format!(
                "{} rows (max {})",
                rows.len(),
                MAX_GRID_SPAN
            )));
        }
        let mut total = 0;
        for (r, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len > MAX_GRID_SPAN {
                return Err(SuggesterError::InvalidLayout(format!(
                    "row {} has {} keys (max {})",
                    r, len, MAX_GRID_SPAN
                )));
            }
            total += len;
        }
        if total > MAX_KEYS {
            return Err(SuggesterError::InvalidLayout(format!(
                "{} keys (max {})",
                total, MAX_KEYS
            )));
        }
        Ok(Self::build(rows))
    }

    /// Callers guarantee `rows` fits the `i8` grid and the `u8` key index.
    fn build(rows: &[&str]) -> Self {
        let mut keys = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, key) in row.chars().enumerate() {
                keys.push(KeyPosition {
                    key: key.to_ascii_lowercase(),
                    row: r as i8,
                    col: c as i8,
                });
            }
        }

        let mut lookup = [KEY_NOT_FOUND; 26];
        for (i, k) in keys.iter().enumerate() {
            if let Some(slot) = letter_slot(k.key) {
                lookup[slot] = i as u8;
            }
        }

        let adjacent = keys
            .iter()
            .map(|k| {
                keys.iter()
                    .filter(|o| o.key != k.key && k.chebyshev(o) <= 1)
                    .map(|o| o.key)
                    .collect()
            })
            .collect();

        Self {
            keys,
            lookup,
            adjacent,
        }
    }

    pub fn qwerty() -> Self {
        Self::build(&QWERTY_ROWS)
    }

    /// Process-wide QWERTY model.
    pub fn shared() -> &'static KeyboardModel {
        static MODEL: OnceLock<KeyboardModel> = OnceLock::new();
        MODEL.get_or_init(KeyboardModel::qwerty)
    }

    pub fn keys(&self) -> &[KeyPosition] {
        &self.keys
    }

    fn index_of(&self, key: char) -> Option<usize> {
        let slot = letter_slot(key.to_ascii_lowercase())?;
        match self.lookup[slot] {
            KEY_NOT_FOUND => None,
            idx => Some(idx as usize),
        }
    }

    pub fn position(&self, key: char) -> Option<&KeyPosition> {
        self.index_of(key).map(|i| &self.keys[i])
    }

    /// Keys within one row and one column of `key`. Unknown keys have no
    /// neighbours.
    pub fn neighbors(&self, key: char) -> &[char] {
        match self.index_of(key) {
            Some(i) => &self.adjacent[i],
            None => &[],
        }
    }

    /// Euclidean grid distance, or `None` if either key is off the layout.
    pub fn distance(&self, from: char, to: char) -> Option<f64> {
        let a = self.position(from)?;
        let b = self.position(to)?;
        Some(a.euclidean(b))
    }
}

impl Default for KeyboardModel {
    fn default() -> Self {
        Self::qwerty()
    }
}

fn letter_slot(key: char) -> Option<usize> {
    if key.is_ascii_lowercase() {
        Some((key as u8 - b'a') as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qwerty_has_all_letters() {
        let model = KeyboardModel::qwerty();
        assert_eq!(model.keys().len(), 26);
        for c in 'a'..='z' {
            assert!(model.position(c).is_some(), "missing {}", c);
        }
    }

    #[test]
    fn test_corner_key_neighbors() {
        let model = KeyboardModel::qwerty();
        let mut q = model.neighbors('q').to_vec();
        q.sort();
        assert_eq!(q, vec!['a', 's', 'w']);
    }

    #[test]
    fn test_uppercase_resolves_to_same_key() {
        let model = KeyboardModel::qwerty();
        assert_eq!(model.neighbors('G'), model.neighbors('g'));
    }

    #[test]
    fn test_unknown_key_is_empty() {
        let model = KeyboardModel::qwerty();
        assert!(model.neighbors('1').is_empty());
        assert!(model.neighbors('é').is_empty());
        assert!(model.distance('a', ';').is_none());
    }
}
