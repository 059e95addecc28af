use super::{Dictionary, DictionaryEntry, DictionaryFormat};
use crate::error::SgResult;
use tracing::debug;

/// Column holding the word in CSV sources.
const CSV_WORD_COL: usize = 1;
/// Column holding the occurrence count in CSV sources.
const CSV_FREQ_COL: usize = 3;

/// Parses raw word list text into entries. Blank lines and rows without a
/// word are dropped.
pub fn parse_dictionary(text: &str, format: DictionaryFormat) -> SgResult<Vec<DictionaryEntry>> {
    let entries = match format {
        DictionaryFormat::CsvWithHeader => parse_csv(text)?,
        DictionaryFormat::Ranked => parse_ranked(text),
        DictionaryFormat::Flat => parse_flat(text),
    };
    Ok(entries)
}

/// Parses `text` and wraps it as a read-only dictionary.
pub fn build_dictionary(id: &str, text: &str, format: DictionaryFormat) -> SgResult<Dictionary> {
    let entries = parse_dictionary(text, format)?;
    debug!("Parsed '{}' as {}: {} words", id, format, entries.len());
    Ok(Dictionary::new(id, entries, format.has_frequency()))
}

/// The first physical line is the header and is dropped whatever it holds.
/// Only `\n` ends a row; a stray `\r` stays inside its field.
fn parse_csv(text: &str) -> SgResult<Vec<DictionaryEntry>> {
    let body = text.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let rec = result?;
        if rec.len() <= CSV_FREQ_COL {
            skipped += 1;
            continue;
        }
        let word = &rec[CSV_WORD_COL];
        if word.is_empty() {
            skipped += 1;
            continue;
        }
        entries.push(DictionaryEntry::new(word, parse_count(&rec[CSV_FREQ_COL])));
    }

    if skipped > 0 {
        debug!("Skipped {} short or empty CSV rows", skipped);
    }
    Ok(entries)
}

/// Earlier lines rank higher: frequency is `line_count - index`.
fn parse_ranked(text: &str) -> Vec<DictionaryEntry> {
    let lines: Vec<&str> = text.lines().collect();
    let total = lines.len() as u64;

    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let word = line.trim();
            if word.is_empty() {
                None
            } else {
                Some(DictionaryEntry::new(word, total - idx as u64))
            }
        })
        .collect()
}

fn parse_flat(text: &str) -> Vec<DictionaryEntry> {
    text.lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(|w| DictionaryEntry::new(w, 1))
        .collect()
}

/// Reads the leading run of digits (after optional whitespace and `+`).
/// Anything unparseable, including negative numbers, counts as 0.
fn parse_count(field: &str) -> u64 {
    let s = field.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let digits = &s[..end];
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}
