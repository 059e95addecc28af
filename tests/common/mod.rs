#![allow(dead_code)]

use std::sync::Arc;
use syllaforge::config::ConfigStore;
use syllaforge::dictionary::{default_catalog, DictionaryStore, StaticFetcher};
use syllaforge::storage::MemoryStorage;
use syllaforge::typist::{RecordingPacer, Typist};
use syllaforge::Assistant;

pub const CSV_5K: &str = "\
Rank,Word,Part of speech,Frequency,Dispersion
1,the,a,22038615,0.98
2,be,v,12545825,0.97
3,and,c,10741073,0.99
15,are,v,2155937,0.97
94,car,n,250000,0.9
120,part,n,180000,0.9
410,bar,n,90000,0.9
2001,arrive,v,30000,0.9
";

pub const RANKED_20K: &str = "the\nof\nand\nare\ncar\nhard\nbar\ncarpet\n";

pub const FLAT_273K: &str = "aardvark\nbar\nbizarre\ncarpet\njazz\nquiz\n";

/// A fetcher serving the fixtures above at the stock catalog locations.
pub fn fixture_fetcher() -> StaticFetcher {
    let catalog = default_catalog();
    let texts = [CSV_5K, RANKED_20K, FLAT_273K];
    let fetcher = StaticFetcher::new();
    for (source, text) in catalog.iter().zip(texts) {
        fetcher.insert(&source.location, text);
    }
    fetcher
}

pub fn fixture_store() -> DictionaryStore {
    DictionaryStore::new(default_catalog(), Arc::new(fixture_fetcher()))
}

/// An assistant over the fixtures that records pauses instead of sleeping.
pub fn fixture_assistant(seed: u64) -> (Assistant, Arc<RecordingPacer>) {
    let pacer = Arc::new(RecordingPacer::new());
    let assistant = Assistant::new(
        fixture_store(),
        ConfigStore::open(Arc::new(MemoryStorage::new())),
        Typist::seeded(pacer.clone(), seed),
    );
    (assistant, pacer)
}

pub fn words(entries: &[&syllaforge::dictionary::DictionaryEntry]) -> Vec<String> {
    entries.iter().map(|e| e.word.clone()).collect()
}
