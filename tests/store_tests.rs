mod common;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use syllaforge::dictionary::store::LoadState;
use syllaforge::dictionary::{
    default_catalog, DictionarySource, DictionaryStore, FileFetcher, SourceFetcher,
};
use syllaforge::error::{SgResult, SuggesterError};

/// Counts fetches, yields once before answering, and never answers for
/// locations containing "slow".
struct CountingFetcher {
    calls: AtomicUsize,
    inner: syllaforge::dictionary::StaticFetcher,
}

#[async_trait]
impl SourceFetcher for CountingFetcher {
    async fn fetch_text(&self, location: &str) -> SgResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if location.contains("slow") {
            std::future::pending::<()>().await;
        }
        self.inner.fetch_text(location).await
    }
}

fn counting() -> Arc<CountingFetcher> {
    Arc::new(CountingFetcher {
        calls: AtomicUsize::new(0),
        inner: common::fixture_fetcher(),
    })
}

#[tokio::test]
async fn test_load_all_fixture_catalog() {
    let store = common::fixture_store();
    let summary = store.load_all().await;
    assert!(summary.all_loaded());
    assert_eq!(summary.loaded, vec!["5k", "20k", "273k"]);
    assert_eq!(store.state("5k"), Some(LoadState::Loaded(8)));
    assert!(store.get("20k").unwrap().has_frequency);
    assert!(!store.get("273k").unwrap().has_frequency);
}

#[tokio::test]
async fn test_one_failure_does_not_block_siblings() {
    let mut catalog = default_catalog();
    catalog.push(DictionarySource::new(
        "broken",
        "mem://nowhere.txt",
        syllaforge::dictionary::DictionaryFormat::Flat,
    ));
    let store = DictionaryStore::new(catalog, Arc::new(common::fixture_fetcher()));

    let summary = store.load_all().await;
    assert!(!summary.all_loaded());
    assert_eq!(summary.loaded.len(), 3);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "broken");
    assert!(matches!(summary.failed[0].1, SuggesterError::Fetch { .. }));
    assert!(!store.is_loaded("broken"));
    assert!(store.is_loaded("5k"));
}

#[tokio::test]
async fn test_loaded_dictionary_not_refetched() {
    let fetcher = counting();
    let store = DictionaryStore::new(default_catalog(), fetcher.clone());
    store.load("20k").await.unwrap();
    store.load("20k").await.unwrap();
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_loads_share_one_fetch() {
    let fetcher = counting();
    let store = DictionaryStore::new(default_catalog(), fetcher.clone());

    let (a, b) = tokio::join!(store.load("20k"), store.load("20k"));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.state("20k"), Some(LoadState::Loaded(a.len())));
}

#[tokio::test]
async fn test_concurrent_load_all_and_load() {
    let fetcher = counting();
    let store = DictionaryStore::new(default_catalog(), fetcher.clone());

    let (summary, one) = tokio::join!(store.load_all(), store.load("5k"));
    assert!(summary.all_loaded());
    assert!(Arc::ptr_eq(&one.unwrap(), &store.get("5k").unwrap()));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_failed_load_can_be_retried() {
    let fetcher = Arc::new(syllaforge::dictionary::StaticFetcher::new());
    let source = DictionarySource::new(
        "late",
        "mem://late.txt",
        syllaforge::dictionary::DictionaryFormat::Ranked,
    );
    let store = DictionaryStore::new(vec![source], fetcher.clone());

    assert!(store.load("late").await.is_err());
    fetcher.insert("mem://late.txt", "one\ntwo\n");
    let dict = store.load("late").await.unwrap();
    assert_eq!(dict.len(), 2);
}

#[tokio::test]
async fn test_unknown_id() {
    let store = common::fixture_store();
    assert!(matches!(
        store.load("100k").await,
        Err(SuggesterError::UnknownDictionary(_))
    ));
    assert!(matches!(
        store.get("100k"),
        Err(SuggesterError::UnknownDictionary(_))
    ));
    assert!(matches!(
        store.get("5k"),
        Err(SuggesterError::NotLoaded(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_hung_fetch_times_out() {
    let source = DictionarySource::new(
        "stuck",
        "mem://slow.txt",
        syllaforge::dictionary::DictionaryFormat::Flat,
    );
    let store = DictionaryStore::new(vec![source], counting())
        .with_timeout(Duration::from_secs(5));

    let err = store.load("stuck").await.unwrap_err();
    assert!(matches!(err, SuggesterError::LoadTimeout(ref id, 5000) if id == "stuck"));
    assert!(matches!(store.state("stuck"), Some(LoadState::Failed(_))));
}

#[tokio::test]
async fn test_file_fetcher_reads_mirror() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("en.txt"), common::FLAT_273K).unwrap();

    let store = DictionaryStore::new(default_catalog(), Arc::new(FileFetcher::new(dir.path())));
    let dict = store.load("273k").await.unwrap();
    assert_eq!(dict.len(), 6);
    assert!(store.load("5k").await.is_err());
}
