use crate::reports;
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use syllaforge::config::ConfigStore;
use syllaforge::dictionary::{default_catalog, DictionaryStore, FileFetcher};
use syllaforge::storage::FileStorage;
use syllaforge::typist::{
    CancelToken, InputSink, MemorySink, Pacer, RecordingPacer, TokioPacer, Typist, TypingOutcome,
};
use syllaforge::Assistant;
use tokio::time::Instant;

#[derive(Args, Debug, Clone)]
pub struct TypeArgs {
    pub word: String,

    /// Fixes the random stream so runs are repeatable.
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Skip the real waits and print the delay schedule instead.
    #[arg(long, default_value_t = false)]
    pub instant: bool,
}

/// Echoes every change of the text box to stdout.
struct ConsoleSink {
    inner: MemorySink,
    started: Instant,
}

impl ConsoleSink {
    fn new() -> Self {
        Self {
            inner: MemorySink::new(true),
            started: Instant::now(),
        }
    }
}

impl InputSink for ConsoleSink {
    fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    fn set_text(&mut self, text: &str) {
        self.inner.set_text(text);
    }

    fn append_char(&mut self, c: char) {
        self.inner.append_char(c);
    }

    fn delete_last_char(&mut self) {
        self.inner.delete_last_char();
    }

    fn notify_changed(&mut self) {
        self.inner.notify_changed();
        println!(
            "{:>7}ms | {}",
            self.started.elapsed().as_millis(),
            self.inner.text()
        );
    }

    fn submit(&mut self) {
        self.inner.submit();
        println!("submit: {}", self.inner.text());
    }
}

pub async fn run(args: TypeArgs, data_dir: &Path, config_dir: &Path) -> i32 {
    let recorder = Arc::new(RecordingPacer::new());
    let pacer: Arc<dyn Pacer> = if args.instant {
        recorder.clone()
    } else {
        Arc::new(TokioPacer)
    };
    let typist = match args.seed {
        Some(seed) => Typist::seeded(pacer, seed),
        None => Typist::new(pacer),
    };

    let assistant = Assistant::new(
        DictionaryStore::new(default_catalog(), Arc::new(FileFetcher::new(data_dir))),
        ConfigStore::open(Arc::new(FileStorage::new(config_dir))),
        typist,
    );

    let cancel = CancelToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut sink = ConsoleSink::new();
    let outcome = assistant
        .simulate_typing(&args.word, Some(&mut sink), &cancel)
        .await;

    match outcome {
        TypingOutcome::Completed(stats) => {
            if args.instant {
                reports::print_schedule(&recorder.pauses());
            }
            reports::print_typing_stats(&args.word, &stats);
            0
        }
        other => {
            eprintln!("⚠️  Typing did not complete: {:?}", other);
            1
        }
    }
}
