pub mod pacer;
pub mod sink;

pub use pacer::{DelayKind, Pacer, RecordingPacer, TokioPacer};
pub use sink::{InputSink, MemorySink, SinkEvent};

use crate::config::TyperConfig;
use crate::keyboard::KeyboardModel;
use crate::timing::{inter_key_delay, sample_phase};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, trace, warn};

/// Cooperative stop signal for a typing run, checked at every suspension
/// point. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TypingStats {
    /// Characters appended, typos included.
    pub keystrokes: usize,
    pub typos: usize,
    pub total_delay_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TypingOutcome {
    Completed(TypingStats),
    NoInputTarget,
    NotYourTurn,
    /// Another run on the same typist is still in flight.
    Busy,
    Cancelled,
}

impl TypingOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Progress through the word.
#[derive(Debug, Clone, Default)]
struct TypingSession {
    index: usize,
    last_emitted: Option<char>,
    typo_in_progress: bool,
    stats: TypingStats,
}

/// Releases the busy flag when a run ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Types words into an [`InputSink`] with human-like timing and typos.
pub struct Typist {
    keyboard: &'static KeyboardModel,
    pacer: Arc<dyn Pacer>,
    rng: Mutex<fastrand::Rng>,
    busy: AtomicBool,
}

impl Typist {
    pub fn new(pacer: Arc<dyn Pacer>) -> Self {
        Self::with_rng(pacer, fastrand::Rng::new())
    }

    /// Reproducible typist: the same seed and config give the same keystrokes.
    pub fn seeded(pacer: Arc<dyn Pacer>, seed: u64) -> Self {
        Self::with_rng(pacer, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(pacer: Arc<dyn Pacer>, rng: fastrand::Rng) -> Self {
        Self {
            keyboard: KeyboardModel::shared(),
            pacer,
            rng: Mutex::new(rng),
            busy: AtomicBool::new(false),
        }
    }

    pub fn keyboard(&self) -> &'static KeyboardModel {
        self.keyboard
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Clears the sink, types `word` one character at a time and submits it.
    ///
    /// `sink == None` means there is no input box to type into. Each character
    /// either goes straight in, or as an adjacent wrong key that is noticed,
    /// erased and corrected. The sink is notified after every mutation.
    pub async fn simulate<S>(
        &self,
        word: &str,
        sink: Option<&mut S>,
        config: &TyperConfig,
        cancel: &CancelToken,
    ) -> TypingOutcome
    where
        S: InputSink + ?Sized,
    {
        let Some(sink) = sink else {
            warn!("No input box to type into");
            return TypingOutcome::NoInputTarget;
        };
        if !sink.is_active() {
            info!("Not your turn; skipping '{}'", word);
            return TypingOutcome::NotYourTurn;
        }
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            warn!("Typing already in progress; ignoring '{}'", word);
            return TypingOutcome::Busy;
        };

        info!("Typing '{}'", word);
        let mut session = TypingSession::default();
        sink.set_text("");
        sink.notify_changed();

        for c in word.chars() {
            if cancel.is_cancelled() {
                return Self::cancelled(&session);
            }
            let completed = match self.pick_typo(c, config) {
                Some(wrong) => self.type_with_typo(sink, &mut session, c, wrong, config, cancel).await,
                None => self.type_plain(sink, &mut session, c, config, cancel).await,
            };
            if !completed {
                return Self::cancelled(&session);
            }
            session.index += 1;
        }

        if cancel.is_cancelled() {
            return Self::cancelled(&session);
        }
        sink.submit();
        debug!(
            "Typed '{}': {} keystrokes, {} typos, {:.0}ms",
            word, session.stats.keystrokes, session.stats.typos, session.stats.total_delay_ms
        );
        TypingOutcome::Completed(session.stats)
    }

    fn cancelled(session: &TypingSession) -> TypingOutcome {
        info!(
            "Typing cancelled at character {}{}",
            session.index,
            if session.typo_in_progress { " (mid-typo)" } else { "" }
        );
        TypingOutcome::Cancelled
    }

    /// The wrong key to hit for `c`, if this keystroke goes astray.
    fn pick_typo(&self, c: char, config: &TyperConfig) -> Option<char> {
        let neighbors = self.keyboard.neighbors(c);
        if neighbors.is_empty() {
            return None;
        }
        let mut rng = self.rng.lock().ok()?;
        if rng.f64() * 100.0 < config.typo_chance {
            Some(neighbors[rng.usize(..neighbors.len())])
        } else {
            None
        }
    }

    fn key_delay(&self, from: Option<char>, to: char, config: &TyperConfig) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => inter_key_delay(&mut rng, self.keyboard, from, to, config),
            Err(_) => config.base_delay,
        }
    }

    fn phase_delay(&self, kind: DelayKind, config: &TyperConfig) -> f64 {
        let dist = match kind {
            DelayKind::TypoNotice => &config.typo_notice_delay,
            DelayKind::TypoBackspace => &config.typo_backspace_delay,
            DelayKind::TypoRecovery => &config.typo_recovery_delay,
            DelayKind::InterKey => return config.base_delay,
        };
        match self.rng.lock() {
            Ok(mut rng) => sample_phase(&mut rng, dist),
            Err(_) => dist.mean.max(0.0),
        }
    }

    /// Waits, then reports whether the run may continue.
    async fn wait(
        &self,
        session: &mut TypingSession,
        kind: DelayKind,
        ms: f64,
        cancel: &CancelToken,
    ) -> bool {
        session.stats.total_delay_ms += ms;
        self.pacer.pause(kind, ms).await;
        !cancel.is_cancelled()
    }

    fn emit<S: InputSink + ?Sized>(sink: &mut S, session: &mut TypingSession, c: char) {
        sink.append_char(c);
        sink.notify_changed();
        session.stats.keystrokes += 1;
    }

    async fn type_plain<S: InputSink + ?Sized>(
        &self,
        sink: &mut S,
        session: &mut TypingSession,
        c: char,
        config: &TyperConfig,
        cancel: &CancelToken,
    ) -> bool {
        Self::emit(sink, session, c);
        let delay = self.key_delay(session.last_emitted, c, config);
        session.last_emitted = Some(c);
        self.wait(session, DelayKind::InterKey, delay, cancel).await
    }

    async fn type_with_typo<S: InputSink + ?Sized>(
        &self,
        sink: &mut S,
        session: &mut TypingSession,
        c: char,
        wrong: char,
        config: &TyperConfig,
        cancel: &CancelToken,
    ) -> bool {
        trace!("Typo: '{}' instead of '{}'", wrong, c);
        session.typo_in_progress = true;
        session.stats.typos += 1;

        Self::emit(sink, session, wrong);
        let delay = self.key_delay(None, wrong, config);
        if !self.wait(session, DelayKind::InterKey, delay, cancel).await {
            return false;
        }

        let notice = self.phase_delay(DelayKind::TypoNotice, config);
        if !self.wait(session, DelayKind::TypoNotice, notice, cancel).await {
            return false;
        }

        sink.delete_last_char();
        sink.notify_changed();
        let backspace = self.phase_delay(DelayKind::TypoBackspace, config);
        if !self.wait(session, DelayKind::TypoBackspace, backspace, cancel).await {
            return false;
        }

        Self::emit(sink, session, c);
        session.last_emitted = Some(c);
        session.typo_in_progress = false;
        let recovery = self.phase_delay(DelayKind::TypoRecovery, config);
        self.wait(session, DelayKind::TypoRecovery, recovery, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(typo_chance: f64) -> TyperConfig {
        TyperConfig {
            typo_chance,
            ..TyperConfig::default()
        }
    }

    #[tokio::test]
    async fn test_inactive_sink_untouched() {
        let typist = Typist::seeded(Arc::new(RecordingPacer::new()), 1);
        let mut sink = MemorySink::new(false);
        let out = typist
            .simulate("hello", Some(&mut sink), &config(0.0), &CancelToken::new())
            .await;
        assert_eq!(out, TypingOutcome::NotYourTurn);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_typists_share_keyboard() {
        let a = Typist::new(Arc::new(RecordingPacer::new()));
        let b = Typist::seeded(Arc::new(RecordingPacer::new()), 2);
        assert!(std::ptr::eq(a.keyboard(), b.keyboard()));
        assert!(std::ptr::eq(a.keyboard(), KeyboardModel::shared()));
    }

    #[tokio::test]
    async fn test_missing_sink() {
        let typist = Typist::seeded(Arc::new(RecordingPacer::new()), 1);
        let out = typist
            .simulate::<MemorySink>("hello", None, &config(0.0), &CancelToken::new())
            .await;
        assert_eq!(out, TypingOutcome::NoInputTarget);
    }

    #[tokio::test]
    async fn test_certain_typo_path_shape() {
        let pacer = Arc::new(RecordingPacer::new());
        let typist = Typist::seeded(pacer.clone(), 9);
        let mut sink = MemorySink::new(true);
        let out = typist
            .simulate("a", Some(&mut sink), &config(100.0), &CancelToken::new())
            .await;

        let TypingOutcome::Completed(stats) = out else {
            panic!("expected completion, got {:?}", out);
        };
        assert_eq!(stats.typos, 1);
        assert_eq!(stats.keystrokes, 2);
        assert_eq!(sink.submitted(), ["a"]);
        assert_eq!(
            pacer.kinds(),
            vec![
                DelayKind::InterKey,
                DelayKind::TypoNotice,
                DelayKind::TypoBackspace,
                DelayKind::TypoRecovery
            ]
        );
        let wrong = match sink.events()[2] {
            SinkEvent::Append(w) => w,
            ref other => panic!("unexpected event {:?}", other),
        };
        assert!(typist.keyboard().neighbors('a').contains(&wrong));
    }

    #[tokio::test]
    async fn test_busy_flag_released_after_run() {
        let typist = Typist::seeded(Arc::new(RecordingPacer::new()), 3);
        let mut sink = MemorySink::new(true);
        let cancel = CancelToken::new();
        assert!(typist
            .simulate("ab", Some(&mut sink), &config(0.0), &cancel)
            .await
            .is_completed());
        assert!(!typist.is_busy());
    }
}
