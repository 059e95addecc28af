use async_trait::async_trait;
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use strum_macros::Display;

/// Why the simulator is pausing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DelayKind {
    InterKey,
    TypoNotice,
    TypoBackspace,
    TypoRecovery,
}

/// Suspension points of a typing run.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, kind: DelayKind, ms: f64);
}

/// Real-time pacing on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, _kind: DelayKind, ms: f64) {
        if ms.is_finite() && ms > 0.0 {
            tokio::time::sleep(Duration::from_secs_f64(ms / 1000.0)).await;
        }
    }
}

/// Records the schedule instead of waiting. Yields once per pause so other
/// tasks still interleave.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<(DelayKind, f64)>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<(DelayKind, f64)> {
        self.pauses.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<DelayKind> {
        self.pauses().into_iter().map(|(k, _)| k).collect()
    }

    pub fn total_ms(&self) -> f64 {
        self.pauses().iter().map(|(_, ms)| ms).sum()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, kind: DelayKind, ms: f64) {
        if let Ok(mut p) = self.pauses.lock() {
            p.push((kind, ms));
        }
        tokio::task::yield_now().await;
    }
}
