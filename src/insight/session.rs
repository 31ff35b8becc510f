//! Insight Session
//!
//! Session-scoped cache for the narrative insight. Exactly one generation
//! attempt is made per session, the first time a non-empty history is
//! offered. The result is kept even if the history later changes.
//!
//! A consumer that goes away mid-request calls [`InsightSession::close`];
//! a result that arrives afterwards is discarded rather than applied.

use crate::insight::{fetch_insight, InsightGenerator, INSIGHT_PLACEHOLDER};
use crate::storage::DailyLogEntry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// One-shot insight cache for a session
#[derive(Clone)]
pub struct InsightSession {
    generator: Arc<dyn InsightGenerator>,
    state: Arc<RwLock<InsightState>>,
}

/// Current state of the session cache
#[derive(Debug, Clone)]
pub struct InsightState {
    /// Whether the single generation attempt has been started
    pub has_fetched: bool,
    /// Whether that attempt is still awaiting a result
    pub in_flight: bool,
    /// Generated text, if the attempt produced any
    pub result: Option<String>,
    /// Cleared by `close`; results are only applied while set
    pub interested: bool,
}

impl Default for InsightState {
    fn default() -> Self {
        Self {
            has_fetched: false,
            in_flight: false,
            result: None,
            interested: true,
        }
    }
}

impl InsightSession {
    /// Create a new session around a generator
    pub fn new(generator: Arc<dyn InsightGenerator>) -> Self {
        Self {
            generator,
            state: Arc::new(RwLock::new(InsightState::default())),
        }
    }

    /// Fetch the insight if this session has not tried yet.
    ///
    /// Returns the cached result. Empty histories never trigger a request.
    pub async fn fetch(&self, history: &[DailyLogEntry]) -> Option<String> {
        {
            let mut state = self.state.write().await;
            if history.is_empty() || state.has_fetched || !state.interested {
                return state.result.clone();
            }
            state.has_fetched = true;
            state.in_flight = true;
        }

        tracing::debug!(
            generator = self.generator.name(),
            entries = history.len(),
            "Fetching session insight"
        );
        let result = fetch_insight(self.generator.as_ref(), history).await;

        let mut state = self.state.write().await;
        state.in_flight = false;
        if state.interested {
            state.result = result;
        } else {
            tracing::debug!("Session closed before insight arrived, discarding result");
        }
        state.result.clone()
    }

    /// Run [`fetch`](Self::fetch) as a background task
    pub fn spawn_fetch(&self, history: Vec<DailyLogEntry>) -> JoinHandle<Option<String>> {
        let session = self.clone();
        tokio::spawn(async move { session.fetch(&history).await })
    }

    /// Mark the consumer as gone; late results will be dropped
    pub async fn close(&self) {
        self.state.write().await.interested = false;
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> InsightState {
        self.state.read().await.clone()
    }

    /// Cached insight, or the placeholder when there is none
    pub async fn display_text(&self) -> String {
        self.state
            .read()
            .await
            .result
            .clone()
            .unwrap_or_else(|| INSIGHT_PLACEHOLDER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::InsightError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Counts calls and optionally waits for a release signal before answering
    struct CountingGenerator {
        calls: AtomicUsize,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    impl CountingGenerator {
        fn new(fail: bool, gate: Option<Arc<Notify>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
                gate,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InsightGenerator for CountingGenerator {
        fn name(&self) -> &str {
            "counting"
        }

        async fn generate(&self, history: &[DailyLogEntry]) -> Result<Option<String>, InsightError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                Err(InsightError::Unavailable)
            } else {
                Ok(Some(format!("{} entries reviewed", history.len())))
            }
        }
    }

    fn history(n: usize) -> Vec<DailyLogEntry> {
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        (0..n).map(|_| DailyLogEntry::new(date)).collect()
    }

    #[tokio::test]
    async fn test_fetches_once_per_session() {
        let generator = CountingGenerator::new(false, None);
        let session = InsightSession::new(generator.clone());

        assert_eq!(session.fetch(&history(2)).await.as_deref(), Some("2 entries reviewed"));
        assert_eq!(session.fetch(&history(5)).await.as_deref(), Some("2 entries reviewed"));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_history_does_not_consume_attempt() {
        let generator = CountingGenerator::new(false, None);
        let session = InsightSession::new(generator.clone());

        assert_eq!(session.fetch(&[]).await, None);
        assert_eq!(generator.calls(), 0);
        assert!(!session.state().await.has_fetched);

        session.fetch(&history(1)).await;
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_shows_placeholder_without_retry() {
        let generator = CountingGenerator::new(true, None);
        let session = InsightSession::new(generator.clone());

        assert_eq!(session.fetch(&history(3)).await, None);
        assert_eq!(session.display_text().await, INSIGHT_PLACEHOLDER);

        session.fetch(&history(3)).await;
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_result_discarded_after_close() {
        let gate = Arc::new(Notify::new());
        let generator = CountingGenerator::new(false, Some(gate.clone()));
        let session = InsightSession::new(generator.clone());

        let handle = session.spawn_fetch(history(4));
        while generator.calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(session.state().await.in_flight);

        session.close().await;
        gate.notify_one();

        assert_eq!(handle.await.unwrap(), None);
        let state = session.state().await;
        assert!(state.has_fetched);
        assert!(!state.in_flight);
        assert_eq!(state.result, None);
    }

    #[tokio::test]
    async fn test_spawned_fetch_applies_result() {
        let generator = CountingGenerator::new(false, None);
        let session = InsightSession::new(generator);

        session.spawn_fetch(history(1)).await.unwrap();
        assert_eq!(session.display_text().await, "1 entries reviewed");
    }
}
