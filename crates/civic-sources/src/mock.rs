//! Deterministic data source for testing
//!
//! `MockSource` performs no network I/O. It answers with a fixed payload, the
//! source's static fallback, or a crash, optionally after a delay, and counts
//! its calls. Clones share the counter.

use crate::fixtures;
use async_trait::async_trait;
use civic_domain::{DataSource, SourceId, SourceParams, SourcePayload, SourceResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What a `MockSource` does when fetched
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Answer with this payload as live data
    Live(SourcePayload),
    /// Answer with the source's fallback payload and this note
    Fallback(String),
    /// Panic inside `fetch`
    Crash,
}

/// Mock data source
#[derive(Debug, Clone)]
pub struct MockSource {
    id: SourceId,
    behavior: MockBehavior,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockSource {
    /// Source answering with live data
    pub fn live(id: SourceId, payload: SourcePayload) -> Self {
        Self::with_behavior(id, MockBehavior::Live(payload))
    }

    /// Source that always falls back
    pub fn failing(id: SourceId) -> Self {
        Self::with_behavior(id, MockBehavior::Fallback("HTTP 503".to_string()))
    }

    /// Source whose fetch panics
    pub fn crashing(id: SourceId) -> Self {
        Self::with_behavior(id, MockBehavior::Crash)
    }

    /// Source with explicit behavior
    pub fn with_behavior(id: SourceId, behavior: MockBehavior) -> Self {
        Self {
            id,
            behavior,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer only after `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times fetch was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for MockSource {
    fn id(&self) -> SourceId {
        self.id
    }

    async fn fetch(&self, _params: &SourceParams) -> SourceResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            MockBehavior::Live(payload) => SourceResult::live(self.id, payload.clone()),
            MockBehavior::Fallback(reason) => SourceResult::fallback(
                self.id,
                fixtures::for_source(self.id),
                format!("{} ({})", fixtures::note_for(self.id), reason),
            ),
            MockBehavior::Crash => panic!("mock source '{}' crashed", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_source_returns_fallback() {
        let source = MockSource::failing(SourceId::RegionalInfo);
        let result = source
            .fetch(&SourceParams::default_for(SourceId::RegionalInfo))
            .await;

        assert!(!result.succeeded);
        assert_eq!(result.payload.as_regional().unwrap().data_type, "sample");
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_call_count() {
        let source = MockSource::live(SourceId::Weather, fixtures::weather());
        let clone = source.clone();

        clone.fetch(&SourceParams::default_for(SourceId::Weather)).await;

        assert_eq!(source.call_count(), 1);
    }
}
