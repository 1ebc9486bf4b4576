//! The never-failing adapter combinator
//!
//! Every adapter shares one contract: try the provider within a time bound,
//! and on any failure hand back the source's static fallback payload with
//! `succeeded = false`. `with_fallback` is that contract as a function and
//! `FallbackSource` lifts a `Provider` into a `DataSource` with it.

use crate::error::SourceError;
use async_trait::async_trait;
use civic_domain::{DataSource, SourceId, SourceParams, SourcePayload, SourceResult};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Provider-specific half of an adapter
///
/// Implementations shape the request and the response; they are free to
/// fail; `FallbackSource` absorbs the failure.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Source this provider serves
    fn id(&self) -> SourceId;

    /// Issue the provider request and shape the response
    async fn request(&self, params: &SourceParams) -> Result<SourcePayload, SourceError>;

    /// Static payload substituted on failure
    fn fallback(&self) -> SourcePayload;

    /// Note attached to fallback results
    fn fallback_note(&self) -> &'static str;
}

/// Run `operation` within `timeout`, substituting `fallback` on any failure
///
/// The returned result always carries a payload.
pub async fn with_fallback<F, P>(
    source_id: SourceId,
    timeout: Duration,
    operation: F,
    fallback: P,
    note: &str,
) -> SourceResult
where
    F: Future<Output = Result<SourcePayload, SourceError>>,
    P: FnOnce() -> SourcePayload,
{
    let outcome = match tokio::time::timeout(timeout, operation).await {
        Ok(outcome) => outcome,
        Err(_) => Err(SourceError::Timeout(timeout)),
    };

    match outcome {
        Ok(payload) => {
            debug!("Source '{}' answered", source_id);
            SourceResult::live(source_id, payload)
        }
        Err(e) => {
            warn!("Source '{}' unavailable, using fallback: {}", source_id, e);
            SourceResult::fallback(source_id, fallback(), format!("{} ({})", note, e))
        }
    }
}

/// A `Provider` wrapped into an always-succeeding `DataSource`
pub struct FallbackSource<P> {
    provider: P,
    timeout: Duration,
}

impl<P: Provider> FallbackSource<P> {
    /// Wrap a provider with a per-call timeout
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout }
    }
}

#[async_trait]
impl<P: Provider> DataSource for FallbackSource<P> {
    fn id(&self) -> SourceId {
        self.provider.id()
    }

    async fn fetch(&self, params: &SourceParams) -> SourceResult {
        with_fallback(
            self.provider.id(),
            self.timeout,
            self.provider.request(params),
            || self.provider.fallback(),
            self.provider.fallback_note(),
        )
        .await
    }
}
