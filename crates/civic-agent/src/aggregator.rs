//! Concurrent fan-out over the registered data sources

use crate::config::AggregationPlan;
use civic_domain::{AggregatedContext, SourceId, SourceResult};
use civic_sources::SourceRegistry;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Queries every source at once and collects whatever settles
///
/// One spawned task per source. A task that panics, or that does not settle
/// inside the aggregation window, is left out of the context. Tasks are never
/// aborted; a late task finishes in the background and its result is dropped.
#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: SourceRegistry,
    window: Option<Duration>,
}

impl Aggregator {
    /// Create an aggregator with no window
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            window: None,
        }
    }

    /// Stop waiting for a source after `window`
    pub fn with_window(mut self, window: Option<Duration>) -> Self {
        self.window = window;
        self
    }

    /// Sources this aggregator queries
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Query every source once with the plan's parameters
    ///
    /// Never fails; in the worst case the context is empty.
    pub async fn gather(&self, plan: &AggregationPlan) -> AggregatedContext {
        info!("Gathering from {} sources", self.registry.len());

        let tasks: Vec<(SourceId, JoinHandle<SourceResult>)> = self
            .registry
            .all()
            .iter()
            .map(|source| {
                let id = source.id();
                let source = Arc::clone(source);
                let params = plan.params(id);
                (id, tokio::spawn(async move { source.fetch(&params).await }))
            })
            .collect();

        let window = self.window;
        let settled = join_all(
            tasks
                .into_iter()
                .map(|(id, handle)| async move { settle(id, handle, window).await }),
        )
        .await;

        let mut context = AggregatedContext::new();
        for result in settled.into_iter().flatten() {
            debug!(
                "Source '{}' settled (live: {})",
                result.source_id, result.succeeded
            );
            context.insert(result);
        }

        info!(
            "Gathered {}/{} sources",
            context.len(),
            self.registry.len()
        );
        context
    }
}

/// Wait for one source task, within the window if there is one
async fn settle(
    id: SourceId,
    handle: JoinHandle<SourceResult>,
    window: Option<Duration>,
) -> Option<SourceResult> {
    let joined = match window {
        Some(window) => match tokio::time::timeout(window, handle).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!("Source '{}' did not settle within {:?}, omitting", id, window);
                return None;
            }
        },
        None => handle.await,
    };

    match joined {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("Source '{}' task failed, omitting: {}", id, e);
            None
        }
    }
}
