//! Registry of the configured data sources

use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::fallback::FallbackSource;
use crate::http::build_client;
use crate::regional::RegionalProvider;
use crate::transport::TransportProvider;
use crate::weather::WeatherProvider;
use civic_domain::{DataSource, SourceId};
use std::sync::Arc;

/// The set of data sources one process serves
///
/// Immutable after construction; cloning shares the adapters.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn DataSource>>,
}

impl SourceRegistry {
    /// Registry over arbitrary adapters
    ///
    /// A later adapter for an already registered source replaces it.
    pub fn new(sources: Vec<Arc<dyn DataSource>>) -> Self {
        let mut registry = Self::default();
        for source in sources {
            registry.register(source);
        }
        registry
    }

    /// The three standard providers, built from configuration
    pub fn from_config(config: &SourcesConfig) -> Result<Self, SourceError> {
        config.validate()?;
        let client = build_client(config.timeout())?;
        let timeout = config.timeout();

        Ok(Self::new(vec![
            Arc::new(FallbackSource::new(
                WeatherProvider::new(&config.jma_base_url, client.clone()),
                timeout,
            )),
            Arc::new(FallbackSource::new(
                RegionalProvider::new(&config.tokyo_api_base, client.clone()),
                timeout,
            )),
            Arc::new(FallbackSource::new(
                TransportProvider::new(&config.delay_feed_url, client, timeout / 2),
                timeout,
            )),
        ]))
    }

    /// Add or replace the adapter for its source
    pub fn register(&mut self, source: Arc<dyn DataSource>) {
        let id = source.id();
        self.sources.retain(|existing| existing.id() != id);
        self.sources.push(source);
    }

    /// Adapter for a source
    pub fn get(&self, id: SourceId) -> Option<Arc<dyn DataSource>> {
        self.sources.iter().find(|source| source.id() == id).cloned()
    }

    /// Every registered adapter
    pub fn all(&self) -> &[Arc<dyn DataSource>] {
        &self.sources
    }

    /// Registered source ids
    pub fn ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.ids())
            .finish()
    }
}
