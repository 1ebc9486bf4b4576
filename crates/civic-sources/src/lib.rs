//! Civic Data Source Adapters
//!
//! One adapter per external provider, each behind the uniform
//! `DataSource::fetch` contract from `civic-domain`.
//!
//! # Architecture
//!
//! ```text
//! Provider (request shaping) → FallbackSource (timeout + static fallback) → DataSource
//! ```
//!
//! Providers are free to fail. `FallbackSource` (built on [`with_fallback`])
//! absorbs every failure, so callers can treat each source as always
//! available and only look at `succeeded` for provenance.
//!
//! # Providers
//!
//! - `WeatherProvider`: national weather forecast feed
//! - `RegionalProvider`: metropolitan open-data API
//! - `TransportProvider`: train-delay feed
//!
//! # Examples
//!
//! ```no_run
//! use civic_domain::{SourceId, SourceParams};
//! use civic_sources::{SourceRegistry, SourcesConfig};
//!
//! # async fn example() -> Result<(), civic_sources::SourceError> {
//! let registry = SourceRegistry::from_config(&SourcesConfig::default())?;
//! let weather = registry.get(SourceId::Weather).unwrap();
//!
//! let result = weather.fetch(&SourceParams::default_for(SourceId::Weather)).await;
//! println!("live: {}, note: {:?}", result.succeeded, result.note);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fallback;
pub mod fixtures;
mod http;
pub mod mock;
pub mod regional;
pub mod registry;
pub mod transport;
pub mod weather;

pub use config::SourcesConfig;
pub use error::SourceError;
pub use fallback::{with_fallback, FallbackSource, Provider};
pub use mock::{MockBehavior, MockSource};
pub use regional::RegionalProvider;
pub use registry::SourceRegistry;
pub use transport::TransportProvider;
pub use weather::WeatherProvider;
