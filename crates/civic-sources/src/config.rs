//! Configuration for the data source adapters

use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default forecast feed base URL
pub const DEFAULT_JMA_BASE_URL: &str = "https://www.jma.go.jp/bosai/forecast/data";

/// Default metropolitan open-data API base URL
pub const DEFAULT_TOKYO_API_BASE: &str = "https://service.api.metro.tokyo.lg.jp/api";

/// Default train-delay feed URL
pub const DEFAULT_DELAY_FEED_URL: &str = "https://rti-giken.jp/fhc/api/train_tetsudo/delay.json";

/// Default per-call timeout (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User agent sent to every provider
pub const USER_AGENT: &str = concat!("civic/", env!("CARGO_PKG_VERSION"));

/// Provider endpoints and per-call bound
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Base URL of the forecast feed (`{base}/forecast/{code}.json`)
    pub jma_base_url: String,

    /// Base URL of the open-data API (`{base}/{dataset}/json`)
    pub tokyo_api_base: String,

    /// Full URL of the train-delay feed
    pub delay_feed_url: String,

    /// Upper bound for one adapter call, in seconds
    pub timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            jma_base_url: DEFAULT_JMA_BASE_URL.to_string(),
            tokyo_api_base: DEFAULT_TOKYO_API_BASE.to_string(),
            delay_feed_url: DEFAULT_DELAY_FEED_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SourcesConfig {
    /// Configuration with every provider served from one base URL
    ///
    /// Used with mock servers: forecast under `/forecast`, open data under
    /// `/api`, delay feed at `/delay.json`.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            jma_base_url: base.to_string(),
            tokyo_api_base: format!("{}/api", base),
            delay_feed_url: format!("{}/delay.json", base),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Per-call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SourceError> {
        for (name, url) in [
            ("jma_base_url", &self.jma_base_url),
            ("tokyo_api_base", &self.tokyo_api_base),
            ("delay_feed_url", &self.delay_feed_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| SourceError::Config(format!("{} is not a valid URL: {}", name, e)))?;
        }
        if self.timeout_secs == 0 {
            return Err(SourceError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
