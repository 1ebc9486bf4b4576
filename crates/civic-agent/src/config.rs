//! Configuration for the agent pipeline

use civic_domain::{
    Area, Dataset, Region, RegionalParams, SourceId, SourceParams, TransportParams, WeatherParams,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default length of the trace summaries, in characters
pub const DEFAULT_SUMMARY_CHARS: usize = 200;

/// Default number of open-data records gathered per turn
pub const DEFAULT_REGIONAL_LIMIT: u32 = 5;

/// Pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Characters of each intermediate pass kept in the trace
    pub summary_chars: usize,

    /// How long the aggregator waits for each source (seconds)
    ///
    /// Unset means the aggregator waits for every source to settle; adapters
    /// still apply their own request timeouts.
    pub aggregation_timeout_secs: Option<u64>,

    /// Parameters sent to each source on every turn
    pub plan: AggregationPlan,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            summary_chars: DEFAULT_SUMMARY_CHARS,
            aggregation_timeout_secs: None,
            plan: AggregationPlan::default(),
        }
    }
}

impl AgentConfig {
    /// Aggregation window as a Duration, if one is configured
    pub fn aggregation_window(&self) -> Option<Duration> {
        self.aggregation_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.summary_chars == 0 {
            return Err("summary_chars must be greater than 0".to_string());
        }
        if self.aggregation_timeout_secs == Some(0) {
            return Err("aggregation_timeout_secs must be greater than 0".to_string());
        }
        if self.plan.regional_limit == 0 {
            return Err("plan.regional_limit must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Fixed per-turn request parameters for every source
///
/// The utterance does not influence which data is gathered; every turn asks
/// each source the same question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationPlan {
    /// Forecast area
    pub weather_area: Area,
    /// Open-data dataset
    pub regional_dataset: Dataset,
    /// Open-data record limit
    pub regional_limit: u32,
    /// Transport region
    pub transport_region: Region,
}

impl Default for AggregationPlan {
    fn default() -> Self {
        Self {
            weather_area: Area::Tokyo,
            regional_dataset: Dataset::Facilities,
            regional_limit: DEFAULT_REGIONAL_LIMIT,
            transport_region: Region::Kanto,
        }
    }
}

impl AggregationPlan {
    /// Parameters addressed to one source
    pub fn params(&self, id: SourceId) -> SourceParams {
        match id {
            SourceId::Weather => SourceParams::Weather(WeatherParams {
                area: self.weather_area,
            }),
            SourceId::RegionalInfo => SourceParams::RegionalInfo(RegionalParams {
                dataset: self.regional_dataset,
                limit: self.regional_limit,
            }),
            SourceId::Transport => SourceParams::Transport(TransportParams {
                region: self.transport_region,
                station: None,
            }),
        }
    }
}
