//! Source identifiers, request parameters and adapter results

use crate::lookup::{Area, Dataset, Region};
use crate::payload::SourcePayload;
use serde::{Deserialize, Serialize};

/// Identifier of one external data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceId {
    /// National weather forecast feed
    Weather,
    /// Metropolitan open-data API (facilities, statistics)
    RegionalInfo,
    /// Train operation status feed
    Transport,
}

impl SourceId {
    /// All sources, in aggregation order
    pub const ALL: [SourceId; 3] = [SourceId::Weather, SourceId::RegionalInfo, SourceId::Transport];

    /// Key used in JSON and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Weather => "weather",
            SourceId::RegionalInfo => "regionalInfo",
            SourceId::Transport => "transport",
        }
    }

    /// Provenance label shown to end users
    pub fn label(&self) -> &'static str {
        match self {
            SourceId::Weather => "気象庁API",
            SourceId::RegionalInfo => "東京都オープンデータ",
            SourceId::Transport => "全国交通情報",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for the weather source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherParams {
    /// Forecast area
    pub area: Area,
}

/// Parameters for the regional open-data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionalParams {
    /// Dataset to query
    pub dataset: Dataset,
    /// Maximum number of records
    pub limit: u32,
}

impl Default for RegionalParams {
    fn default() -> Self {
        Self {
            dataset: Dataset::default(),
            limit: 20,
        }
    }
}

/// Parameters for the transport source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportParams {
    /// Region whose major stations are reported
    pub region: Region,
    /// Station the caller is interested in, echoed back in the payload
    pub station: Option<String>,
}

/// Request parameters addressed to one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceParams {
    /// Weather request
    Weather(WeatherParams),
    /// Regional open-data request
    RegionalInfo(RegionalParams),
    /// Transport request
    Transport(TransportParams),
}

impl SourceParams {
    /// Source these parameters are addressed to
    pub fn source_id(&self) -> SourceId {
        match self {
            SourceParams::Weather(_) => SourceId::Weather,
            SourceParams::RegionalInfo(_) => SourceId::RegionalInfo,
            SourceParams::Transport(_) => SourceId::Transport,
        }
    }

    /// Default parameters for a source
    pub fn default_for(id: SourceId) -> Self {
        match id {
            SourceId::Weather => SourceParams::Weather(WeatherParams::default()),
            SourceId::RegionalInfo => SourceParams::RegionalInfo(RegionalParams::default()),
            SourceId::Transport => SourceParams::Transport(TransportParams::default()),
        }
    }
}

/// Outcome of one adapter call
///
/// A result is complete whether or not the provider answered: on failure
/// `payload` holds the source's static fallback and `succeeded` is false.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResult {
    /// Which source produced this result
    pub source_id: SourceId,
    /// Whether the payload came from the live provider
    pub succeeded: bool,
    /// Live or fallback payload
    pub payload: SourcePayload,
    /// Why fallback content was substituted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SourceResult {
    /// Result carrying live provider data
    pub fn live(source_id: SourceId, payload: SourcePayload) -> Self {
        Self {
            source_id,
            succeeded: true,
            payload,
            note: None,
        }
    }

    /// Result carrying fallback data
    pub fn fallback(source_id: SourceId, payload: SourcePayload, note: impl Into<String>) -> Self {
        Self {
            source_id,
            succeeded: false,
            payload,
            note: Some(note.into()),
        }
    }
}
