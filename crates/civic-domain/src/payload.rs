//! Concrete payload schemas, one per source.
//!
//! `SourcePayload` serializes untagged so each variant keeps the JSON shape
//! clients already consume (`{area, forecast, ...}` for weather and so on).
//! The variant itself is always recoverable from the owning `SourceResult`'s
//! `source_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload produced by one data source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourcePayload {
    /// Weather forecast for one area
    Weather(WeatherReport),
    /// Records from the metropolitan open-data API
    RegionalInfo(RegionalDataset),
    /// Train operation status for one region
    Transport(TransportStatus),
}

impl SourcePayload {
    /// Weather report, if this is a weather payload
    pub fn as_weather(&self) -> Option<&WeatherReport> {
        match self {
            SourcePayload::Weather(report) => Some(report),
            _ => None,
        }
    }

    /// Regional dataset, if this is a regional payload
    pub fn as_regional(&self) -> Option<&RegionalDataset> {
        match self {
            SourcePayload::RegionalInfo(dataset) => Some(dataset),
            _ => None,
        }
    }

    /// Transport status, if this is a transport payload
    pub fn as_transport(&self) -> Option<&TransportStatus> {
        match self {
            SourcePayload::Transport(status) => Some(status),
            _ => None,
        }
    }
}

/// Shaped forecast for one area
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    /// Area name as published by the forecast office
    pub area: String,
    /// Publication time of the overview text
    pub publish_time: String,
    /// Free-text overview
    pub overview: String,
    /// Today / tomorrow forecast
    pub forecast: Forecast,
    /// Temperature outlook
    pub temperature: Temperature,
}

/// Two-day forecast
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    /// Today
    pub today: DailyForecast,
    /// Tomorrow
    pub tomorrow: DailyForecast,
}

/// Forecast for a single day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    /// ISO date-time the slot starts at
    pub date: String,
    /// Weather description
    pub weather: String,
    /// Numeric weather code, as a string
    pub weather_code: String,
}

/// Temperature outlook
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Temperature {
    /// Today's range
    pub today: TemperatureRange,
}

/// Max / min temperature, as published (strings)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemperatureRange {
    /// Maximum
    pub max: String,
    /// Minimum
    pub min: String,
}

/// Records returned by the metropolitan open-data API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalDataset {
    /// Dataset key, or `sample` for the static fallback
    pub data_type: String,
    /// Total hit count reported by the API
    pub total_count: u64,
    /// Returned records
    pub items: Vec<DatasetItem>,
    /// Human-readable provenance
    pub source: String,
    /// When the payload was assembled
    pub last_update: DateTime<Utc>,
}

/// One dataset record
///
/// Open-data records have no fixed schema; they are kept as raw JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasetItem {
    /// Curated facility entry
    Facility(FacilityItem),
    /// Raw record as published
    Record(serde_json::Map<String, serde_json::Value>),
}

/// Curated facility entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityItem {
    /// Facility name
    pub name: String,
    /// Street address
    pub address: String,
    /// Facility category
    #[serde(rename = "type")]
    pub kind: String,
    /// Short description
    pub description: String,
}

/// Operation status for the major stations of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportStatus {
    /// Region key, or `unknown` for the static fallback
    pub region: String,
    /// Station the caller asked about (may be empty)
    #[serde(default)]
    pub requested_station: String,
    /// Major stations of the region
    pub major_stations: Vec<String>,
    /// Per-station line status
    pub operation_status: Vec<LineStatus>,
    /// Delay feed contents, when the feed was reachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_time_data: Option<RealTimeData>,
    /// Region keys callers may ask for
    #[serde(default)]
    pub available_regions: Vec<String>,
    /// Provenance label for fallback content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// When the payload was assembled
    pub last_update: DateTime<Utc>,
}

/// Status of the line serving one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatus {
    /// Station name
    pub station: String,
    /// Line name
    pub line: String,
    /// `正常` or `遅延`
    pub status: String,
    /// Delay description, if delayed
    pub delay: Option<String>,
    /// When the status was computed
    pub last_update: DateTime<Utc>,
}

/// Raw delay feed contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealTimeData {
    /// Feed provenance label
    pub source: String,
    /// Lines currently reported as delayed
    pub data: Vec<DelayEntry>,
}

/// One delayed line as reported by the delay feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayEntry {
    /// Line name
    pub name: String,
    /// Operating company
    #[serde(default)]
    pub company: String,
    /// Last update, seconds since epoch
    #[serde(default)]
    pub lastupdate_gmt: Option<i64>,
    /// Upstream source of the report
    #[serde(default)]
    pub source: Option<String>,
}
