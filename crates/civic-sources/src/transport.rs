//! Train operation status provider
//!
//! Reports the line serving each major station of a region. A station's line
//! is marked delayed when the delay feed lists a line whose name contains the
//! station name. When the feed itself is unavailable the region's stations
//! are still reported, all normal and without real-time data.

use crate::error::SourceError;
use crate::fallback::Provider;
use crate::fixtures;
use crate::http::get_json;
use async_trait::async_trait;
use chrono::Utc;
use civic_domain::{
    DelayEntry, LineStatus, RealTimeData, Region, SourceId, SourceParams, SourcePayload,
    TransportStatus,
};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Provenance label of the delay feed
const FEED_LABEL: &str = "鉄道遅延情報";

const STATUS_NORMAL: &str = "正常";
const STATUS_DELAYED: &str = "遅延";

/// Delay feed provider
pub struct TransportProvider {
    feed_url: String,
    client: reqwest::Client,
    feed_timeout: Duration,
}

impl TransportProvider {
    /// Create a provider reading the delay feed at `feed_url`
    ///
    /// `feed_timeout` bounds the feed request alone and must stay below the
    /// adapter's own bound for the station table to be reported.
    pub fn new(feed_url: impl Into<String>, client: reqwest::Client, feed_timeout: Duration) -> Self {
        Self {
            feed_url: feed_url.into(),
            client,
            feed_timeout,
        }
    }

    /// Fetch the delay feed, skipping entries that do not parse
    async fn read_feed(&self) -> Result<Vec<DelayEntry>, SourceError> {
        let feed = tokio::time::timeout(self.feed_timeout, get_json(&self.client, &self.feed_url))
            .await
            .map_err(|_| SourceError::Timeout(self.feed_timeout))??;

        let Value::Array(entries) = feed else {
            return Err(SourceError::Malformed("delay feed is not a list".to_string()));
        };
        let total = entries.len();
        let delays: Vec<DelayEntry> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        if delays.len() < total {
            debug!("Skipped {} unreadable delay entries", total - delays.len());
        }

        Ok(delays)
    }
}

#[async_trait]
impl Provider for TransportProvider {
    fn id(&self) -> SourceId {
        SourceId::Transport
    }

    async fn request(&self, params: &SourceParams) -> Result<SourcePayload, SourceError> {
        let SourceParams::Transport(params) = params else {
            return Err(SourceError::Misrouted(params.source_id()));
        };

        let delays = match self.read_feed().await {
            Ok(delays) => {
                debug!("Delay feed lists {} lines", delays.len());
                Some(delays)
            }
            Err(e) => {
                warn!("Delay feed unavailable, reporting stations only: {}", e);
                None
            }
        };

        Ok(SourcePayload::Transport(build_status(
            params.region,
            params.station.clone().unwrap_or_default(),
            delays,
        )))
    }

    fn fallback(&self) -> SourcePayload {
        fixtures::transport()
    }

    fn fallback_note(&self) -> &'static str {
        fixtures::TRANSPORT_FALLBACK_NOTE
    }
}

/// Build the status payload for a region from the delay feed entries
///
/// `None` means the feed could not be read: every line is normal and no
/// real-time data is attached.
pub fn build_status(
    region: Region,
    requested_station: String,
    delays: Option<Vec<DelayEntry>>,
) -> TransportStatus {
    let now = Utc::now();
    let listed = delays.as_deref().unwrap_or_default();

    let operation_status = region
        .stations()
        .iter()
        .map(|station| {
            let delayed = listed.iter().find(|entry| entry.name.contains(station));
            LineStatus {
                station: station.to_string(),
                line: format!("{}線", station),
                status: if delayed.is_some() { STATUS_DELAYED } else { STATUS_NORMAL }.to_string(),
                delay: delayed.map(|entry| format!("{}で遅延が発生しています", entry.name)),
                last_update: now,
            }
        })
        .collect();

    TransportStatus {
        region: region.as_str().to_string(),
        requested_station,
        major_stations: region.stations().iter().map(|s| s.to_string()).collect(),
        operation_status,
        real_time_data: delays.map(|data| RealTimeData {
            source: FEED_LABEL.to_string(),
            data,
        }),
        available_regions: Region::keys().into_iter().map(String::from).collect(),
        source: None,
        last_update: now,
    }
}
