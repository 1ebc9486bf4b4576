//! Metropolitan open-data provider

use crate::error::SourceError;
use crate::fallback::Provider;
use crate::fixtures;
use crate::http::read_json;
use async_trait::async_trait;
use chrono::Utc;
use civic_domain::{DatasetItem, RegionalDataset, SourceId, SourceParams, SourcePayload};
use serde_json::{json, Value};
use tracing::debug;

/// Provenance recorded on live payloads
const SOURCE_LABEL: &str = "東京都オープンデータ";

/// Open-data API provider
pub struct RegionalProvider {
    base_url: String,
    client: reqwest::Client,
}

impl RegionalProvider {
    /// Create a provider reading from `base_url`
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl Provider for RegionalProvider {
    fn id(&self) -> SourceId {
        SourceId::RegionalInfo
    }

    async fn request(&self, params: &SourceParams) -> Result<SourcePayload, SourceError> {
        let SourceParams::RegionalInfo(params) = params else {
            return Err(SourceError::Misrouted(params.source_id()));
        };

        let url = format!(
            "{}/{}/json?limit={}",
            self.base_url,
            params.dataset.api_id(),
            params.limit
        );
        debug!("Querying dataset {} (limit {})", params.dataset.as_str(), params.limit);

        // Empty column list selects every column
        let body = json!({
            "column": [],
            "searchCondition": {
                "conditionRelationship": "and",
                "dateAndSearch": []
            }
        });

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;
        let data = read_json(response).await?;

        shape_dataset(params.dataset.as_str(), &data).map(SourcePayload::RegionalInfo)
    }

    fn fallback(&self) -> SourcePayload {
        fixtures::regional()
    }

    fn fallback_note(&self) -> &'static str {
        fixtures::REGIONAL_FALLBACK_NOTE
    }
}

/// Shape an API search response (`{total, hits}`) into a dataset payload
pub fn shape_dataset(data_type: &str, data: &Value) -> Result<RegionalDataset, SourceError> {
    let object = data
        .as_object()
        .ok_or_else(|| SourceError::Malformed("search response is not an object".to_string()))?;

    let items = object
        .get("hits")
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit.as_object().cloned().map(DatasetItem::Record))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    Ok(RegionalDataset {
        data_type: data_type.to_string(),
        total_count: object.get("total").and_then(Value::as_u64).unwrap_or(0),
        items,
        source: SOURCE_LABEL.to_string(),
        last_update: Utc::now(),
    })
}
