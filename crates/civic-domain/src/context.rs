//! Aggregated context for one user turn

use crate::source::{SourceId, SourceResult};
use serde::Serialize;

/// Every source result gathered for one turn
///
/// A missing entry means the adapter call never produced a result (it did not
/// settle in time or it crashed). Downstream code treats that the same as a
/// fallback result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedContext {
    /// Weather forecast
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<SourceResult>,
    /// Metropolitan open data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_info: Option<SourceResult>,
    /// Train operation status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<SourceResult>,
}

impl AggregatedContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result under its own source key, replacing any previous one
    pub fn insert(&mut self, result: SourceResult) {
        let slot = self.slot_mut(result.source_id);
        *slot = Some(result);
    }

    /// Result for a source, if it settled
    pub fn get(&self, id: SourceId) -> Option<&SourceResult> {
        match id {
            SourceId::Weather => self.weather.as_ref(),
            SourceId::RegionalInfo => self.regional_info.as_ref(),
            SourceId::Transport => self.transport.as_ref(),
        }
    }

    /// Sources present in the context, in aggregation order
    pub fn source_ids(&self) -> Vec<SourceId> {
        SourceId::ALL
            .into_iter()
            .filter(|id| self.get(*id).is_some())
            .collect()
    }

    /// Number of settled sources
    pub fn len(&self) -> usize {
        self.source_ids().len()
    }

    /// True when no source settled
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_mut(&mut self, id: SourceId) -> &mut Option<SourceResult> {
        match id {
            SourceId::Weather => &mut self.weather,
            SourceId::RegionalInfo => &mut self.regional_info,
            SourceId::Transport => &mut self.transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{SourcePayload, WeatherReport};

    fn weather_result() -> SourceResult {
        SourceResult::live(
            SourceId::Weather,
            SourcePayload::Weather(WeatherReport {
                area: "東京".to_string(),
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_insert_places_result_under_its_key() {
        let mut context = AggregatedContext::new();
        assert!(context.is_empty());

        context.insert(weather_result());

        assert_eq!(context.len(), 1);
        assert!(context.get(SourceId::Weather).is_some());
        assert!(context.get(SourceId::Transport).is_none());
        assert_eq!(context.source_ids(), vec![SourceId::Weather]);
    }

    #[test]
    fn test_missing_sources_are_omitted_from_json() {
        let mut context = AggregatedContext::new();
        context.insert(weather_result());

        let value = serde_json::to_value(&context).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["weather".to_string()]);
        assert_eq!(value["weather"]["payload"]["area"], "東京");
    }
}
