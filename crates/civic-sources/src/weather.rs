//! Weather forecast provider
//!
//! Reads the national forecast feed: `forecast/{code}.json` for the
//! structured forecast and `overview_forecast/{code}.json` for the summary
//! text. Both are fetched concurrently and shaped into a `WeatherReport`.

use crate::error::SourceError;
use crate::fallback::Provider;
use crate::fixtures;
use crate::http::{get_json, text_at};
use async_trait::async_trait;
use civic_domain::{
    DailyForecast, Forecast, SourceId, SourceParams, SourcePayload, Temperature, TemperatureRange,
    WeatherReport,
};
use serde_json::Value;
use tracing::debug;

/// Area name used when the feed omits it
const UNKNOWN_AREA: &str = "不明";

/// Forecast feed provider
pub struct WeatherProvider {
    base_url: String,
    client: reqwest::Client,
}

impl WeatherProvider {
    /// Create a provider reading from `base_url`
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl Provider for WeatherProvider {
    fn id(&self) -> SourceId {
        SourceId::Weather
    }

    async fn request(&self, params: &SourceParams) -> Result<SourcePayload, SourceError> {
        let SourceParams::Weather(params) = params else {
            return Err(SourceError::Misrouted(params.source_id()));
        };

        let code = params.area.code();
        let forecast_url = format!("{}/forecast/{}.json", self.base_url, code);
        let overview_url = format!("{}/overview_forecast/{}.json", self.base_url, code);
        debug!("Fetching forecast for area {} ({})", params.area.as_str(), code);

        let (forecast, overview) = tokio::try_join!(
            get_json(&self.client, &forecast_url),
            get_json(&self.client, &overview_url),
        )?;

        shape_report(&forecast, &overview).map(SourcePayload::Weather)
    }

    fn fallback(&self) -> SourcePayload {
        fixtures::weather()
    }

    fn fallback_note(&self) -> &'static str {
        fixtures::WEATHER_FALLBACK_NOTE
    }
}

/// Shape the raw feed documents into a report
///
/// The forecast document must be a non-empty array; individual fields that
/// are missing become empty strings.
pub fn shape_report(forecast: &Value, overview: &Value) -> Result<WeatherReport, SourceError> {
    if forecast.as_array().map_or(true, Vec::is_empty) {
        return Err(SourceError::Malformed(
            "forecast document is not a non-empty array".to_string(),
        ));
    }

    let area = match text_at(forecast, "/0/timeSeries/0/areas/0/area/name") {
        name if name.is_empty() => UNKNOWN_AREA.to_string(),
        name => name,
    };

    let day = |index: usize| DailyForecast {
        date: text_at(forecast, &format!("/0/timeSeries/0/timeDefines/{}", index)),
        weather: text_at(forecast, &format!("/0/timeSeries/0/areas/0/weathers/{}", index)),
        weather_code: text_at(forecast, &format!("/0/timeSeries/0/areas/0/weatherCodes/{}", index)),
    };

    Ok(WeatherReport {
        area,
        publish_time: text_at(overview, "/reportDatetime"),
        overview: text_at(overview, "/text"),
        forecast: Forecast {
            today: day(0),
            tomorrow: day(1),
        },
        temperature: Temperature {
            today: TemperatureRange {
                max: text_at(forecast, "/0/timeSeries/2/areas/0/temps/0"),
                min: text_at(forecast, "/0/timeSeries/2/areas/0/temps/1"),
            },
        },
    })
}
