//! HTTP request handlers for the server.
//!
//! Implements the chat endpoint, one endpoint per data source, and a health
//! check using axum.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use civic_agent::AgentPipeline;
use civic_domain::{
    Area, Dataset, PipelineResult, Region, RegionalParams, SourceId, SourceParams,
    SourcePayload, SourceResult, TransportParams, WeatherParams,
};
use civic_sources::SourceRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Record limit used when a request gives none (or an unusable one)
const DEFAULT_LIMIT: u32 = 20;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Pipeline run once per chat request
    pub pipeline: Arc<AgentPipeline>,
    /// Adapters behind the data-source endpoints
    pub registry: SourceRegistry,
    /// Whether a generation credential is configured
    pub llm_configured: bool,
}

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's utterance
    pub message: String,
}

/// Successful chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Always true; repaired turns are still successful responses
    pub success: bool,
    /// The turn's result
    pub data: PipelineResult,
    /// When the response was produced
    pub timestamp: DateTime<Utc>,
}

/// Weather endpoint request (query string or JSON body)
#[derive(Debug, Default, Deserialize)]
pub struct WeatherRequest {
    /// Area key, e.g. "osaka"
    pub area: Option<String>,
}

/// Open-data endpoint request (query string or JSON body)
#[derive(Debug, Default, Deserialize)]
pub struct RegionalRequest {
    /// Dataset key, e.g. "tourism"
    #[serde(rename = "type")]
    pub dataset: Option<String>,
    /// Record limit, as a number or a numeric string
    pub limit: Option<Value>,
}

/// Transport endpoint request (query string or JSON body)
#[derive(Debug, Default, Deserialize)]
pub struct TransportRequest {
    /// Region key, e.g. "kansai"
    pub region: Option<String>,
    /// Station of interest, echoed back in the payload
    pub station: Option<String>,
}

/// Data-source endpoint response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResponse {
    /// Always true for well-formed requests
    pub success: bool,
    /// Live or fallback payload
    pub data: SourcePayload,
    /// Provenance label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Dataset keys the open-data endpoint accepts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_types: Option<Vec<&'static str>>,
    /// Present when fallback content was substituted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// When the response was produced
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
    /// Registered data sources
    pub sources: Vec<String>,
    /// Whether a generation credential is configured
    pub llm_configured: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Body missing, not JSON, or lacking a usable `message`
    InvalidRequest,
    /// No adapter is registered for the source
    SourceUnavailable(SourceId),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidRequest => {
                (StatusCode::BAD_REQUEST, "Invalid request format".to_string())
            }
            AppError::SourceUnavailable(id) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Source '{}' is not configured", id),
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            error: message,
        });
        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        AppError::InvalidRequest
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        warn!("Rejected query string: {}", rejection.body_text());
        AppError::InvalidRequest
    }
}

impl WeatherRequest {
    fn params(&self) -> SourceParams {
        SourceParams::Weather(WeatherParams {
            area: Area::parse_or_default(self.area.as_deref().unwrap_or_default()),
        })
    }
}

impl RegionalRequest {
    fn params(&self) -> SourceParams {
        SourceParams::RegionalInfo(RegionalParams {
            dataset: Dataset::parse_or_default(self.dataset.as_deref().unwrap_or_default()),
            limit: self.limit().unwrap_or(DEFAULT_LIMIT),
        })
    }

    /// Positive limit from a number or a numeric string
    fn limit(&self) -> Option<u32> {
        let limit = match self.limit.as_ref()? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        limit.filter(|n| *n > 0)
    }
}

impl TransportRequest {
    fn params(&self) -> SourceParams {
        SourceParams::Transport(TransportParams {
            region: Region::parse_or_default(self.region.as_deref().unwrap_or_default()),
            station: self
                .station
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// POST /chat - Run one pipeline turn
///
/// Only a malformed body is an error; every turn, repaired or not, is a 200.
async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = body?;
    if request.message.is_empty() {
        return Err(AppError::InvalidRequest);
    }

    info!("Chat turn: {} chars", request.message.chars().count());
    let result = state.pipeline.run(&request.message).await;

    Ok(Json(ChatResponse {
        success: true,
        data: result,
        timestamp: Utc::now(),
    }))
}

async fn fetch(
    state: &AppState,
    params: SourceParams,
) -> Result<SourceResult, AppError> {
    let id = params.source_id();
    let source = state
        .registry
        .get(id)
        .ok_or(AppError::SourceUnavailable(id))?;
    Ok(source.fetch(&params).await)
}

fn source_response(result: SourceResult) -> Json<SourceResponse> {
    Json(SourceResponse {
        success: true,
        source: Some(result.source_id.label().to_string()),
        available_types: None,
        note: result.note,
        data: result.payload,
        timestamp: Utc::now(),
    })
}

fn regional_response(result: SourceResult) -> Json<SourceResponse> {
    Json(SourceResponse {
        source: None,
        available_types: Some(Dataset::keys()),
        ..source_response(result).0
    })
}

/// GET /api/weather - Forecast for one area
async fn weather_query(
    State(state): State<AppState>,
    query: Result<Query<WeatherRequest>, QueryRejection>,
) -> Result<Json<SourceResponse>, AppError> {
    let Query(request) = query?;
    Ok(source_response(fetch(&state, request.params()).await?))
}

/// POST /api/weather
async fn weather_body(
    State(state): State<AppState>,
    body: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<Json<SourceResponse>, AppError> {
    let Json(request) = body?;
    Ok(source_response(fetch(&state, request.params()).await?))
}

/// GET /api/tokyo - Records from one open-data dataset
async fn regional_query(
    State(state): State<AppState>,
    query: Result<Query<RegionalRequest>, QueryRejection>,
) -> Result<Json<SourceResponse>, AppError> {
    let Query(request) = query?;
    Ok(regional_response(fetch(&state, request.params()).await?))
}

/// POST /api/tokyo
async fn regional_body(
    State(state): State<AppState>,
    body: Result<Json<RegionalRequest>, JsonRejection>,
) -> Result<Json<SourceResponse>, AppError> {
    let Json(request) = body?;
    Ok(regional_response(fetch(&state, request.params()).await?))
}

/// GET /api/transport - Operation status for one region
async fn transport_query(
    State(state): State<AppState>,
    query: Result<Query<TransportRequest>, QueryRejection>,
) -> Result<Json<SourceResponse>, AppError> {
    let Query(request) = query?;
    Ok(source_response(fetch(&state, request.params()).await?))
}

/// POST /api/transport
async fn transport_body(
    State(state): State<AppState>,
    body: Result<Json<TransportRequest>, JsonRejection>,
) -> Result<Json<SourceResponse>, AppError> {
    let Json(request) = body?;
    Ok(source_response(fetch(&state, request.params()).await?))
}

/// GET /health - Liveness and wiring summary
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sources: state
            .registry
            .ids()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect(),
        llm_configured: state.llm_configured,
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/api/weather", get(weather_query).post(weather_body))
        .route("/api/tokyo", get(regional_query).post(regional_body))
        .route("/api/transport", get(transport_query).post(transport_body))
        .route("/health", get(health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use civic_agent::AgentConfig;
    use civic_domain::DataSource;
    use civic_llm::MockGenerator;
    use civic_sources::{fixtures, MockSource};
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let registry = SourceRegistry::new(vec![
            Arc::new(MockSource::live(SourceId::Weather, fixtures::weather())) as Arc<dyn DataSource>,
            Arc::new(MockSource::failing(SourceId::RegionalInfo)) as Arc<dyn DataSource>,
            Arc::new(MockSource::failing(SourceId::Transport)) as Arc<dyn DataSource>,
        ]);
        let pipeline = AgentPipeline::new(
            registry.clone(),
            Arc::new(MockGenerator::new("回答")),
            &AgentConfig::default(),
        )
        .unwrap();

        AppState {
            pipeline: Arc::new(pipeline),
            registry,
            llm_configured: false,
        }
    }

    #[test]
    fn test_regional_limit_parsing() {
        let request = |limit: Value| RegionalRequest {
            dataset: None,
            limit: Some(limit),
        };

        assert_eq!(request(Value::from(5)).limit(), Some(5));
        assert_eq!(request(Value::from("7")).limit(), Some(7));
        assert_eq!(request(Value::from("many")).limit(), None);
        assert_eq!(request(Value::from(0)).limit(), None);
        assert_eq!(request(Value::from(-3)).limit(), None);
    }

    #[test]
    fn test_unknown_keys_fall_back_to_defaults() {
        let weather = WeatherRequest {
            area: Some("atlantis".to_string()),
        };
        assert_eq!(
            weather.params(),
            SourceParams::Weather(WeatherParams { area: Area::Tokyo })
        );

        let transport = TransportRequest {
            region: Some("KANSAI".to_string()),
            station: Some("  ".to_string()),
        };
        assert_eq!(
            transport.params(),
            SourceParams::Transport(TransportParams {
                region: Region::Kansai,
                station: None,
            })
        );
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message": ""}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_source_is_unavailable() {
        let mut state = create_test_state();
        state.registry = SourceRegistry::default();
        let app = create_router(state);

        let request = Request::builder()
            .uri("/api/weather")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
