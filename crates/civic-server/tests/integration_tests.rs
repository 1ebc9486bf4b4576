//! Integration tests for the civic server

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use civic_agent::{AgentConfig, AgentPipeline, REPAIR_SOURCES};
use civic_domain::{DataSource, SourceId};
use civic_llm::MockGenerator;
use civic_server::{
    build_state,
    config::ServerConfig,
    handlers::{create_router, AppState, HealthResponse},
};
use civic_sources::{fixtures, MockSource, SourceRegistry, SourcesConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test doubles shared between the state and the assertions
struct Fixture {
    sources: Vec<MockSource>,
    generator: MockGenerator,
}

impl Fixture {
    fn new() -> Self {
        Self {
            sources: vec![
                MockSource::live(SourceId::Weather, fixtures::weather()),
                MockSource::failing(SourceId::RegionalInfo),
                MockSource::failing(SourceId::Transport),
            ],
            generator: MockGenerator::new("今日の東京は晴れです。"),
        }
    }

    fn app(&self) -> Router {
        let registry = SourceRegistry::new(
            self.sources
                .iter()
                .cloned()
                .map(|source| Arc::new(source) as Arc<dyn DataSource>)
                .collect(),
        );
        let pipeline = AgentPipeline::new(
            registry.clone(),
            Arc::new(self.generator.clone()),
            &AgentConfig::default(),
        )
        .unwrap();

        create_router(AppState {
            pipeline: Arc::new(pipeline),
            registry,
            llm_configured: false,
        })
    }

    fn source_calls(&self) -> usize {
        self.sources.iter().map(MockSource::call_count).sum()
    }
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_chat_returns_pipeline_result() {
    let fixture = Fixture::new();

    let (status, body) = send(
        fixture.app(),
        post_json("/chat", r#"{"message": "今日の天気は？"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["timestamp"].is_string());

    let data = &body["data"];
    assert_eq!(data["responseText"], "今日の東京は晴れです。");
    assert_eq!(data["repaired"], false);
    assert_eq!(
        data["sources"],
        json!(["気象庁API", "東京都オープンデータ", "全国交通情報", "Qwen AI"])
    );
    assert_eq!(data["agentTrace"]["information"]["weather"]["succeeded"], true);
    assert_eq!(
        data["agentTrace"]["information"]["transport"]["succeeded"],
        false
    );
    assert!(data["agentTrace"]["analysisSummary"]
        .as_str()
        .unwrap()
        .ends_with("..."));

    assert_eq!(fixture.source_calls(), 3);
    assert_eq!(fixture.generator.call_count(), 3);
}

#[tokio::test]
async fn test_chat_without_message_is_rejected() {
    let fixture = Fixture::new();

    let (status, body) = send(fixture.app(), post_json("/chat", r#"{"text": "こんにちは"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Invalid request format"}));
    assert_eq!(fixture.source_calls(), 0);
    assert_eq!(fixture.generator.call_count(), 0);
}

#[tokio::test]
async fn test_chat_with_non_string_message_is_rejected() {
    let fixture = Fixture::new();

    let (status, _) = send(fixture.app(), post_json("/chat", r#"{"message": 42}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fixture.source_calls(), 0);
}

#[tokio::test]
async fn test_chat_with_invalid_json_is_rejected() {
    let fixture = Fixture::new();

    let (status, body) = send(fixture.app(), post_json("/chat", "{message: ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request format");
    assert_eq!(fixture.generator.call_count(), 0);
}

#[tokio::test]
async fn test_repaired_turn_is_still_success() {
    let fixture = Fixture::new();

    let (status, body) = send(fixture.app(), post_json("/chat", r#"{"message": "   "}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["repaired"], true);
    assert_eq!(body["data"]["sources"], json!(REPAIR_SOURCES));
    assert_eq!(body["data"]["error"], "Utterance is empty");
    assert_eq!(fixture.source_calls(), 0);
}

#[tokio::test]
async fn test_weather_endpoint() {
    let fixture = Fixture::new();

    let (status, body) = send(fixture.app(), get("/api/weather?area=osaka")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "気象庁API");
    assert_eq!(body["data"]["area"], "東京");
    assert!(body.get("note").is_none());
}

#[tokio::test]
async fn test_tokyo_endpoint_reports_fallback() {
    let fixture = Fixture::new();

    let (status, body) = send(fixture.app(), get("/api/tokyo?type=tourism&limit=abc")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["availableTypes"],
        json!(["population", "facilities", "tourism", "transport"])
    );
    assert_eq!(body["data"]["dataType"], "sample");
    assert!(body["note"].as_str().unwrap().contains("東京都API"));
}

#[tokio::test]
async fn test_transport_endpoint_post() {
    let fixture = Fixture::new();

    let (status, body) = send(
        fixture.app(),
        post_json("/api/transport", r#"{"region": "kansai", "station": "大阪"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "全国交通情報");
    assert!(body["note"].is_string());
}

#[tokio::test]
async fn test_data_endpoint_rejects_malformed_body() {
    let fixture = Fixture::new();

    let (status, body) = send(fixture.app(), post_json("/api/tokyo", "not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Invalid request format"}));
    assert_eq!(fixture.source_calls(), 0);
}

#[tokio::test]
async fn test_data_endpoint_rejects_malformed_query() {
    let fixture = Fixture::new();

    let (status, body) = send(fixture.app(), get("/api/tokyo?limit=5&limit=6")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Invalid request format"}));
    assert_eq!(fixture.source_calls(), 0);
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let fixture = Fixture::new();

    let response = fixture.app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.sources, vec!["weather", "regionalInfo", "transport"]);
    assert!(!health.llm_configured);
}

#[tokio::test]
async fn test_configured_server_end_to_end() {
    let mock_server = MockServer::start().await;

    // Provider feeds are left unmounted: weather and regional info fall back,
    // transport reports its stations without real-time data
    Mock::given(method("POST"))
        .and(path("/generation"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"text": "東京は晴れの予報です。"}
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = ServerConfig {
        sources: SourcesConfig {
            timeout_secs: 2,
            ..SourcesConfig::with_base(&mock_server.uri())
        },
        ..Default::default()
    };
    config.llm.endpoint = format!("{}/generation", mock_server.uri());
    config.llm.api_key = Some("sk-test".to_string());

    let app = create_router(build_state(&config).unwrap());
    let (status, body) = send(app, post_json("/chat", r#"{"message": "今日の天気は？"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["responseText"], "東京は晴れの予報です。");
    assert_eq!(body["data"]["repaired"], false);

    let information = &body["data"]["agentTrace"]["information"];
    for key in ["weather", "regionalInfo"] {
        assert_eq!(information[key]["succeeded"], false, "{} should fall back", key);
        assert!(information[key]["note"].is_string());
    }
    assert_eq!(information["transport"]["succeeded"], true);
    assert_eq!(information["transport"]["payload"]["region"], "kanto");
    assert!(information["transport"]["payload"]["realTimeData"].is_null());
}
