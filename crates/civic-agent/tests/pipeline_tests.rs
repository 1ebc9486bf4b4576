//! End-to-end tests for the agent pipeline
//!
//! Sources are `MockSource` doubles and generation uses `MockGenerator`, so
//! no test here touches the network.

use async_trait::async_trait;
use civic_agent::{AgentConfig, AgentPipeline, REPAIR_MESSAGE, REPAIR_SOURCES};
use civic_domain::{
    DataSource, DailyForecast, Forecast, GenerationOutcome, SourceId, SourcePayload,
    TextGenerator, WeatherReport,
};
use civic_llm::{LlmConfig, MockGenerator, QwenClient};
use civic_sources::{MockSource, SourceRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const CONSULTED: [&str; 4] = ["気象庁API", "東京都オープンデータ", "全国交通情報", "Qwen AI"];

fn sunny_tokyo() -> SourcePayload {
    SourcePayload::Weather(WeatherReport {
        area: "東京".to_string(),
        forecast: Forecast {
            today: DailyForecast {
                weather: "晴れ".to_string(),
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    })
}

/// Live weather, the other two sources falling back
fn standard_sources() -> Vec<MockSource> {
    vec![
        MockSource::live(SourceId::Weather, sunny_tokyo()),
        MockSource::failing(SourceId::RegionalInfo),
        MockSource::failing(SourceId::Transport),
    ]
}

fn registry(sources: &[MockSource]) -> SourceRegistry {
    SourceRegistry::new(
        sources
            .iter()
            .cloned()
            .map(|source| Arc::new(source) as Arc<dyn DataSource>)
            .collect(),
    )
}

fn pipeline(sources: &[MockSource], generator: Arc<dyn TextGenerator>) -> AgentPipeline {
    AgentPipeline::new(registry(sources), generator, &AgentConfig::default()).unwrap()
}

fn total_source_calls(sources: &[MockSource]) -> usize {
    sources.iter().map(MockSource::call_count).sum()
}

/// Generator that panics on its first call
struct PanickingGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for PanickingGenerator {
    async fn generate(&self, _prompt: &str) -> GenerationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("generator exploded");
    }
}

#[tokio::test]
async fn test_sunny_tokyo_scenario() {
    let sources = standard_sources();
    let generator = MockGenerator::echo();
    let pipeline = pipeline(&sources, Arc::new(generator.clone()));

    let result = pipeline.run("今日の天気は？").await;

    assert!(!result.repaired);
    assert!(result.error.is_none());
    assert!(result.response_text.contains("東京"));
    assert!(result.response_text.contains("晴れ"));
    assert_eq!(result.sources, CONSULTED);

    let information = &result.agent_trace.information;
    assert!(information.weather.as_ref().unwrap().succeeded);
    assert!(!information.regional_info.as_ref().unwrap().succeeded);
    assert!(!information.transport.as_ref().unwrap().succeeded);
}

#[tokio::test]
async fn test_each_stage_called_once_in_order() {
    let sources = standard_sources();
    let generator = MockGenerator::echo();
    let pipeline = pipeline(&sources, Arc::new(generator.clone()));

    pipeline.run("今日の天気は？").await;

    assert_eq!(total_source_calls(&sources), 3);

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].contains("分析エージェント"));
    assert!(prompts[1].starts_with("分析結果: "));
    assert!(!prompts[1].contains("今日の天気は？"));
    assert!(prompts[2].contains("予測結果: "));
    assert!(prompts[2].contains("今日の天気は？"));
}

#[tokio::test]
async fn test_summaries_are_bounded() {
    let sources = standard_sources();
    let generator = MockGenerator::new("長".repeat(500));
    let pipeline = pipeline(&sources, Arc::new(generator));

    let result = pipeline.run("今日の天気は？").await;

    assert_eq!(result.agent_trace.analysis_summary.chars().count(), 203);
    assert!(result.agent_trace.analysis_summary.ends_with("..."));
    assert_eq!(result.agent_trace.prediction_summary.chars().count(), 203);
    assert_eq!(result.response_text.chars().count(), 500);
}

#[tokio::test]
async fn test_identical_inputs_give_identical_results() {
    let first_sources = standard_sources();
    let second_sources = standard_sources();
    let first = pipeline(&first_sources, Arc::new(MockGenerator::new("晴れの一日です")));
    let second = pipeline(&second_sources, Arc::new(MockGenerator::new("晴れの一日です")));

    let a = first.run("今日の天気は？").await;
    let b = second.run("今日の天気は？").await;

    assert_eq!(a.response_text, b.response_text);
    assert_eq!(a.sources, b.sources);
    assert_eq!(a.repaired, b.repaired);
    assert_eq!(a.agent_trace.analysis_summary, b.agent_trace.analysis_summary);
    assert_eq!(a.agent_trace.prediction_summary, b.agent_trace.prediction_summary);
}

#[tokio::test]
async fn test_blank_utterance_repairs_without_io() {
    let sources = standard_sources();
    let generator = MockGenerator::echo();
    let pipeline = pipeline(&sources, Arc::new(generator.clone()));

    let result = pipeline.run("   ").await;

    assert!(result.repaired);
    assert_eq!(result.response_text, REPAIR_MESSAGE);
    assert_eq!(result.sources, REPAIR_SOURCES);
    assert_eq!(result.error.as_deref(), Some("Utterance is empty"));
    assert_eq!(total_source_calls(&sources), 0);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_panicking_stage_repairs_without_further_calls() {
    let sources = standard_sources();
    let generator = Arc::new(PanickingGenerator {
        calls: AtomicUsize::new(0),
    });
    let pipeline = pipeline(&sources, generator.clone());

    let result = pipeline.run("今日の天気は？").await;

    assert!(result.repaired);
    assert!(!result.response_text.is_empty());
    assert_eq!(result.sources, REPAIR_SOURCES);
    assert!(result.error.unwrap().contains("generator exploded"));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(total_source_calls(&sources), 3);
}

#[tokio::test]
async fn test_empty_synthesis_repairs() {
    let sources = standard_sources();
    let pipeline = pipeline(&sources, Arc::new(MockGenerator::new("")));

    let result = pipeline.run("今日の天気は？").await;

    assert!(result.repaired);
    assert_eq!(result.response_text, REPAIR_MESSAGE);
}

#[tokio::test]
async fn test_crashing_source_is_left_out() {
    let sources = vec![
        MockSource::live(SourceId::Weather, sunny_tokyo()),
        MockSource::crashing(SourceId::RegionalInfo),
        MockSource::failing(SourceId::Transport),
    ];
    let pipeline = pipeline(&sources, Arc::new(MockGenerator::echo()));

    let result = pipeline.run("今日の天気は？").await;

    assert!(!result.repaired);
    assert_eq!(result.sources, CONSULTED);
    assert!(result.agent_trace.information.regional_info.is_none());
    assert!(result.agent_trace.information.weather.is_some());
}

#[tokio::test]
async fn test_failed_analysis_flows_into_prediction() {
    let sources = standard_sources();
    let generator = MockGenerator::new("予測と回答");
    let pipeline = pipeline(&sources, Arc::new(generator.clone()));

    let information = pipeline.gather().await;
    let analysis_prompt = civic_agent::PromptBuilder::new(
        "今日の天気は？",
        &serde_json::to_string_pretty(&information).unwrap(),
    )
    .analysis();
    generator.add_failure(analysis_prompt, "Qwen API接続エラー: Qwen API error: 503");

    let analysis = pipeline.analyze("今日の天気は？", &information).await.unwrap();
    assert!(analysis.0.failed);

    let prediction = pipeline.predict(&analysis).await;
    assert!(!prediction.0.failed);
    assert!(generator.prompts()[1].contains("Qwen API error: 503"));
}

#[tokio::test]
async fn test_missing_credential_completes_with_diagnostic() {
    let sources = standard_sources();
    let config = LlmConfig {
        endpoint: "http://127.0.0.1:9/generation".to_string(),
        ..Default::default()
    };
    let client = QwenClient::new(&config).unwrap();
    let pipeline = pipeline(&sources, Arc::new(client));

    let result = pipeline.run("今日の天気は？").await;

    assert!(!result.repaired);
    assert_eq!(
        result.response_text,
        "Qwen API接続エラー: Qwen API key not configured"
    );
    assert_eq!(result.sources, CONSULTED);
    assert!(result
        .agent_trace
        .analysis_summary
        .starts_with("Qwen API接続エラー"));
}
