//! The agent pipeline: gather, analyze, predict, synthesize
//!
//! One call to [`AgentPipeline::run`] handles one user turn. The stages run
//! strictly in order and each sees only what the previous ones produced:
//!
//! ```text
//! Gather → Analyze(utterance, context) → Predict(analysis) → Synthesize(all) → Done
//!    └────────── any error or panic ──────────────────────────────────→ Repair
//! ```
//!
//! A failed generation pass is not an error here: its diagnostic text simply
//! flows into the next stage. Only pipeline-level failures (a blank utterance,
//! a context that will not serialize, a panic) take the repair path, which
//! does no further I/O.

use crate::aggregator::Aggregator;
use crate::config::{AgentConfig, AggregationPlan};
use crate::error::PipelineError;
use crate::prompt::PromptBuilder;
use chrono::Utc;
use civic_domain::{
    AgentTrace, AggregatedContext, GenerationOutcome, PipelineResult, SourceId, TextGenerator,
};
use civic_sources::SourceRegistry;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Provenance label of the generation service
pub const GENERATOR_LABEL: &str = "Qwen AI";

/// Provenance labels reported by a repaired turn
pub const REPAIR_SOURCES: [&str; 2] = ["修復AI", "フォールバックシステム"];

/// Fixed apology returned by a repaired turn
pub const REPAIR_MESSAGE: &str = "申し訳ございません。現在システムに一時的な問題が発生しています。

修復AIが以下を試行しました:
- API接続の再試行
- フォールバックシステムへの切り替え
- エラーログの記録

しばらく時間をおいてから再度お試しください。基本的な質問であれば、政府公式データを使って回答いたします。";

/// Marker appended to every trace summary
const TRUNCATION_MARKER: &str = "...";

/// Output of the analysis pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis(pub GenerationOutcome);

/// Output of the prediction pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction(pub GenerationOutcome);

impl Analysis {
    /// Full analysis text (a diagnostic if the pass failed)
    pub fn text(&self) -> &str {
        &self.0.text
    }
}

impl Prediction {
    /// Full prediction text (a diagnostic if the pass failed)
    pub fn text(&self) -> &str {
        &self.0.text
    }
}

/// Drives one user turn from utterance to [`PipelineResult`]
///
/// Holds no per-turn state; concurrent turns share nothing but the
/// registry and the generator.
pub struct AgentPipeline {
    aggregator: Aggregator,
    generator: Arc<dyn TextGenerator>,
    plan: AggregationPlan,
    summary_chars: usize,
}

impl AgentPipeline {
    /// Create a pipeline
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid
    pub fn new(
        registry: SourceRegistry,
        generator: Arc<dyn TextGenerator>,
        config: &AgentConfig,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        Ok(Self {
            aggregator: Aggregator::new(registry).with_window(config.aggregation_window()),
            generator,
            plan: config.plan.clone(),
            summary_chars: config.summary_chars,
        })
    }

    /// Sources gathered on every turn
    pub fn sources(&self) -> Vec<SourceId> {
        self.aggregator.registry().ids()
    }

    /// Handle one turn
    ///
    /// Never fails: any error or panic in a stage yields the repair result.
    pub async fn run(&self, utterance: &str) -> PipelineResult {
        let span = info_span!("turn", id = %Uuid::now_v7());

        async move {
            let error = match AssertUnwindSafe(self.execute(utterance))
                .catch_unwind()
                .await
            {
                Ok(Ok(result)) => return result,
                Ok(Err(e)) => e,
                Err(panic) => PipelineError::Panicked(panic_message(panic.as_ref())),
            };

            warn!("Turn failed, returning repair response: {}", error);
            repair_result(&error)
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, utterance: &str) -> Result<PipelineResult, PipelineError> {
        if utterance.trim().is_empty() {
            return Err(PipelineError::EmptyUtterance);
        }

        let information = self.gather().await;
        let analysis = self.analyze(utterance, &information).await?;
        let prediction = self.predict(&analysis).await;
        let response = self
            .synthesize(utterance, &information, &analysis, &prediction)
            .await?;

        if response.text.trim().is_empty() {
            return Err(PipelineError::EmptyResponse);
        }

        Ok(self.done(information, &analysis, &prediction, response))
    }

    /// Gather stage: query every source once
    pub async fn gather(&self) -> AggregatedContext {
        info!("Gather: collecting source data");
        self.aggregator.gather(&self.plan).await
    }

    /// Analyze stage: one generation pass over the utterance and the context
    pub async fn analyze(
        &self,
        utterance: &str,
        information: &AggregatedContext,
    ) -> Result<Analysis, PipelineError> {
        info!("Analyze: analysing gathered data");
        let context_json = serde_json::to_string_pretty(information)?;
        let prompt = PromptBuilder::new(utterance, &context_json).analysis();

        Ok(Analysis(self.generate("analysis", &prompt).await))
    }

    /// Predict stage: one generation pass over the analysis text only
    pub async fn predict(&self, analysis: &Analysis) -> Prediction {
        info!("Predict: forecasting from analysis");
        let prompt = PromptBuilder::prediction(analysis.text());

        Prediction(self.generate("prediction", &prompt).await)
    }

    /// Synthesize stage: the user-facing answer
    pub async fn synthesize(
        &self,
        utterance: &str,
        information: &AggregatedContext,
        analysis: &Analysis,
        prediction: &Prediction,
    ) -> Result<GenerationOutcome, PipelineError> {
        info!("Synthesize: composing final response");
        let context_json = serde_json::to_string_pretty(information)?;
        let prompt = PromptBuilder::new(utterance, &context_json)
            .synthesis(analysis.text(), prediction.text());

        Ok(self.generate("synthesis", &prompt).await)
    }

    async fn generate(&self, pass: &str, prompt: &str) -> GenerationOutcome {
        debug!("{} prompt: {} chars", pass, prompt.chars().count());
        let outcome = self.generator.generate(prompt).await;
        if outcome.failed {
            warn!("{} pass failed, continuing with diagnostic text", pass);
        }
        outcome
    }

    fn done(
        &self,
        information: AggregatedContext,
        analysis: &Analysis,
        prediction: &Prediction,
        response: GenerationOutcome,
    ) -> PipelineResult {
        let sources = SourceId::ALL
            .iter()
            .map(|id| id.label())
            .chain(std::iter::once(GENERATOR_LABEL))
            .map(str::to_string)
            .collect();

        PipelineResult {
            response_text: response.text,
            sources,
            agent_trace: AgentTrace {
                information,
                analysis_summary: summarize(analysis.text(), self.summary_chars),
                prediction_summary: summarize(prediction.text(), self.summary_chars),
                timestamp: Utc::now(),
            },
            repaired: false,
            error: None,
        }
    }
}

/// First `max_chars` characters of `text` followed by the truncation marker
///
/// The marker is appended even when nothing was cut.
pub fn summarize(text: &str, max_chars: usize) -> String {
    let mut summary: String = text.chars().take(max_chars).collect();
    summary.push_str(TRUNCATION_MARKER);
    summary
}

/// The repair result for a failed turn
///
/// Built from static strings only.
pub fn repair_result(error: &PipelineError) -> PipelineResult {
    PipelineResult {
        response_text: REPAIR_MESSAGE.to_string(),
        sources: REPAIR_SOURCES.iter().map(|s| s.to_string()).collect(),
        agent_trace: AgentTrace {
            information: AggregatedContext::new(),
            analysis_summary: String::new(),
            prediction_summary: String::new(),
            timestamp: Utc::now(),
        },
        repaired: true,
        error: Some(error.to_string()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
