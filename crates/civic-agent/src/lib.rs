//! Civic Agent
//!
//! Turns one user utterance into one [`PipelineResult`] by combining live
//! public data with three generation passes.
//!
//! # Architecture
//!
//! ```text
//! Utterance → Aggregator (all sources, concurrently) → Analyze → Predict → Synthesize → PipelineResult
//! ```
//!
//! # Key Features
//!
//! - **Fan-out**: every source is queried on every turn; a crashed or late
//!   source is simply missing from the context
//! - **Sequential passes**: each generation pass sees the previous pass's text,
//!   failed or not
//! - **Repair**: pipeline-level errors and panics produce a fixed apology in
//!   the same result shape, with no further I/O
//! - **Bounded traces**: intermediate passes are kept as short summaries
//!
//! # Example Usage
//!
//! ```no_run
//! use civic_agent::{AgentConfig, AgentPipeline};
//! use civic_domain::{GenerationOutcome, TextGenerator};
//! use civic_sources::{SourceRegistry, SourcesConfig};
//! use std::sync::Arc;
//!
//! struct Fixed;
//!
//! #[async_trait::async_trait]
//! impl TextGenerator for Fixed {
//!     async fn generate(&self, _prompt: &str) -> GenerationOutcome {
//!         GenerationOutcome::succeeded("晴れです")
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SourceRegistry::from_config(&SourcesConfig::default())?;
//! let pipeline = AgentPipeline::new(registry, Arc::new(Fixed), &AgentConfig::default())?;
//!
//! let result = pipeline.run("今日の天気は？").await;
//! println!("{} (repaired: {})", result.response_text, result.repaired);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregator;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompt;

pub use aggregator::Aggregator;
pub use config::{AgentConfig, AggregationPlan};
pub use error::PipelineError;
pub use pipeline::{
    repair_result, summarize, AgentPipeline, Analysis, Prediction, GENERATOR_LABEL,
    REPAIR_MESSAGE, REPAIR_SOURCES,
};
pub use prompt::PromptBuilder;

pub use civic_domain::PipelineResult;
