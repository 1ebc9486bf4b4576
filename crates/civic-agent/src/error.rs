//! Error types for the agent pipeline

use thiserror::Error;

/// Errors that send a turn down the repair path
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The utterance is empty or whitespace only
    #[error("Utterance is empty")]
    EmptyUtterance,

    /// The aggregated context could not be serialized for the prompts
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The synthesis pass produced no text
    #[error("Synthesis produced an empty response")]
    EmptyResponse,

    /// A stage panicked
    #[error("Pipeline stage panicked: {0}")]
    Panicked(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Serialization(e.to_string())
    }
}
