//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and infrastructure.
//! Implementations live in `civic-sources` and `civic-llm`.

use crate::generation::GenerationOutcome;
use crate::source::{SourceId, SourceParams, SourceResult};
use async_trait::async_trait;

/// One external data source behind the uniform fetch contract
///
/// Implemented by the adapter layer (civic-sources)
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Source this adapter serves
    fn id(&self) -> SourceId;

    /// Fetch from the provider
    ///
    /// Never fails: on any provider failure the result carries the source's
    /// fallback payload with `succeeded = false`.
    async fn fetch(&self, params: &SourceParams) -> SourceResult;
}

/// Text-completion provider
///
/// Implemented by the infrastructure layer (civic-llm)
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a single-message prompt
    ///
    /// Never fails: failures come back as an outcome with `failed = true`
    /// and a diagnostic text.
    async fn generate(&self, prompt: &str) -> GenerationOutcome;
}
