//! Final result of one chat turn

use crate::context::AggregatedContext;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the chat endpoint returns for one turn
///
/// The repair path produces this same shape with `repaired` set, so callers
/// never special-case failure at the type level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    /// Natural-language answer; never empty
    pub response_text: String,
    /// Provenance labels of everything consulted
    pub sources: Vec<String>,
    /// Intermediate artifacts, trimmed for transport
    pub agent_trace: AgentTrace,
    /// Whether the repair path produced this result
    pub repaired: bool,
    /// Diagnostic message from the failure that triggered repair
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Trace of the intermediate pipeline stages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTrace {
    /// Context gathered from the data sources
    pub information: AggregatedContext,
    /// Leading part of the analysis pass output
    pub analysis_summary: String,
    /// Leading part of the prediction pass output
    pub prediction_summary: String,
    /// When the result was assembled
    pub timestamp: DateTime<Utc>,
}
