//! Generation pass outcome

use serde::Serialize;

/// Text produced by one generation pass
///
/// A failed pass still carries readable text (a diagnostic), so the next
/// pipeline stage always has a string to embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOutcome {
    /// Generated text, or a diagnostic when `failed` is set
    pub text: String,
    /// Whether the pass failed
    pub failed: bool,
}

impl GenerationOutcome {
    /// Outcome of a successful pass
    pub fn succeeded(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: false,
        }
    }

    /// Outcome of a failed pass
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: true,
        }
    }
}
