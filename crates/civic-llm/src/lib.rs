//! Civic LLM Provider Layer
//!
//! Implementations of the `TextGenerator` trait from `civic-domain`.
//!
//! # Architecture
//!
//! A generator never fails past its boundary: every provider error becomes a
//! `GenerationOutcome` with `failed = true` and a readable diagnostic, which
//! the pipeline embeds into the next prompt like any other text.
//!
//! # Providers
//!
//! - `MockGenerator`: Deterministic mock for testing
//! - `QwenClient`: DashScope text-generation API integration
//!
//! # Examples
//!
//! ```
//! use civic_llm::MockGenerator;
//! use civic_domain::TextGenerator;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let generator = MockGenerator::new("Hello from LLM!");
//! let outcome = generator.generate("test prompt").await;
//! assert_eq!(outcome.text, "Hello from LLM!");
//! assert!(!outcome.failed);
//! # });
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod qwen;

use async_trait::async_trait;
use civic_domain::{GenerationOutcome, TextGenerator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use config::LlmConfig;
pub use qwen::QwenClient;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key configured; no request was attempted
    #[error("Qwen API key not configured")]
    MissingCredential,

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Provider answered with a non-2xx status
    #[error("Qwen API error: {0}")]
    Status(u16),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Canned behavior for one prompt
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Failure(String),
}

/// Mock text generator for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Clones share responses and the call counter.
///
/// # Examples
///
/// ```
/// use civic_llm::MockGenerator;
/// use civic_domain::TextGenerator;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// // Multiple responses
/// let generator = MockGenerator::default();
/// generator.add_response("prompt1", "response1");
/// generator.add_failure("prompt2", "quota exceeded");
///
/// assert_eq!(generator.generate("prompt1").await.text, "response1");
/// assert!(generator.generate("prompt2").await.failed);
/// assert_eq!(generator.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockGenerator {
    default_response: String,
    echo: bool,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockGenerator {
    /// Create a generator with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            echo: false,
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a generator that answers every prompt with the prompt itself
    pub fn echo() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure a failed outcome for a specific prompt
    pub fn add_failure(&self, prompt: impl Into<String>, diagnostic: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Failure(diagnostic.into()));
    }

    /// Number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Forget recorded prompts
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> GenerationOutcome {
        lock(&self.prompts).push(prompt.to_string());

        match lock(&self.responses).get(prompt) {
            Some(MockReply::Text(text)) => GenerationOutcome::succeeded(text.clone()),
            Some(MockReply::Failure(diagnostic)) => GenerationOutcome::failed(diagnostic.clone()),
            None if self.echo => GenerationOutcome::succeeded(prompt),
            None => GenerationOutcome::succeeded(self.default_response.clone()),
        }
    }
}

// A poisoned mock only means another test thread panicked mid-call
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generator_default() {
        let generator = MockGenerator::new("Test response");
        let outcome = generator.generate("any prompt").await;
        assert!(!outcome.failed);
        assert_eq!(outcome.text, "Test response");
    }

    #[tokio::test]
    async fn test_mock_generator_specific_responses() {
        let generator = MockGenerator::default();
        generator.add_response("hello", "world");
        generator.add_response("foo", "bar");

        assert_eq!(generator.generate("hello").await.text, "world");
        assert_eq!(generator.generate("foo").await.text, "bar");
        assert_eq!(generator.generate("unknown").await.text, "Default mock response");
    }

    #[tokio::test]
    async fn test_mock_generator_call_count() {
        let generator = MockGenerator::new("test");
        assert_eq!(generator.call_count(), 0);

        generator.generate("prompt1").await;
        generator.generate("prompt2").await;
        assert_eq!(generator.call_count(), 2);
        assert_eq!(generator.prompts(), vec!["prompt1", "prompt2"]);

        generator.reset_call_count();
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_generator_failure() {
        let generator = MockGenerator::default();
        generator.add_failure("bad prompt", "Qwen API接続エラー: HTTP 500");

        let outcome = generator.generate("bad prompt").await;
        assert!(outcome.failed);
        assert!(outcome.text.contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_mock_generator_echo() {
        let generator = MockGenerator::echo();
        let outcome = generator.generate("東京は晴れ").await;
        assert_eq!(outcome.text, "東京は晴れ");
    }

    #[tokio::test]
    async fn test_mock_generator_clone_shares_state() {
        let generator1 = MockGenerator::new("test");
        let generator2 = generator1.clone();

        generator1.generate("test").await;

        assert_eq!(generator1.call_count(), 1);
        assert_eq!(generator2.call_count(), 1);
    }
}
