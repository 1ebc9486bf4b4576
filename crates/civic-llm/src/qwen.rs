//! Qwen Provider Implementation
//!
//! Integration with the DashScope text-generation API.
//!
//! # Features
//!
//! - One request per call, fixed sampling parameters
//! - Accepts both envelope variants (`output.text` and `output.choices`)
//! - Missing credential short-circuits before any network I/O
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use civic_llm::{LlmConfig, QwenClient};
//! use civic_domain::TextGenerator;
//!
//! # async fn example() -> Result<(), civic_llm::LlmError> {
//! let client = QwenClient::new(&LlmConfig::default())?.with_api_key("sk-...");
//! let outcome = client.generate("こんにちは").await;
//! println!("{} (failed: {})", outcome.text, outcome.failed);
//! # Ok(())
//! # }
//! ```

use crate::config::LlmConfig;
use crate::LlmError;
use async_trait::async_trait;
use civic_domain::{GenerationOutcome, TextGenerator};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Text used when the envelope parses but carries no completion
pub const EMPTY_COMPLETION: &str = "Qwen APIからの応答を取得できませんでした";

/// Prefix of every failure diagnostic
const ERROR_PREFIX: &str = "Qwen API接続エラー";

/// DashScope text-generation client
pub struct QwenClient {
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key: Option<String>,
    client: reqwest::Client,
}

/// Request body for the text-generation API
#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: RequestInput<'a>,
    parameters: RequestParameters,
}

#[derive(Serialize)]
struct RequestInput<'a> {
    messages: [RequestMessage<'a>; 1],
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct RequestParameters {
    temperature: f32,
    max_tokens: u32,
}

/// Response envelope; both completion shapes are optional
#[derive(Debug, Default, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    output: Option<ResponseOutput>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseOutput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    choices: Option<Vec<ResponseChoice>>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GenerationResponse {
    /// First non-empty completion: `output.text`, then the first chat choice
    fn completion(self) -> Option<String> {
        let output = self.output?;
        let non_empty = |text: &Option<String>| text.as_ref().filter(|t| !t.is_empty()).cloned();

        non_empty(&output.text).or_else(|| {
            output
                .choices?
                .into_iter()
                .next()
                .and_then(|choice| choice.message)
                .and_then(|message| non_empty(&message.content))
        })
    }
}

impl QwenClient {
    /// Create a client from configuration
    ///
    /// The credential is taken from `config.api_key`; a blank key counts as
    /// absent.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            api_key: config.credential().map(str::to_string),
            client,
        })
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.trim().is_empty()).then_some(api_key);
        self
    }

    /// Whether a credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Issue one completion request
    ///
    /// # Returns
    ///
    /// The first completion text, or `None` when the envelope carries none
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No API key is configured (no request is sent)
    /// - Network communication fails
    /// - The provider answers with a non-2xx status
    /// - The envelope is not valid JSON
    pub async fn complete(&self, prompt: &str) -> Result<Option<String>, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredential)?;

        let request_body = GenerationRequest {
            model: &self.model,
            input: RequestInput {
                messages: [RequestMessage {
                    role: "user",
                    content: prompt,
                }],
            },
            parameters: RequestParameters {
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;
        let envelope: GenerationResponse = serde_json::from_slice(&body)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(envelope.completion())
    }
}

#[async_trait]
impl TextGenerator for QwenClient {
    async fn generate(&self, prompt: &str) -> GenerationOutcome {
        debug!("Generation request: {} chars", prompt.chars().count());

        match self.complete(prompt).await {
            Ok(Some(text)) => GenerationOutcome::succeeded(text),
            Ok(None) => {
                warn!("Generation envelope carried no completion");
                GenerationOutcome::failed(EMPTY_COMPLETION)
            }
            Err(e) => {
                warn!("Generation failed: {}", e);
                GenerationOutcome::failed(format!("{}: {}", ERROR_PREFIX, e))
            }
        }
    }
}
