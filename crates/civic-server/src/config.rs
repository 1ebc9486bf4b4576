//! Configuration file parsing for the server.
//!
//! Loads settings from an optional TOML file, then applies environment
//! overrides. Every field has a default, so an empty file is a valid config.

use civic_agent::AgentConfig;
use civic_llm::LlmConfig;
use civic_sources::SourcesConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the generation API key
pub const ENV_API_KEY: &str = "QWEN_API_KEY";

/// Environment variable overriding the generation endpoint
pub const ENV_BASE_URL: &str = "QWEN_BASE_URL";

/// Environment variable overriding the bind address (`host:port`)
pub const ENV_BIND: &str = "CIVIC_BIND";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 3000)
    pub bind_port: u16,

    /// Generation client settings
    pub llm: LlmConfig,

    /// Data source settings
    pub sources: SourcesConfig,

    /// Pipeline settings
    pub agent: AgentConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 3000,
            llm: LlmConfig::default(),
            sources: SourcesConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    ///
    /// Blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.llm.api_key = Some(api_key);
        }
        if let Some(endpoint) = lookup(ENV_BASE_URL) {
            self.llm.endpoint = endpoint;
        }
        if let Some(bind) = lookup(ENV_BIND) {
            let (address, port) = bind
                .rsplit_once(':')
                .ok_or_else(|| ConfigError::Invalid(format!("{} must be host:port", ENV_BIND)))?;
            self.bind_port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{} has an invalid port", ENV_BIND)))?;
            self.bind_address = address.to_string();
        }

        Ok(self)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address must not be empty".to_string()));
        }
        self.llm
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[llm] {}", e)))?;
        self.sources
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[sources] {}", e)))?;
        self.agent
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[agent] {}", e)))?;
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
