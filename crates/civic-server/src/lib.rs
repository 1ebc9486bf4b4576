//! Civic Server
//!
//! HTTP surface of the civic assistant: the chat endpoint, one endpoint per
//! public data source, and a health check.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use civic_agent::AgentPipeline;
use civic_llm::QwenClient;
use civic_sources::SourceRegistry;
use config::ServerConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A component could not be built from the configuration
    #[error("Startup error: {0}")]
    Startup(String),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Wire the registry, generation client and pipeline from configuration
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    config.validate()?;

    let registry = SourceRegistry::from_config(&config.sources)
        .map_err(|e| ServerError::Startup(e.to_string()))?;
    let client = QwenClient::new(&config.llm).map_err(|e| ServerError::Startup(e.to_string()))?;
    let llm_configured = client.has_credential();

    let pipeline = AgentPipeline::new(registry.clone(), Arc::new(client), &config.agent)
        .map_err(|e| ServerError::Startup(e.to_string()))?;

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        registry,
        llm_configured,
    })
}

/// Start the HTTP server
///
/// Builds the application state and serves until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting civic server");
    info!("Bind address: {}", config.bind_addr());
    info!("Model: {}", config.llm.model);

    let state = build_state(&config)?;
    if !state.llm_configured {
        warn!("No generation credential configured; answers will carry diagnostics");
    }
    info!("Data sources: {:?}", state.registry.ids());

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_from_defaults() {
        let state = build_state(&ServerConfig::default()).unwrap();
        assert_eq!(state.registry.len(), 3);
        assert!(!state.llm_configured);
    }

    #[test]
    fn test_build_state_with_credential() {
        let mut config = ServerConfig::default();
        config.llm.api_key = Some("sk-test".to_string());

        let state = build_state(&config).unwrap();
        assert!(state.llm_configured);
    }

    #[test]
    fn test_build_state_rejects_invalid_config() {
        let mut config = ServerConfig::default();
        config.sources.delay_feed_url = "not a url".to_string();
        assert!(matches!(build_state(&config), Err(ServerError::Config(_))));
    }
}
