//! Civic Server CLI
//!
//! Starts the HTTP server for the chat and data-source endpoints.

use civic_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("No config file specified, using defaults");
        ServerConfig::default()
    };

    let config = config.with_env()?;
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Civic Server - public data assistant");
    println!();
    println!("USAGE:");
    println!("    civic-server [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    QWEN_API_KEY       Generation API key");
    println!("    QWEN_BASE_URL      Generation endpoint override");
    println!("    CIVIC_BIND         Bind address override (host:port)");
    println!("    RUST_LOG           Log filter (default: info)");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address, bind_port");
    println!("    - [llm]: endpoint, model, temperature, max_tokens, timeout_secs");
    println!("    - [sources]: jma_base_url, tokyo_api_base, delay_feed_url, timeout_secs");
    println!("    - [agent]: summary_chars, aggregation_timeout_secs, [agent.plan]");
    println!();
}
