/// PromptLab: catalog and laboratory service for AI prompts, workflows and agents
///
/// Main entry point for the PromptLab server. Initializes configuration and starts
/// the HTTP server with catalog browsing, laboratory engines and the chat relay.

use promptlab::{config::Config, server::start_server};

/// Application entry point
///
/// Initializes the server with environment-driven configuration and starts listening.
/// The server provides:
/// - Catalog browsing at /api/prompts, /api/workflows, /api/agents, ...
/// - Laboratory engines at /api/lab/*
/// - Streaming agent chat at /api/agents/chat
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3004 and the xAI relay endpoint)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
