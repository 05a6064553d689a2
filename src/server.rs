/// Server setup and initialization
///
/// Wires together all components: seed catalog, workflow generator, chat relay
/// and HTTP routes. Provides the application factory functions for the Axum app.

use crate::{
    api::{
        create_agent_routes, create_catalog_routes, create_chat_routes, create_compare_routes, create_lab_routes,
        create_marketplace_routes, create_team_routes,
    },
    catalog::Catalog,
    chat::{ChatRelay, CompletionProvider, XaiProvider},
    config::Config,
    lab::WorkflowGenerator,
};
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Seed-backed catalog repositories
    pub catalog: Catalog,
    /// Verified workflow template library
    pub generator: Arc<WorkflowGenerator>,
    /// Agent chat relay in front of the completion provider
    pub relay: ChatRelay,
}

impl AppState {
    pub fn new(catalog: Catalog, generator: WorkflowGenerator, provider: Arc<dyn CompletionProvider>) -> Self {
        let relay = ChatRelay::new(Arc::clone(&catalog.agents), provider);
        Self {
            catalog,
            generator: Arc::new(generator),
            relay,
        }
    }
}

/// Router with every endpoint, without outer middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Agent chat relay
        .merge(create_chat_routes())
        // Catalog browsing
        .merge(create_agent_routes())
        .merge(create_catalog_routes())
        .merge(create_marketplace_routes())
        .merge(create_team_routes())
        // Laboratory and comparison
        .merge(create_lab_routes())
        .merge(create_compare_routes())
        .with_state(state)
}

/// Create the main Axum application with all routes and middleware
///
/// Loads and verifies the seed catalog and workflow templates, and builds the
/// upstream provider client. Any failure here aborts startup.
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("📥 Loading seed catalog");
    let catalog = Catalog::from_seed().context("Failed to load seed catalog")?;

    tracing::info!("📊 Verifying workflow template library");
    let generator = WorkflowGenerator::embedded().context("Failed to build workflow generator")?;

    tracing::info!(
        "🔗 Chat relay upstream: {} (model {}, key from ${})",
        config.relay.base_url,
        config.relay.model,
        config.relay.api_key_var
    );
    if config.relay.api_key().is_none() {
        tracing::warn!(
            "⚠️ ${} is not set; chat requests will fail until it is",
            config.relay.api_key_var
        );
    }
    let provider = XaiProvider::new(config.relay.clone()).context("Failed to build provider client")?;

    tracing::info!("📡 Creating HTTP router with all endpoints");
    let mut app = build_router(AppState::new(catalog, generator, Arc::new(provider))).layer(TraceLayer::new_for_http());
    if config.server.cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Start the HTTP server with the given configuration
///
/// Creates the application and starts the Axum server on the configured address and port.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("promptlab=info,tower_http=info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("🚀 Starting PromptLab server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
