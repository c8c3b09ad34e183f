mod assessment;
mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::assessment::catalog::FieldCatalog;
use crate::assessment::provider::LlmJudgmentProvider;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting matchscan v{}", env!("CARGO_PKG_VERSION"));

    // Field catalog is validated once and shared read-only
    let catalog = Arc::new(FieldCatalog::standard()?);
    anyhow::ensure!(!catalog.is_empty(), "Field catalog has no fields");
    info!("Field catalog loaded ({} fields)", catalog.len());

    // Initialize LLM-backed judgment provider
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!(
        "LLM client initialized (model: {}, per-category timeout: {}s)",
        llm_client::MODEL,
        config.provider_timeout.as_secs()
    );
    let provider = Arc::new(LlmJudgmentProvider(llm));

    let state = AppState {
        provider,
        catalog,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
