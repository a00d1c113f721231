mod applications;
mod config;
mod cors;
mod cover_letter;
mod errors;
mod extract;
mod llm_client;
mod models;
mod records;
mod resumes;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::cors::cors_layer;
use crate::cover_letter::writer::{CoverLetterService, LlmWriter};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::mongo::MongoStore;

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

    info!("Starting ApplyTrack API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize MongoDB. Never fatal: requests reconnect on demand.
    let store = MongoStore::connect(&config.mongodb_uri, &config.mongodb_database).await;

    // Initialize cover-letter generation
    let cover_letters = match &config.generation {
        Some(generation) => {
            let llm = LlmClient::new(generation)?;
            info!("LLM cover letters enabled (model: {})", llm.model());
            CoverLetterService::with_remote(Arc::new(LlmWriter(llm)))
        }
        None => {
            info!("GENERATION_API_KEY not set; cover letters use the template only");
            CoverLetterService::template_only()
        }
    };

    // Build app state
    let state = AppState {
        store: Arc::new(store),
        cover_letters: Arc::new(cover_letters),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
