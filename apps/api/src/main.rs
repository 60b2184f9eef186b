mod config;
mod errors;
mod extraction;
mod insights;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::catalog::{default_definitions, load_definitions};
use crate::extraction::engine::SkillEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skills API v{}", env!("CARGO_PKG_VERSION"));

    // Load the skill catalog: configured file, else the bundled one
    let definitions = match &config.catalog_path {
        Some(path) => {
            info!("Loading skill catalog from {}", path.display());
            load_definitions(path)?
        }
        None => {
            info!("Using bundled skill catalog");
            default_definitions()?
        }
    };

    // Compile catalog → automaton once; the engine owns it and the result cache
    let engine = Arc::new(SkillEngine::from_definitions(
        &definitions,
        config.cache_capacity,
    )?);
    info!("Extraction cache capacity: {}", config.cache_capacity);

    // Build app state
    let state = AppState {
        engine,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the tracker frontend

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
