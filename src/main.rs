//! wallet-stats - Solana wallet friction analysis server
//!
//! Provides:
//! - Wallet transaction history analysis over HTTP
//! - Rule-based transaction classification and friction metrics
//! - Optional AI narrative enrichment

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware::from_fn, routing::get, Router};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod analyzer;
mod app_error;
mod app_state;
mod classifier;
mod config;
mod friction;
mod middleware;
mod narrator;
mod routes;
mod rpc;

use app_state::AppState;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wallet_stats=debug"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .init();

    tracing::info!("Starting wallet-stats server...");

    let config = Config::from_env()?;

    let state = Arc::new(AppState::new(&config));
    tracing::info!("RPC client initialized");
    if state.narrator.is_enabled() {
        tracing::info!("Narrative enrichment enabled");
    } else {
        tracing::info!("Narrative enrichment disabled (no service configured)");
    }

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/analyze", get(routes::analyze))
        .layer(from_fn(middleware::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
