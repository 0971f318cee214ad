//! PhishGuard API Server
//!
//! URL phishing-risk scoring service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      PHISHGUARD API                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌─────────────┐  ┌──────────────────────┐  │
//! │  │  API      │  │  Ensemble   │  │  Deep Analyzer       │  │
//! │  │  Gateway  │  │  Panel      │  │  (bounded fetch +    │  │
//! │  │  (Axum)   │  │  (ONNX)     │  │   signal sniffing)   │  │
//! │  └─────┬─────┘  └──────┬──────┘  └──────────┬───────────┘  │
//! │        └───────────────┼────────────────────┘              │
//! │                        ▼                                   │
//! │                ┌──────────────┐                            │
//! │                │  Rule Engine │                            │
//! │                └──────────────┘                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod logic;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logic::deep::HttpDeepAnalyzer;
use logic::ensemble::load_panel;
use logic::Scanner;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "phishguard_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("PhishGuard API starting...");
    tracing::info!("Model path: {}", config.model_path);

    // Load the classifier panel; the service still starts without it so
    // health reports the failure and scans fail fast
    let panel = match load_panel(&config.model_path) {
        Ok(panel) => {
            tracing::info!("Model panel loaded: {} classifiers", panel.len());
            Some(Arc::new(panel))
        }
        Err(e) => {
            tracing::error!("Failed to load model panel: {}", e);
            None
        }
    };

    let deep = Arc::new(HttpDeepAnalyzer::new(config.fetch_timeout_secs));
    let scanner = panel.map(|panel| Scanner::new(panel, deep));

    // Build application state
    let state = AppState {
        scanner,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Absent when the panel failed to load; scans then fail fast
    pub scanner: Option<Scanner<HttpDeepAnalyzer>>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::info))
        .route("/api/health", get(handlers::health::check))
        .route("/api/scan", post(handlers::scan::scan))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================
