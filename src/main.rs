//! EEG Assessment Server
//!
//! Serves ADHD / related-disorder screening predictions over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  EEG ASSESSMENT SERVER                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────┐  ┌──────────────────┐ │
//! │  │  API      │  │  Inference       │  │  Assessment      │ │
//! │  │  (Axum)   │─▶│  scaler + forest │─▶│  heuristics +    │ │
//! │  │           │  │  (read-only)     │  │  fusion + risk   │ │
//! │  └─────┬─────┘  └──────────────────┘  └──────────────────┘ │
//! │        ▼                                                    │
//! │  ┌─────────────┐                                            │
//! │  │ PostgreSQL  │  (soft failure: saved_to_database=false)  │
//! │  └─────────────┘                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod models;
mod handlers;
mod error;
mod inference;
mod assessment;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assessment::HeuristicScorer;
use inference::InferenceEngine;
use store::AssessmentStore;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "eeg_assessment_server=debug,tower_http=debug".into());
    if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("EEG Assessment Server starting ({})...", config.environment);

    // Load fitted artifacts
    let engine = InferenceEngine::load(&config.scaler_path, &config.model_path, config.model_variant)
        .context("Failed to load model artifacts")?;
    tracing::info!(
        variant = config.model_variant.as_str(),
        classes = ?engine.classes(),
        "Inference engine ready"
    );

    // Initialize assessment store
    if let Some(url) = &config.database_url {
        tracing::info!("Database: {}", url.split('@').last().unwrap_or("***"));
    } else if config.is_production() {
        tracing::warn!("DATABASE_URL not set in production; assessments will not be stored");
    } else {
        tracing::warn!("DATABASE_URL not set; assessments will not be stored");
    }
    let store = AssessmentStore::connect(config.database_url.as_deref())
        .await
        .context("Failed to initialize assessment store")?;

    // Build application state
    let state = AppState {
        engine: Arc::new(engine),
        store: Arc::new(store),
        scorer: HeuristicScorer::new(config.flag_match),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
    pub store: Arc<AssessmentStore>,
    pub scorer: HeuristicScorer,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))

        // Assessments
        .route("/assessments", get(handlers::assessments::list))
        .route("/assessments/stats", get(handlers::assessments::stats))
        .route("/assessments/:patient_id", get(handlers::assessments::by_patient))

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
