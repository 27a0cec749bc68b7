//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use crate::inference::ModelVariant;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    environment: String,
    model_variant: ModelVariant,
    classes: Vec<String>,
    store: &'static str,
}

/// Plain-text banner at `/`
pub async fn index() -> &'static str {
    "EEG + Questionnaire ADHD Prediction API is running!"
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        environment: state.config.environment.clone(),
        model_variant: state.engine.variant(),
        classes: state.engine.classes().to_vec(),
        store: state.store.backend(),
    })
}
