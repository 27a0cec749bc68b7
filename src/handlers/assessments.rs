//! Assessment read-back handlers

use axum::{extract::{State, Path}, Json};

use crate::{AppState, AppResult};
use crate::models::{AssessmentList, AssessmentStats};

/// List all assessments, most recent first
pub async fn list(State(state): State<AppState>) -> AppResult<Json<AssessmentList>> {
    let assessments = state.store.list_recent().await?;
    Ok(Json(assessments.into()))
}

/// List one patient's assessments
pub async fn by_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> AppResult<Json<AssessmentList>> {
    let assessments = state.store.list_by_patient(&patient_id).await?;
    Ok(Json(assessments.into()))
}

/// Prediction and risk level breakdown
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<AssessmentStats>> {
    Ok(Json(state.store.stats().await?))
}
