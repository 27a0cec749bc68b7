//! Prediction handler

use axum::{extract::{rejection::JsonRejection, State}, Json};
use validator::Validate;

use crate::{AppState, AppError, AppResult};
use crate::assessment::{fuse, risk_level};
use crate::inference::validate_eeg;
use crate::models::{Assessment, PredictRequest, PredictResponse};

/// Classify an EEG sample, fuse with questionnaire heuristics, store the result
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let eeg = req
        .eeg
        .as_ref()
        .ok_or_else(|| AppError::Validation("No EEG data provided".to_string()))?;
    let channels = validate_eeg(eeg)?;

    let answers = req.questions.as_deref();
    let extra = state.engine.extra_features(answers)?;
    let classification = state.engine.classify(&channels, &extra)?;

    // Questionnaire heuristics only run when answers were submitted
    let heuristic_flags = answers.map(|answers| {
        let history = req.medical_history.clone().unwrap_or_default();
        state.scorer.score(answers, &history)
    });

    let prediction = match &heuristic_flags {
        Some(flags) => fuse(&classification.label, flags),
        None => classification.label.clone(),
    };
    let risk = risk_level(&prediction);
    let confidence = classification.confidence_for(&prediction);

    let saved_to_database = match Assessment::from_prediction(&req, &prediction, risk, confidence) {
        Ok(record) => match state.store.insert(&record).await {
            Ok(()) => {
                tracing::info!(patient_id = %record.patient_id, %prediction, "Assessment stored");
                true
            }
            Err(e) => {
                tracing::error!(patient_id = %record.patient_id, "Failed to store assessment: {}", e);
                false
            }
        },
        Err(e) => {
            tracing::error!("Failed to encode assessment: {}", e);
            false
        }
    };

    Ok(Json(PredictResponse {
        prediction,
        risk_level: risk,
        confidence,
        confidence_scores: classification.confidence_scores,
        heuristic_flags,
        saved_to_database,
    }))
}
