//! EEG channel layout - Centralized feature definition
//!
//! The order below is the column order the scaler and classifier were
//! fitted with. Changing it silently invalidates every exported artifact.

use std::collections::BTreeMap;

use serde_json::Value;

/// Standard 10-20 system electrodes, in training-time column order
pub const EEG_CHANNELS: [&str; EEG_CHANNEL_COUNT] = [
    "Fp1", "Fp2", "F3", "F4", "C3", "C4", "P3", "P4", "O1", "O2",
    "F7", "F8", "T7", "T8", "P7", "P8", "Fz", "Cz", "Pz",
];

pub const EEG_CHANNEL_COUNT: usize = 19;

/// Leading questionnaire items appended to the multimodal feature vector
pub const ADHD_QUESTION_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("Missing EEG columns: [{}]", quoted(.0))]
    MissingColumns(Vec<&'static str>),

    #[error("EEG column '{0}' must be a number")]
    NotNumeric(&'static str),

    #[error("Multimodal model needs at least {expected} questionnaire answers, got {actual}")]
    TooFewAnswers { expected: usize, actual: usize },
}

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check that every required channel is present and numeric.
///
/// Returns the channel values in layout order. All missing channels are
/// reported at once; extra keys are ignored.
pub fn validate_eeg(eeg: &BTreeMap<String, Value>) -> Result<Vec<f64>, FeatureError> {
    let missing: Vec<&'static str> = EEG_CHANNELS
        .iter()
        .copied()
        .filter(|ch| !eeg.contains_key(*ch))
        .collect();

    if !missing.is_empty() {
        return Err(FeatureError::MissingColumns(missing));
    }

    EEG_CHANNELS
        .iter()
        .map(|ch| {
            eeg.get(*ch)
                .and_then(Value::as_f64)
                .ok_or(FeatureError::NotNumeric(*ch))
        })
        .collect()
}

/// Normalize the leading ADHD items from the 1-5 scale to 0-1
pub fn normalized_adhd_answers(answers: &[i64]) -> Result<Vec<f64>, FeatureError> {
    if answers.len() < ADHD_QUESTION_COUNT {
        return Err(FeatureError::TooFewAnswers {
            expected: ADHD_QUESTION_COUNT,
            actual: answers.len(),
        });
    }

    Ok(answers[..ADHD_QUESTION_COUNT]
        .iter()
        .map(|&q| (q as f64 - 1.0) / 4.0)
        .collect())
}
