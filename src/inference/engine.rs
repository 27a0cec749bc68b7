//! Inference Engine - scaler + classifier behind one immutable handle
//!
//! Built once at startup and shared read-only across requests.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;

use serde::Serialize;

use super::channels::{normalized_adhd_answers, FeatureError, EEG_CHANNELS, EEG_CHANNEL_COUNT};
use super::{ModelError, ModelVariant, RandomForest, StandardScaler};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Fitted multi-class classifier (random forest today, swappable)
pub trait Classifier: Debug + Send + Sync {
    /// Class labels, in the order `predict_proba` reports them
    fn classes(&self) -> &[String];

    fn n_features(&self) -> usize;

    /// Per-class probabilities for one scaled row
    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError>;
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Classifier verdict for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub label: String,
    /// Class label -> probability in percent, rounded to 2 decimals
    pub confidence_scores: BTreeMap<String, f64>,
}

impl Classification {
    /// Confidence (percent) for `label`, 0 when the classifier has no such class
    pub fn confidence_for(&self, label: &str) -> f64 {
        self.confidence_scores.get(label).copied().unwrap_or(0.0)
    }
}

fn as_percent(p: f64) -> f64 {
    (p * 100.0 * 100.0).round() / 100.0
}

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug)]
pub struct InferenceEngine {
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
    variant: ModelVariant,
}

impl InferenceEngine {
    pub fn new(
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
        variant: ModelVariant,
    ) -> Result<Self, ModelError> {
        if scaler.n_features() != EEG_CHANNEL_COUNT {
            return Err(ModelError::InvalidArtifact(format!(
                "scaler was fitted on {} features, expected {} EEG channels",
                scaler.n_features(),
                EEG_CHANNEL_COUNT
            )));
        }

        if let Some(names) = &scaler.feature_names {
            if names.iter().map(String::as_str).ne(EEG_CHANNELS.iter().copied()) {
                return Err(ModelError::InvalidArtifact(format!(
                    "scaler columns {:?} do not match the EEG channel layout",
                    names
                )));
            }
        }

        if classifier.n_features() != variant.feature_count() {
            return Err(ModelError::InvalidArtifact(format!(
                "{} classifier expects {} features, but the artifact was fitted on {}",
                variant.as_str(),
                variant.feature_count(),
                classifier.n_features()
            )));
        }

        Ok(Self {
            scaler,
            classifier,
            variant,
        })
    }

    /// Load both artifacts from disk
    pub fn load(scaler_path: &Path, model_path: &Path, variant: ModelVariant) -> Result<Self, ModelError> {
        let scaler = StandardScaler::load(scaler_path)?;
        let forest = RandomForest::load(model_path)?;
        Self::new(scaler, Box::new(forest), variant)
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn classes(&self) -> &[String] {
        self.classifier.classes()
    }

    /// Features appended after the scaled EEG channels.
    ///
    /// Empty for the EEG-only model; the multimodal model needs the leading
    /// ADHD questionnaire items.
    pub fn extra_features(&self, answers: Option<&[i64]>) -> Result<Vec<f64>, FeatureError> {
        match self.variant {
            ModelVariant::EegOnly => Ok(Vec::new()),
            ModelVariant::Multimodal => normalized_adhd_answers(answers.unwrap_or_default()),
        }
    }

    /// Scale the EEG channels, append `extra`, and run the classifier
    pub fn classify(&self, eeg: &[f64], extra: &[f64]) -> Result<Classification, ModelError> {
        let mut row = self.scaler.transform(eeg)?;
        row.extend_from_slice(extra);

        let proba = self.classifier.predict_proba(&row)?;
        let classes = self.classifier.classes();
        if proba.len() != classes.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "classifier returned {} probabilities for {} classes",
                proba.len(),
                classes.len()
            )));
        }

        let mut best = 0usize;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }

        let confidence_scores = classes
            .iter()
            .cloned()
            .zip(proba.iter().map(|p| as_percent(*p)))
            .collect();

        tracing::debug!(label = %classes[best], probability = proba[best], "Classified EEG sample");

        Ok(Classification {
            label: classes[best].clone(),
            confidence_scores,
        })
    }
}
