//! Inference - fitted scaler + classifier
//!
//! Training happens offline. The scaler and the random forest are exported
//! to JSON and loaded once at startup into an immutable [`InferenceEngine`].

pub mod channels;
pub mod scaler;
pub mod forest;
pub mod engine;


use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

pub use channels::{validate_eeg, FeatureError, EEG_CHANNELS, EEG_CHANNEL_COUNT, ADHD_QUESTION_COUNT};
pub use scaler::StandardScaler;
pub use forest::RandomForest;
pub use engine::{Classification, Classifier, InferenceEngine};

// ============================================================================
// MODEL VARIANT
// ============================================================================

/// Feature layout the classifier was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// 19 scaled EEG channels
    EegOnly,
    /// 19 scaled EEG channels + first 10 answers normalized to 0-1
    Multimodal,
}

impl ModelVariant {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "eeg_only" | "eeg-only" | "eeg" => Some(ModelVariant::EegOnly),
            "multimodal" | "multi_modal" => Some(ModelVariant::Multimodal),
            _ => None,
        }
    }

    /// Number of classifier inputs for this variant
    pub fn feature_count(self) -> usize {
        match self {
            ModelVariant::EegOnly => EEG_CHANNEL_COUNT,
            ModelVariant::Multimodal => EEG_CHANNEL_COUNT + ADHD_QUESTION_COUNT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::EegOnly => "eeg_only",
            ModelVariant::Multimodal => "multimodal",
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("X has {actual} features, but {component} is expecting {expected} features as input")]
    DimensionMismatch {
        component: &'static str,
        expected: usize,
        actual: usize,
    },
}

// ============================================================================
// ARTIFACT LOADING
// ============================================================================

/// Parsed artifact plus the SHA-256 of its bytes (logged at startup)
pub(crate) fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<(T, String), ModelError> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((parsed, hex::encode(Sha256::digest(&bytes))))
}
