//! Standard scaler - per-feature standardization with fitted parameters

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{read_artifact, ModelError};

/// Fitted `(x - mean) / scale` transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column names seen at fit time, if the exporter recorded them
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        let scaler = Self {
            feature_names: None,
            mean,
            scale,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Load a scaler exported as JSON
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let (scaler, fingerprint): (Self, String) = read_artifact(path)?;
        scaler.validate()?;

        tracing::info!(
            path = %path.display(),
            features = scaler.n_features(),
            sha256 = %fingerprint,
            "Scaler loaded"
        );
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.mean.is_empty() {
            return Err(ModelError::InvalidArtifact("scaler has no features".to_string()));
        }
        if self.mean.len() != self.scale.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.mean.len() {
                return Err(ModelError::InvalidArtifact(format!(
                    "scaler lists {} feature names for {} features",
                    names.len(),
                    self.mean.len()
                )));
            }
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "scaler parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one row. Zero-variance columns keep a unit scale.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                component: "StandardScaler",
                expected: self.n_features(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
