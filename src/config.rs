//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::assessment::heuristic::FlagMatch;
use crate::inference::ModelVariant;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL (`memory` selects the in-process store)
    pub database_url: Option<String>,

    /// Server port
    pub port: u16,

    /// Fitted scaler artifact (JSON)
    pub scaler_path: PathBuf,

    /// Fitted classifier artifact (JSON)
    pub model_path: PathBuf,

    /// Which feature layout the classifier was trained on
    pub model_variant: ModelVariant,

    /// How medical-history "Yes" flags are matched
    pub flag_match: FlagMatch,

    /// Environment (development, production)
    pub environment: String,

    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            scaler_path: env::var("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models/eeg_scaler.json")),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models/eeg_only_model.json")),

            model_variant: env::var("MODEL_VARIANT")
                .ok()
                .and_then(|v| ModelVariant::parse(&v))
                .unwrap_or(ModelVariant::EegOnly),

            flag_match: env::var("HISTORY_FLAG_MATCH")
                .ok()
                .and_then(|v| FlagMatch::parse(&v))
                .unwrap_or(FlagMatch::CaseInsensitive),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            json_logs: env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
