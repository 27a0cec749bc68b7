//! Risk level mapping

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ADHD_LABEL;

/// Coarse severity bucket derived from the final label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Low => "low",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ADHD is high risk, the other screened disorders moderate, anything else low
pub fn risk_level(label: &str) -> RiskLevel {
    match label {
        ADHD_LABEL => RiskLevel::High,
        "ODD" | "ASD" | "Dyslexia" => RiskLevel::Moderate,
        _ => RiskLevel::Low,
    }
}
