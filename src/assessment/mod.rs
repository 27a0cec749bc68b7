//! Assessment logic - risk mapping, questionnaire heuristics, decision fusion

pub mod risk;
pub mod heuristic;
pub mod fusion;

pub use risk::{risk_level, RiskLevel};
pub use heuristic::{Disorder, FlagMatch, HeuristicFlags, HeuristicScorer, Verdict};
pub use fusion::fuse;

/// Classifier label that always wins fusion
pub const ADHD_LABEL: &str = "ADHD";

/// Final label when nothing is flagged
pub const HEALTHY_LABEL: &str = "Healthy";
