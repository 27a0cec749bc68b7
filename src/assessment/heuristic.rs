//! Heuristic disorder scorer
//!
//! Questionnaire items per disorder (0-based, half-open):
//!
//! | Disorder | Items     | History boost               |
//! |----------|-----------|-----------------------------|
//! | ODD      | `[10,13)` | `family_adhd`               |
//! | Dyslexia | `[13,16)` | `family_learning_disorders` |
//! | ASD      | `[16,20)` | -                           |
//!
//! Answers are averaged on their raw 1-5 scale and compared against 0.5.
//! A sequence too short for a disorder's items scores 0.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Serialize, Serializer};

/// Score at or above which a disorder is flagged
pub const POSSIBLE_THRESHOLD: f64 = 0.5;

// ============================================================================
// TYPES
// ============================================================================

/// Disorders screened by questionnaire, in fusion precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disorder {
    Odd,
    Dyslexia,
    Asd,
}

impl Disorder {
    pub const ALL: [Disorder; 3] = [Disorder::Odd, Disorder::Dyslexia, Disorder::Asd];

    pub fn label(self) -> &'static str {
        match self {
            Disorder::Odd => "ODD",
            Disorder::Dyslexia => "Dyslexia",
            Disorder::Asd => "ASD",
        }
    }

    fn items(self) -> Range<usize> {
        match self {
            Disorder::Odd => 10..13,
            Disorder::Dyslexia => 13..16,
            Disorder::Asd => 16..20,
        }
    }

    fn history_flag(self) -> Option<&'static str> {
        match self {
            Disorder::Odd => Some("family_adhd"),
            Disorder::Dyslexia => Some("family_learning_disorders"),
            Disorder::Asd => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Possible,
    Unlikely,
}

/// How a medical-history flag value is compared against "Yes"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagMatch {
    /// "Yes", "yes", "YES" all count
    CaseInsensitive,
    /// Only the exact string "Yes" counts
    Exact,
}

impl FlagMatch {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "case_insensitive" | "insensitive" => Some(FlagMatch::CaseInsensitive),
            "exact" => Some(FlagMatch::Exact),
            _ => None,
        }
    }

    fn is_yes(self, value: &str) -> bool {
        match self {
            FlagMatch::CaseInsensitive => value.eq_ignore_ascii_case("yes"),
            FlagMatch::Exact => value == "Yes",
        }
    }
}

/// One verdict per disorder, iterated in [`Disorder::ALL`] order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicFlags {
    verdicts: [Verdict; 3],
}

impl HeuristicFlags {
    pub const fn new(odd: Verdict, dyslexia: Verdict, asd: Verdict) -> Self {
        Self {
            verdicts: [odd, dyslexia, asd],
        }
    }

    pub fn get(&self, disorder: Disorder) -> Verdict {
        self.verdicts[disorder as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Disorder, Verdict)> + '_ {
        Disorder::ALL.into_iter().zip(self.verdicts.iter().copied())
    }
}

impl Serialize for HeuristicFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(d, v)| (d.label(), v)))
    }
}

// ============================================================================
// SCORER
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct HeuristicScorer {
    flag_match: FlagMatch,
}

impl HeuristicScorer {
    pub fn new(flag_match: FlagMatch) -> Self {
        Self { flag_match }
    }

    /// Raw score for one disorder (before thresholding)
    pub fn disorder_score(&self, disorder: Disorder, answers: &[i64], history: &BTreeMap<String, String>) -> f64 {
        let items = disorder.items();
        let mut score = match answers.get(items.clone()) {
            Some(slice) => slice.iter().map(|&a| a as f64).sum::<f64>() / items.len() as f64,
            None => 0.0,
        };

        let boosted = disorder
            .history_flag()
            .and_then(|key| history.get(key))
            .is_some_and(|value| self.flag_match.is_yes(value));
        if boosted {
            score = (score + 1.0) / 2.0;
        }

        score
    }

    pub fn score(&self, answers: &[i64], history: &BTreeMap<String, String>) -> HeuristicFlags {
        let verdict = |disorder| {
            if self.disorder_score(disorder, answers, history) >= POSSIBLE_THRESHOLD {
                Verdict::Possible
            } else {
                Verdict::Unlikely
            }
        };

        let flags = HeuristicFlags::new(
            verdict(Disorder::Odd),
            verdict(Disorder::Dyslexia),
            verdict(Disorder::Asd),
        );
        tracing::debug!(?flags, answers = answers.len(), "Questionnaire heuristics scored");
        flags
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new(FlagMatch::CaseInsensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_short_sequence_odd_unlikely() {
        let scorer = HeuristicScorer::default();
        for len in 0..13 {
            let answers = vec![5; len];
            let flags = scorer.score(&answers, &BTreeMap::new());
            assert_eq!(flags.get(Disorder::Odd), Verdict::Unlikely, "len {}", len);
        }
    }

    #[test]
    fn test_full_sequence_flags_all_possible() {
        // Raw 1-5 averages are always >= 1, so every covered disorder is Possible
        let flags = HeuristicScorer::default().score(&[1; 20], &BTreeMap::new());
        for (disorder, verdict) in flags.iter() {
            assert_eq!(verdict, Verdict::Possible, "{:?}", disorder);
        }
    }

    #[test]
    fn test_partial_coverage() {
        // Covers ODD and Dyslexia but not ASD
        let flags = HeuristicScorer::default().score(&[2; 16], &BTreeMap::new());
        assert_eq!(flags, HeuristicFlags::new(Verdict::Possible, Verdict::Possible, Verdict::Unlikely));
    }

    #[test]
    fn test_history_boost_lifts_zero_score() {
        let scorer = HeuristicScorer::default();
        let hist = history(&[("family_adhd", "Yes"), ("family_learning_disorders", "No")]);

        assert_eq!(scorer.disorder_score(Disorder::Odd, &[], &hist), 0.5);
        assert_eq!(scorer.disorder_score(Disorder::Dyslexia, &[], &hist), 0.0);

        let flags = scorer.score(&[], &hist);
        assert_eq!(flags, HeuristicFlags::new(Verdict::Possible, Verdict::Unlikely, Verdict::Unlikely));
    }

    #[test]
    fn test_boost_pulls_halfway_to_one() {
        let scorer = HeuristicScorer::default();
        let mut answers = vec![1; 20];
        answers[13..16].copy_from_slice(&[3, 4, 5]);
        let hist = history(&[("family_learning_disorders", "Yes")]);
        assert_eq!(scorer.disorder_score(Disorder::Dyslexia, &answers, &hist), 2.5);
    }

    #[test]
    fn test_asd_has_no_history_boost() {
        let scorer = HeuristicScorer::default();
        let hist = history(&[("family_asd", "Yes"), ("family_adhd", "Yes")]);
        assert_eq!(scorer.disorder_score(Disorder::Asd, &[], &hist), 0.0);
    }

    #[test]
    fn test_extreme_answers_do_not_overflow() {
        let scorer = HeuristicScorer::default();
        let answers = vec![i64::MAX; 20];
        let score = scorer.disorder_score(Disorder::Asd, &answers, &BTreeMap::new());
        assert!(score.is_finite());
        assert!(score > POSSIBLE_THRESHOLD);
    }

    #[test]
    fn test_flag_match_modes() {
        let hist = history(&[("family_adhd", "yes")]);

        let lenient = HeuristicScorer::new(FlagMatch::CaseInsensitive);
        assert_eq!(lenient.score(&[], &hist).get(Disorder::Odd), Verdict::Possible);

        let strict = HeuristicScorer::new(FlagMatch::Exact);
        assert_eq!(strict.score(&[], &hist).get(Disorder::Odd), Verdict::Unlikely);

        assert_eq!(FlagMatch::parse("EXACT"), Some(FlagMatch::Exact));
        assert_eq!(FlagMatch::parse("maybe"), None);
    }

    #[test]
    fn test_flags_serialize_in_precedence_order() {
        let flags = HeuristicFlags::new(Verdict::Unlikely, Verdict::Possible, Verdict::Unlikely);
        assert_eq!(
            serde_json::to_string(&flags).unwrap(),
            r#"{"ODD":"Unlikely","Dyslexia":"Possible","ASD":"Unlikely"}"#
        );
    }
}
