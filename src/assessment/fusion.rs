//! Decision fusion - classifier label + questionnaire flags -> final label

use super::heuristic::{HeuristicFlags, Verdict};
use super::{ADHD_LABEL, HEALTHY_LABEL};

/// An ADHD classification always stands. Otherwise the first disorder
/// flagged Possible (ODD, Dyslexia, ASD) wins, else "Healthy".
pub fn fuse(classifier_label: &str, flags: &HeuristicFlags) -> String {
    if classifier_label == ADHD_LABEL {
        return ADHD_LABEL.to_string();
    }

    flags
        .iter()
        .find(|(_, verdict)| *verdict == Verdict::Possible)
        .map(|(disorder, _)| disorder.label())
        .unwrap_or(HEALTHY_LABEL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Verdict::{Possible, Unlikely};

    const ALL_FLAGS: [HeuristicFlags; 8] = [
        HeuristicFlags::new(Unlikely, Unlikely, Unlikely),
        HeuristicFlags::new(Unlikely, Unlikely, Possible),
        HeuristicFlags::new(Unlikely, Possible, Unlikely),
        HeuristicFlags::new(Unlikely, Possible, Possible),
        HeuristicFlags::new(Possible, Unlikely, Unlikely),
        HeuristicFlags::new(Possible, Unlikely, Possible),
        HeuristicFlags::new(Possible, Possible, Unlikely),
        HeuristicFlags::new(Possible, Possible, Possible),
    ];

    #[test]
    fn test_adhd_always_wins() {
        for flags in &ALL_FLAGS {
            assert_eq!(fuse("ADHD", flags), "ADHD");
        }
    }

    #[test]
    fn test_first_possible_wins() {
        assert_eq!(fuse("Non_ADHD", &HeuristicFlags::new(Possible, Unlikely, Unlikely)), "ODD");
        assert_eq!(fuse("Non_ADHD", &HeuristicFlags::new(Possible, Possible, Possible)), "ODD");
        assert_eq!(fuse("Non_ADHD", &HeuristicFlags::new(Unlikely, Possible, Possible)), "Dyslexia");
        assert_eq!(fuse("Healthy", &HeuristicFlags::new(Unlikely, Unlikely, Possible)), "ASD");
    }

    #[test]
    fn test_nothing_flagged_is_healthy() {
        assert_eq!(fuse("Non_ADHD", &ALL_FLAGS[0]), "Healthy");
        assert_eq!(fuse("ASD", &ALL_FLAGS[0]), "Healthy");
    }
}
