use super::mett_c::{MettcFactor, MettcReport};
use serde::{Deserialize, Serialize};

/// Final disposition of a scored candidate after the METT-C gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    Flagged { breaches: Vec<MettcFactor> },
    /// The time floor is a hard business rule: the plan cannot be executed.
    Rejected { reason: String },
}

impl Verdict {
    pub fn summary(&self) -> String {
        match self {
            Verdict::Accepted => "accepted".to_string(),
            Verdict::Flagged { breaches } => {
                let factors: Vec<&str> = breaches.iter().map(|factor| factor.label()).collect();
                format!("flagged: below floor on {}", factors.join(", "))
            }
            Verdict::Rejected { reason } => format!("rejected: {reason}"),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Verdict::Rejected { .. })
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

pub(crate) fn decide_verdict(report: &MettcReport) -> Verdict {
    if report.breached(MettcFactor::Time) {
        return Verdict::Rejected {
            reason: format!(
                "time score {:.2} breaches the hard time floor",
                report.mett_c_scores.time
            ),
        };
    }

    if report.is_valid {
        Verdict::Accepted
    } else {
        Verdict::Flagged {
            breaches: report.breaches.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MettcScores;
    use crate::evaluation::MettcValidator;

    #[test]
    fn time_breach_rejects_even_when_other_factors_pass() {
        let report = MettcValidator::default().validate_scores(
            "COA-1",
            &MettcScores {
                time: Some(0.0),
                ..MettcScores::default()
            },
        );
        match decide_verdict(&report) {
            Verdict::Rejected { .. } => {}
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn other_breaches_flag() {
        let report = MettcValidator::default().validate_scores(
            "COA-1",
            &MettcScores {
                troops: Some(0.1),
                ..MettcScores::default()
            },
        );
        let verdict = decide_verdict(&report);
        assert_eq!(
            verdict,
            Verdict::Flagged {
                breaches: vec![MettcFactor::Troops]
            }
        );
        assert_eq!(verdict.summary(), "flagged: below floor on troops");
    }
}
