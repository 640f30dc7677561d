//! Input validation for the scoring engine
//!
//! Structurally invalid input is the only error condition the engine knows;
//! absence of data elsewhere in the system is modeled as a value.

use crate::model::CriteriaScore;

/// Validation failures for scoring input
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("Criteria list is empty; a domain score requires at least one criterion")]
    EmptyCriteria,

    #[error("Evidence score {value} for criterion '{criteria_id}' is outside [0, 100]")]
    EvidenceOutOfRange { criteria_id: String, value: f64 },
}

/// Reject empty criteria lists and out-of-range evidence scores
pub fn validate_criteria(criteria: &[CriteriaScore]) -> Result<(), ScoringError> {
    if criteria.is_empty() {
        return Err(ScoringError::EmptyCriteria);
    }

    for criterion in criteria {
        let score = criterion.evidence_score;
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(ScoringError::EvidenceOutOfRange {
                criteria_id: criterion.criteria_id.clone(),
                value: score,
            });
        }
    }

    Ok(())
}
