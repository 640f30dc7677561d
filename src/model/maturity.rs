//! Maturity levels and domain scoring types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The five ordered maturity stages.
///
/// Ordinal values (1-5) drive threshold comparison, deficit detection,
/// and downgrade arithmetic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    Basic,
    Reactive,
    Compliant,
    Proactive,
    Resilient,
}

impl MaturityLevel {
    /// Numeric ordinal, 1 (basic) through 5 (resilient)
    pub fn ordinal(self) -> u8 {
        match self {
            MaturityLevel::Basic => 1,
            MaturityLevel::Reactive => 2,
            MaturityLevel::Compliant => 3,
            MaturityLevel::Proactive => 4,
            MaturityLevel::Resilient => 5,
        }
    }

    /// Level for an ordinal value, clamped to the valid 1-5 range
    pub fn from_ordinal_clamped(ordinal: u8) -> Self {
        match ordinal {
            0 | 1 => MaturityLevel::Basic,
            2 => MaturityLevel::Reactive,
            3 => MaturityLevel::Compliant,
            4 => MaturityLevel::Proactive,
            _ => MaturityLevel::Resilient,
        }
    }

    /// Downgrade by `steps` ordinal steps, flooring at basic
    pub fn downgraded(self, steps: u8) -> Self {
        Self::from_ordinal_clamped(self.ordinal().saturating_sub(steps).max(1))
    }

    /// Ordinal distance below `target` (0 when at or above target)
    pub fn deficit_from(self, target: MaturityLevel) -> u8 {
        target.ordinal().saturating_sub(self.ordinal())
    }
}

/// A single criterion response within an assessment.
///
/// Immutable once scored; owned by the assessment session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CriteriaScore {
    pub criteria_id: String,
    pub current_level: MaturityLevel,
    pub target_level: MaturityLevel,
    /// Evidence strength, 0-100
    pub evidence_score: f64,
}

/// Derived domain maturity verdict.
///
/// Recomputed on demand from its criteria scores; never treated as
/// authoritative in storage.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DomainScore {
    pub domain_id: String,
    pub domain_name: String,
    pub criteria_scores: Vec<CriteriaScore>,
    pub calculated_level: MaturityLevel,
    pub target_level: MaturityLevel,
    pub meets_threshold: bool,
    pub penalty_applied: bool,
    /// Share of criteria at or above target, rounded to one decimal
    pub percentage_at_target: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_matches_ordinals() {
        assert!(MaturityLevel::Basic < MaturityLevel::Reactive);
        assert!(MaturityLevel::Reactive < MaturityLevel::Compliant);
        assert!(MaturityLevel::Compliant < MaturityLevel::Proactive);
        assert!(MaturityLevel::Proactive < MaturityLevel::Resilient);
    }

    #[test]
    fn test_downgrade_floors_at_basic() {
        assert_eq!(
            MaturityLevel::Reactive.downgraded(1),
            MaturityLevel::Basic
        );
        assert_eq!(MaturityLevel::Basic.downgraded(1), MaturityLevel::Basic);
        assert_eq!(MaturityLevel::Basic.downgraded(3), MaturityLevel::Basic);
    }

    #[test]
    fn test_deficit() {
        assert_eq!(
            MaturityLevel::Basic.deficit_from(MaturityLevel::Proactive),
            3
        );
        assert_eq!(
            MaturityLevel::Reactive.deficit_from(MaturityLevel::Compliant),
            1
        );
        assert_eq!(
            MaturityLevel::Resilient.deficit_from(MaturityLevel::Basic),
            0
        );
    }
}
