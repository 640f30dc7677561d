//! Maturity scoring engine
//!
//! Pure, synchronous domain-level aggregation: an 80% achievement threshold
//! combined with a two-level deficit penalty. No I/O, no shared state;
//! identical inputs always produce identical verdicts.

pub mod validation;

pub use validation::{validate_criteria, ScoringError};

use crate::model::{CriteriaScore, DomainScore, MaturityLevel};

/// Share of criteria that must be at or above target for the threshold to hold
const THRESHOLD_PERCENT: f64 = 80.0;

/// Minimum ordinal gap below target that triggers the deficit penalty
const PENALTY_DEFICIT_STEPS: u8 = 2;

/// Score a single domain from its criterion responses.
///
/// Returns a validation error for an empty criteria list or an evidence
/// score outside [0, 100]; never a silently-wrong score.
pub fn score_domain(
    domain_id: &str,
    domain_name: &str,
    criteria: Vec<CriteriaScore>,
    target_level: MaturityLevel,
) -> Result<DomainScore, ScoringError> {
    validate_criteria(&criteria)?;

    let total = criteria.len();
    let at_target = criteria
        .iter()
        .filter(|c| c.current_level >= target_level)
        .count();

    let percentage_at_target = round_one_decimal(at_target as f64 / total as f64 * 100.0);
    let meets_threshold = percentage_at_target >= THRESHOLD_PERCENT;

    let penalty_applied = criteria
        .iter()
        .any(|c| c.current_level.deficit_from(target_level) >= PENALTY_DEFICIT_STEPS);

    let calculated_level = if meets_threshold {
        if penalty_applied {
            target_level.downgraded(1)
        } else {
            target_level
        }
    } else {
        below_threshold_level(&criteria, target_level)
    };

    tracing::debug!(
        domain = %domain_id,
        at_target = at_target,
        total = total,
        percentage = percentage_at_target,
        meets_threshold = meets_threshold,
        penalty_applied = penalty_applied,
        calculated_level = ?calculated_level,
        "Computed domain maturity score"
    );

    Ok(DomainScore {
        domain_id: domain_id.to_string(),
        domain_name: domain_name.to_string(),
        criteria_scores: criteria,
        calculated_level,
        target_level,
        meets_threshold,
        penalty_applied,
        percentage_at_target,
    })
}

/// Score several domains independently.
///
/// Each entry carries its own criteria and target; a validation failure in
/// any domain fails the whole call so callers never mix verdicts with
/// rejected input.
pub fn score_assessment(
    domains: Vec<(String, String, Vec<CriteriaScore>, MaturityLevel)>,
) -> Result<Vec<DomainScore>, ScoringError> {
    domains
        .into_iter()
        .map(|(id, name, criteria, target)| score_domain(&id, &name, criteria, target))
        .collect()
}

/// Achieved level when the threshold is missed: the lower of the median
/// achieved level and one step below target, never exceeding target.
fn below_threshold_level(criteria: &[CriteriaScore], target_level: MaturityLevel) -> MaturityLevel {
    let mut ordinals: Vec<u8> = criteria.iter().map(|c| c.current_level.ordinal()).collect();
    ordinals.sort_unstable();

    // Lower-middle median keeps even-count domains conservative
    let median = MaturityLevel::from_ordinal_clamped(ordinals[(ordinals.len() - 1) / 2]);
    let one_below_target = target_level.downgraded(1);

    median.min(one_below_target).min(target_level)
}

/// Round to one decimal place
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MaturityLevel::*;

    fn criterion(current: MaturityLevel, target: MaturityLevel) -> CriteriaScore {
        CriteriaScore {
            criteria_id: format!("crit-{:?}-{:?}", current, target),
            current_level: current,
            target_level: target,
            evidence_score: 75.0,
        }
    }

    #[test]
    fn test_single_criterion_at_target_meets_threshold() {
        let score =
            score_domain("d1", "Governance", vec![criterion(Compliant, Compliant)], Compliant)
                .unwrap();

        assert_eq!(score.percentage_at_target, 100.0);
        assert!(score.meets_threshold);
        assert!(!score.penalty_applied);
        assert_eq!(score.calculated_level, Compliant);
    }

    #[test]
    fn test_all_above_target_meets_threshold() {
        let criteria = vec![
            criterion(Proactive, Compliant),
            criterion(Resilient, Compliant),
            criterion(Compliant, Compliant),
        ];
        let score = score_domain("d1", "Governance", criteria, Compliant).unwrap();

        assert_eq!(score.percentage_at_target, 100.0);
        assert!(score.meets_threshold);
        assert_eq!(score.calculated_level, Compliant);
    }

    #[test]
    fn test_empty_criteria_rejected() {
        let result = score_domain("d1", "Governance", vec![], Compliant);
        assert!(matches!(result, Err(ScoringError::EmptyCriteria)));
    }

    #[test]
    fn test_evidence_out_of_range_rejected() {
        let mut bad = criterion(Compliant, Compliant);
        bad.evidence_score = 101.0;
        let result = score_domain("d1", "Governance", vec![bad], Compliant);
        assert!(matches!(
            result,
            Err(ScoringError::EvidenceOutOfRange { .. })
        ));
    }

    #[test]
    fn test_three_step_deficit_downgrades_despite_threshold() {
        // Target proactive(4), one criterion at basic(1) among at-target peers:
        // threshold holds at 80% but the deficit penalty downgrades one step.
        let criteria = vec![
            criterion(Proactive, Proactive),
            criterion(Proactive, Proactive),
            criterion(Proactive, Proactive),
            criterion(Proactive, Proactive),
            criterion(Basic, Proactive),
        ];
        let score = score_domain("d1", "Governance", criteria, Proactive).unwrap();

        assert_eq!(score.percentage_at_target, 80.0);
        assert!(score.meets_threshold);
        assert!(score.penalty_applied);
        assert_eq!(score.calculated_level, Compliant);
    }

    #[test]
    fn test_uniform_one_step_deficit_no_penalty() {
        let criteria = vec![
            criterion(Reactive, Compliant),
            criterion(Reactive, Compliant),
            criterion(Reactive, Compliant),
        ];
        let score = score_domain("d1", "Governance", criteria, Compliant).unwrap();

        assert!(!score.penalty_applied);
        assert!(!score.meets_threshold);
    }

    #[test]
    fn test_five_criteria_one_step_lagger() {
        // 4 of 5 at/above compliant, one at reactive: exactly 80%, no penalty.
        let criteria = vec![
            criterion(Compliant, Compliant),
            criterion(Proactive, Compliant),
            criterion(Compliant, Compliant),
            criterion(Compliant, Compliant),
            criterion(Reactive, Compliant),
        ];
        let score = score_domain("d1", "Governance", criteria, Compliant).unwrap();

        assert_eq!(score.percentage_at_target, 80.0);
        assert!(score.meets_threshold);
        assert!(!score.penalty_applied);
        assert_eq!(score.calculated_level, Compliant);
    }

    #[test]
    fn test_five_criteria_two_step_lagger_downgrades() {
        // Same shape but the lagger sits at basic: 2-step gap from compliant.
        let criteria = vec![
            criterion(Compliant, Compliant),
            criterion(Proactive, Compliant),
            criterion(Compliant, Compliant),
            criterion(Compliant, Compliant),
            criterion(Basic, Compliant),
        ];
        let score = score_domain("d1", "Governance", criteria, Compliant).unwrap();

        assert_eq!(score.percentage_at_target, 80.0);
        assert!(score.meets_threshold);
        assert!(score.penalty_applied);
        assert_eq!(score.calculated_level, Reactive);
    }

    #[test]
    fn test_penalty_floors_at_basic() {
        let criteria = vec![
            criterion(Reactive, Reactive),
            criterion(Reactive, Reactive),
            criterion(Reactive, Reactive),
            criterion(Reactive, Reactive),
            criterion(Basic, Reactive),
        ];
        // 80% at target reactive(2), but... basic(1) is only a 1-step gap
        let score = score_domain("d1", "Governance", criteria, Reactive).unwrap();
        assert!(!score.penalty_applied);
        assert_eq!(score.calculated_level, Reactive);

        // With target compliant(3) and a basic lagger the downgrade lands on reactive
        let criteria = vec![
            criterion(Compliant, Compliant),
            criterion(Compliant, Compliant),
            criterion(Compliant, Compliant),
            criterion(Compliant, Compliant),
            criterion(Basic, Compliant),
        ];
        let score = score_domain("d1", "Governance", criteria, Compliant).unwrap();
        assert!(score.penalty_applied);
        assert_eq!(score.calculated_level, Reactive);
    }

    #[test]
    fn test_below_threshold_uses_median_capped_below_target() {
        // 1 of 4 at target: 25%, threshold missed.
        // Achieved ordinals sorted: [1, 2, 2, 4], lower-middle median = reactive.
        let criteria = vec![
            criterion(Basic, Proactive),
            criterion(Reactive, Proactive),
            criterion(Reactive, Proactive),
            criterion(Proactive, Proactive),
        ];
        let score = score_domain("d1", "Governance", criteria, Proactive).unwrap();

        assert!(!score.meets_threshold);
        assert_eq!(score.calculated_level, Reactive);
    }

    #[test]
    fn test_below_threshold_median_capped_at_one_below_target() {
        // Most criteria above target but one lagger drops the percentage below 80:
        // median would equal target, so the cap at target-1 binds.
        let criteria = vec![
            criterion(Resilient, Resilient),
            criterion(Resilient, Resilient),
            criterion(Resilient, Resilient),
            criterion(Basic, Resilient),
            criterion(Basic, Resilient),
        ];
        let score = score_domain("d1", "Governance", criteria, Resilient).unwrap();

        assert!(!score.meets_threshold);
        assert_eq!(score.calculated_level, Proactive);
    }

    #[test]
    fn test_percentage_rounded_to_one_decimal() {
        // 1 of 3 at target: 33.333...% rounds to 33.3
        let criteria = vec![
            criterion(Compliant, Compliant),
            criterion(Reactive, Compliant),
            criterion(Reactive, Compliant),
        ];
        let score = score_domain("d1", "Governance", criteria, Compliant).unwrap();
        assert_eq!(score.percentage_at_target, 33.3);

        // 2 of 3: 66.666...% rounds to 66.7
        let criteria = vec![
            criterion(Compliant, Compliant),
            criterion(Compliant, Compliant),
            criterion(Reactive, Compliant),
        ];
        let score = score_domain("d1", "Governance", criteria, Compliant).unwrap();
        assert_eq!(score.percentage_at_target, 66.7);
    }

    #[test]
    fn test_score_assessment_scores_each_domain() {
        let domains = vec![
            (
                "d1".to_string(),
                "Governance".to_string(),
                vec![criterion(Compliant, Compliant)],
                Compliant,
            ),
            (
                "d2".to_string(),
                "Operations".to_string(),
                vec![criterion(Basic, Compliant)],
                Compliant,
            ),
        ];
        let scores = score_assessment(domains).unwrap();

        assert_eq!(scores.len(), 2);
        assert!(scores[0].meets_threshold);
        assert!(!scores[1].meets_threshold);
    }

    #[test]
    fn test_score_assessment_fails_on_any_invalid_domain() {
        let domains = vec![
            (
                "d1".to_string(),
                "Governance".to_string(),
                vec![criterion(Compliant, Compliant)],
                Compliant,
            ),
            ("d2".to_string(), "Operations".to_string(), vec![], Compliant),
        ];
        assert!(score_assessment(domains).is_err());
    }

    #[test]
    fn test_deterministic() {
        let criteria = vec![
            criterion(Compliant, Proactive),
            criterion(Basic, Proactive),
            criterion(Proactive, Proactive),
        ];
        let a = score_domain("d1", "Governance", criteria.clone(), Proactive).unwrap();
        let b = score_domain("d1", "Governance", criteria, Proactive).unwrap();

        assert_eq!(a.calculated_level, b.calculated_level);
        assert_eq!(a.percentage_at_target, b.percentage_at_target);
        assert_eq!(a.penalty_applied, b.penalty_applied);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::model::MaturityLevel;
    use proptest::prelude::*;

    fn arb_level() -> impl Strategy<Value = MaturityLevel> {
        prop_oneof![
            Just(MaturityLevel::Basic),
            Just(MaturityLevel::Reactive),
            Just(MaturityLevel::Compliant),
            Just(MaturityLevel::Proactive),
            Just(MaturityLevel::Resilient),
        ]
    }

    fn arb_criteria(target: MaturityLevel) -> impl Strategy<Value = Vec<CriteriaScore>> {
        prop::collection::vec((arb_level(), 0.0f64..=100.0), 1..12).prop_map(move |entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (level, evidence))| CriteriaScore {
                    criteria_id: format!("crit-{}", i),
                    current_level: level,
                    target_level: target,
                    evidence_score: evidence,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn calculated_level_never_exceeds_target(
            target in arb_level(),
            criteria in arb_level().prop_flat_map(arb_criteria),
        ) {
            let score = score_domain("d", "Domain", criteria, target).unwrap();
            prop_assert!(score.calculated_level <= target);
        }

        #[test]
        fn percentage_is_in_range(
            target in arb_level(),
            criteria in arb_level().prop_flat_map(arb_criteria),
        ) {
            let score = score_domain("d", "Domain", criteria, target).unwrap();
            prop_assert!(score.percentage_at_target >= 0.0);
            prop_assert!(score.percentage_at_target <= 100.0);
        }

        #[test]
        fn all_at_or_above_target_meets_threshold(
            target in arb_level(),
            count in 1usize..10,
        ) {
            let criteria: Vec<CriteriaScore> = (0..count)
                .map(|i| CriteriaScore {
                    criteria_id: format!("crit-{}", i),
                    current_level: MaturityLevel::Resilient,
                    target_level: target,
                    evidence_score: 50.0,
                })
                .collect();
            let score = score_domain("d", "Domain", criteria, target).unwrap();
            prop_assert_eq!(score.percentage_at_target, 100.0);
            prop_assert!(score.meets_threshold);
        }

        #[test]
        fn penalty_implies_two_step_deficit_exists(
            target in arb_level(),
            criteria in arb_level().prop_flat_map(arb_criteria),
        ) {
            let score = score_domain("d", "Domain", criteria.clone(), target).unwrap();
            let has_deep_deficit = criteria
                .iter()
                .any(|c| c.current_level.deficit_from(target) >= 2);
            prop_assert_eq!(score.penalty_applied, has_deep_deficit);
        }
    }
}
