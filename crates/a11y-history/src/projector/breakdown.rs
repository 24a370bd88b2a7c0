//! Per-record impact tally

use crate::record::{Impact, Violation};

/// Count violations per impact level.
///
/// Pairs are ordered critical, serious, moderate, minor; unrecognized
/// impacts and violations without one (`None`) follow in the order they
/// were first encountered. The counts always sum to `violations.len()`.
pub fn impact_breakdown(violations: &[Violation]) -> Vec<(Option<Impact>, usize)> {
    let mut counts: Vec<(Option<Impact>, usize)> = Vec::new();

    for violation in violations {
        match counts.iter_mut().find(|(seen, _)| *seen == violation.impact) {
            Some((_, count)) => *count += 1,
            None => counts.push((violation.impact.clone(), 1)),
        }
    }

    // stable: unranked impacts keep encounter order
    counts.sort_by_key(|(impact, _)| impact.as_ref().and_then(Impact::rank).unwrap_or(u8::MAX));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(impact: &str) -> Violation {
        Violation::new("help", "description", Impact::from(impact))
    }

    #[test]
    fn test_orders_by_severity() {
        let breakdown = impact_breakdown(&[violation("serious"), violation("critical")]);
        assert_eq!(
            breakdown,
            vec![(Some(Impact::Critical), 1), (Some(Impact::Serious), 1)]
        );
    }

    #[test]
    fn test_counts_repeated_impacts() {
        let breakdown = impact_breakdown(&[
            violation("minor"),
            violation("moderate"),
            violation("minor"),
            violation("critical"),
            violation("minor"),
        ]);
        assert_eq!(
            breakdown,
            vec![
                (Some(Impact::Critical), 1),
                (Some(Impact::Moderate), 1),
                (Some(Impact::Minor), 3),
            ]
        );
    }

    #[test]
    fn test_unknown_impacts_sort_last_in_encounter_order() {
        let mut unspecified = violation("minor");
        unspecified.impact = None;

        let violations = vec![
            violation("zeta"),
            violation("minor"),
            unspecified,
            violation("alpha"),
            violation("zeta"),
        ];
        let breakdown = impact_breakdown(&violations);
        assert_eq!(
            breakdown,
            vec![
                (Some(Impact::Minor), 1),
                (Some(Impact::Other("zeta".to_string())), 2),
                (None, 1),
                (Some(Impact::Other("alpha".to_string())), 1),
            ]
        );
    }

    #[test]
    fn test_missing_impact_is_not_merged_with_literal_unknown() {
        let mut unspecified = violation("minor");
        unspecified.impact = None;

        let breakdown = impact_breakdown(&[violation("unknown"), unspecified, violation("unknown")]);
        assert_eq!(
            breakdown,
            vec![(Some(Impact::Other("unknown".to_string())), 2), (None, 1)]
        );
    }

    #[test]
    fn test_counts_sum_to_violation_total() {
        let impacts = ["critical", "minor", "odd", "serious", "serious", "moderate", "odd"];
        for n in 0..=impacts.len() {
            let violations: Vec<_> = impacts[..n].iter().map(|i| violation(i)).collect();
            let total: usize = impact_breakdown(&violations).iter().map(|(_, c)| c).sum();
            assert_eq!(total, violations.len());
        }
    }
}
