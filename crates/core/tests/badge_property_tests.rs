//! Property-based integration tests for badge eligibility.
//!
//! These run against the default catalog through the public API, using the
//! `proptest` crate for random test case generation.

use goalpost_core::badges::{default_badge_catalog, eligible_badges, Badge};
use proptest::prelude::*;
use std::collections::HashSet;

// =============================================================================
// Generators
// =============================================================================

/// Generates a random subset of the default catalog's ids, as already earned.
fn arb_earned_ids() -> impl Strategy<Value = HashSet<String>> {
    let ids: Vec<String> = default_badge_catalog().into_iter().map(|b| b.id).collect();
    proptest::sample::subsequence(ids.clone(), 0..=ids.len())
        .prop_map(|subset| subset.into_iter().collect())
}

fn ids(badges: &[Badge]) -> Vec<&str> {
    badges.iter().map(|b| b.id.as_str()).collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// A badge is eligible exactly when its threshold is met and it is not yet earned.
    #[test]
    fn prop_eligibility_matches_definition(count in 0i64..120, earned in arb_earned_ids()) {
        let catalog = default_badge_catalog();
        let eligible: HashSet<String> = eligible_badges(&catalog, count, &earned)
            .into_iter()
            .map(|b| b.id)
            .collect();

        for badge in &catalog {
            let expected = i64::from(badge.goal_count_required) <= count && !earned.contains(&badge.id);
            prop_assert_eq!(eligible.contains(&badge.id), expected, "badge {}", badge.id);
        }
    }

    /// Results come back lowest threshold first.
    #[test]
    fn prop_eligible_badges_are_sorted(count in 0i64..120, earned in arb_earned_ids()) {
        let eligible = eligible_badges(&default_badge_catalog(), count, &earned);
        for pair in eligible.windows(2) {
            prop_assert!(pair[0].goal_count_required <= pair[1].goal_count_required);
        }
    }

    /// Earning more never makes a badge eligible again.
    #[test]
    fn prop_more_earned_means_fewer_eligible(
        count in 0i64..120,
        a in arb_earned_ids(),
        b in arb_earned_ids(),
    ) {
        let catalog = default_badge_catalog();
        let union: HashSet<String> = a.union(&b).cloned().collect();
        let with_a: HashSet<String> =
            eligible_badges(&catalog, count, &a).into_iter().map(|b| b.id).collect();
        let with_union: HashSet<String> =
            eligible_badges(&catalog, count, &union).into_iter().map(|b| b.id).collect();
        prop_assert!(with_union.is_subset(&with_a));
    }
}

// =============================================================================
// Threshold boundaries
// =============================================================================

#[test]
fn test_each_threshold_is_inclusive() {
    let catalog = default_badge_catalog();
    let none = HashSet::new();
    for badge in &catalog {
        let threshold = i64::from(badge.goal_count_required);
        let below = eligible_badges(&catalog, threshold - 1, &none);
        let at = eligible_badges(&catalog, threshold, &none);
        assert!(!ids(&below).contains(&badge.id.as_str()), "{} below", badge.id);
        assert!(ids(&at).contains(&badge.id.as_str()), "{} at", badge.id);
    }
}

#[test]
fn test_scenario_counts() {
    let catalog = default_badge_catalog();
    let none = HashSet::new();
    assert!(eligible_badges(&catalog, 0, &none).is_empty());
    assert_eq!(ids(&eligible_badges(&catalog, 1, &none)), vec!["beginner"]);

    let earned: HashSet<String> = ["beginner".to_string()].into_iter().collect();
    assert_eq!(ids(&eligible_badges(&catalog, 5, &earned)), vec!["achiever"]);
    assert_eq!(
        ids(&eligible_badges(&catalog, 50, &none)),
        vec!["beginner", "achiever", "goal_getter", "champion", "legend"]
    );
}
