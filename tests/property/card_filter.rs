//! Property-based tests for card derivation and filter queries.
//!
//! Uses proptest to verify:
//! 1. Truncated descriptions never exceed the limit plus the ellipsis, and
//!    are untouched when they already fit.
//! 2. Filter queries carry exactly the non-`All` axes, status first.
//! 3. Cycling a filter visits every value and returns to `All`.
//! 4. The local filter predicate agrees with the query it produces.

use proptest::prelude::*;
use taskdeck::card::truncate_description;
use taskdeck::filter::{Filter, FilterState};
use taskdeck_proto::{Priority, TaskStatus};

fn arb_status_filter() -> impl Strategy<Value = Filter<TaskStatus>> {
    prop::option::of(prop::sample::select(TaskStatus::ALL.to_vec())).prop_map(Filter::from)
}

fn arb_priority_filter() -> impl Strategy<Value = Filter<Priority>> {
    prop::option::of(prop::sample::select(Priority::ALL.to_vec())).prop_map(Filter::from)
}

proptest! {
    #[test]
    fn truncation_respects_limit(text in "\\PC{0,300}", limit in 0usize..200) {
        let out = truncate_description(&text, limit);
        let len = text.chars().count();
        if len <= limit {
            prop_assert_eq!(&out, &text);
        } else {
            prop_assert!(out.ends_with("..."));
            prop_assert_eq!(out.chars().count(), limit + 3);
            let kept: String = text.chars().take(limit).collect();
            prop_assert!(out.starts_with(&kept));
        }
    }

    #[test]
    fn query_carries_only_selected_axes(
        status in arb_status_filter(),
        priority in arb_priority_filter(),
    ) {
        let pairs = FilterState::new(status, priority).query_pairs();

        let mut expected = Vec::new();
        if let Some(s) = status.value() {
            expected.push(("status", s.as_str()));
        }
        if let Some(p) = priority.value() {
            expected.push(("priority", p.as_str()));
        }
        prop_assert_eq!(pairs, expected);
    }

    #[test]
    fn filter_predicate_matches_query(
        filter in arb_status_filter(),
        candidate in prop::sample::select(TaskStatus::ALL.to_vec()),
    ) {
        let expected = filter.value().is_none_or(|s| s == candidate);
        prop_assert_eq!(filter.matches(candidate), expected);
    }
}

#[test]
fn status_cycle_visits_every_value_then_all() {
    let mut filter = Filter::<TaskStatus>::All;
    let mut seen = Vec::new();
    for _ in 0..TaskStatus::ALL.len() {
        filter = filter.cycle(&TaskStatus::ALL);
        seen.push(filter.value().unwrap());
    }
    assert_eq!(seen, TaskStatus::ALL);
    assert_eq!(filter.cycle(&TaskStatus::ALL), Filter::All);
}

#[test]
fn priority_cycle_follows_high_to_low() {
    let mut filter = Filter::<Priority>::All;
    let mut labels = Vec::new();
    for _ in 0..=Priority::ALL.len() {
        filter = filter.cycle(&Priority::ALL);
        labels.push(filter.label());
    }
    assert_eq!(labels, ["High", "Medium", "Low", "All Priority"]);
}
