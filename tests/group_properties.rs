//! Property-based tests for grouped stacking
//!
//! **Feature: fast-geneviz, Property 5: 同组区间共享偏移**

use fast_geneviz::core::{
    spans_overlap, stack, stack_grouped, Extent, Interval, Labeler, MeasureError, Orientation,
    StackOptions,
};
use proptest::prelude::*;
use std::collections::HashMap;

/// Intervals tagged with an optional group id
fn arb_grouped() -> impl Strategy<Value = Vec<Interval<Option<u8>>>> {
    prop::collection::vec(
        (0i64..5_000, 1i64..300, prop::option::of(0u8..8)),
        0..40,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .map(|(start, len, group)| Interval::new(start, start + len, 1.0, group))
            .collect()
    })
}

/// Bounding span of each group (singletons keyed by their index)
fn group_bounds(intervals: &[Interval<Option<u8>>]) -> HashMap<(Option<u8>, usize), (i64, i64)> {
    let mut bounds = HashMap::new();
    for (i, iv) in intervals.iter().enumerate() {
        let key = match iv.payload {
            Some(g) => (Some(g), 0),
            None => (None, i),
        };
        let entry = bounds.entry(key).or_insert((iv.start, iv.end));
        entry.0 = entry.0.min(iv.start);
        entry.1 = entry.1.max(iv.end);
    }
    bounds
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 5: 同组区间共享偏移**
    ///
    /// Members of a group get the same level and offset.
    #[test]
    fn prop_group_members_share_offset(intervals in arb_grouped()) {
        let layout = stack_grouped(intervals, |iv| iv.payload, None, &StackOptions::default()).unwrap();

        let mut seen: HashMap<u8, (usize, f64)> = HashMap::new();
        for item in &layout.items {
            if let Some(group) = item.interval.payload {
                let placement = *seen.entry(group).or_insert((item.level, item.y_offset));
                prop_assert_eq!(placement, (item.level, item.y_offset));
            }
        }
    }

    /// Group bounds sharing a level never overlap
    #[test]
    fn prop_group_bounds_disjoint_per_level(intervals in arb_grouped()) {
        let bounds = group_bounds(&intervals);
        let layout = stack_grouped(intervals, |iv| iv.payload, None, &StackOptions::default()).unwrap();

        let mut by_level: HashMap<usize, Vec<(i64, i64)>> = HashMap::new();
        let mut placed = std::collections::HashSet::new();
        for (i, item) in layout.items.iter().enumerate() {
            let key = match item.interval.payload {
                Some(g) => (Some(g), 0),
                None => (None, i),
            };
            if placed.insert(key) {
                by_level.entry(item.level).or_default().push(bounds[&key]);
            }
        }

        for spans in by_level.values() {
            for (i, a) in spans.iter().enumerate() {
                for b in &spans[i + 1..] {
                    prop_assert!(!spans_overlap(*a, *b));
                }
            }
        }
    }

    /// Without groups, items come back in input order with their spans unchanged
    #[test]
    fn prop_ungrouped_keeps_order(intervals in arb_grouped()) {
        let expected: Vec<(i64, i64)> = intervals.iter().map(|iv| (iv.start, iv.end)).collect();
        let layout = stack(intervals, None, &StackOptions::default()).unwrap();

        let got: Vec<(i64, i64)> = layout.items.iter().map(|s| (s.interval.start, s.interval.end)).collect();
        prop_assert_eq!(got, expected);
        prop_assert!(layout.level_count() <= layout.items.len());
    }

    /// The label backend is called once per group that has a label
    #[test]
    fn prop_one_measure_call_per_group(intervals in arb_grouped(), reversed in any::<bool>()) {
        let groups = group_bounds(&intervals).len();
        let mut calls = 0usize;
        let mut measure = |x: f64, y: f64, _text: &str| -> Result<Extent, MeasureError> {
            calls += 1;
            Ok(Extent::new(x - 5.0, x, y, y + 1.0))
        };
        let label_of = |_: &Interval<Option<u8>>| Some("label".to_string());
        let options = StackOptions {
            orientation: if reversed { Orientation::Reversed } else { Orientation::Forward },
            ..StackOptions::default()
        };

        stack_grouped(
            intervals,
            |iv| iv.payload,
            Some(Labeler { label_of: &label_of, measure: &mut measure }),
            &options,
        )
        .unwrap();

        prop_assert_eq!(calls, groups);
    }
}
