//! Property-based tests for interval merging
//!
//! **Feature: fast-geneviz, Property 4: 合并区间覆盖不变**

use fast_geneviz::core::merge_intervals;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn arb_pairs() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((0u32..1_000, 0u32..100).prop_map(|(s, l)| (s, s + l)), 0..40)
}

/// Integer positions covered by closed `[low, high]` pairs
fn covered(pairs: &[(u32, u32)]) -> BTreeSet<u32> {
    pairs.iter().flat_map(|&(low, high)| low..=high).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 4: 合并区间覆盖不变**
    ///
    /// Merged runs cover exactly the positions of the input.
    #[test]
    fn prop_merge_preserves_coverage(pairs in arb_pairs()) {
        let merged: Vec<_> = merge_intervals(pairs.clone()).collect();
        prop_assert_eq!(covered(&merged), covered(&pairs));
    }

    /// Runs come out sorted and separated by a gap
    #[test]
    fn prop_merged_runs_disjoint(pairs in arb_pairs()) {
        let merged: Vec<_> = merge_intervals(pairs.clone()).collect();

        prop_assert_eq!(merged.is_empty(), pairs.is_empty());
        for window in merged.windows(2) {
            prop_assert!(window[0].1 < window[1].0);
        }
        prop_assert!(merged.len() <= pairs.len());
    }

    /// Merging merged output changes nothing
    #[test]
    fn prop_merge_idempotent(pairs in arb_pairs()) {
        let once: Vec<_> = merge_intervals(pairs).collect();
        let twice: Vec<_> = merge_intervals(once.clone()).collect();
        prop_assert_eq!(once, twice);
    }
}
