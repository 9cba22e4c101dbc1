//! Property-based tests for partial-result merging.
//!
//! These tests use proptest to check that any partition of the rows, merged
//! in any order, reproduces a single pass over all of them.

use moments_rs::prelude::*;
use proptest::prelude::*;

// ============================================================================
// Test Utilities
// ============================================================================

const COLUMNS: usize = 3;

/// Rows plus two cut points splitting them into three (possibly empty) parts.
fn partitioned_rows() -> impl Strategy<Value = (Vec<f64>, usize, usize)> {
    prop::collection::vec(-1e3..1e3f64, COLUMNS..=COLUMNS * 60).prop_flat_map(|mut values| {
        let rows = values.len() / COLUMNS;
        values.truncate(rows * COLUMNS);
        (Just(values), 0..=rows, 0..=rows)
    })
}

fn partial_of(values: &[f64]) -> MomentsPartial<f64> {
    let mut p = MomentsPartial::new(COLUMNS).unwrap();
    p.update(values).unwrap();
    p
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * (1.0 + a.abs().max(b.abs()))
}

// ============================================================================
// Merge Properties
// ============================================================================

proptest! {
    /// Property: merge(A, B, C) in any order equals one pass over A ∪ B ∪ C
    #[test]
    fn prop_partition_merge_matches_single_pass((values, c1, c2) in partitioned_rows()) {
        let (lo, hi) = (c1.min(c2) * COLUMNS, c1.max(c2) * COLUMNS);
        let parts = [
            partial_of(&values[..lo]),
            partial_of(&values[lo..hi]),
            partial_of(&values[hi..]),
        ];
        let whole = partial_of(&values).finalize(EstimatesToCompute::All).unwrap();

        for order in [[0, 1, 2], [2, 1, 0], [1, 2, 0]] {
            let mut merged = parts[order[0]].clone();
            merged.merge(&parts[order[1]]).unwrap();
            merged.merge(&parts[order[2]]).unwrap();
            let r = merged.finalize(EstimatesToCompute::All).unwrap();

            prop_assert_eq!(r.observations, whole.observations);
            prop_assert_eq!(&r.minimum, &whole.minimum);
            prop_assert_eq!(&r.maximum, &whole.maximum);
            for f in 0..COLUMNS {
                prop_assert!(close(r.mean[f], whole.mean[f], 1e-10));
                prop_assert!(close(r.variance[f], whole.variance[f], 1e-8));
            }
        }
    }

    /// Property: merging is commutative on the raw partial state
    #[test]
    fn prop_merge_commutes((values, c1, _c2) in partitioned_rows()) {
        let cut = c1 * COLUMNS;
        let a = partial_of(&values[..cut]);
        let b = partial_of(&values[cut..]);

        let mut ab = a.clone();
        ab.merge(&b).unwrap();
        let mut ba = b.clone();
        ba.merge(&a).unwrap();

        prop_assert_eq!(ab.count(), ba.count());
        prop_assert_eq!(ab.min(), ba.min());
        prop_assert_eq!(ab.max(), ba.max());
        for f in 0..COLUMNS {
            prop_assert!(close(ab.sum()[f], ba.sum()[f], 1e-12));
            prop_assert!(close(ab.sum_squares_centered()[f], ba.sum_squares_centered()[f], 1e-9));
        }
    }

    /// Property: variance is never negative and the mean lies within [min, max]
    #[test]
    fn prop_finalized_values_are_consistent((values, _c1, _c2) in partitioned_rows()) {
        let r = partial_of(&values).finalize(EstimatesToCompute::All).unwrap();
        for f in 0..COLUMNS {
            prop_assert!(r.variance[f] >= 0.0);
            prop_assert!(r.mean[f] >= r.minimum[f] - 1e-9);
            prop_assert!(r.mean[f] <= r.maximum[f] + 1e-9);
        }
    }

    /// Property: snapshots survive the wire unchanged
    #[test]
    fn prop_snapshot_round_trip((values, cut, _c2) in partitioned_rows()) {
        let p = partial_of(&values[..cut * COLUMNS]);
        let back: MomentsPartial<f64> = decode_partial(&encode_partial(&p).unwrap()).unwrap();
        prop_assert_eq!(back, p);
    }
}
