// File: crates/xfilter-core/tests/proptest_engines.rs
// Purpose: Property tests for both engines: monotone ranges, exact incremental updates, drift-proof resets.

use std::collections::BTreeSet;

use proptest::prelude::*;
use xfilter_core::{
    query_by_indices, query_by_range, Binning, ChartSink, CumulativeTile, PerRowTile,
    SelectionDelta, Stride, XfilterError,
};

/// Sink whose displayed vector is whatever it was last handed.
struct Shown {
    y: Vec<f64>,
    unfiltered: Vec<f64>,
}

impl ChartSink for Shown {
    fn data_points(&self) -> usize { self.y.len() }
    fn get_source_y_axis(&self) -> Vec<f64> { self.y.clone() }
    fn unfiltered_y_axis(&self) -> xfilter_core::Result<Vec<f64>> { Ok(self.unfiltered.clone()) }
    fn reset_chart(&mut self, result: Vec<f64>) { self.y = result; }
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// Square matrix of small non-negative integers (exact in f64), as columns.
fn tile_columns() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2usize..8).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec((0u8..5).prop_map(f64::from), n), n)
    })
}

/// A tile plus a walk of non-empty selections over its rows.
fn tile_and_walk() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<Vec<usize>>)> {
    tile_columns().prop_flat_map(|cols| {
        let n = cols.len();
        let selection = prop::collection::vec(any::<bool>(), n)
            .prop_filter("selection must be non-empty", |mask| mask.iter().any(|&b| b))
            .prop_map(|mask| (0..mask.len()).filter(|&i| mask[i]).collect::<Vec<_>>());
        (Just(cols), prop::collection::vec(selection, 1..12))
    })
}

fn direct(cols: &[Vec<f64>], rows: &[usize]) -> Vec<f64> {
    let mut out = vec![0.0; cols.len()];
    for &c in rows {
        for (acc, v) in out.iter_mut().zip(&cols[c]) {
            *acc += v;
        }
    }
    out
}

fn cumulative(cols: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut acc = vec![0.0; cols.len()];
    cols.iter()
        .map(|c| {
            for (a, v) in acc.iter_mut().zip(c) {
                *a += v;
            }
            acc.clone()
        })
        .collect()
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn range_results_are_monotone(cols in tile_columns(), a in 0usize..8, b in 0usize..8) {
        let n = cols.len();
        let (a, b) = (a % n, b % n);
        let (lo, hi) = (a.min(b), a.max(b));
        let tile = CumulativeTile::from_columns(cumulative(&cols)).unwrap();
        let binning = Binning::new(0.0, Some(Stride::Int(1)), n).unwrap();

        let mut low = Shown { y: vec![0.0; n], unfiltered: Vec::new() };
        let mut high = Shown { y: vec![0.0; n], unfiltered: Vec::new() };
        query_by_range(&binning, (0.0, lo as f64), &tile, &mut low).unwrap();
        query_by_range(&binning, (0.0, hi as f64), &tile, &mut high).unwrap();
        for (l, h) in low.y.iter().zip(&high.y) {
            prop_assert!(l <= h);
        }
    }

    #[test]
    fn incremental_walk_matches_direct((cols, walk) in tile_and_walk()) {
        let tile = PerRowTile::from_columns(cols.clone()).unwrap();
        let all: Vec<usize> = (0..cols.len()).collect();
        let mut shown = Shown { y: direct(&cols, &walk[0]), unfiltered: direct(&cols, &all) };
        for step in walk.windows(2) {
            query_by_indices(&step[0], &step[1], &tile, &mut shown).unwrap();
        }
        prop_assert_eq!(shown.y, direct(&cols, walk.last().unwrap()));
    }

    #[test]
    fn reset_ignores_history(
        cols in tile_columns(),
        noise in prop::collection::vec(-50.0f64..50.0, 8),
        baseline in prop::collection::vec(0.0f64..100.0, 8),
        full in any::<bool>(),
    ) {
        // the chart's own baseline need not match the tile total
        let n = cols.len();
        let tile = PerRowTile::from_columns(cols.clone()).unwrap();
        let mut shown = Shown { y: noise[..n].to_vec(), unfiltered: baseline[..n].to_vec() };
        let new: Vec<usize> = if full { (0..n).collect() } else { Vec::new() };
        query_by_indices(&[0], &new, &tile, &mut shown).unwrap();
        prop_assert_eq!(shown.y, baseline[..n].to_vec());
    }

    #[test]
    fn non_finite_bounds_are_rejected(cols in tile_columns(), lo in -5.0f64..5.0, which in 0usize..3) {
        let n = cols.len();
        let tile = CumulativeTile::from_columns(cumulative(&cols)).unwrap();
        let binning = Binning::new(0.0, Some(Stride::Int(1)), n).unwrap();
        let hi = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY][which];
        let mut shown = Shown { y: vec![0.0; n], unfiltered: Vec::new() };
        let res = query_by_range(&binning, (lo, hi), &tile, &mut shown);
        let is_expected_err = matches!(res, Err(XfilterError::InvalidRange { .. }) | Err(XfilterError::NonFiniteValue(_)));
        prop_assert!(is_expected_err);
        prop_assert_eq!(shown.y, vec![0.0; n]);
    }

    #[test]
    fn delta_is_a_partition(old in prop::collection::vec(0usize..16, 0..10), new in prop::collection::vec(0usize..16, 0..10)) {
        let d = SelectionDelta::between(&old, &new);
        let old: BTreeSet<_> = old.into_iter().collect();
        let new: BTreeSet<_> = new.into_iter().collect();
        for i in &d.added {
            prop_assert!(new.contains(i) && !old.contains(i));
            prop_assert!(!d.removed.contains(i));
        }
        for i in &d.removed {
            prop_assert!(old.contains(i) && !new.contains(i));
        }
        prop_assert_eq!(d.added.len(), new.difference(&old).count());
        prop_assert_eq!(d.removed.len(), old.difference(&new).count());
    }
}
