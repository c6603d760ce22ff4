// File: crates/xfilter-core/src/query.rs
// Summary: Range and index-delta query engines turning a selection into a chart's new aggregate vector.
// Notes:
// - Range queries read one column of a cumulative tile; only the upper bound
//   picks the column, the lower bound is taken to be the domain minimum.
// - Index queries patch the chart's displayed vector with the columns of the
//   rows that entered or left the selection: one pass over both selection
//   lists to split them, then one column add/subtract per changed row. An
//   empty or complete selection shows the passive chart's own unfiltered
//   aggregate instead, which also discards drift from earlier patches.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::binning::Binning;
use crate::chart::ChartSink;
use crate::datatile::{CumulativeTile, PerRowTile};
use crate::error::{Result, XfilterError};

/// A selection made on the active chart.
#[derive(Clone, Debug, PartialEq)]
pub enum Query {
    /// Closed interval on the active chart's binned axis.
    Range { lo: f64, hi: f64 },
    /// Selected row indices before and after the interaction.
    Indices { old: Vec<usize>, new: Vec<usize> },
}

/// Direction-split symmetric difference of two selections.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionDelta {
    /// In `new` but not in `old`, ascending.
    pub added: Vec<usize>,
    /// In `old` but not in `new`, ascending.
    pub removed: Vec<usize>,
}

impl SelectionDelta {
    pub fn between(old: &[usize], new: &[usize]) -> Self {
        let old: BTreeSet<usize> = old.iter().copied().collect();
        let new: BTreeSet<usize> = new.iter().copied().collect();
        Self {
            added: new.difference(&old).copied().collect(),
            removed: old.difference(&new).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool { self.added.is_empty() && self.removed.is_empty() }
}

/// Hand `sink` the cumulative column for the bin containing `hi`.
pub fn query_by_range<S: ChartSink + ?Sized>(
    active: &Binning,
    (lo, hi): (f64, f64),
    tile: &CumulativeTile,
    sink: &mut S,
) -> Result<()> {
    if lo.is_nan() || hi.is_nan() || lo > hi {
        return Err(XfilterError::InvalidRange { lo, hi });
    }
    let col = active.bin_within(hi, tile.len())?;
    trace!(lo, hi, col, "range query");
    sink.reset_chart(tile.column(col)?.to_vec());
    Ok(())
}

/// Move `passive` from the aggregate of selection `old` to that of `new`.
pub fn query_by_indices<S: ChartSink + ?Sized>(
    old: &[usize],
    new: &[usize],
    tile: &PerRowTile,
    passive: &mut S,
) -> Result<()> {
    let n = tile.len();
    if passive.data_points() != n {
        return Err(XfilterError::TileShapeMismatch { tile: n, data_points: passive.data_points() });
    }
    if let Some(&index) = old.iter().chain(new).find(|&&i| i >= n) {
        return Err(XfilterError::IndexOutOfRange { index, data_points: n });
    }

    let selected = new.iter().collect::<BTreeSet<_>>().len();
    if selected == 0 || selected == passive.data_points() {
        debug!(selected, data_points = n, "selection covers no filter; resetting to unfiltered aggregate");
        let baseline = passive.unfiltered_y_axis()?;
        if baseline.len() != n {
            return Err(XfilterError::BaselineLength { got: baseline.len(), expected: n });
        }
        passive.reset_chart(baseline);
        return Ok(());
    }

    let delta = SelectionDelta::between(old, new);
    let mut result = passive.get_source_y_axis();
    if result.len() != n {
        return Err(XfilterError::BaselineLength { got: result.len(), expected: n });
    }
    for &i in &delta.added {
        for (acc, v) in result.iter_mut().zip(tile.column(i)?) {
            *acc += v;
        }
    }
    for &i in &delta.removed {
        for (acc, v) in result.iter_mut().zip(tile.column(i)?) {
            *acc -= v;
        }
    }
    trace!(added = delta.added.len(), removed = delta.removed.len(), "applied selection delta");
    passive.reset_chart(result);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_partitions_by_direction() {
        let d = SelectionDelta::between(&[3, 1, 2, 2], &[2, 4, 0]);
        assert_eq!(d.added, vec![0, 4]);
        assert_eq!(d.removed, vec![1, 3]);
        assert!(SelectionDelta::between(&[1, 2], &[2, 1]).is_empty());
    }
}
