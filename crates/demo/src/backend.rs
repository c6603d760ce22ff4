// File: crates/demo/src/backend.rs
// Summary: Stand-in aggregation backend that precomputes datatiles for every ordered chart pair.
// Notes:
// - Per-row column `i` is the passive aggregate over rows in active bin `i`;
//   cumulative column `c` is the running sum of per-row columns `0..=c`.
// - Only additive aggregates (count, sum) give exact tiles this way.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::debug;
use xfilter_core::{
    aggregate_by_bin, AggregateChart, CumulativeTile, DataTable, PerRowTile, TileProvider, XfilterError,
};

type PairKey = (String, String);

pub struct BackendTiles {
    pairs: HashMap<PairKey, (CumulativeTile, PerRowTile)>,
}

impl BackendTiles {
    pub fn build(charts: &[&AggregateChart], table: &DataTable) -> Result<Self> {
        let mut pairs = HashMap::new();
        for active in charts {
            for passive in charts {
                let (Some(a), Some(p)) = (active.name(), passive.name()) else {
                    anyhow::bail!("every chart needs an x column and a chart type");
                };
                if a == p {
                    continue;
                }
                let per_row = per_row_columns(active, passive, table)
                    .with_context(|| format!("building tile {a} -> {p}"))?;
                let cumulative = running_sum(&per_row);
                debug!(active = %a, passive = %p, n = per_row.len(), "built datatiles");
                pairs.insert(
                    (a, p),
                    (CumulativeTile::from_columns(cumulative)?, PerRowTile::from_columns(per_row)?),
                );
            }
        }
        Ok(Self { pairs })
    }

    fn pair(&self, active: &AggregateChart, passive: &AggregateChart) -> xfilter_core::Result<&(CumulativeTile, PerRowTile)> {
        let a = active.name().ok_or(XfilterError::UnnamedChart)?;
        let p = passive.name().ok_or(XfilterError::UnnamedChart)?;
        self.pairs.get(&(a, p.clone())).ok_or(XfilterError::UnknownChart(p))
    }
}

impl TileProvider<()> for BackendTiles {
    fn cumulative_tile(&self, active: &AggregateChart, passive: &AggregateChart) -> xfilter_core::Result<&CumulativeTile> {
        self.pair(active, passive).map(|(c, _)| c)
    }

    fn per_row_tile(&self, active: &AggregateChart, passive: &AggregateChart) -> xfilter_core::Result<&PerRowTile> {
        self.pair(active, passive).map(|(_, r)| r)
    }
}

fn per_row_columns(active: &AggregateChart, passive: &AggregateChart, table: &DataTable) -> Result<Vec<Vec<f64>>> {
    let active_bins = active.binning()?;
    let passive_bins = passive.binning()?;
    let active_keys = table.column(active.x.as_deref().unwrap_or_default())?;
    let passive_keys = table.column(passive.x.as_deref().unwrap_or_default())?;
    let values = match (passive.aggregate_fn.needs_values(), passive.y.as_deref()) {
        (true, Some(y)) => Some(table.column(y)?),
        (true, None) => anyhow::bail!("'{}' aggregates values but has no y column", passive.aggregate_fn),
        (false, _) => None,
    };

    let mut columns = Vec::with_capacity(active_bins.data_points);
    for bin in 0..active_bins.data_points {
        let rows: Vec<usize> = active_keys
            .iter()
            .enumerate()
            .filter(|(_, k)| active_bins.bin_index(**k).ok() == Some(bin))
            .map(|(i, _)| i)
            .collect();
        let keys: Vec<f64> = rows.iter().map(|&r| passive_keys[r]).collect();
        let vals: Option<Vec<f64>> = values.map(|v| rows.iter().map(|&r| v[r]).collect());
        columns.push(aggregate_by_bin(&keys, vals.as_deref(), &passive_bins, passive.aggregate_fn)?);
    }
    Ok(columns)
}

fn running_sum(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut acc = vec![0.0; columns.first().map_or(0, Vec::len)];
    columns
        .iter()
        .map(|col| {
            for (a, v) in acc.iter_mut().zip(col) {
                *a += v;
            }
            acc.clone()
        })
        .collect()
}
