// File: crates/xfilter-core/src/dashboard.rs
// Summary: Registry of linked charts; routes an interaction on one chart to every other chart.

use tracing::{debug, warn};

use crate::chart::{AggregateChart, ChartSink};
use crate::datatile::{CumulativeTile, PerRowTile};
use crate::error::{Result, XfilterError};
use crate::query::{query_by_indices, query_by_range, Query};

/// Charts are addressed by their derived name (`"{x}_{chart_type}"`).
pub type ChartId = String;

/// A selection made on `source`, to be reflected on every other chart.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionEvent {
    pub source: ChartId,
    pub query: Query,
}

/// External producer of datatiles for an (active, passive) chart pair.
/// Tiles must follow the active chart's current binning and selection context.
pub trait TileProvider<H> {
    fn cumulative_tile(&self, active: &AggregateChart<H>, passive: &AggregateChart<H>) -> Result<&CumulativeTile>;
    fn per_row_tile(&self, active: &AggregateChart<H>, passive: &AggregateChart<H>) -> Result<&PerRowTile>;
}

/// Outcome of one dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Charts whose aggregate vector was replaced, in registration order.
    pub updated: Vec<ChartId>,
    /// Charts left alone because they opted out of datatiles.
    pub skipped: Vec<ChartId>,
}

pub struct Dashboard<H = ()> {
    charts: Vec<(ChartId, AggregateChart<H>)>,
    tiles: Box<dyn TileProvider<H>>,
}

impl<H> Dashboard<H> {
    pub fn new(tiles: impl TileProvider<H> + 'static) -> Self {
        Self { charts: Vec::new(), tiles: Box::new(tiles) }
    }

    /// Add a chart; it starts out showing its unfiltered baseline when it has a backup table.
    pub fn register(&mut self, mut chart: AggregateChart<H>) -> Result<ChartId> {
        let id = chart.name().ok_or(XfilterError::UnnamedChart)?;
        if self.position(&id).is_some() {
            return Err(XfilterError::DuplicateChart(id));
        }
        if chart.source_backup.is_some() {
            chart.restore_baseline()?;
        }
        debug!(chart = %id, data_points = chart.data_points, "registered chart");
        self.charts.push((id.clone(), chart));
        Ok(id)
    }

    pub fn chart_ids(&self) -> impl Iterator<Item = &str> {
        self.charts.iter().map(|(id, _)| id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&AggregateChart<H>> {
        self.position(id).map(|i| &self.charts[i].1)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut AggregateChart<H>> {
        self.position(id).map(|i| &mut self.charts[i].1)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.charts.iter().position(|(cid, _)| cid == id)
    }

    /// Run the event's query once per dependent chart.
    ///
    /// Every result is computed before any chart changes, so an error leaves
    /// the whole dashboard as it was.
    pub fn dispatch(&mut self, event: &InteractionEvent) -> Result<DispatchReport> {
        let si = self
            .position(&event.source)
            .ok_or_else(|| XfilterError::UnknownChart(event.source.clone()))?;
        let mut report = DispatchReport::default();
        let mut staged = Vec::new();

        for pi in (0..self.charts.len()).filter(|&i| i != si) {
            let (active, passive) = (&self.charts[si].1, &self.charts[pi].1);
            if !passive.use_data_tiles {
                report.skipped.push(self.charts[pi].0.clone());
                continue;
            }
            let expected = passive.data_points;
            let mut pending = Pending { chart: passive, result: None };
            match &event.query {
                Query::Range { lo, hi } => {
                    let binning = active.binning()?;
                    let tile = self.tiles.cumulative_tile(active, passive)?;
                    check_shape(tile.len(), expected)?;
                    query_by_range(&binning, (*lo, *hi), tile, &mut pending)?;
                }
                Query::Indices { old, new } => {
                    let tile = self.tiles.per_row_tile(active, passive)?;
                    check_shape(tile.len(), expected)?;
                    query_by_indices(old, new, tile, &mut pending)?;
                }
            }
            if let Some(result) = pending.result {
                staged.push((pi, result));
            }
        }

        for (pi, result) in staged {
            let (id, chart) = &mut self.charts[pi];
            chart.reset_chart(result);
            report.updated.push(id.clone());
        }
        debug!(
            source = %event.source,
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            "dispatched interaction"
        );
        Ok(report)
    }

    /// Put every chart back on its unfiltered baseline.
    pub fn reset_all(&mut self) -> Result<()> {
        for (id, chart) in &mut self.charts {
            if chart.source_backup.is_some() {
                chart.restore_baseline()?;
            } else {
                warn!(chart = %id, "no backup table; clearing to zeros");
                chart.reset_chart(vec![0.0; chart.data_points]);
            }
        }
        Ok(())
    }
}

/// Read-only view of a chart that holds on to the engine's result.
struct Pending<'a, H> {
    chart: &'a AggregateChart<H>,
    result: Option<Vec<f64>>,
}

impl<H> ChartSink for Pending<'_, H> {
    fn data_points(&self) -> usize { self.chart.data_points }
    fn get_source_y_axis(&self) -> Vec<f64> { self.chart.get_source_y_axis() }
    fn unfiltered_y_axis(&self) -> Result<Vec<f64>> { ChartSink::unfiltered_y_axis(self.chart) }
    fn reset_chart(&mut self, result: Vec<f64>) { self.result = Some(result); }
}

fn check_shape(tile: usize, data_points: usize) -> Result<()> {
    if tile != data_points {
        return Err(XfilterError::TileShapeMismatch { tile, data_points });
    }
    Ok(())
}
