// File: crates/demo/src/main.rs
// Summary: Demo loads a CSV, links two count histograms through datatiles and prints each chart update.

mod backend;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use xfilter_core::{
    aggregate_by_bin, AggregateChart, AggregateFn, ChartSink, Dashboard, DataTable,
    InteractionEvent, Query,
};

use backend::BackendTiles;

/// Command-line configuration: `xfilter-demo [csv] [active_col] [passive_col] [bins]`.
struct DemoOptions {
    csv: String,
    active: String,
    passive: String,
    bins: usize,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            csv: concat!(env!("CARGO_MANIFEST_DIR"), "/data/trips.csv").to_string(),
            active: "distance".into(),
            passive: "duration".into(),
            bins: 6,
        }
    }
}

impl DemoOptions {
    fn from_args() -> Result<Self> {
        let mut opts = Self::default();
        let mut args = std::env::args().skip(1);
        if let Some(v) = args.next() { opts.csv = v; }
        if let Some(v) = args.next() { opts.active = v; }
        if let Some(v) = args.next() { opts.passive = v; }
        if let Some(v) = args.next() {
            opts.bins = v.parse().with_context(|| format!("bins must be a positive integer, got '{v}'"))?;
        }
        if opts.bins == 0 {
            anyhow::bail!("bins must be at least 1");
        }
        Ok(opts)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = DemoOptions::from_args()?;
    let path = PathBuf::from(&opts.csv);
    let table = load_numeric_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    info!(rows = table.row_count(), path = %path.display(), "loaded dataset");
    if table.row_count() == 0 {
        anyhow::bail!("no rows loaded; check headers/delimiter.");
    }

    let active = histogram(&opts.active, opts.bins, &table)?;
    let passive = histogram(&opts.passive, opts.bins, &table)?;
    let tiles = BackendTiles::build(&[&active, &passive], &table)?;

    let mut dash = Dashboard::new(tiles);
    let a = dash.register(active)?;
    let p = dash.register(passive)?;
    print_chart(&dash, &p, "unfiltered");

    // Range drags on the active chart, growing the brush one bin at a time.
    let binning = dash.get(&a).context("active chart vanished")?.binning()?;
    for bin in 0..opts.bins {
        let hi = binning.bin_start(bin);
        let query = Query::Range { lo: binning.min_value, hi };
        dash.dispatch(&InteractionEvent { source: a.clone(), query })?;
        print_chart(&dash, &p, &format!("range <= {hi:.2}"));
    }

    // Bar picking on the active chart, starting from an empty selection.
    dash.get_mut(&p).context("passive chart vanished")?.reset_chart(vec![0.0; opts.bins]);
    let picks: [&[usize]; 5] = [&[], &[1], &[1, 2], &[2], &[]];
    for step in picks.windows(2) {
        let (old, new) = (step[0].to_vec(), step[1].to_vec());
        dash.dispatch(&InteractionEvent { source: a.clone(), query: Query::Indices { old, new: new.clone() } })?;
        print_chart(&dash, &p, &format!("bars {new:?}"));
        check_against_rescan(&dash, &a, &p, &table, &new)?;
    }

    dash.reset_all()?;
    print_chart(&dash, &p, "reset");
    Ok(())
}

fn histogram(column: &str, bins: usize, table: &DataTable) -> Result<AggregateChart> {
    let mut chart = AggregateChart::with_axis(column, "bar");
    chart.aggregate_fn = AggregateFn::Count;
    chart.data_points = bins;
    chart.source = Some(table.clone());
    chart.source_backup = Some(table.clone());
    chart.calibrate().with_context(|| format!("calibrating '{column}'"))?;
    Ok(chart)
}

fn print_chart(dash: &Dashboard, id: &str, label: &str) {
    if let Some(chart) = dash.get(id) {
        let y = chart.get_source_y_axis();
        println!("{id:>16} | {label:<18} | {y:?}");
    }
}

/// Recompute the passive histogram directly over the selected rows and compare.
fn check_against_rescan(dash: &Dashboard, a: &str, p: &str, table: &DataTable, picked: &[usize]) -> Result<()> {
    let (Some(active), Some(passive)) = (dash.get(a), dash.get(p)) else {
        anyhow::bail!("charts vanished");
    };
    let shown = passive.get_source_y_axis();
    if picked.is_empty() || picked.len() == passive.data_points {
        return Ok(());
    }
    let active_bins = active.binning()?;
    let keys = table.column(active.x.as_deref().unwrap_or_default())?;
    let rows: Vec<usize> = keys
        .iter()
        .enumerate()
        .filter(|(_, k)| active_bins.bin_index(**k).map_or(false, |b| picked.contains(&b)))
        .map(|(i, _)| i)
        .collect();
    let filtered = table.take_rows(&rows)?;
    let direct = aggregate_by_bin(
        filtered.column(passive.x.as_deref().unwrap_or_default())?,
        None,
        &passive.binning()?,
        passive.aggregate_fn,
    )?;
    if direct != shown {
        anyhow::bail!("incremental result {shown:?} differs from rescan {direct:?}");
    }
    Ok(())
}

/// Load every column of a CSV as `f64`; cells that do not parse become NaN.
fn load_numeric_csv(path: &Path) -> Result<DataTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();
    info!(?headers, "csv headers");

    let mut columns = vec![Vec::new(); headers.len()];
    for rec in rdr.records() {
        let rec = rec?;
        for (i, col) in columns.iter_mut().enumerate() {
            col.push(rec.get(i).and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN));
        }
    }

    let mut table = DataTable::new();
    for (name, col) in headers.into_iter().zip(columns) {
        table = table.with_column(name, col)?;
    }
    Ok(table)
}
