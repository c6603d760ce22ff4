// File: crates/xfilter-core/src/chart.rs
// Summary: Aggregate chart state (binning, data sources, label maps) and the sink contract engines write to.

use std::collections::BTreeMap;

use tracing::debug;

use crate::aggregate::{aggregate_by_bin, AggregateFn};
use crate::binning::{Binning, Stride, StrideType};
use crate::error::{Result, XfilterError};
use crate::table::DataTable;

/// Raw category value -> display label.
pub type LabelMap = BTreeMap<String, String>;

/// Backend-specific chart parameters.
pub type LibraryParams = BTreeMap<String, ParamValue>;

pub const X_LABEL_MAP_KEY: &str = "x_label_map";
pub const Y_LABEL_MAP_KEY: &str = "y_label_map";

#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
    LabelMap(LabelMap),
}

/// What a query engine needs from the chart it updates.
pub trait ChartSink {
    /// Number of bins the chart displays.
    fn data_points(&self) -> usize;
    /// Currently displayed aggregate vector.
    fn get_source_y_axis(&self) -> Vec<f64>;
    /// Aggregate vector with no selection applied.
    fn unfiltered_y_axis(&self) -> Result<Vec<f64>>;
    /// Replace the displayed aggregate vector.
    fn reset_chart(&mut self, result: Vec<f64>);
}

/// State held for one aggregate chart. `H` is the renderer's chart handle,
/// opaque to this crate.
#[derive(Clone, Debug)]
pub struct AggregateChart<H = ()> {
    pub chart_type: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub aggregate_fn: AggregateFn,
    pub color: Option<String>,
    pub height: u32,
    pub width: u32,
    pub add_interaction: bool,
    pub chart: Option<H>,
    pub source: Option<DataTable>,
    pub source_backup: Option<DataTable>,
    pub data_points: usize,
    pub min_value: f64,
    pub max_value: f64,
    pub x_label_map: LabelMap,
    pub y_label_map: LabelMap,
    pub use_data_tiles: bool,
    /// Column names in the data tables; default to `x` / `y` when unset.
    pub data_x_axis: Option<String>,
    pub data_y_axis: Option<String>,
    library_specific_params: LibraryParams,
    stride: Option<Stride>,
    stride_type: StrideType,
    y_axis: Vec<f64>,
}

impl<H> Default for AggregateChart<H> {
    fn default() -> Self {
        Self {
            chart_type: None,
            x: None,
            y: None,
            aggregate_fn: AggregateFn::Count,
            color: None,
            height: 0,
            width: 0,
            add_interaction: true,
            chart: None,
            source: None,
            source_backup: None,
            data_points: 0,
            min_value: 0.0,
            max_value: 0.0,
            x_label_map: LabelMap::new(),
            y_label_map: LabelMap::new(),
            use_data_tiles: true,
            data_x_axis: None,
            data_y_axis: None,
            library_specific_params: LibraryParams::new(),
            stride: None,
            stride_type: StrideType::Int,
            y_axis: Vec::new(),
        }
    }
}

impl<H> AggregateChart<H> {
    pub fn new() -> Self { Self::default() }

    /// Convenience constructor for the common `x` + `chart_type` case.
    pub fn with_axis(x: impl Into<String>, chart_type: impl Into<String>) -> Self {
        Self { x: Some(x.into()), chart_type: Some(chart_type.into()), ..Self::default() }
    }

    /// `"{x}_{chart_type}"`, once both are set.
    pub fn name(&self) -> Option<String> {
        match (&self.x, &self.chart_type) {
            (Some(x), Some(t)) => Some(format!("{x}_{t}")),
            _ => None,
        }
    }

    pub fn stride(&self) -> Option<Stride> { self.stride }

    pub fn stride_type(&self) -> StrideType { self.stride_type }

    /// Store `stride` verbatim. `None` clears binning and keeps the last type class.
    pub fn set_stride(&mut self, stride: Option<Stride>) {
        if let Some(s) = stride {
            self.stride_type = s.stride_type();
        }
        self.stride = stride;
    }

    pub fn library_specific_params(&self) -> &LibraryParams { &self.library_specific_params }

    /// Store backend params, lifting label maps out of the well-known keys.
    pub fn set_library_specific_params(&mut self, params: LibraryParams) {
        if let Some(ParamValue::LabelMap(m)) = params.get(X_LABEL_MAP_KEY) {
            self.x_label_map = m.clone();
        }
        if let Some(ParamValue::LabelMap(m)) = params.get(Y_LABEL_MAP_KEY) {
            self.y_label_map = m.clone();
        }
        self.library_specific_params = params;
    }

    pub fn view(&self) -> Option<&H> { self.chart.as_ref() }

    pub fn binning(&self) -> Result<Binning> {
        Binning::new(self.min_value, self.stride, self.data_points)
    }

    fn x_column(&self) -> Result<&str> {
        self.data_x_axis
            .as_deref()
            .or(self.x.as_deref())
            .ok_or_else(|| XfilterError::MissingColumn("<x>".into()))
    }

    fn y_column(&self) -> Option<&str> {
        self.data_y_axis.as_deref().or(self.y.as_deref())
    }

    /// Derive `min_value`/`max_value` from the backup table, then fill in
    /// whichever of `stride` / `data_points` is missing.
    pub fn calibrate(&mut self) -> Result<()> {
        let table = self.source_backup.as_ref().ok_or(XfilterError::MissingSource)?;
        let (lo, hi) = table.min_max(self.x_column()?)?.unwrap_or((0.0, 0.0));
        self.min_value = lo;
        self.max_value = hi;
        let span = hi - lo;

        match self.stride {
            Some(s) => {
                let stride = s.checked()?;
                self.data_points = (span / stride + 1e-9).floor() as usize + 1;
            }
            None if self.data_points > 0 => {
                // a degenerate span still needs a positive width
                let stride = if self.data_points > 1 && span > 0.0 {
                    span / (self.data_points - 1) as f64
                } else {
                    1.0
                };
                self.set_stride(Some(Stride::Real(stride)));
            }
            None => return Err(XfilterError::CannotCalibrate),
        }
        let name = self.name();
        debug!(
            name = name.as_deref().unwrap_or("<unnamed>"),
            min = self.min_value,
            max = self.max_value,
            data_points = self.data_points,
            "calibrated binning"
        );
        Ok(())
    }

    /// Aggregate vector over every row of `source_backup`.
    pub fn unfiltered_y_axis(&self) -> Result<Vec<f64>> {
        let table = self.source_backup.as_ref().ok_or(XfilterError::MissingSource)?;
        let binning = self.binning()?;
        let keys = table.column(self.x_column()?)?;
        let values = if self.aggregate_fn.needs_values() {
            let col = self.y_column().ok_or_else(|| XfilterError::MissingColumn("<y>".into()))?;
            Some(table.column(col)?)
        } else {
            None
        };
        aggregate_by_bin(keys, values, &binning, self.aggregate_fn)
    }

    /// Replace both tables and show the unfiltered baseline again.
    pub fn reload_source(&mut self, source: DataTable, source_backup: DataTable) -> Result<()> {
        self.source = Some(source);
        self.source_backup = Some(source_backup);
        self.y_axis = self.unfiltered_y_axis()?;
        Ok(())
    }

    /// Show the unfiltered baseline computed from `source_backup`.
    pub fn restore_baseline(&mut self) -> Result<()> {
        self.y_axis = self.unfiltered_y_axis()?;
        Ok(())
    }
}

impl<H> ChartSink for AggregateChart<H> {
    fn data_points(&self) -> usize { self.data_points }

    fn get_source_y_axis(&self) -> Vec<f64> {
        if self.y_axis.is_empty() {
            vec![0.0; self.data_points]
        } else {
            self.y_axis.clone()
        }
    }

    fn unfiltered_y_axis(&self) -> Result<Vec<f64>> {
        AggregateChart::unfiltered_y_axis(self)
    }

    fn reset_chart(&mut self, result: Vec<f64>) {
        self.y_axis = result;
    }
}
