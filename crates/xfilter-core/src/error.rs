// File: crates/xfilter-core/src/error.rs
// Summary: Error taxonomy shared by binning, datatiles, chart state and the query engines.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, XfilterError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum XfilterError {
    // ---- configuration ------------------------------------------------------
    #[error("stride is unset; binning is disabled for this chart")]
    StrideUnset,
    #[error("stride must be finite and positive, got {0}")]
    InvalidStride(f64),
    #[error("cannot calibrate binning: set a stride or a non-zero data_points first")]
    CannotCalibrate,
    #[error("unknown aggregate function '{0}'")]
    UnknownAggregate(String),
    #[error("datatile has {tile} bins but the chart expects {data_points}")]
    TileShapeMismatch { tile: usize, data_points: usize },

    // ---- caller contract ----------------------------------------------------
    #[error("value {0} is not finite and has no bin")]
    NonFiniteValue(f64),
    #[error("bin {bin} is outside [0, {data_points})")]
    BinOutOfRange { bin: i64, data_points: usize },
    #[error("row index {index} is outside [0, {data_points})")]
    IndexOutOfRange { index: usize, data_points: usize },
    #[error("range lower bound {lo} is above upper bound {hi}")]
    InvalidRange { lo: f64, hi: f64 },
    #[error("baseline has {got} values, expected {expected}")]
    BaselineLength { got: usize, expected: usize },

    // ---- datatile construction ----------------------------------------------
    #[error("datatile is empty")]
    EmptyTile,
    #[error("datatile is not square: vector {index} has {len} values, expected {expected}")]
    RaggedTile { index: usize, len: usize, expected: usize },

    // ---- data sources -------------------------------------------------------
    #[error("chart has no backup source table")]
    MissingSource,
    #[error("column '{0}' not found in source table")]
    MissingColumn(String),
    #[error("column '{name}' has {len} rows, expected {expected}")]
    ColumnLength { name: String, len: usize, expected: usize },

    // ---- dashboard ----------------------------------------------------------
    #[error("chart needs both `x` and `chart_type` set to be named")]
    UnnamedChart,
    #[error("no chart registered as '{0}'")]
    UnknownChart(String),
    #[error("a chart named '{0}' is already registered")]
    DuplicateChart(String),
}
