// File: crates/xfilter-core/src/lib.rs
// Summary: Core library entry point; exports chart state, datatiles and the cross-filter query engines.

pub mod aggregate;
pub mod binning;
pub mod chart;
pub mod dashboard;
pub mod datatile;
pub mod error;
pub mod query;
pub mod table;

pub use aggregate::{aggregate_by_bin, AggregateFn};
pub use binning::{Binning, Stride, StrideType};
pub use chart::{AggregateChart, ChartSink, LabelMap, LibraryParams, ParamValue};
pub use dashboard::{ChartId, Dashboard, DispatchReport, InteractionEvent, TileProvider};
pub use datatile::{Cumulative, CumulativeTile, Datatile, PerRow, PerRowTile, TileKind};
pub use error::{Result, XfilterError};
pub use query::{query_by_indices, query_by_range, Query, SelectionDelta};
pub use table::DataTable;
