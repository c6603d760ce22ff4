// File: crates/xfilter-core/src/aggregate.rs
// Summary: Per-bin aggregation used to recompute a chart's unfiltered baseline from its backup table.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::binning::Binning;
use crate::error::{Result, XfilterError};

/// Aggregation operator applied to the rows of each bin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AggregateFn {
    #[default]
    Count,
    Sum,
    Mean,
    Min,
    Max,
}

impl AggregateFn {
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFn::Count => "count",
            AggregateFn::Sum => "sum",
            AggregateFn::Mean => "mean",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
        }
    }

    /// Whether the operator reads a y column at all.
    pub fn needs_values(&self) -> bool { !matches!(self, AggregateFn::Count) }
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for AggregateFn {
    type Err = XfilterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(AggregateFn::Count),
            "sum" => Ok(AggregateFn::Sum),
            "mean" | "avg" => Ok(AggregateFn::Mean),
            "min" => Ok(AggregateFn::Min),
            "max" => Ok(AggregateFn::Max),
            _ => Err(XfilterError::UnknownAggregate(s.to_string())),
        }
    }
}

#[derive(Clone, Copy)]
struct Acc {
    n: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Acc {
    const EMPTY: Acc = Acc { n: 0, sum: 0.0, min: f64::INFINITY, max: f64::NEG_INFINITY };

    fn push(&mut self, v: f64) {
        self.n += 1;
        self.sum += v;
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    fn finish(&self, op: AggregateFn) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        match op {
            AggregateFn::Count => self.n as f64,
            AggregateFn::Sum => self.sum,
            AggregateFn::Mean => self.sum / self.n as f64,
            AggregateFn::Min => self.min,
            AggregateFn::Max => self.max,
        }
    }
}

/// Aggregate `values` grouped by the bin of `keys`, one output per bin.
///
/// Rows with a non-finite key or value, or whose key falls outside
/// `[0, binning.data_points)`, do not contribute. Empty bins yield `0.0`.
/// `values` may be `None` only for [`AggregateFn::Count`].
pub fn aggregate_by_bin(
    keys: &[f64],
    values: Option<&[f64]>,
    binning: &Binning,
    op: AggregateFn,
) -> Result<Vec<f64>> {
    let values = match values {
        Some(v) if v.len() != keys.len() => {
            return Err(XfilterError::ColumnLength { name: "values".into(), len: v.len(), expected: keys.len() });
        }
        Some(v) => Some(v),
        None if op.needs_values() => return Err(XfilterError::MissingColumn("values".into())),
        None => None,
    };

    let mut accs = vec![Acc::EMPTY; binning.data_points];
    let mut skipped = 0usize;
    for (row, &k) in keys.iter().enumerate() {
        let v = values.map_or(1.0, |vs| vs[row]);
        if !k.is_finite() || !v.is_finite() {
            skipped += 1;
            continue;
        }
        match binning.bin_index(k) {
            Ok(bin) => accs[bin].push(v),
            Err(_) => skipped += 1,
        }
    }
    trace!(rows = keys.len(), skipped, op = op.name(), "aggregated by bin");
    Ok(accs.iter().map(|a| a.finish(op)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::Stride;

    fn binning() -> Binning {
        Binning::new(0.0, Some(Stride::Int(1)), 3).unwrap()
    }

    #[test]
    fn parses_names() {
        assert_eq!("count".parse::<AggregateFn>(), Ok(AggregateFn::Count));
        assert_eq!(" Mean ".parse::<AggregateFn>(), Ok(AggregateFn::Mean));
        assert_eq!(
            "median".parse::<AggregateFn>(),
            Err(XfilterError::UnknownAggregate("median".into()))
        );
        assert_eq!(AggregateFn::default().to_string(), "count");
    }

    #[test]
    fn each_operator() {
        let keys = [0.0, 0.5, 1.0, 2.9, 7.0];
        let vals = [2.0, 4.0, 5.0, -1.0, 100.0];
        let b = binning();
        let run = |op| aggregate_by_bin(&keys, Some(&vals[..]), &b, op).unwrap();
        assert_eq!(run(AggregateFn::Count), vec![2.0, 1.0, 1.0]);
        assert_eq!(run(AggregateFn::Sum), vec![6.0, 5.0, -1.0]);
        assert_eq!(run(AggregateFn::Mean), vec![3.0, 5.0, -1.0]);
        assert_eq!(run(AggregateFn::Min), vec![2.0, 5.0, -1.0]);
        assert_eq!(run(AggregateFn::Max), vec![4.0, 5.0, -1.0]);
    }

    #[test]
    fn count_without_values_and_empty_bins() {
        let out = aggregate_by_bin(&[0.0, f64::NAN, 0.2], None, &binning(), AggregateFn::Count).unwrap();
        assert_eq!(out, vec![2.0, 0.0, 0.0]);
        assert!(aggregate_by_bin(&[0.0], None, &binning(), AggregateFn::Sum).is_err());
    }
}
