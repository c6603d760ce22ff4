// File: crates/xfilter-core/src/table.rs
// Summary: Column-keyed numeric table used as a chart's `source` / `source_backup`.

use crate::error::{Result, XfilterError};

/// Owned numeric table.
/// Contract: every column has `row_count()` values. Missing cells are `NaN`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl DataTable {
    pub fn new() -> Self { Self::default() }

    /// Append a column; its length must match the columns already present.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if let Some(first) = self.columns.first() {
            if first.len() != values.len() {
                return Err(XfilterError::ColumnLength { name, len: values.len(), expected: first.len() });
            }
        }
        match self.names.iter().position(|n| *n == name) {
            Some(i) => self.columns[i] = values,
            None => {
                self.names.push(name);
                self.columns.push(values);
            }
        }
        Ok(self)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| XfilterError::MissingColumn(name.to_string()))
    }

    /// Min and max over the finite values of a column; `None` if there are none.
    pub fn min_max(&self, name: &str) -> Result<Option<(f64, f64)>> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in self.column(name)?.iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        Ok(if lo <= hi { Some((lo, hi)) } else { None })
    }

    /// New table holding only `rows`, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Result<Self> {
        let n = self.row_count();
        if let Some(&index) = rows.iter().find(|&&r| r >= n) {
            return Err(XfilterError::IndexOutOfRange { index, data_points: n });
        }
        let columns = self
            .columns
            .iter()
            .map(|col| rows.iter().map(|&r| col[r]).collect())
            .collect();
        Ok(Self { names: self.names.clone(), columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        DataTable::new()
            .with_column("x", vec![10.0, 11.0, f64::NAN, 13.0])
            .unwrap()
            .with_column("y", vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
    }

    #[test]
    fn columns_and_min_max() {
        let t = sample();
        assert_eq!(t.row_count(), 4);
        assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(t.min_max("x").unwrap(), Some((10.0, 13.0)));
        assert_eq!(t.column("z"), Err(XfilterError::MissingColumn("z".into())));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = sample().with_column("w", vec![1.0]).unwrap_err();
        assert_eq!(err, XfilterError::ColumnLength { name: "w".into(), len: 1, expected: 4 });
    }

    #[test]
    fn take_rows_keeps_order() {
        let t = sample().take_rows(&[3, 0]).unwrap();
        assert_eq!(t.column("y").unwrap(), &[4.0, 1.0]);
        assert!(sample().take_rows(&[4]).is_err());
    }
}
