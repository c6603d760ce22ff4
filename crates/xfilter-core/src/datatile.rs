// File: crates/xfilter-core/src/datatile.rs
// Summary: Square, column-addressable contribution matrices tagged with how their columns are read.
// Notes:
// - `datatile[c][r]` is the value bin `r` takes when only what column `c`
//   stands for contributes. What a column stands for depends on the tag:
//   `Cumulative` columns cover bins 0..=c of the active chart (range queries),
//   `PerRow` columns hold one selectable row's contribution (index queries).
// - Tiles are produced outside this crate and are read-only here.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{Result, XfilterError};

/// Marker for how a tile's columns are meant to be combined.
pub trait TileKind {
    const NAME: &'static str;
}

/// Column `c` already holds "everything up to and including bin `c`".
#[derive(Clone, Copy, Debug)]
pub enum Cumulative {}

/// Column `i` holds the contribution of selectable row `i`.
#[derive(Clone, Copy, Debug)]
pub enum PerRow {}

impl TileKind for Cumulative {
    const NAME: &'static str = "cumulative";
}

impl TileKind for PerRow {
    const NAME: &'static str = "per-row";
}

pub struct Datatile<K: TileKind> {
    n: usize,
    // column-major, n * n
    cells: Vec<f64>,
    _kind: PhantomData<K>,
}

pub type CumulativeTile = Datatile<Cumulative>;
pub type PerRowTile = Datatile<PerRow>;

impl<K: TileKind> Datatile<K> {
    /// Build from column vectors; every column must have `columns.len()` values.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self> {
        let n = columns.len();
        if n == 0 {
            return Err(XfilterError::EmptyTile);
        }
        let mut cells = Vec::with_capacity(n * n);
        for (index, col) in columns.into_iter().enumerate() {
            if col.len() != n {
                return Err(XfilterError::RaggedTile { index, len: col.len(), expected: n });
            }
            cells.extend(col);
        }
        Ok(Self { n, cells, _kind: PhantomData })
    }

    /// Build from row vectors (`rows[r][c]`), transposing into column storage.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(XfilterError::EmptyTile);
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(XfilterError::RaggedTile { index, len: row.len(), expected: n });
        }
        let mut cells = vec![0.0; n * n];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[c * n + r] = v;
            }
        }
        Ok(Self { n, cells, _kind: PhantomData })
    }

    /// Number of bins (rows), equal to the number of columns.
    pub fn len(&self) -> usize { self.n }

    pub fn is_empty(&self) -> bool { self.n == 0 }

    pub fn column(&self, c: usize) -> Result<&[f64]> {
        if c >= self.n {
            return Err(XfilterError::IndexOutOfRange { index: c, data_points: self.n });
        }
        Ok(&self.cells[c * self.n..(c + 1) * self.n])
    }

    /// Elementwise sum of every column.
    pub fn column_sum(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.n];
        for col in self.cells.chunks_exact(self.n) {
            for (acc, v) in out.iter_mut().zip(col) {
                *acc += v;
            }
        }
        out
    }
}

// Manual impls: derives would require `K: Clone`/`K: Debug` on the marker.
impl<K: TileKind> Clone for Datatile<K> {
    fn clone(&self) -> Self {
        Self { n: self.n, cells: self.cells.clone(), _kind: PhantomData }
    }
}

impl<K: TileKind> fmt::Debug for Datatile<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datatile")
            .field("kind", &K::NAME)
            .field("n", &self.n)
            .finish()
    }
}
