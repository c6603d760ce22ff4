// File: crates/xfilter-core/src/binning.rs
// Summary: Stride values and the value -> bin index mapping shared by both query engines.

use crate::error::{Result, XfilterError};

/// Slack added before flooring so values sitting on a bin edge are not pushed
/// into the previous bin by float representation error (0.3 / 0.1 < 3.0).
const EDGE_EPSILON: f64 = 1e-9;

/// Numeric class of a stride.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrideType {
    #[default]
    Int,
    Real,
}

/// Bin width. Integer and fractional strides are kept apart so a chart can
/// report which kind it was configured with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stride {
    Int(i64),
    Real(f64),
}

impl Stride {
    pub fn value(&self) -> f64 {
        match *self {
            Stride::Int(v) => v as f64,
            Stride::Real(v) => v,
        }
    }

    pub fn stride_type(&self) -> StrideType {
        match self {
            Stride::Int(_) => StrideType::Int,
            Stride::Real(_) => StrideType::Real,
        }
    }

    /// Returns the width as `f64` if it can drive a binning (finite, > 0).
    pub fn checked(&self) -> Result<f64> {
        let v = self.value();
        if v.is_finite() && v > 0.0 { Ok(v) } else { Err(XfilterError::InvalidStride(v)) }
    }
}

impl From<i64> for Stride {
    fn from(v: i64) -> Self { Stride::Int(v) }
}

impl From<i32> for Stride {
    fn from(v: i32) -> Self { Stride::Int(v as i64) }
}

impl From<f64> for Stride {
    fn from(v: f64) -> Self { Stride::Real(v) }
}

/// Snapshot of a chart's binning parameters.
/// Contract: `stride` is finite and positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binning {
    pub min_value: f64,
    pub stride: f64,
    pub data_points: usize,
}

impl Binning {
    pub fn new(min_value: f64, stride: Option<Stride>, data_points: usize) -> Result<Self> {
        let stride = stride.ok_or(XfilterError::StrideUnset)?.checked()?;
        Ok(Self { min_value, stride, data_points })
    }

    /// `floor((v - min_value) / stride)` without any bounds check.
    /// Meaningless for non-finite `v` (NaN saturates to 0).
    pub fn bin(&self, v: f64) -> i64 {
        ((v - self.min_value) / self.stride + EDGE_EPSILON).floor() as i64
    }

    /// Bin index of `v`, checked against `[0, bins)`. Never clamps.
    pub fn bin_within(&self, v: f64, bins: usize) -> Result<usize> {
        if !v.is_finite() {
            return Err(XfilterError::NonFiniteValue(v));
        }
        let bin = self.bin(v);
        if bin < 0 || bin as u64 >= bins as u64 {
            return Err(XfilterError::BinOutOfRange { bin, data_points: bins });
        }
        Ok(bin as usize)
    }

    /// Bin index of `v` within this binning's own `data_points`.
    pub fn bin_index(&self, v: f64) -> Result<usize> {
        self.bin_within(v, self.data_points)
    }

    /// Left edge of bin `i`.
    pub fn bin_start(&self, i: usize) -> f64 {
        self.min_value + i as f64 * self.stride
    }
}
