//! Sampled metric grid over (spot, time).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GreekSurfError, Result};
use crate::surface::axis::is_strictly_increasing;
use crate::types::SurfaceMetric;

/// Number of rows (spot samples) and columns (time samples) of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A metric sampled on a rectangular (spot, time) grid.
///
/// `value(i, j)` is the metric at `(s_axis[i], t_axis[j])`. Values are stored
/// row-major: one row per spot sample, one column per time sample.
///
/// Both axes are strictly increasing and the value count always equals
/// `s_axis.len() × t_axis.len()`; deserialization re-checks this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurfaceGridRaw", into = "SurfaceGridRaw")]
pub struct SurfaceGrid {
    metric: SurfaceMetric,
    s_axis: Vec<f64>,
    t_axis: Vec<f64>,
    values: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct SurfaceGridRaw {
    metric: SurfaceMetric,
    s_axis: Vec<f64>,
    t_axis: Vec<f64>,
    values: Vec<f64>,
}

impl TryFrom<SurfaceGridRaw> for SurfaceGrid {
    type Error = GreekSurfError;
    fn try_from(raw: SurfaceGridRaw) -> Result<Self> {
        Self::from_parts(raw.metric, raw.s_axis, raw.t_axis, raw.values)
    }
}

impl From<SurfaceGrid> for SurfaceGridRaw {
    fn from(g: SurfaceGrid) -> Self {
        Self {
            metric: g.metric,
            s_axis: g.s_axis,
            t_axis: g.t_axis,
            values: g.values,
        }
    }
}

impl SurfaceGrid {
    /// Assemble a grid from its axes and row-major values.
    ///
    /// # Errors
    /// Returns [`GreekSurfError::InvalidInput`] if an axis is empty or not
    /// strictly increasing, if the value count does not match the axes, or if
    /// any value is not finite.
    pub fn from_parts(
        metric: SurfaceMetric,
        s_axis: Vec<f64>,
        t_axis: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if s_axis.is_empty() || t_axis.is_empty() {
            return Err(GreekSurfError::invalid_input(format!(
                "grid axes must be non-empty, got {}x{}",
                s_axis.len(),
                t_axis.len()
            )));
        }
        if !is_strictly_increasing(&s_axis) || !is_strictly_increasing(&t_axis) {
            return Err(GreekSurfError::invalid_input(
                "grid axes must be strictly increasing",
            ));
        }
        let expected = s_axis.len() * t_axis.len();
        if values.len() != expected {
            return Err(GreekSurfError::invalid_input(format!(
                "grid of {}x{} needs {expected} values, got {}",
                s_axis.len(),
                t_axis.len(),
                values.len()
            )));
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(GreekSurfError::invalid_input(format!(
                "grid value at index {pos} is not finite"
            )));
        }
        Ok(Self::from_parts_unchecked(metric, s_axis, t_axis, values))
    }

    pub(crate) fn from_parts_unchecked(
        metric: SurfaceMetric,
        s_axis: Vec<f64>,
        t_axis: Vec<f64>,
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(values.len(), s_axis.len() * t_axis.len());
        Self {
            metric,
            s_axis,
            t_axis,
            values,
        }
    }

    /// Same axes and metric, different values.
    pub(crate) fn with_values(&self, values: Vec<f64>) -> Self {
        Self::from_parts_unchecked(self.metric, self.s_axis.clone(), self.t_axis.clone(), values)
    }

    /// Metric the values represent.
    pub fn metric(&self) -> SurfaceMetric {
        self.metric
    }

    /// Spot samples, one per row.
    pub fn s_axis(&self) -> &[f64] {
        &self.s_axis
    }

    /// Time-to-expiry samples, one per column.
    pub fn t_axis(&self) -> &[f64] {
        &self.t_axis
    }

    /// All values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.s_axis.len(), self.t_axis.len())
    }

    /// Value at spot index `i`, time index `j`.
    pub fn value(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.s_axis.len() || j >= self.t_axis.len() {
            return None;
        }
        Some(self.values[i * self.t_axis.len() + j])
    }

    /// Values along the time axis at spot index `i`.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        let cols = self.t_axis.len();
        self.values.get(i * cols..(i + 1) * cols)
    }

    /// Iterate rows in spot order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.t_axis.len())
    }

    /// Largest absolute value in the grid.
    pub fn max_abs(&self) -> f64 {
        self.values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}
