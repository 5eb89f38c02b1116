//! Height normalization.
//!
//! A single uniform scale `target / max|v|` maps the largest magnitude in a
//! grid to the target height. The transform is linear, so signs and ratios
//! between cells are preserved; it is never applied per axis.

use serde::{Deserialize, Serialize};

use crate::error::{GreekSurfError, Result};
use crate::surface::{GridShape, SurfaceGrid};
use crate::validate::validate_extent;

/// Default peak height in local display units.
pub const DEFAULT_TARGET_HEIGHT: f64 = 0.1;

/// Display-scale heights with the same shape as the grid they came from.
///
/// The height count always equals `shape.len()` and every height is finite;
/// deserialization re-checks this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HeightMapRaw", into = "HeightMapRaw")]
pub struct HeightMap {
    shape: GridShape,
    heights: Vec<f32>,
    /// Largest absolute raw value before scaling.
    peak: f64,
    /// Factor applied to every raw value; zero for an all-zero input.
    scale: f64,
}

#[derive(Serialize, Deserialize)]
struct HeightMapRaw {
    shape: GridShape,
    heights: Vec<f32>,
    peak: f64,
    scale: f64,
}

impl TryFrom<HeightMapRaw> for HeightMap {
    type Error = GreekSurfError;
    fn try_from(raw: HeightMapRaw) -> Result<Self> {
        check_len(raw.shape, raw.heights.len())?;
        check_heights(&raw.heights)?;
        for (value, name) in [(raw.peak, "peak"), (raw.scale, "scale")] {
            if !value.is_finite() || value < 0.0 {
                return Err(GreekSurfError::invalid_input(format!(
                    "height map {name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(Self {
            shape: raw.shape,
            heights: raw.heights,
            peak: raw.peak,
            scale: raw.scale,
        })
    }
}

impl From<HeightMap> for HeightMapRaw {
    fn from(m: HeightMap) -> Self {
        Self {
            shape: m.shape,
            heights: m.heights,
            peak: m.peak,
            scale: m.scale,
        }
    }
}

impl HeightMap {
    /// Wrap already display-scaled heights (scale 1).
    ///
    /// # Errors
    /// Returns [`GreekSurfError::InvalidInput`] if the height count does not
    /// match the shape or a height is not finite.
    pub fn new(shape: GridShape, heights: Vec<f32>) -> Result<Self> {
        check_len(shape, heights.len())?;
        check_heights(&heights)?;
        let peak = heights.iter().fold(0.0_f64, |acc, &h| acc.max(f64::from(h.abs())));
        Ok(Self {
            shape,
            heights,
            peak,
            scale: 1.0,
        })
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Heights, row-major.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Height at row `i`, column `j`.
    pub fn height(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.shape.rows || j >= self.shape.cols {
            return None;
        }
        Some(self.heights[i * self.shape.cols + j])
    }

    /// Largest absolute raw value before scaling.
    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Factor that was applied to the raw values. Saturates at `f64::MAX`
    /// when the peak is so small that `target / peak` overflows.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Largest absolute height.
    pub fn max_abs(&self) -> f32 {
        self.heights.iter().fold(0.0_f32, |acc, h| acc.max(h.abs()))
    }

    /// True if every height is exactly zero.
    pub fn is_flat(&self) -> bool {
        self.heights.iter().all(|&h| h == 0.0)
    }
}

/// Scales raw metric values so the largest magnitude equals a target height.
///
/// # Examples
/// ```
/// use greeksurf::mesh::HeightNormalizer;
/// use greeksurf::surface::GridShape;
///
/// let normalizer = HeightNormalizer::default();
/// let map = normalizer
///     .normalize_values(GridShape::new(1, 3), &[-4.0, 2.0, 1.0])
///     .unwrap();
/// assert_eq!(map.heights(), &[-0.1, 0.05, 0.025]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightNormalizer {
    target: f64,
}

impl HeightNormalizer {
    /// # Errors
    /// Returns [`GreekSurfError::InvalidInput`] unless `target` is positive
    /// and representable as a finite `f32`.
    pub fn new(target: f64) -> Result<Self> {
        validate_extent(target, "target height")?;
        if target > f64::from(f32::MAX) {
            return Err(GreekSurfError::invalid_input(format!(
                "target height {target} exceeds the f32 range"
            )));
        }
        Ok(Self { target })
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Normalize a grid's values. Grid values are finite by construction.
    pub fn normalize(&self, grid: &SurfaceGrid) -> HeightMap {
        self.scale_into(grid.shape(), grid.values())
    }

    /// Normalize raw row-major values of the given shape.
    ///
    /// An all-zero input yields an all-zero map.
    ///
    /// # Errors
    /// Returns [`GreekSurfError::InvalidInput`] if the value count does not
    /// match the shape or a value is not finite.
    pub fn normalize_values(&self, shape: GridShape, values: &[f64]) -> Result<HeightMap> {
        check_len(shape, values.len())?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GreekSurfError::invalid_input("raw values must be finite"));
        }
        Ok(self.scale_into(shape, values))
    }

    fn scale_into(&self, shape: GridShape, values: &[f64]) -> HeightMap {
        let peak = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let (scale, heights) = if peak > 0.0 {
            // Divide first: `target / peak` overflows for a subnormal peak,
            // while `v / peak` stays within [-1, 1].
            let heights = values
                .iter()
                .map(|&v| (v / peak * self.target) as f32)
                .collect();
            ((self.target / peak).min(f64::MAX), heights)
        } else {
            (0.0, vec![0.0; values.len()])
        };

        #[cfg(feature = "logging")]
        tracing::debug!(peak, scale, rows = shape.rows, cols = shape.cols, "heights normalized");

        HeightMap {
            shape,
            heights,
            peak,
            scale,
        }
    }
}

impl Default for HeightNormalizer {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET_HEIGHT,
        }
    }
}

fn check_heights(heights: &[f32]) -> Result<()> {
    if heights.iter().any(|h| !h.is_finite()) {
        return Err(GreekSurfError::invalid_input("heights must be finite"));
    }
    Ok(())
}

fn check_len(shape: GridShape, len: usize) -> Result<()> {
    if len != shape.len() {
        return Err(GreekSurfError::invalid_input(format!(
            "shape {shape} needs {} values, got {len}",
            shape.len()
        )));
    }
    Ok(())
}
