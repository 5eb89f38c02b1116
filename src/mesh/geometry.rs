//! Placement of a grid on a rectangular footprint.
//!
//! Mesh building and inspection both go through [`GridGeometry`], so a point
//! picked on a rendered mesh always resolves back to the cell that produced
//! it, as long as the same [`Footprint`] is used for both.

use serde::{Deserialize, Serialize};

use crate::error::{GreekSurfError, Result};
use crate::surface::GridShape;
use crate::validate::validate_extent;

/// Default footprint edge length in local display units.
pub const DEFAULT_FOOTPRINT_EXTENT: f64 = 0.3;

/// Horizontal extent of a rendered surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FootprintRaw", into = "FootprintRaw")]
pub struct Footprint {
    width: f64,
    depth: f64,
}

#[derive(Serialize, Deserialize)]
struct FootprintRaw {
    width: f64,
    depth: f64,
}

impl TryFrom<FootprintRaw> for Footprint {
    type Error = GreekSurfError;
    fn try_from(raw: FootprintRaw) -> Result<Self> {
        Self::new(raw.width, raw.depth)
    }
}

impl From<Footprint> for FootprintRaw {
    fn from(f: Footprint) -> Self {
        Self {
            width: f.width,
            depth: f.depth,
        }
    }
}

impl Footprint {
    /// # Errors
    /// Returns [`GreekSurfError::InvalidInput`] unless both extents are
    /// positive and finite.
    pub fn new(width: f64, depth: f64) -> Result<Self> {
        validate_extent(width, "footprint width")?;
        validate_extent(depth, "footprint depth")?;
        Ok(Self { width, depth })
    }

    /// Extent along x (time axis).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Extent along z (spot axis).
    pub fn depth(&self) -> f64 {
        self.depth
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            width: DEFAULT_FOOTPRINT_EXTENT,
            depth: DEFAULT_FOOTPRINT_EXTENT,
        }
    }
}

/// One axis of the placement: `coord = offset + index · spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisPlacement {
    count: usize,
    offset: f64,
    spacing: f64,
}

impl AxisPlacement {
    fn new(count: usize, extent: f64) -> Self {
        if count < 2 {
            // Single sample sits at the centre.
            return Self {
                count,
                offset: 0.0,
                spacing: 0.0,
            };
        }
        Self {
            count,
            offset: -extent / 2.0,
            spacing: extent / (count - 1) as f64,
        }
    }

    fn coord(&self, index: usize) -> f64 {
        self.offset + index as f64 * self.spacing
    }

    fn nearest(&self, coord: f64) -> usize {
        if self.count < 2 {
            return 0;
        }
        let k = ((coord - self.offset) / self.spacing).round();
        if k.is_nan() {
            return 0;
        }
        k.clamp(0.0, (self.count - 1) as f64) as usize
    }
}

/// Forward and inverse mapping between grid cells and local coordinates.
///
/// Column `j` (time) maps to `x = −width/2 + j·width/(C−1)`, row `i` (spot)
/// to `z = −depth/2 + i·depth/(R−1)`.
///
/// # Examples
/// ```
/// use greeksurf::mesh::{Footprint, GridGeometry};
/// use greeksurf::surface::GridShape;
///
/// let geo = GridGeometry::new(GridShape::new(40, 40), Footprint::default());
/// let (x, z) = geo.cell_position(12, 30);
/// assert_eq!(geo.nearest_cell(x, z), (12, 30));
/// // Points off the footprint clamp to the edge.
/// assert_eq!(geo.nearest_cell(10.0, -10.0), (0, 39));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    shape: GridShape,
    footprint: Footprint,
    x: AxisPlacement,
    z: AxisPlacement,
}

impl GridGeometry {
    pub fn new(shape: GridShape, footprint: Footprint) -> Self {
        Self {
            shape,
            footprint,
            x: AxisPlacement::new(shape.cols, footprint.width),
            z: AxisPlacement::new(shape.rows, footprint.depth),
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Distance between neighbouring columns (x) and rows (z).
    /// Zero on an axis with a single sample.
    pub fn spacing(&self) -> (f64, f64) {
        (self.x.spacing, self.z.spacing)
    }

    /// Local (x, z) of cell `(i, j)`.
    pub fn cell_position(&self, i: usize, j: usize) -> (f64, f64) {
        (self.x.coord(j), self.z.coord(i))
    }

    /// Nearest cell `(i, j)` to a local point, clamped to the grid.
    /// Never fails: points outside the footprint resolve to the closest edge
    /// cell and a NaN coordinate resolves to index 0 on that axis.
    pub fn nearest_cell(&self, x: f64, z: f64) -> (usize, usize) {
        (self.z.nearest(z), self.x.nearest(x))
    }
}
