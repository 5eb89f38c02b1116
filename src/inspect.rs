//! Point inspection on a rendered surface.
//!
//! A local point picked on the mesh is mapped back to the nearest grid cell
//! with the same [`GridGeometry`] that placed the vertices. The option is then
//! re-priced at that cell's (spot, time), so reported values are exact model
//! values rather than display-scaled heights.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mesh::{Footprint, GridGeometry};
use crate::pricing::BlackScholes;
use crate::surface::SurfaceGrid;
use crate::types::OptionParameters;

/// Model values at an inspected grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Spot index of the cell.
    pub row: usize,
    /// Time index of the cell.
    pub col: usize,
    pub spot: f64,
    pub time: f64,
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
}

/// Resolve a local point to the nearest cell of `grid` and price it.
///
/// `base` supplies everything except spot and time, which come from the
/// grid axes. Points outside the footprint clamp to the nearest edge cell.
///
/// # Errors
/// Returns [`GreekSurfError::InvalidParameter`](crate::GreekSurfError::InvalidParameter)
/// if the resolved parameters are outside the model domain.
///
/// # Examples
/// ```
/// use greeksurf::inspect::inspect;
/// use greeksurf::mesh::{Footprint, GridGeometry};
/// use greeksurf::surface::GridBuilder;
/// use greeksurf::types::OptionParameters;
///
/// let base = OptionParameters::default();
/// let grid = GridBuilder::new().steps(10, 10).build(&base).unwrap();
/// let footprint = Footprint::default();
///
/// let (x, z) = GridGeometry::new(grid.shape(), footprint).cell_position(3, 7);
/// let hit = inspect(x, z, &grid, footprint, &base).unwrap();
/// assert_eq!((hit.row, hit.col), (3, 7));
/// assert_eq!(hit.spot, grid.s_axis()[3]);
/// ```
pub fn inspect(
    x: f64,
    z: f64,
    grid: &SurfaceGrid,
    footprint: Footprint,
    base: &OptionParameters,
) -> Result<Selection> {
    let geometry = GridGeometry::new(grid.shape(), footprint);
    let (row, col) = geometry.nearest_cell(x, z);
    let spot = grid.s_axis()[row];
    let time = grid.t_axis()[col];

    let params = base.with_spot(spot).with_time(time);
    params.validate()?;
    let bs = BlackScholes::new(&params);

    #[cfg(feature = "logging")]
    tracing::debug!(x, z, row, col, spot, time, "surface inspected");

    Ok(Selection {
        row,
        col,
        spot,
        time,
        price: bs.price(),
        delta: bs.delta(),
        gamma: bs.gamma(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    use crate::surface::GridBuilder;
    use crate::types::{OptionType, SurfaceMetric};

    fn setup() -> (OptionParameters, SurfaceGrid) {
        let base = OptionParameters::new(100.0, 100.0, 0.5, 0.2, 0.01, 0.0, OptionType::Call);
        let grid = GridBuilder::new()
            .steps(12, 9)
            .metric(SurfaceMetric::Delta)
            .build(&base)
            .unwrap();
        (base, grid)
    }

    #[test]
    fn values_are_exact_model_values() {
        let (base, grid) = setup();
        let footprint = Footprint::default();
        let (x, z) = GridGeometry::new(grid.shape(), footprint).cell_position(5, 2);
        let hit = inspect(x, z, &grid, footprint, &base).unwrap();
        assert_eq!((hit.row, hit.col), (5, 2));
        // The grid holds delta, so the inspected delta must agree exactly.
        assert_eq!(hit.delta, grid.value(5, 2).unwrap());
        let bs = BlackScholes::new(&base.with_spot(hit.spot).with_time(hit.time));
        assert_eq!(hit.price, bs.price());
        assert_eq!(hit.gamma, bs.gamma());
    }

    #[test]
    fn out_of_range_clamps_to_corner() {
        let (base, grid) = setup();
        let hit = inspect(5.0, 5.0, &grid, Footprint::default(), &base).unwrap();
        assert_eq!((hit.row, hit.col), (11, 8));
        assert_abs_diff_eq!(hit.spot, 150.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.time, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn footprint_mismatch_shifts_cell() {
        let (base, grid) = setup();
        let (x, z) = GridGeometry::new(grid.shape(), Footprint::new(0.6, 0.6).unwrap())
            .cell_position(8, 2);
        // x = −0.15 is column 2 on a 0.6 footprint but column 0 on 0.3.
        let hit = inspect(x, z, &grid, Footprint::default(), &base).unwrap();
        assert_eq!(hit.col, 0);
    }

    #[test]
    fn invalid_base_is_reported() {
        let (base, grid) = setup();
        let bad = OptionParameters {
            volatility: 0.0,
            ..base
        };
        assert!(inspect(0.0, 0.0, &grid, Footprint::default(), &bad).is_err());
    }
}
