//! Fluent builder for metric surfaces.
//!
//! ```
//! use greeksurf::surface::GridBuilder;
//! use greeksurf::types::{OptionParameters, SurfaceMetric};
//!
//! let base = OptionParameters::default();
//! let grid = GridBuilder::new()
//!     .spot_range(0.5, 1.5)
//!     .time_range(0.01, 1.0)
//!     .steps(40, 40)
//!     .metric(SurfaceMetric::Delta)
//!     .build(&base)
//!     .unwrap();
//!
//! assert_eq!(grid.s_axis().len(), 40);
//! assert_eq!(grid.t_axis()[0], 0.01);
//! ```

use crate::error::{GreekSurfError, Result};
use crate::pricing::BlackScholes;
use crate::surface::axis::{is_strictly_increasing, linspace};
use crate::surface::grid::SurfaceGrid;
use crate::types::{OptionParameters, SurfaceMetric};
use crate::validate::{validate_extent, validate_positive, validate_steps};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default lower spot bound as a multiple of the base spot.
pub const DEFAULT_SPOT_MIN_FACTOR: f64 = 0.5;
/// Default upper spot bound as a multiple of the base spot.
pub const DEFAULT_SPOT_MAX_FACTOR: f64 = 1.5;
/// Default shortest time to expiry. Kept above zero so every sample is priceable.
pub const DEFAULT_TIME_MIN: f64 = 0.01;
/// Default longest time to expiry in years.
pub const DEFAULT_TIME_MAX: f64 = 1.0;
/// Default samples per axis.
pub const DEFAULT_STEPS: usize = 40;

/// Builder for sampling a [`SurfaceMetric`] over a (spot, time) grid.
///
/// The spot axis spans `[factor_min·S₀, factor_max·S₀]` where `S₀` is the
/// base parameters' spot; the time axis spans `[time_min, time_max]`. Each
/// cell re-prices the base parameters with spot and time overridden.
#[derive(Debug, Clone, PartialEq)]
pub struct GridBuilder {
    spot_min_factor: f64,
    spot_max_factor: f64,
    time_min: f64,
    time_max: f64,
    spot_steps: usize,
    time_steps: usize,
    metric: SurfaceMetric,
}

impl GridBuilder {
    /// Builder with the default 0.5×–1.5× spot range, 0.01–1.0 year time
    /// range, 40×40 samples and the price metric.
    pub fn new() -> Self {
        Self {
            spot_min_factor: DEFAULT_SPOT_MIN_FACTOR,
            spot_max_factor: DEFAULT_SPOT_MAX_FACTOR,
            time_min: DEFAULT_TIME_MIN,
            time_max: DEFAULT_TIME_MAX,
            spot_steps: DEFAULT_STEPS,
            time_steps: DEFAULT_STEPS,
            metric: SurfaceMetric::default(),
        }
    }

    /// Spot range as multiplicative factors of the base spot.
    pub fn spot_range(mut self, min_factor: f64, max_factor: f64) -> Self {
        self.spot_min_factor = min_factor;
        self.spot_max_factor = max_factor;
        self
    }

    /// Time-to-expiry range in years.
    pub fn time_range(mut self, time_min: f64, time_max: f64) -> Self {
        self.time_min = time_min;
        self.time_max = time_max;
        self
    }

    /// Set only the upper end of the time range.
    pub fn time_max(mut self, time_max: f64) -> Self {
        self.time_max = time_max;
        self
    }

    /// Number of samples on the spot and time axes.
    pub fn steps(mut self, spot_steps: usize, time_steps: usize) -> Self {
        self.spot_steps = spot_steps;
        self.time_steps = time_steps;
        self
    }

    /// Metric evaluated at every cell.
    pub fn metric(mut self, metric: SurfaceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Sample the metric over the configured grid.
    ///
    /// An axis with a single step is the single point at its range minimum.
    ///
    /// # Errors
    /// Returns [`GreekSurfError::InvalidParameter`] if the base parameters
    /// (other than spot and time, which the grid overrides) are outside the
    /// model domain, if `time_min` is not positive, or if any cell evaluates
    /// to a non-finite value. Returns [`GreekSurfError::InvalidInput`] for zero
    /// steps or an empty, inverted or too narrow range.
    pub fn build(self, base: &OptionParameters) -> Result<SurfaceGrid> {
        #[cfg(feature = "logging")]
        tracing::debug!(
            spot_steps = self.spot_steps,
            time_steps = self.time_steps,
            metric = %self.metric,
            "surface grid generation started"
        );

        base.validate_template()?;
        validate_steps(self.spot_steps, "spot_steps")?;
        validate_steps(self.time_steps, "time_steps")?;
        validate_extent(self.spot_min_factor, "spot_min_factor")?;
        validate_extent(self.spot_max_factor, "spot_max_factor")?;
        validate_positive(self.time_min, "time_min")?;
        validate_positive(self.time_max, "time_max")?;
        check_range(
            self.spot_min_factor,
            self.spot_max_factor,
            self.spot_steps,
            "spot factor",
        )?;
        check_range(self.time_min, self.time_max, self.time_steps, "time")?;

        let s_axis = linspace(
            base.spot * self.spot_min_factor,
            base.spot * self.spot_max_factor,
            self.spot_steps,
        );
        let t_axis = linspace(self.time_min, self.time_max, self.time_steps);
        check_axis(&s_axis, "spot")?;
        check_axis(&t_axis, "time")?;

        let metric = self.metric;
        let cols = t_axis.len();
        let mut values = vec![0.0; s_axis.len() * cols];

        let fill_row = |(row, &spot): (&mut [f64], &f64)| {
            let at_spot = base.with_spot(spot);
            for (cell, &time) in row.iter_mut().zip(&t_axis) {
                *cell = BlackScholes::new(&at_spot.with_time(time)).metric(metric);
            }
        };

        #[cfg(feature = "parallel")]
        values
            .par_chunks_mut(cols)
            .zip(s_axis.par_iter())
            .for_each(fill_row);
        #[cfg(not(feature = "parallel"))]
        values.chunks_mut(cols).zip(s_axis.iter()).for_each(fill_row);

        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            let (i, j) = (pos / cols, pos % cols);
            return Err(GreekSurfError::InvalidParameter {
                message: format!(
                    "{metric} is not finite at spot={}, time={}",
                    s_axis[i], t_axis[j]
                ),
            });
        }

        #[cfg(feature = "logging")]
        tracing::debug!(
            rows = s_axis.len(),
            cols,
            "surface grid generation complete"
        );

        Ok(SurfaceGrid::from_parts_unchecked(metric, s_axis, t_axis, values))
    }
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A multi-sample axis needs `min < max`; a single sample needs `min ≤ max`.
fn check_range(min: f64, max: f64, steps: usize, name: &str) -> Result<()> {
    let ok = if steps > 1 { min < max } else { min <= max };
    if !ok {
        return Err(GreekSurfError::invalid_input(format!(
            "{name} range [{min}, {max}] is empty for {steps} steps"
        )));
    }
    Ok(())
}

/// A range narrower than the float spacing collapses neighbouring samples.
fn check_axis(axis: &[f64], name: &str) -> Result<()> {
    if !is_strictly_increasing(axis) {
        return Err(GreekSurfError::invalid_input(format!(
            "{name} range [{}, {}] is too narrow for {} distinct steps",
            axis.first().copied().unwrap_or(f64::NAN),
            axis.last().copied().unwrap_or(f64::NAN),
            axis.len()
        )));
    }
    Ok(())
}
