//! Session facade over the surface pipeline.
//!
//! [`SurfaceLab`] owns the state an interactive viewer keeps between calls:
//! the most recently generated grid with the parameters that produced it,
//! the current inspection selection, and the retained baseline. Everything
//! else is recomputed from the request on every call.
//!
//! ```
//! use greeksurf::{SurfaceLab, SurfaceRequest};
//!
//! let lab = SurfaceLab::default();
//! let request = SurfaceRequest::default().with_steps(16, 16);
//!
//! let surface = lab.generate_surface(&request).unwrap();
//! let mesh = lab.generate_mesh(&surface.height_map);
//! assert_eq!(mesh.triangle_count(), 2 * 15 * 15);
//!
//! let hit = lab.inspect(0.0, 0.0).unwrap().unwrap();
//! assert!(hit.price > 0.0);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::baseline::{BaselineStore, DiffOutcome};
use crate::config::LabConfig;
use crate::error::Result;
use crate::inspect::{Selection, inspect};
use crate::mesh::{HeightMap, HeightNormalizer, Mesh, MeshBuilder};
use crate::surface::SurfaceGrid;
use crate::surface::builder::{DEFAULT_STEPS, DEFAULT_TIME_MAX};
use crate::types::{OptionParameters, SurfaceMetric};

/// Inputs of one generation call: the option, the plotted metric and the
/// grid resolution and horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRequest {
    pub params: OptionParameters,
    pub metric: SurfaceMetric,
    pub spot_steps: usize,
    pub time_steps: usize,
    /// Longest time to expiry on the grid, in years.
    pub time_max: f64,
}

impl SurfaceRequest {
    pub fn new(params: OptionParameters, metric: SurfaceMetric) -> Self {
        Self {
            params,
            metric,
            ..Self::default()
        }
    }

    pub fn with_steps(mut self, spot_steps: usize, time_steps: usize) -> Self {
        self.spot_steps = spot_steps;
        self.time_steps = time_steps;
        self
    }

    pub fn with_time_max(mut self, time_max: f64) -> Self {
        self.time_max = time_max;
        self
    }

    pub fn with_metric(mut self, metric: SurfaceMetric) -> Self {
        self.metric = metric;
        self
    }
}

impl Default for SurfaceRequest {
    fn default() -> Self {
        Self {
            params: OptionParameters::default(),
            metric: SurfaceMetric::default(),
            spot_steps: DEFAULT_STEPS,
            time_steps: DEFAULT_STEPS,
            time_max: DEFAULT_TIME_MAX,
        }
    }
}

/// A freshly generated surface: the raw grid and its display heights.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSurface {
    pub grid: Arc<SurfaceGrid>,
    pub height_map: HeightMap,
}

impl GeneratedSurface {
    pub fn s_axis(&self) -> &[f64] {
        self.grid.s_axis()
    }

    pub fn t_axis(&self) -> &[f64] {
        self.grid.t_axis()
    }
}

#[derive(Debug, Default)]
struct LabState {
    current: Option<CurrentSurface>,
    selection: Option<Selection>,
}

#[derive(Debug)]
struct CurrentSurface {
    grid: Arc<SurfaceGrid>,
    params: OptionParameters,
}

/// One interactive session: current surface, selection and baseline.
///
/// All methods take `&self`; the lab can be shared across threads behind an
/// `Arc`. Grid evaluation runs outside the locks.
#[derive(Debug)]
pub struct SurfaceLab {
    config: LabConfig,
    normalizer: HeightNormalizer,
    mesh_builder: MeshBuilder,
    state: Mutex<LabState>,
    baseline: BaselineStore,
}

impl SurfaceLab {
    /// # Errors
    /// Returns [`GreekSurfError::Config`](crate::GreekSurfError::Config) if
    /// the configuration does not validate.
    pub fn new(config: LabConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = config.display.normalizer()?;
        let mesh_builder = MeshBuilder::new(config.footprint);
        Ok(Self {
            config,
            normalizer,
            mesh_builder,
            state: Mutex::new(LabState::default()),
            baseline: BaselineStore::new(),
        })
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    /// Build and normalize a surface, and make it the one that
    /// [`inspect`](Self::inspect) resolves against. Any previous selection
    /// is dropped.
    ///
    /// # Errors
    /// Returns [`GreekSurfError::InvalidParameter`](crate::GreekSurfError::InvalidParameter)
    /// or [`GreekSurfError::InvalidInput`](crate::GreekSurfError::InvalidInput)
    /// if the request cannot be sampled. The current surface is unchanged.
    pub fn generate_surface(&self, request: &SurfaceRequest) -> Result<GeneratedSurface> {
        let grid = Arc::new(self.build_grid(request)?);
        let height_map = self.normalizer.normalize(&grid);

        let mut state = self.lock();
        state.current = Some(CurrentSurface {
            grid: Arc::clone(&grid),
            params: request.params,
        });
        state.selection = None;

        Ok(GeneratedSurface { grid, height_map })
    }

    /// Triangulate a height map on the configured footprint.
    pub fn generate_mesh(&self, heights: &HeightMap) -> Mesh {
        self.mesh_builder.build(heights)
    }

    /// Resolve a local point on the current surface and remember it as the
    /// selection. `Ok(None)` if nothing has been generated yet.
    ///
    /// # Errors
    /// Returns [`GreekSurfError::InvalidParameter`](crate::GreekSurfError::InvalidParameter)
    /// if the resolved cell cannot be priced.
    pub fn inspect(&self, x: f64, z: f64) -> Result<Option<Selection>> {
        let mut state = self.lock();
        let Some(current) = &state.current else {
            return Ok(None);
        };
        let hit = inspect(x, z, &current.grid, self.config.footprint, &current.params)?;
        state.selection = Some(hit);
        Ok(Some(hit))
    }

    /// The last successful inspection on the current surface.
    pub fn selection(&self) -> Option<Selection> {
        self.lock().selection
    }

    /// The current grid, if any.
    pub fn current_grid(&self) -> Option<Arc<SurfaceGrid>> {
        self.lock().current.as_ref().map(|c| Arc::clone(&c.grid))
    }

    /// Generate the grid for `request` and retain it as the baseline,
    /// replacing any earlier one.
    ///
    /// # Errors
    /// Same as [`generate_surface`](Self::generate_surface). On error the
    /// previous baseline is kept.
    pub fn save_baseline(&self, request: &SurfaceRequest) -> Result<()> {
        let grid = self.build_grid(request)?;
        self.baseline.save(grid);
        Ok(())
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.has_baseline()
    }

    /// Generate the grid for `request` and diff it against the baseline.
    ///
    /// A missing baseline or a shape mismatch is reported inside the
    /// [`DiffOutcome`], not as an error.
    ///
    /// # Errors
    /// Same as [`generate_surface`](Self::generate_surface).
    pub fn diff_against_baseline(&self, request: &SurfaceRequest) -> Result<DiffOutcome> {
        let grid = self.build_grid(request)?;
        Ok(self.baseline.diff_heights(&grid, &self.normalizer))
    }

    /// Forget the baseline, the current surface and the selection.
    pub fn reset(&self) {
        self.baseline.clear();
        let mut state = self.lock();
        state.current = None;
        state.selection = None;

        #[cfg(feature = "logging")]
        tracing::debug!("surface lab reset");
    }

    fn build_grid(&self, request: &SurfaceRequest) -> Result<SurfaceGrid> {
        self.config.grid.builder(request).build(&request.params)
    }

    fn lock(&self) -> MutexGuard<'_, LabState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SurfaceLab {
    fn default() -> Self {
        let config = LabConfig::default();
        Self {
            normalizer: HeightNormalizer::default(),
            mesh_builder: MeshBuilder::new(config.footprint),
            config,
            state: Mutex::new(LabState::default()),
            baseline: BaselineStore::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    use crate::baseline::DiffUnavailable;
    use crate::error::GreekSurfError;
    use crate::mesh::GridGeometry;

    fn request() -> SurfaceRequest {
        SurfaceRequest::default().with_steps(10, 8)
    }

    #[test]
    fn generate_then_inspect() {
        let lab = SurfaceLab::default();
        assert_eq!(lab.inspect(0.0, 0.0).unwrap(), None);

        let surface = lab.generate_surface(&request()).unwrap();
        assert_eq!(surface.s_axis().len(), 10);
        assert_eq!(surface.t_axis().len(), 8);
        assert_abs_diff_eq!(surface.height_map.max_abs(), 0.1, epsilon = 1e-6);

        let (x, z) = GridGeometry::new(surface.grid.shape(), lab.config().footprint).cell_position(4, 6);
        let hit = lab.inspect(x, z).unwrap().unwrap();
        assert_eq!((hit.row, hit.col), (4, 6));
        assert_eq!(hit.price, surface.grid.value(4, 6).unwrap());
        assert_eq!(lab.selection(), Some(hit));
    }

    #[test]
    fn failed_generation_keeps_current() {
        let lab = SurfaceLab::default();
        lab.generate_surface(&request()).unwrap();
        let bad = request().with_steps(0, 8);
        assert!(matches!(
            lab.generate_surface(&bad),
            Err(GreekSurfError::InvalidInput { .. })
        ));
        assert_eq!(lab.current_grid().unwrap().shape().rows, 10);
    }

    #[test]
    fn regeneration_clears_selection() {
        let lab = SurfaceLab::default();
        lab.generate_surface(&request()).unwrap();
        lab.inspect(0.0, 0.0).unwrap();
        assert!(lab.selection().is_some());
        lab.generate_surface(&request()).unwrap();
        assert!(lab.selection().is_none());
    }

    #[test]
    fn diff_lifecycle() {
        let lab = SurfaceLab::default();
        assert_eq!(
            lab.diff_against_baseline(&request()).unwrap(),
            DiffOutcome::Unavailable(DiffUnavailable::NoBaseline)
        );

        lab.save_baseline(&request()).unwrap();
        assert!(lab.has_baseline());
        let same = lab.diff_against_baseline(&request()).unwrap();
        assert!(same.into_height_map().unwrap().is_flat());

        let resized = lab.diff_against_baseline(&request().with_steps(11, 8)).unwrap();
        assert!(matches!(
            resized,
            DiffOutcome::Unavailable(DiffUnavailable::ShapeMismatch { .. })
        ));

        lab.reset();
        assert!(!lab.has_baseline());
        assert!(lab.current_grid().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = LabConfig::default();
        config.display.target_height = -1.0;
        assert!(matches!(
            SurfaceLab::new(config),
            Err(GreekSurfError::Config { .. })
        ));
    }

    #[test]
    fn lab_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SurfaceLab>();
    }
}
