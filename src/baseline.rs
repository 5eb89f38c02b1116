//! Baseline snapshot and difference surfaces.
//!
//! [`BaselineStore`] holds at most one retained [`SurfaceGrid`]. Saving
//! replaces the previous snapshot wholesale and reset clears it; the snapshot
//! is never merged or edited in place. A single mutex guards the reference,
//! which is all the locking needed since grids are immutable.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::mesh::{HeightMap, HeightNormalizer};
use crate::surface::{GridShape, SurfaceGrid};

/// Why a difference surface could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiffUnavailable {
    /// No baseline has been saved since creation or the last reset.
    #[error("no baseline saved")]
    NoBaseline,
    /// The current grid and the baseline have different axis lengths.
    #[error("baseline is {baseline} but current grid is {current}")]
    ShapeMismatch {
        baseline: GridShape,
        current: GridShape,
    },
}

/// Result of comparing the current grid against the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    /// Normalized `current − baseline` heights.
    Ready(HeightMap),
    /// Nothing to render.
    Unavailable(DiffUnavailable),
}

impl DiffOutcome {
    pub fn height_map(&self) -> Option<&HeightMap> {
        match self {
            DiffOutcome::Ready(map) => Some(map),
            DiffOutcome::Unavailable(_) => None,
        }
    }

    pub fn into_height_map(self) -> Option<HeightMap> {
        match self {
            DiffOutcome::Ready(map) => Some(map),
            DiffOutcome::Unavailable(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DiffOutcome::Ready(_))
    }
}

/// Retains one baseline grid and diffs later grids against it.
///
/// # Examples
/// ```
/// use greeksurf::baseline::{BaselineStore, DiffUnavailable};
/// use greeksurf::surface::GridBuilder;
/// use greeksurf::types::OptionParameters;
///
/// let base = OptionParameters::default();
/// let grid = GridBuilder::new().steps(8, 8).build(&base).unwrap();
///
/// let store = BaselineStore::new();
/// assert_eq!(store.diff(&grid).unwrap_err(), DiffUnavailable::NoBaseline);
///
/// store.save(grid.clone());
/// let diff = store.diff(&grid).unwrap();
/// assert!(diff.values().iter().all(|&v| v == 0.0));
/// ```
#[derive(Debug, Default)]
pub struct BaselineStore {
    snapshot: Mutex<Option<Arc<SurfaceGrid>>>,
}

impl BaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the baseline with `grid`.
    pub fn save(&self, grid: impl Into<Arc<SurfaceGrid>>) {
        let grid = grid.into();

        #[cfg(feature = "logging")]
        tracing::debug!(
            rows = grid.shape().rows,
            cols = grid.shape().cols,
            metric = %grid.metric(),
            "baseline saved"
        );

        *self.lock() = Some(grid);
    }

    /// Drop the baseline, if any.
    pub fn clear(&self) {
        #[cfg(feature = "logging")]
        tracing::debug!("baseline cleared");

        *self.lock() = None;
    }

    /// The retained baseline.
    pub fn baseline(&self) -> Option<Arc<SurfaceGrid>> {
        self.lock().clone()
    }

    pub fn has_baseline(&self) -> bool {
        self.lock().is_some()
    }

    /// Elementwise `current − baseline` on the current grid's axes.
    ///
    /// # Errors
    /// Returns [`DiffUnavailable`] when no baseline exists or the axis lengths
    /// differ. Neither is a failure of the caller.
    pub fn diff(&self, current: &SurfaceGrid) -> Result<SurfaceGrid, DiffUnavailable> {
        let baseline = self.baseline().ok_or(DiffUnavailable::NoBaseline)?;
        if baseline.shape() != current.shape() {
            return Err(DiffUnavailable::ShapeMismatch {
                baseline: baseline.shape(),
                current: current.shape(),
            });
        }
        let values = current
            .values()
            .iter()
            .zip(baseline.values())
            .map(|(c, b)| c - b)
            .collect();
        Ok(current.with_values(values))
    }

    /// Diff against the baseline and normalize with its own peak, independent
    /// of the normalization of the main surface.
    pub fn diff_heights(&self, current: &SurfaceGrid, normalizer: &HeightNormalizer) -> DiffOutcome {
        match self.diff(current) {
            Ok(diff) => DiffOutcome::Ready(normalizer.normalize(&diff)),
            Err(reason) => {
                #[cfg(feature = "logging")]
                tracing::debug!(%reason, "diff unavailable");

                DiffOutcome::Unavailable(reason)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<SurfaceGrid>>> {
        // The guarded value is a plain reference swap, so a poisoned lock
        // still holds a consistent value.
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
