//! # greeksurf
//!
//! Interactive option-metric surfaces for teaching and exploration.
//!
//! Provides the full pipeline: option parameters → Black-Scholes price and
//! Greeks over a (spot, time) grid → display-normalized heights → triangle
//! mesh → point inspection and baseline comparison.
//!
//! ## Architecture
//!
//! - **`pricing`** — Closed-form Black-Scholes price and Greeks
//! - **`surface`** — Sampling a metric over a (spot, time-to-expiry) grid
//! - **`mesh`** — Height normalization, grid placement and triangulation
//! - **`inspect`** — Mapping a picked point back to exact model values
//! - **`baseline`** — Retained snapshot and difference surfaces
//! - **`lab`** — Session facade tying the above together
//! - **`config`** — Serde configuration for a session
//!
//! ## Design
//!
//! - **Validate at the boundary.** The pricing formulas do not check their
//!   inputs; grid generation and inspection reject out-of-domain parameters
//!   with [`GreekSurfError::InvalidParameter`] before any evaluation, so NaN
//!   never reaches a mesh.
//! - **No panics.** Every fallible operation returns [`Result`]. Library code
//!   never calls `unwrap()` or `expect()`.
//! - **Immutable grids.** A [`SurfaceGrid`](surface::SurfaceGrid) is built
//!   fresh per request and never edited; a diff is a new grid.
//! - **One mutable snapshot.** The baseline is the only state retained across
//!   requests, owned by a [`BaselineStore`](baseline::BaselineStore) behind a
//!   single mutex and replaced wholesale.
//! - **Shared geometry.** Mesh building and inspection use the same
//!   [`GridGeometry`](mesh::GridGeometry), so a picked point always resolves
//!   to the cell that produced it.
//! - **Serializable.** Parameters, grids, height maps, meshes, selections and
//!   the configuration implement Serde `Serialize` / `Deserialize`, with
//!   validation on deserialization where invariants exist.
//!
//! ## Features
//!
//! - `parallel` (default) — evaluate grid rows on the rayon thread pool
//! - `logging` — emit `tracing` events from the pipeline

pub mod baseline;
pub mod config;
pub mod error;
pub mod inspect;
pub mod lab;
pub mod mesh;
pub mod pricing;
pub mod surface;
pub mod types;
mod validate;

#[doc(inline)]
pub use baseline::{DiffOutcome, DiffUnavailable};
#[doc(inline)]
pub use config::LabConfig;
#[doc(inline)]
pub use error::{GreekSurfError, Result};
#[doc(inline)]
pub use inspect::Selection;
#[doc(inline)]
pub use lab::{GeneratedSurface, SurfaceLab, SurfaceRequest};
#[doc(inline)]
pub use pricing::BlackScholes;
#[doc(inline)]
pub use types::{Greeks, OptionParameters, OptionType, SurfaceMetric};
