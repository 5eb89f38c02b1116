//! Display-space representation of a surface.
//!
//! - [`HeightNormalizer`] — rescales raw metric values into a bounded
//!   [`HeightMap`]
//! - [`GridGeometry`] — forward (cell → local x/z) and inverse (local point →
//!   nearest cell) placement of a grid on a [`Footprint`]
//! - [`MeshBuilder`] — triangulates a height map into a [`Mesh`]
//!
//! Local coordinates are y-up: the time axis runs along x across the
//! footprint width, the spot axis along z across its depth, and the height is
//! y. The grid is centred on the origin.

pub mod builder;
pub mod geometry;
pub mod normalize;

pub use builder::{Mesh, MeshBuilder};
pub use geometry::{Footprint, GridGeometry};
pub use normalize::{HeightMap, HeightNormalizer, DEFAULT_TARGET_HEIGHT};
