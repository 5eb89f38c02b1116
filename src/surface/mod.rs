//! Option metric surfaces sampled over (spot, time) grids.
//!
//! A surface maps every (spot, time-to-expiry) pair of a rectangular grid to
//! one [`SurfaceMetric`](crate::types::SurfaceMetric) evaluated by the
//! Black-Scholes model.
//!
//! - [`GridBuilder`] — fluent construction from a base parameter template
//! - [`SurfaceGrid`] — immutable result: axes plus row-major values
//! - [`axis::linspace`] — inclusive linear axis sampling
//!
//! # Design
//! - Grids are created fresh on every generation and never mutated in place;
//!   a diff against a baseline is a new grid.
//! - Generation is a pure function of its inputs. With the `parallel`
//!   feature, rows are evaluated on the rayon pool.

pub mod axis;
pub mod builder;
pub mod grid;

pub use builder::GridBuilder;
pub use grid::{GridShape, SurfaceGrid};
