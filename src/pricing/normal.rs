//! Standard normal distribution functions.
//!
//! The CDF is computed analytically through the complementary error function,
//! `N(x) = ½·erfc(−x/√2)`, which keeps full relative precision in the far
//! left tail.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use statrs::function::erf::erfc;

/// Standard normal cumulative distribution function N(x).
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Standard normal density φ(x).
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}
