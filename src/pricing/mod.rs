//! Closed-form European option pricing.
//!
//! - [`BlackScholes`] — price and Greeks from one shared evaluation of
//!   d1, d2 and the discount factors
//! - [`norm_cdf`] / [`norm_pdf`] — standard normal distribution
//!
//! The model performs no validation: non-positive time, volatility, spot or
//! strike produce NaN or infinities. Callers validate first (see
//! [`OptionParameters::validate`](crate::types::OptionParameters::validate)).

pub mod black_scholes;
pub mod normal;

pub use black_scholes::BlackScholes;
pub use normal::{norm_cdf, norm_pdf};

use crate::types::{OptionParameters, SurfaceMetric};

/// Evaluate a single metric for a parameter set.
pub fn evaluate(params: &OptionParameters, metric: SurfaceMetric) -> f64 {
    BlackScholes::new(params).metric(metric)
}
