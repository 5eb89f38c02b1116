//! Input validation helpers.
//!
//! Standardizes validation across the crate using `!is_finite()` to reject
//! NaN, +Inf, and -Inf uniformly.

use crate::error::{GreekSurfError, Result};

/// Validate that an option parameter is strictly positive and finite.
pub(crate) fn validate_positive(value: f64, name: &str) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GreekSurfError::InvalidParameter {
            message: format!("{name} must be positive and finite, got {value}"),
        });
    }
    Ok(value)
}

/// Validate that an option parameter is finite (allows zero and negatives).
pub(crate) fn validate_finite(value: f64, name: &str) -> Result<f64> {
    if !value.is_finite() {
        return Err(GreekSurfError::InvalidParameter {
            message: format!("{name} must be finite, got {value}"),
        });
    }
    Ok(value)
}

/// Validate a display or grid dimension: strictly positive and finite.
pub(crate) fn validate_extent(value: f64, name: &str) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GreekSurfError::invalid_input(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(value)
}

/// Validate an axis step count.
pub(crate) fn validate_steps(steps: usize, name: &str) -> Result<usize> {
    if steps == 0 {
        return Err(GreekSurfError::invalid_input(format!(
            "{name} must be at least 1, got 0"
        )));
    }
    Ok(steps)
}
