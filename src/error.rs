//! Error types for the greeksurf library.
//!
//! All fallible operations return `Result<T, GreekSurfError>` rather than
//! panicking. Invalid option inputs are rejected at the grid and inspection
//! boundaries so NaN or infinite values never reach a height map or mesh.

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, GreekSurfError>;

/// Errors that can occur while generating surfaces, meshes and inspections.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GreekSurfError {
    /// Option parameters are outside the model's domain
    /// (e.g., non-positive volatility, zero time, non-finite rate).
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Grid, footprint or request inputs are invalid
    /// (e.g., zero steps, inverted range, unknown metric name).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration text could not be parsed or failed validation.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl GreekSurfError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
