//! Ramp error types.

use thiserror::Error;

/// Result type for ramp operations.
pub type RampResult<T> = Result<T, RampError>;

/// Errors that can occur while exporting ramps.
#[derive(Debug, Error)]
pub enum RampError {
    /// Ramp file has an unexpected shape.
    #[error("invalid ramp: {0}")]
    InvalidRamp(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
