//! Driver error types.
//!
//! Driver errors are consumed inside this crate: the applier turns them into
//! rejections, capture and restore into `false`. Nothing here reaches the
//! user as a hard error.

use thiserror::Error;

/// Result type for driver calls.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors reported by a display backend.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Output enumeration failed entirely.
    #[error("display enumeration failed: {0}")]
    Enumeration(String),

    /// No device context could be opened for the output.
    #[error("cannot open device context for {device}")]
    DeviceContext {
        /// Device name
        device: String,
    },

    /// The driver refused to return the current ramp.
    #[error("reading gamma ramp failed for {device}")]
    ReadFailed {
        /// Device name
        device: String,
    },

    /// The driver reported failure for a ramp write.
    #[error("writing gamma ramp failed for {device}")]
    WriteFailed {
        /// Device name
        device: String,
    },

    /// The identifier does not name a known output.
    #[error("unknown display {device}")]
    UnknownDevice {
        /// Device name
        device: String,
    },
}

impl DriverError {
    /// Device name the error refers to, if any.
    pub fn device(&self) -> Option<&str> {
        match self {
            Self::Enumeration(_) => None,
            Self::DeviceContext { device }
            | Self::ReadFailed { device }
            | Self::WriteFailed { device }
            | Self::UnknownDevice { device } => Some(device),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_name_reported() {
        let err = DriverError::WriteFailed {
            device: r"\\.\DISPLAY2".into(),
        };
        assert_eq!(err.device(), Some(r"\\.\DISPLAY2"));
        assert!(err.to_string().contains("DISPLAY2"));
        assert_eq!(DriverError::Enumeration("x".into()).device(), None);
    }
}
