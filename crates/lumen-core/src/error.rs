//! Error types for lumen-core parsing.
//!
//! Curve math and ramp building are total and never fail. Errors only arise
//! when text from the command line or the configuration file is turned into
//! core types.
//!
//! # Usage
//!
//! ```rust
//! use lumen_core::{Error, ToneCurveKind};
//!
//! let err = "sepia".parse::<ToneCurveKind>().unwrap_err();
//! assert!(matches!(err, Error::UnknownCurveKind { .. }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing core types from text.
#[derive(Debug, Error)]
pub enum Error {
    /// Curve name does not match any [`crate::ToneCurveKind`].
    #[error("unknown tone curve '{name}' (expected identity, power, shadow-lift, soft-contrast, cinema or custom)")]
    UnknownCurveKind {
        /// The name that failed to parse
        name: String,
    },

    /// A control point could not be parsed as `x:y`.
    #[error("invalid curve point '{text}': {reason}")]
    InvalidPoint {
        /// Offending text
        text: String,
        /// Why it was rejected
        reason: String,
    },

    /// A custom curve needs at least two points.
    #[error("custom curve needs at least 2 points, got {count}")]
    TooFewPoints {
        /// Number of points supplied
        count: usize,
    },
}

impl Error {
    /// Creates an [`Error::UnknownCurveKind`] error.
    #[inline]
    pub fn unknown_curve(name: impl Into<String>) -> Self {
        Self::UnknownCurveKind { name: name.into() }
    }

    /// Creates an [`Error::InvalidPoint`] error.
    #[inline]
    pub fn invalid_point(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPoint {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_curve_message() {
        let err = Error::unknown_curve("sepia");
        assert!(err.to_string().contains("sepia"));
    }

    #[test]
    fn test_invalid_point_message() {
        let err = Error::invalid_point("0.5;0.5", "missing ':'");
        let msg = err.to_string();
        assert!(msg.contains("0.5;0.5"));
        assert!(msg.contains("missing ':'"));
    }

    #[test]
    fn test_too_few_points() {
        let err = Error::TooFewPoints { count: 1 };
        assert!(err.to_string().contains("got 1"));
    }
}
