//! Soft output envelope.
//!
//! Bounds curve output before quantization so that pathological curves
//! (inverted, flat, extreme shadow lift) never reach the driver. The bound is
//! deliberately generous: the real acceptance range is per-driver and is
//! discovered at apply time.
//!
//! ```text
//! 0 <= y <= min(1, slope * x + offset)
//! ```

use serde::{Deserialize, Serialize};

/// Default envelope slope.
pub const DEFAULT_SLOPE: f64 = 3.0;

/// Default envelope offset at black.
pub const DEFAULT_OFFSET: f64 = 0.2;

/// Upper output bound as a linear function of input, floored at 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Growth of the upper bound per unit of input
    pub slope: f64,
    /// Upper bound at `x = 0`
    pub offset: f64,
}

impl Envelope {
    /// Creates an envelope.
    pub const fn new(slope: f64, offset: f64) -> Self {
        Self { slope, offset }
    }

    /// Maximum permitted output at input `x`.
    ///
    /// A NaN bound imposes no limit.
    ///
    /// ```rust
    /// use lumen_core::Envelope;
    ///
    /// let env = Envelope::default();
    /// assert!((env.max(0.0) - 0.2).abs() < 1e-12);
    /// assert_eq!(env.max(0.5), 1.0);
    /// ```
    #[inline]
    pub fn max(&self, x: f64) -> f64 {
        let bound = self.slope * x + self.offset;
        if bound.is_nan() { 1.0 } else { bound.clamp(0.0, 1.0) }
    }

    /// Clamps `y` into `[0, max(x)]`.
    #[inline]
    pub fn clamp(&self, x: f64, y: f64) -> f64 {
        y.clamp(0.0, self.max(x))
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(DEFAULT_SLOPE, DEFAULT_OFFSET)
    }
}
