//! Shadow-lift curve.
//!
//! Same shape as the sRGB encoding function: a short linear toe followed by
//! a 1/2.4 power segment. It raises dark values considerably while leaving
//! highlights close to where they were.
//!
//! # Range
//!
//! - Input/Output: [0, 1]

/// Break point between the linear toe and the power segment.
pub const BREAK: f64 = 0.0031308;

/// Slope of the linear toe.
pub const TOE_SLOPE: f64 = 12.92;

/// Shadow-lift curve.
///
/// # Formula
///
/// ```text
/// if x <= 0.0031308:
///     y = 12.92 * x
/// else:
///     y = 1.055 * x^(1/2.4) - 0.055
/// ```
///
/// # Example
///
/// ```rust
/// use lumen_transfer::shadow_lift::lift;
///
/// assert!((lift(0.214) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn lift(x: f64) -> f64 {
    if x <= BREAK {
        TOE_SLOPE * x
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}
