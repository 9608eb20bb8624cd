//! Soft-contrast curve.
//!
//! Follows the Rec.709 camera encoding shape: linear segment near black,
//! then a 0.45 power. Gentler in the deep shadows than [`crate::shadow_lift`].
//!
//! # Range
//!
//! - Input/Output: [0, 1]

const BETA: f64 = 0.018;
const ALPHA: f64 = 1.099;
const EXPONENT: f64 = 0.45;

/// Soft-contrast curve.
///
/// # Formula
///
/// ```text
/// if x < 0.018:
///     y = 4.5 * x
/// else:
///     y = 1.099 * x^0.45 - 0.099
/// ```
#[inline]
pub fn contrast(x: f64) -> f64 {
    if x < BETA {
        4.5 * x
    } else {
        ALPHA * x.powf(EXPONENT) - (ALPHA - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_boundaries() {
        assert_eq!(contrast(0.0), 0.0);
        assert_abs_diff_eq!(contrast(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_toe_is_linear() {
        assert_abs_diff_eq!(contrast(0.01), 0.045, epsilon = 1e-12);
    }

    #[test]
    fn test_nearly_continuous_at_break() {
        // the published constants leave a tiny step at the break
        assert_abs_diff_eq!(contrast(BETA - 1e-9), contrast(BETA), epsilon = 1e-3);
    }
}
