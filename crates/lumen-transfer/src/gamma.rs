//! Power-law curves.
//!
//! `y = x^(1/strength)`. Strength above 1 brightens midtones, below 1
//! darkens them. The cinema preset is the same shape at a fixed 2.6, the
//! exponent used for theatrical projection.
//!
//! # Range
//!
//! - Input/Output: [0, 1]
//! - Strength: [0.1, 9.0], clamped

/// Smallest accepted strength.
pub const MIN_STRENGTH: f64 = 0.1;

/// Largest accepted strength.
pub const MAX_STRENGTH: f64 = 9.0;

/// Fixed exponent of the cinema preset.
pub const CINEMA_EXPONENT: f64 = 2.6;

/// Common strengths a slider sticks to on release.
pub const DEFAULT_TICKS: [f64; 4] = [1.0, 1.8, 2.2, 2.5];

/// Distance within which [`snap_strength`] snaps to a tick.
pub const SNAP_THRESHOLD: f64 = 0.05;

/// Clamps a strength into [`MIN_STRENGTH`, `MAX_STRENGTH`].
///
/// Non-finite input yields the neutral strength 1.0.
///
/// # Example
///
/// ```rust
/// use lumen_transfer::gamma::clamp_strength;
///
/// assert_eq!(clamp_strength(0.05), 0.1);
/// assert_eq!(clamp_strength(20.0), 9.0);
/// assert_eq!(clamp_strength(f64::NAN), 1.0);
/// ```
#[inline]
pub fn clamp_strength(strength: f64) -> f64 {
    if strength.is_finite() {
        strength.clamp(MIN_STRENGTH, MAX_STRENGTH)
    } else {
        1.0
    }
}

/// Power law `x^(1/strength)` with the strength clamped first.
///
/// # Example
///
/// ```rust
/// use lumen_transfer::gamma::power;
///
/// assert!((power(0.25, 2.0) - 0.5).abs() < 1e-12);
/// ```
#[inline]
pub fn power(x: f64, strength: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else {
        x.powf(1.0 / clamp_strength(strength))
    }
}

/// Cinema preset, `x^(1/2.6)`.
#[inline]
pub fn cinema(x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else {
        x.powf(1.0 / CINEMA_EXPONENT)
    }
}

/// Snaps `strength` to the first tick closer than `threshold`.
///
/// Returns the input unchanged when no tick is close enough.
///
/// # Example
///
/// ```rust
/// use lumen_transfer::gamma::{snap_strength, DEFAULT_TICKS, SNAP_THRESHOLD};
///
/// assert_eq!(snap_strength(2.23, &DEFAULT_TICKS, SNAP_THRESHOLD), 2.2);
/// assert_eq!(snap_strength(2.35, &DEFAULT_TICKS, SNAP_THRESHOLD), 2.35);
/// ```
pub fn snap_strength(strength: f64, ticks: &[f64], threshold: f64) -> f64 {
    ticks
        .iter()
        .copied()
        .find(|tick| (strength - tick).abs() < threshold)
        .unwrap_or(strength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_boundaries() {
        assert_eq!(power(0.0, 2.2), 0.0);
        assert_abs_diff_eq!(power(1.0, 2.2), 1.0, epsilon = 1e-12);
        assert_eq!(cinema(0.0), 0.0);
        assert_abs_diff_eq!(cinema(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_strength_clamped() {
        assert_eq!(power(0.3, 0.05), power(0.3, MIN_STRENGTH));
        assert_eq!(power(0.3, 20.0), power(0.3, MAX_STRENGTH));
    }

    #[test]
    fn test_unit_strength_is_identity() {
        for i in 0..=20 {
            let x = i as f64 / 20.0;
            assert_abs_diff_eq!(power(x, 1.0), x, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cinema_matches_power_26() {
        assert_abs_diff_eq!(cinema(0.18), power(0.18, 2.6), epsilon = 1e-12);
    }

    #[test]
    fn test_snap_prefers_first_tick() {
        let ticks = [1.0, 1.04];
        assert_eq!(snap_strength(1.02, &ticks, 0.05), 1.0);
        assert_eq!(snap_strength(1.02, &[], 0.05), 1.02);
    }
}
