//! # lumen-transfer
//!
//! Tone curve evaluation: maps a normalized input level to an output level.
//!
//! These are curve *shapes* applied as a blunt output remap. Some resemble
//! well-known transfer functions, none of them is a calibrated transform.
//!
//! # Supported Curves
//!
//! | Kind | Formula | Module |
//! |------|---------|--------|
//! | Identity | `y = x` | - |
//! | PowerLaw | `y = x^(1/strength)`, strength in [0.1, 9] | [`gamma`] |
//! | ShadowLift | sRGB-like piecewise lift | [`shadow_lift`] |
//! | SoftContrast | Rec.709-like piecewise curve | [`soft_contrast`] |
//! | Cinema | `y = x^(1/2.6)` | [`gamma`] |
//! | Custom | piecewise-linear over control points | [`custom`] |
//!
//! # Usage
//!
//! ```rust
//! use lumen_core::ToneCurveKind;
//! use lumen_transfer::evaluate;
//!
//! let y = evaluate(ToneCurveKind::PowerLaw, 2.0, None, 0.25);
//! assert!((y - 0.5).abs() < 1e-12);
//! ```
//!
//! # Output Range
//!
//! The evaluator does not clamp its output. `lumen-ramp` clamps to [0, 1]
//! and applies the soft envelope before quantizing.
//!
//! # Dependencies
//!
//! - [`lumen-core`] - Curve and point types
//!
//! # Used By
//!
//! - `lumen-ramp` - Ramp synthesis
//! - `lumen-display` - Custom curve normalization in the engine

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod custom;
pub mod gamma;
pub mod shadow_lift;
pub mod soft_contrast;

pub use custom::{CurveEditor, DEFAULT_REMOVE_RADIUS};
pub use gamma::{clamp_strength, snap_strength, DEFAULT_TICKS, MAX_STRENGTH, MIN_STRENGTH, SNAP_THRESHOLD};

use lumen_core::{CurvePoint, ToneCurve, ToneCurveKind};

/// Evaluates a tone curve at `x`.
///
/// `x` is clamped to [0, 1] first. `strength` is only read by
/// [`ToneCurveKind::PowerLaw`]; `points` only by [`ToneCurveKind::Custom`],
/// which falls back to identity when fewer than two points are given.
///
/// # Example
///
/// ```rust
/// use lumen_core::{CurvePoint, ToneCurveKind};
/// use lumen_transfer::evaluate;
///
/// let pts = [CurvePoint::new(0.0, 0.2), CurvePoint::new(1.0, 0.9)];
/// assert_eq!(evaluate(ToneCurveKind::Custom, 1.0, Some(&pts), -0.5), 0.2);
/// ```
pub fn evaluate(kind: ToneCurveKind, strength: f64, points: Option<&[CurvePoint]>, x: f64) -> f64 {
    // NaN clamps to NaN; treat it as black
    let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };

    match kind {
        ToneCurveKind::Identity => x,
        ToneCurveKind::PowerLaw => gamma::power(x, strength),
        ToneCurveKind::ShadowLift => shadow_lift::lift(x),
        ToneCurveKind::SoftContrast => soft_contrast::contrast(x),
        ToneCurveKind::Cinema => gamma::cinema(x),
        ToneCurveKind::Custom => match points {
            Some(pts) if pts.len() >= 2 => custom::interpolate(pts, x),
            _ => x,
        },
    }
}

/// Evaluates a full [`ToneCurve`] selection at `x`.
#[inline]
pub fn evaluate_curve(curve: &ToneCurve, x: f64) -> f64 {
    evaluate(curve.kind, curve.strength, curve.active_points(), x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity_roundtrip() {
        for i in 0..=1000 {
            let x = i as f64 / 1000.0;
            assert_eq!(evaluate(ToneCurveKind::Identity, 3.0, None, x), x);
        }
    }

    #[test]
    fn test_input_clamped() {
        assert_eq!(evaluate(ToneCurveKind::Identity, 1.0, None, -2.0), 0.0);
        assert_eq!(evaluate(ToneCurveKind::Identity, 1.0, None, 7.0), 1.0);
        assert_eq!(evaluate(ToneCurveKind::Cinema, 1.0, None, f64::NAN), 0.0);
    }

    #[test]
    fn test_custom_endpoint_clamp() {
        let pts = [CurvePoint::new(0.0, 0.2), CurvePoint::new(1.0, 0.9)];
        assert_eq!(evaluate(ToneCurveKind::Custom, 1.0, Some(&pts), -0.5), 0.2);
        assert_eq!(evaluate(ToneCurveKind::Custom, 1.0, Some(&pts), 1.5), 0.9);
    }

    #[test]
    fn test_custom_interpolation() {
        let pts = [
            CurvePoint::new(0.0, 0.0),
            CurvePoint::new(0.5, 0.5),
            CurvePoint::new(1.0, 1.0),
        ];
        assert_abs_diff_eq!(evaluate(ToneCurveKind::Custom, 1.0, Some(&pts), 0.25), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_degrades_to_identity() {
        let one = [CurvePoint::new(0.3, 0.9)];
        assert_eq!(evaluate(ToneCurveKind::Custom, 1.0, Some(&one), 0.4), 0.4);
        assert_eq!(evaluate(ToneCurveKind::Custom, 1.0, None, 0.4), 0.4);
    }

    #[test]
    fn test_strength_only_affects_power() {
        for kind in [ToneCurveKind::ShadowLift, ToneCurveKind::SoftContrast, ToneCurveKind::Cinema] {
            assert_eq!(evaluate(kind, 0.5, None, 0.3), evaluate(kind, 5.0, None, 0.3));
        }
        assert_ne!(
            evaluate(ToneCurveKind::PowerLaw, 0.5, None, 0.3),
            evaluate(ToneCurveKind::PowerLaw, 5.0, None, 0.3)
        );
    }

    #[test]
    fn test_evaluate_curve_uses_selection() {
        let mut curve = ToneCurve::custom(vec![CurvePoint::new(0.0, 0.5), CurvePoint::new(1.0, 0.5)]);
        assert_eq!(evaluate_curve(&curve, 0.1), 0.5);
        curve.kind = ToneCurveKind::Identity;
        assert_eq!(evaluate_curve(&curve, 0.1), 0.1);
    }
}
