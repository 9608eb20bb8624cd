//! Ramp synthesis from a tone curve.

use crate::enforce_monotonic;
use lumen_core::{CurvePoint, Envelope, GammaRamp, ToneCurve, ToneCurveKind, RAMP_LEN, RAMP_MAX};
use tracing::trace;

/// Builds 3x256 gamma ramps from tone curves.
///
/// Output is bit-exact for fixed inputs.
///
/// # Example
///
/// ```rust
/// use lumen_core::{Envelope, ToneCurveKind};
/// use lumen_ramp::RampBuilder;
///
/// let builder = RampBuilder::with_envelope(Envelope::new(2.0, 0.1));
/// let ramp = builder.build(ToneCurveKind::ShadowLift, 1.0, None);
/// assert!(ramp.is_mono());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RampBuilder {
    envelope: Envelope,
}

impl RampBuilder {
    /// Creates a builder with the default envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with a custom envelope.
    pub fn with_envelope(envelope: Envelope) -> Self {
        Self { envelope }
    }

    /// Envelope applied before quantization.
    #[inline]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Builds a ramp for the given curve parameters.
    pub fn build(&self, kind: ToneCurveKind, strength: f64, points: Option<&[CurvePoint]>) -> GammaRamp {
        trace!(%kind, strength, "build ramp");

        let mut channel = [0u16; RAMP_LEN];
        for (i, v) in channel.iter_mut().enumerate() {
            let x = i as f64 / (RAMP_LEN - 1) as f64;
            let y = lumen_transfer::evaluate(kind, strength, points, x);
            let y = if y.is_nan() { x } else { y.clamp(0.0, 1.0) };
            let y = self.envelope.clamp(x, y);
            *v = quantize(y);
        }

        let mut ramp = GammaRamp::from_channel(channel);
        enforce_monotonic(&mut ramp);
        ramp
    }

    /// Builds a ramp for a full curve selection.
    #[inline]
    pub fn build_curve(&self, curve: &ToneCurve) -> GammaRamp {
        self.build(curve.kind, curve.strength, curve.active_points())
    }
}

#[inline]
fn quantize(y: f64) -> u16 {
    (y * f64::from(RAMP_MAX)).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_kinds_with(points: &[CurvePoint]) -> Vec<GammaRamp> {
        let b = RampBuilder::new();
        let mut out = Vec::new();
        for kind in ToneCurveKind::all() {
            for strength in [0.05, 0.1, 0.5, 1.0, 2.2, 4.0, 9.0, 20.0] {
                out.push(b.build(*kind, strength, Some(points)));
            }
        }
        out
    }

    #[test]
    fn test_strictly_increasing_for_all_kinds() {
        let sets = [
            vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)],
            vec![CurvePoint::new(0.0, 1.0), CurvePoint::new(1.0, 0.0)],
            vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(0.3, 1.0), CurvePoint::new(1.0, 1.0)],
            vec![CurvePoint::new(0.0, 0.5), CurvePoint::new(1.0, 0.5)],
            vec![CurvePoint::new(0.5, 0.5)],
        ];
        for pts in &sets {
            for ramp in all_kinds_with(pts) {
                assert!(ramp.is_strictly_increasing());
                assert!(ramp.is_mono());
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let pts = [CurvePoint::new(0.0, 0.1), CurvePoint::new(0.4, 0.7), CurvePoint::new(1.0, 1.0)];
        let b = RampBuilder::new();
        assert_eq!(
            b.build(ToneCurveKind::Custom, 1.0, Some(&pts)),
            b.build(ToneCurveKind::Custom, 1.0, Some(&pts))
        );
    }

    #[test]
    fn test_power_strength_clamped() {
        let b = RampBuilder::new();
        assert_eq!(b.build(ToneCurveKind::PowerLaw, 0.05, None), b.build(ToneCurveKind::PowerLaw, 0.1, None));
        assert_eq!(b.build(ToneCurveKind::PowerLaw, 20.0, None), b.build(ToneCurveKind::PowerLaw, 9.0, None));
    }

    #[test]
    fn test_nan_envelope_builds_unbounded() {
        let unbounded = RampBuilder::with_envelope(Envelope::new(0.0, 1.0));
        for env in [Envelope::new(f64::NAN, 0.2), Envelope::new(3.0, f64::NAN)] {
            let ramp = RampBuilder::with_envelope(env).build(ToneCurveKind::PowerLaw, 9.0, None);
            assert_eq!(ramp, unbounded.build(ToneCurveKind::PowerLaw, 9.0, None));
            assert!(ramp.is_strictly_increasing());
        }
    }

    #[test]
    fn test_identity_curve_gives_identity_ramp() {
        let b = RampBuilder::new();
        assert_eq!(b.build(ToneCurveKind::Identity, 1.0, None), GammaRamp::identity());
        assert_eq!(b.build(ToneCurveKind::PowerLaw, 1.0, None), GammaRamp::identity());
    }

    #[test]
    fn test_envelope_respected() {
        let b = RampBuilder::new();
        let ramp = b.build(ToneCurveKind::PowerLaw, 9.0, None);
        for i in 1..RAMP_LEN {
            let x = i as f64 / 255.0;
            let max = quantize(b.envelope().max(x));
            assert!(ramp.red[i] <= max, "i={i} v={} max={max}", ramp.red[i]);
        }
        // strong lift is capped at the black offset
        assert_eq!(ramp.red[0], 0);
        assert!(ramp.red[1] > 13_000);
    }

    #[test]
    fn test_build_curve_matches_build() {
        let curve = ToneCurve::power(1.8);
        let b = RampBuilder::new();
        assert_eq!(b.build_curve(&curve), b.build(ToneCurveKind::PowerLaw, 1.8, None));
    }
}
