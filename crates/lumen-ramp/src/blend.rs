//! Partial application of a ramp.
//!
//! The adaptive applier never needs anything between two ramps other than a
//! straight line: `scale = 0` is "no change", `scale = 1` is the full target.

use lumen_core::{GammaRamp, RAMP_MAX};

/// The linear baseline ramp (`i * 257`).
#[inline]
pub fn identity_ramp() -> GammaRamp {
    GammaRamp::identity()
}

/// Blends `identity + scale * (ramp - identity)` per entry.
///
/// `scale` is clamped to [0, 1]; results are rounded and clamped to the
/// 16-bit range. Blending can create flat runs near identity, so callers
/// that send the result to a driver re-run
/// [`enforce_monotonic`](crate::enforce_monotonic).
///
/// # Example
///
/// ```rust
/// use lumen_core::GammaRamp;
/// use lumen_ramp::{blend, identity_ramp};
///
/// let target = GammaRamp::from_channel([65535; 256]);
/// let half = blend(&target, &identity_ramp(), 0.5);
/// assert_eq!(half.red[0], 32768);
/// ```
pub fn blend(ramp: &GammaRamp, identity: &GammaRamp, scale: f64) -> GammaRamp {
    let scale = if scale.is_nan() { 0.0 } else { scale.clamp(0.0, 1.0) };
    let mut out = GammaRamp::zeroed();

    for ((dst, src), base) in out
        .channels_mut()
        .into_iter()
        .zip(ramp.channels())
        .zip(identity.channels())
    {
        for ((d, &s), &b) in dst.iter_mut().zip(src.iter()).zip(base.iter()) {
            let v = f64::from(b) + scale * (f64::from(s) - f64::from(b));
            *d = v.round().clamp(0.0, f64::from(RAMP_MAX)) as u16;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::ToneCurveKind;

    use crate::RampBuilder;

    #[test]
    fn test_endpoints_exact() {
        let target = RampBuilder::new().build(ToneCurveKind::Cinema, 1.0, None);
        let id = identity_ramp();
        assert_eq!(blend(&target, &id, 0.0), id);
        assert_eq!(blend(&target, &id, 1.0), target);
    }

    #[test]
    fn test_scale_clamped() {
        let target = RampBuilder::new().build(ToneCurveKind::ShadowLift, 1.0, None);
        let id = identity_ramp();
        assert_eq!(blend(&target, &id, 3.0), target);
        assert_eq!(blend(&target, &id, -1.0), id);
        assert_eq!(blend(&target, &id, f64::NAN), id);
    }

    #[test]
    fn test_midpoint_between() {
        let target = RampBuilder::new().build(ToneCurveKind::PowerLaw, 2.2, None);
        let id = identity_ramp();
        let half = blend(&target, &id, 0.5);
        for i in 0..256 {
            let lo = target.red[i].min(id.red[i]);
            let hi = target.red[i].max(id.red[i]);
            assert!(half.red[i] >= lo && half.red[i] <= hi);
        }
    }
}
