//! Strength estimation from a live ramp.

use lumen_core::{GammaRamp, RAMP_MAX};
use lumen_transfer::clamp_strength;

const SAMPLE_INDEX: usize = 128;

/// Estimates the power-law strength a ramp corresponds to.
///
/// Samples the red channel at entry 128 and solves `out = in^(1/s)` for `s`,
/// clamped to [0.1, 9.0]. Returns 1.0 when the sample is pinned to black or
/// white. Only meaningful for power-law ramps; other shapes give a rough
/// midtone equivalent.
///
/// # Example
///
/// ```rust
/// use lumen_core::ToneCurveKind;
/// use lumen_ramp::{estimate_strength, RampBuilder};
///
/// let ramp = RampBuilder::new().build(ToneCurveKind::PowerLaw, 2.2, None);
/// assert!((estimate_strength(&ramp) - 2.2).abs() < 0.01);
/// ```
pub fn estimate_strength(ramp: &GammaRamp) -> f64 {
    let input = SAMPLE_INDEX as f64 / 255.0;
    let output = f64::from(ramp.red[SAMPLE_INDEX]) / f64::from(RAMP_MAX);

    if output <= 0.0 || output >= 1.0 {
        return 1.0;
    }
    clamp_strength(input.ln() / output.ln())
}
