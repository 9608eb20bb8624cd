//! Linear ramps on every display.

use super::Context;
use anyhow::{bail, Result};
use lumen_core::ToneCurve;
use lumen_display::{DisplayBackend, GammaEngine};
use lumen_ramp::identity_ramp;

/// `lumen reset`
///
/// The ramps captured by this process may be a curve left by an earlier
/// one-shot run, so identity is written instead of restoring them.
pub fn run<D: DisplayBackend + 'static>(engine: &mut GammaEngine<D>, ctx: &mut Context) -> Result<()> {
    let outcome = engine.apply_ramp_all(&identity_ramp());
    if !outcome.any_ok() {
        bail!("{}", engine.status_text());
    }
    engine.keep_on_exit();
    engine.load_curve(ToneCurve::default());

    ctx.config.remember(&ToneCurve {
        points: ctx.config.points.clone(),
        ..ToneCurve::default()
    });
    ctx.save();

    if ctx.verbose > 0 {
        println!("Reset {} display(s) to linear", outcome.succeeded());
    }
    Ok(())
}
