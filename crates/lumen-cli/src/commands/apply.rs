//! One-shot application: apply, save, leave the ramp applied and exit.

use super::{curve_from_args, Context};
use crate::ApplyArgs;
use anyhow::{bail, Context as _, Result};
use lumen_display::{ApplyOutcome, DisplayBackend, GammaEngine};
use lumen_ramp::cube;
use tracing::info;

/// `lumen <value>`
pub fn run_value<D: DisplayBackend + 'static>(value: f64, engine: &mut GammaEngine<D>, ctx: &mut Context) -> Result<()> {
    let outcome = engine.set_gamma(value);
    finish(outcome, engine, ctx)
}

/// `lumen apply`
pub fn run<D: DisplayBackend + 'static>(args: ApplyArgs, engine: &mut GammaEngine<D>, ctx: &mut Context) -> Result<()> {
    if let Some(path) = &args.lut {
        let ramp = cube::read_1d(path).with_context(|| format!("Failed to load LUT: {}", path.display()))?;
        if ctx.verbose > 0 {
            println!("Applying {}", path.display());
        }
        let outcome = engine.apply_ramp_all(&ramp);
        // an imported LUT is not a curve, keep the saved selection
        return report(&outcome, engine, ctx.verbose);
    }

    let curve = curve_from_args(&args.curve, &ctx.config)?;
    if ctx.verbose > 0 {
        println!("Applying {} {:.2}", curve.kind.label(), curve.strength);
    }
    engine.load_curve(curve);
    let outcome = engine.apply_all();
    finish(outcome, engine, ctx)
}

fn finish<D: DisplayBackend + 'static>(outcome: ApplyOutcome, engine: &mut GammaEngine<D>, ctx: &mut Context) -> Result<()> {
    if outcome.any_ok() {
        ctx.config.remember(engine.curve());
        ctx.save();
    }
    report(&outcome, engine, ctx.verbose)
}

fn report<D: DisplayBackend + 'static>(outcome: &ApplyOutcome, engine: &mut GammaEngine<D>, verbose: u8) -> Result<()> {
    if !outcome.any_ok() {
        bail!("{}", engine.status_text());
    }
    engine.keep_on_exit();
    info!(ok = outcome.succeeded(), of = outcome.len(), "applied");
    if verbose > 0 || !outcome.all_ok() {
        println!("{}", engine.status_text());
    }
    Ok(())
}
