//! Ramp export to .cube

use super::curve_from_args;
use crate::config::Config;
use crate::ExportArgs;
use anyhow::{Context, Result};
use lumen_ramp::{cube, RampBuilder};

/// `lumen export`
pub fn run(args: ExportArgs, config: &Config, verbose: u8) -> Result<()> {
    let curve = curve_from_args(&args.curve, config)?;
    let ramp = RampBuilder::with_envelope(config.envelope).build_curve(&curve);

    let title = args.title.unwrap_or_else(|| {
        if curve.kind.uses_strength() {
            format!("{} {}", curve.kind, curve.strength)
        } else {
            curve.kind.to_string()
        }
    });
    cube::write_1d(&args.output, &ramp, Some(&title))
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;

    if verbose > 0 {
        println!("Wrote {}", args.output.display());
    }
    Ok(())
}
