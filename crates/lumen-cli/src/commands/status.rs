//! Display and gamma report.

use super::Context;
use crate::StatusArgs;
use anyhow::Result;
use lumen_display::{DisplayBackend, GammaEngine, MonitorSnapshot};
use serde::Serialize;

#[derive(Serialize)]
struct StatusReport<'a> {
    monitors: Vec<MonitorSnapshot>,
    primary: Option<usize>,
    estimated_gamma: f64,
    saved_curve: &'a str,
    saved_strength: f64,
    status: &'a str,
}

/// `lumen status`
pub fn run<D: DisplayBackend + 'static>(args: StatusArgs, engine: &mut GammaEngine<D>, ctx: &Context) -> Result<()> {
    // read only, nothing to restore
    engine.keep_on_exit();

    let report = StatusReport {
        monitors: engine.monitors(),
        primary: engine.primary_index(),
        estimated_gamma: engine.read_gamma(),
        saved_curve: ctx.config.curve.name(),
        saved_strength: ctx.config.last_value,
        status: engine.status_text(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Displays: {}", report.monitors.len());
    for m in &report.monitors {
        println!(
            "  [{}] {}{}{}",
            m.index,
            m.name,
            if m.is_primary { " (primary)" } else { "" },
            if m.has_original { "" } else { " (no capture)" },
        );
    }
    println!("Estimated gamma: {:.2}", report.estimated_gamma);
    println!("Saved curve:     {} {:.2}", report.saved_curve, report.saved_strength);
    if ctx.verbose > 0 {
        println!("Status:          {}", report.status);
    }
    Ok(())
}
