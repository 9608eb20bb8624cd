//! lumen - display gamma control
//!
//! Applies tone curves to every connected display through hardware gamma
//! ramps and restores the original ramps on exit, reset or crash.

use anyhow::{bail, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use lumen_core::ToneCurveKind;
use lumen_display::backend::{self, SimulatedDriver};
use lumen_display::{DisplayBackend, GammaEngine};
use lumen_transfer::{MAX_STRENGTH, MIN_STRENGTH};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

mod commands;
mod config;
mod guard;
mod logging;

use config::Config;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(author, version, about = "Display gamma control")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "
Adjusts display gamma through hardware gamma ramps. The original ramps are
captured at startup and restored on reset, on exit and after a crash.

Examples:
  lumen                                 # Interactive mode
  lumen 2.2                             # Apply gamma 2.2 and exit
  lumen apply -c shadow-lift            # Apply a curve and exit
  lumen apply -c custom -p 0:0,0.3:0.5,1:1
  lumen apply --lut warm.cube           # Push a 256-entry 1D LUT
  lumen reset                           # Linear ramps on every display
  lumen status --json
  lumen export -c cinema -o cinema.cube
  lumen --simulate 2 2.2                # Dry run against two fake displays
")]
struct Cli {
    /// Gamma strength to apply before exiting (0.1 - 9.0)
    #[arg(value_parser = parse_strength)]
    value: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Config file (default: <config dir>/lumen/lumen.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Use N simulated displays instead of the hardware
    #[arg(long, global = true, value_name = "N")]
    simulate: Option<usize>,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a curve and leave it applied
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Write linear ramps to every display
    Reset,

    /// Show displays and the active gamma
    #[command(visible_alias = "s")]
    Status(StatusArgs),

    /// Write a curve's ramp to a .cube 1D LUT
    #[command(visible_alias = "x")]
    Export(ExportArgs),
}

/// Curve selection shared by `apply` and `export`.
#[derive(Args, Clone)]
struct CurveArgs {
    /// Curve: identity, power, shadow-lift, soft-contrast, cinema, custom
    #[arg(short, long, default_value = "power")]
    curve: ToneCurveKind,

    /// Strength for the power curve (default: last saved value)
    #[arg(short, long, value_parser = parse_strength)]
    strength: Option<f64>,

    /// Custom points as x:y,x:y,... (implies --curve custom)
    #[arg(short, long)]
    points: Option<String>,
}

/// Arguments for the `apply` command.
#[derive(Args)]
struct ApplyArgs {
    #[command(flatten)]
    curve: CurveArgs,

    /// Apply a 256-entry .cube 1D LUT instead of a curve
    #[arg(long, conflicts_with_all = ["points", "strength"])]
    lut: Option<PathBuf>,
}

/// Arguments for the `status` command.
#[derive(Args)]
struct StatusArgs {
    /// Print JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the `export` command.
#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    curve: CurveArgs,

    /// Output .cube file
    #[arg(short, long)]
    output: PathBuf,

    /// TITLE line (default: curve name)
    #[arg(short, long)]
    title: Option<String>,
}

fn parse_strength(s: &str) -> std::result::Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !(MIN_STRENGTH..=MAX_STRENGTH).contains(&v) {
        return Err(format!("gamma must be between {MIN_STRENGTH} and {MAX_STRENGTH}"));
    }
    Ok(v)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    let config_path = cli.config.clone().or_else(Config::default_path);
    let config = match config_path.as_deref() {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "using default settings");
            Config::default()
        }),
        None => Config::default(),
    };
    debug!(path = ?config_path, "settings loaded");

    // export only needs the ramp builder
    let command = match cli.command {
        Some(Commands::Export(args)) => return commands::export::run(args, &config, cli.verbose),
        other => other,
    };

    let ctx = commands::Context {
        config,
        config_path,
        verbose: cli.verbose,
    };

    match cli.simulate {
        Some(n) => run(Arc::new(SimulatedDriver::new(n)), cli.value, command, ctx),
        None => {
            if !backend::has_native() {
                warn!("no gamma backend on this platform, use --simulate");
            }
            run(Arc::new(backend::native()), cli.value, command, ctx)
        }
    }
}

fn run<D: DisplayBackend + 'static>(
    driver: Arc<D>,
    value: Option<f64>,
    command: Option<Commands>,
    mut ctx: commands::Context,
) -> Result<()> {
    guard::install();
    let mut engine = GammaEngine::new(driver, ctx.config.engine_config());
    guard::arm(&engine.restore_point());

    let result = match (value, command) {
        (Some(v), _) => commands::apply::run_value(v, &mut engine, &mut ctx),
        (None, Some(Commands::Apply(args))) => commands::apply::run(args, &mut engine, &mut ctx),
        (None, Some(Commands::Reset)) => commands::reset::run(&mut engine, &mut ctx),
        (None, Some(Commands::Status(args))) => commands::status::run(args, &mut engine, &ctx),
        (None, Some(Commands::Export(_))) => bail!("export does not use a display"),
        (None, None) => commands::interactive::run(&mut engine, &mut ctx),
    };

    engine.shutdown();
    guard::disarm();
    result
}
