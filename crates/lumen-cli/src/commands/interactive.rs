//! Interactive mode: one command per line on stdin.
//!
//! The session drives the engine directly, the same calls a tray icon or
//! hotkey handler would make. Settings are saved on exit.

use super::Context;
use anyhow::{anyhow, bail, Context as _, Result};
use lumen_core::{parse_points, ToneCurveKind};
use lumen_display::{ApplyOutcome, DisplayBackend, GammaEngine, GAMMA_STEP};
use lumen_ramp::cube;
use lumen_transfer::{CurveEditor, DEFAULT_REMOVE_RADIUS};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::debug;

const HELP: &str = "\
Commands:
  gamma <v>              Apply power curve strength v (0.1 - 9.0)
  up | down              Step strength by 0.1
  curve <kind> [s]       identity, power, shadow-lift, soft-contrast, cinema, custom
  points x:y,x:y,...     Set custom curve points
  add <x> <y>            Add a custom curve point
  remove <x> <y>         Remove the custom point nearest (x, y)
  toggle                 Switch between curve and original gamma
  reset                  Back to the original gamma
  apply                  Re-apply the current curve
  status                 Current curve and status
  monitors               List displays
  export <path>          Write the current ramp as .cube
  save                   Save settings
  help                   This text
  quit | exit            Restore original gamma and exit";

/// Whether the loop continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Leave interactive mode
    Quit,
}

/// Interactive session over an engine.
pub struct Session<'a, D: DisplayBackend + 'static, W: Write> {
    engine: &'a mut GammaEngine<D>,
    ctx: &'a mut Context,
    out: W,
}

impl<'a, D: DisplayBackend + 'static, W: Write> Session<'a, D, W> {
    /// Creates a session, restoring the saved curve into the engine.
    pub fn new(engine: &'a mut GammaEngine<D>, ctx: &'a mut Context, out: W) -> Self {
        engine.load_curve(ctx.config.tone_curve());
        Self { engine, ctx, out }
    }

    /// Applies the saved curve unless it is neutral.
    pub fn start(&mut self) -> Result<()> {
        writeln!(self.out, "{} display(s). {}", self.engine.monitor_count(), self.engine.status_text())?;
        let hk = &self.ctx.config.hotkeys;
        writeln!(
            self.out,
            "Hotkeys: {} / {} step, {} reset, {} toggle",
            hk.increase, hk.decrease, hk.reset, hk.toggle
        )?;

        let curve = self.engine.curve();
        let neutral = match curve.kind {
            ToneCurveKind::Identity => true,
            ToneCurveKind::PowerLaw => curve.strength == 1.0,
            _ => false,
        };
        if !neutral {
            let outcome = self.engine.apply_all();
            self.report(&outcome)?;
        }
        writeln!(self.out, "Type 'help' for commands.")?;
        Ok(())
    }

    /// Executes one command line.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(Flow::Continue);
        };
        let rest: Vec<&str> = words.collect();
        debug!(cmd, ?rest, "interactive command");

        match cmd.to_ascii_lowercase().as_str() {
            "gamma" | "g" => {
                let v = self.ctx.snap(number(&rest, 0, "gamma <value>")?);
                let outcome = self.engine.set_gamma(v);
                self.report(&outcome)?;
            }
            "up" | "+" => {
                let outcome = self.engine.adjust_gamma(GAMMA_STEP);
                self.report(&outcome)?;
            }
            "down" | "-" => {
                let outcome = self.engine.adjust_gamma(-GAMMA_STEP);
                self.report(&outcome)?;
            }
            "curve" | "c" => {
                let kind: ToneCurveKind = rest
                    .first()
                    .ok_or_else(|| anyhow!("usage: curve <kind> [strength]"))?
                    .parse()?;
                let strength = match rest.get(1) {
                    Some(_) => self.ctx.snap(number(&rest, 1, "curve <kind> [strength]")?),
                    None => self.engine.curve().strength,
                };
                let outcome = self.engine.set_curve(kind, strength);
                self.report(&outcome)?;
            }
            "points" => {
                let text = rest.join("");
                let points = parse_points(&text)?;
                let outcome = self.engine.set_custom_points(points);
                self.report(&outcome)?;
            }
            "add" => {
                let x = number(&rest, 0, "add <x> <y>")?;
                let y = number(&rest, 1, "add <x> <y>")?;
                let mut editor = CurveEditor::new(self.engine.curve().points.clone());
                editor.insert(x, y, &self.ctx.config.envelope);
                let outcome = self.engine.set_custom_points(editor.into_points());
                self.report(&outcome)?;
            }
            "remove" | "rm" => {
                let x = number(&rest, 0, "remove <x> <y>")?;
                let y = number(&rest, 1, "remove <x> <y>")?;
                let mut editor = CurveEditor::new(self.engine.curve().points.clone());
                if editor.remove_nearest(x, y, DEFAULT_REMOVE_RADIUS).is_none() {
                    writeln!(self.out, "No removable point near ({x}, {y})")?;
                    return Ok(Flow::Continue);
                }
                let outcome = self.engine.set_custom_points(editor.into_points());
                self.report(&outcome)?;
            }
            "toggle" | "t" => {
                let outcome = self.engine.toggle_gamma();
                self.report(&outcome)?;
            }
            "reset" | "r" => {
                let outcome = self.engine.reset_gamma();
                self.report(&outcome)?;
            }
            "apply" => {
                let outcome = self.engine.apply_all();
                self.report(&outcome)?;
            }
            "status" => self.print_status()?,
            "monitors" | "m" => self.print_monitors()?,
            "export" => {
                let path = rest.first().ok_or_else(|| anyhow!("usage: export <path>"))?;
                self.export(Path::new(path))?;
            }
            "save" => {
                self.remember();
                self.ctx.save();
                writeln!(self.out, "Settings saved")?;
            }
            "help" | "?" | "h" => writeln!(self.out, "{HELP}")?,
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            other => bail!("Unknown command: {other} (type 'help')"),
        }
        Ok(Flow::Continue)
    }

    /// Records the current curve in the settings.
    pub fn remember(&mut self) {
        self.ctx.config.remember(self.engine.curve());
    }

    fn report(&mut self, outcome: &ApplyOutcome) -> io::Result<()> {
        writeln!(self.out, "{}", self.engine.status_text())?;
        for (i, ok) in outcome.per_monitor.iter().enumerate() {
            if !ok {
                writeln!(self.out, "  display {i}: not applied")?;
            }
        }
        Ok(())
    }

    fn print_status(&mut self) -> io::Result<()> {
        let curve = self.engine.curve();
        let enabled = if self.engine.is_enabled() { "on" } else { "off" };
        match curve.kind {
            ToneCurveKind::PowerLaw => writeln!(self.out, "Curve: {} {:.2} ({enabled})", curve.kind.label(), curve.strength)?,
            ToneCurveKind::Custom => writeln!(
                self.out,
                "Curve: {} [{}] ({enabled})",
                curve.kind.label(),
                lumen_core::format_points(&curve.points)
            )?,
            kind => writeln!(self.out, "Curve: {} ({enabled})", kind.label())?,
        }
        writeln!(self.out, "Estimated gamma: {:.2}", self.engine.read_gamma())?;
        writeln!(self.out, "{}", self.engine.status_text())
    }

    fn print_monitors(&mut self) -> io::Result<()> {
        for m in self.engine.monitors() {
            writeln!(
                self.out,
                "[{}] {}{} scale {:.3}{}",
                m.index,
                m.name,
                if m.is_primary { " (primary)" } else { "" },
                m.safe_scale,
                if m.has_original { "" } else { " (no capture)" },
            )?;
        }
        Ok(())
    }

    fn export(&mut self, path: &Path) -> Result<()> {
        let ramp = self.engine.build_ramp();
        let title = self.engine.curve().kind.to_string();
        cube::write_1d(path, &ramp, Some(&title))
            .with_context(|| format!("Failed to write: {}", path.display()))?;
        writeln!(self.out, "Wrote {}", path.display())?;
        Ok(())
    }
}

fn number(args: &[&str], index: usize, usage: &str) -> Result<f64> {
    let text = args.get(index).ok_or_else(|| anyhow!("usage: {usage}"))?;
    let v: f64 = text.parse().map_err(|_| anyhow!("'{text}' is not a number"))?;
    if !v.is_finite() {
        bail!("'{text}' is not a number");
    }
    Ok(v)
}

/// `lumen` with no arguments.
pub fn run<D: DisplayBackend + 'static>(engine: &mut GammaEngine<D>, ctx: &mut Context) -> Result<()> {
    let stdout = io::stdout();
    let mut session = Session::new(engine, ctx, stdout.lock());
    session.start()?;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match session.execute(line.trim()) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("{e:#}"),
        }
    }

    session.remember();
    session.ctx.save();
    Ok(())
}
