//! CLI command implementations

pub mod apply;
pub mod export;
pub mod interactive;
pub mod reset;
pub mod status;

use crate::config::Config;
use crate::CurveArgs;
use anyhow::{Context as _, Result};
use lumen_core::{parse_points, ToneCurve, ToneCurveKind};
use lumen_transfer::{clamp_strength, snap_strength, CurveEditor, DEFAULT_TICKS, SNAP_THRESHOLD};
use std::path::PathBuf;
use tracing::warn;

/// State shared by every command that drives a display.
pub struct Context {
    /// Loaded settings
    pub config: Config,
    /// Where settings are saved, `None` if there is no config directory
    pub config_path: Option<PathBuf>,
    /// `-v` count
    pub verbose: u8,
}

impl Context {
    /// Saves settings. Failures are logged, not fatal.
    pub fn save(&self) {
        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        if let Err(e) = self.config.save(path) {
            warn!(error = %e, "settings not saved");
        }
    }

    /// Applies the configured tick snapping to a strength.
    pub fn snap(&self, strength: f64) -> f64 {
        if self.config.snap_to_ticks {
            snap_strength(strength, &DEFAULT_TICKS, SNAP_THRESHOLD)
        } else {
            strength
        }
    }
}

/// Resolves curve arguments against the saved settings.
///
/// Points imply the custom kind; a missing strength falls back to the last
/// saved value.
pub fn curve_from_args(args: &CurveArgs, config: &Config) -> Result<ToneCurve> {
    let mut curve = config.tone_curve();
    curve.kind = args.curve;
    if let Some(s) = args.strength {
        curve.strength = clamp_strength(s);
    }
    if let Some(text) = &args.points {
        let points = parse_points(text).with_context(|| format!("Invalid points: {text}"))?;
        curve.points = CurveEditor::new(points).into_points();
        curve.kind = ToneCurveKind::Custom;
    }
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(curve: ToneCurveKind, strength: Option<f64>, points: Option<&str>) -> CurveArgs {
        CurveArgs {
            curve,
            strength,
            points: points.map(str::to_string),
        }
    }

    #[test]
    fn test_points_imply_custom() {
        let c = curve_from_args(&args(ToneCurveKind::PowerLaw, None, Some("0:0,0.5:0.7,1:1")), &Config::default()).unwrap();
        assert_eq!(c.kind, ToneCurveKind::Custom);
        assert_eq!(c.points.len(), 3);
    }

    #[test]
    fn test_strength_falls_back_to_saved() {
        let config = Config {
            last_value: 1.8,
            ..Default::default()
        };
        let c = curve_from_args(&args(ToneCurveKind::PowerLaw, None, None), &config).unwrap();
        assert_eq!(c.strength, 1.8);
        let c = curve_from_args(&args(ToneCurveKind::PowerLaw, Some(2.5), None), &config).unwrap();
        assert_eq!(c.strength, 2.5);
    }

    #[test]
    fn test_bad_points_rejected() {
        assert!(curve_from_args(&args(ToneCurveKind::Custom, None, Some("0:0")), &Config::default()).is_err());
    }

    #[test]
    fn test_snap() {
        let mut ctx = Context {
            config: Config::default(),
            config_path: None,
            verbose: 0,
        };
        assert_eq!(ctx.snap(2.23), 2.2);
        ctx.config.snap_to_ticks = false;
        assert_eq!(ctx.snap(2.23), 2.23);
    }
}
