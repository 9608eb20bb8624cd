//! Persisted settings.
//!
//! Stored as INI text at `<config_dir>/lumen/lumen.ini`, read and written
//! with `rust-ini`. Loading is lenient:
//! unknown sections and keys and malformed lines are skipped, numeric values
//! are clamped, and anything unusable falls back to its default.

use anyhow::{Context, Result};
use ini::Ini;
use lumen_core::{default_points, format_points, parse_points, CurvePoint, Envelope, ToneCurve, ToneCurveKind};
use lumen_display::{AdaptiveConfig, EngineConfig};
use lumen_transfer::{clamp_strength, CurveEditor};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Keyboard modifiers of a hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Control
    pub ctrl: bool,
    /// Alt
    pub alt: bool,
    /// Shift
    pub shift: bool,
    /// Windows / Super
    pub win: bool,
}

/// A global hotkey such as `Ctrl+Alt+Up`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    /// Modifier keys
    pub modifiers: Modifiers,
    /// Key name, e.g. `Up`, `R`, `F5`
    pub key: String,
}

impl HotkeyBinding {
    fn ctrl_alt(key: &str) -> Self {
        Self {
            modifiers: Modifiers {
                ctrl: true,
                alt: true,
                ..Default::default()
            },
            key: key.to_string(),
        }
    }
}

impl FromStr for HotkeyBinding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut modifiers = Modifiers::default();
        let mut key: Option<String> = None;

        for part in s.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(format!("empty component in '{s}'"));
            }
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "win" | "super" | "meta" => modifiers.win = true,
                _ if key.is_none() => key = Some(canonical_key(part)),
                _ => return Err(format!("more than one key in '{s}'")),
            }
        }

        let key = key.ok_or_else(|| format!("no key in '{s}'"))?;
        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (on, name) in [(m.ctrl, "Ctrl"), (m.alt, "Alt"), (m.shift, "Shift"), (m.win, "Win")] {
            if on {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key)
    }
}

fn canonical_key(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Global hotkey bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkeys {
    /// Increase strength by one step
    pub increase: HotkeyBinding,
    /// Decrease strength by one step
    pub decrease: HotkeyBinding,
    /// Reset to original
    pub reset: HotkeyBinding,
    /// Toggle the curve on and off
    pub toggle: HotkeyBinding,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            increase: HotkeyBinding::ctrl_alt("Up"),
            decrease: HotkeyBinding::ctrl_alt("Down"),
            reset: HotkeyBinding::ctrl_alt("R"),
            toggle: HotkeyBinding::ctrl_alt("T"),
        }
    }
}

/// All persisted settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Last applied strength
    pub last_value: f64,
    /// Last selected curve kind
    pub curve: ToneCurveKind,
    /// Snap strengths near common values
    pub snap_to_ticks: bool,
    /// Custom curve points
    pub points: Vec<CurvePoint>,
    /// Hotkey bindings
    pub hotkeys: Hotkeys,
    /// Close button hides to the tray instead of exiting
    pub minimize_to_tray_on_close: bool,
    /// Adaptive application tuning
    pub adaptive: AdaptiveConfig,
    /// Ramp synthesis envelope
    pub envelope: Envelope,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            last_value: 1.0,
            curve: ToneCurveKind::PowerLaw,
            snap_to_ticks: true,
            points: default_points(),
            hotkeys: Hotkeys::default(),
            minimize_to_tray_on_close: true,
            adaptive: AdaptiveConfig::default(),
            envelope: Envelope::default(),
        }
    }
}

impl Config {
    /// Platform default location, `None` if there is no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lumen").join("lumen.ini"))
    }

    /// Loads settings, writing defaults first if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            debug!(path = %path.display(), "wrote default config");
            return Ok(config);
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    /// Saves settings, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        self.to_document()
            .write_to_file(path)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Parses INI text. Never fails.
    ///
    /// Section and key names are case-insensitive.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        let ini = match Ini::load_from_str(&well_formed_lines(text)) {
            Ok(ini) => ini,
            Err(e) => {
                debug!(error = %e, "unreadable config, using defaults");
                return config;
            }
        };

        for (section, props) in ini.iter() {
            let section = section.unwrap_or_default().trim().to_ascii_lowercase();
            for (key, value) in props.iter() {
                let key = key.trim().to_ascii_lowercase();
                let value = value.trim();
                if !config.set(&section, &key, value) {
                    debug!(section = %section, key = %key, value, "ignoring config entry");
                }
            }
        }
        config
    }

    /// Applies one entry. Returns `false` if it was not recognized or usable.
    fn set(&mut self, section: &str, key: &str, value: &str) -> bool {
        match (section, key) {
            ("gamma", "lastvalue") => match value.parse::<f64>() {
                Ok(v) => {
                    self.last_value = clamp_strength(v);
                    true
                }
                Err(_) => false,
            },
            ("gamma", "curve") => value.parse().map(|k| self.curve = k).is_ok(),
            ("gamma", "snaptoticks") => parse_bool(value).map(|b| self.snap_to_ticks = b).is_some(),
            ("curve", "points") => {
                self.points = match parse_points(value) {
                    Ok(points) => CurveEditor::new(points).into_points(),
                    Err(_) => default_points(),
                };
                true
            }
            ("hotkeys", "increase") => set_hotkey(&mut self.hotkeys.increase, value),
            ("hotkeys", "decrease") => set_hotkey(&mut self.hotkeys.decrease, value),
            ("hotkeys", "reset") => set_hotkey(&mut self.hotkeys.reset, value),
            ("hotkeys", "toggle") => set_hotkey(&mut self.hotkeys.toggle, value),
            ("window", "minimizetotrayonclose") => {
                parse_bool(value).map(|b| self.minimize_to_tray_on_close = b).is_some()
            }
            ("adaptive", "maxattempts") => value.parse::<u32>().map(|v| self.adaptive.max_attempts = v).is_ok(),
            ("adaptive", "headroom") => set_f64(&mut self.adaptive.headroom, value),
            ("adaptive", "matchtolerance") => set_f64(&mut self.adaptive.match_tolerance, value),
            ("adaptive", "convergence") => set_f64(&mut self.adaptive.convergence, value),
            ("adaptive", "fallbackscale") => set_f64(&mut self.adaptive.fallback_scale, value),
            ("envelope", "slope") => set_positive(&mut self.envelope.slope, value),
            ("envelope", "offset") => set_positive(&mut self.envelope.offset, value),
            _ => false,
        }
    }

    /// Settings as an INI document.
    pub fn to_document(&self) -> Ini {
        let mut ini = Ini::new();
        let a = &self.adaptive;
        ini.with_section(Some("Gamma"))
            .set("LastValue", self.last_value.to_string())
            .set("Curve", self.curve.to_string())
            .set("SnapToTicks", self.snap_to_ticks.to_string());
        ini.with_section(Some("Curve"))
            .set("Points", format_points(&self.points));
        ini.with_section(Some("Hotkeys"))
            .set("Increase", self.hotkeys.increase.to_string())
            .set("Decrease", self.hotkeys.decrease.to_string())
            .set("Reset", self.hotkeys.reset.to_string())
            .set("Toggle", self.hotkeys.toggle.to_string());
        ini.with_section(Some("Window"))
            .set("MinimizeToTrayOnClose", self.minimize_to_tray_on_close.to_string());
        ini.with_section(Some("Adaptive"))
            .set("MaxAttempts", a.max_attempts.to_string())
            .set("Headroom", a.headroom.to_string())
            .set("MatchTolerance", a.match_tolerance.to_string())
            .set("Convergence", a.convergence.to_string())
            .set("FallbackScale", a.fallback_scale.to_string());
        ini.with_section(Some("Envelope"))
            .set("Slope", self.envelope.slope.to_string())
            .set("Offset", self.envelope.offset.to_string());
        ini
    }

    /// Formats settings as INI text.
    pub fn to_ini(&self) -> String {
        let mut buf = Vec::new();
        // in-memory writes do not fail
        let _ = self.to_document().write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Curve selection described by these settings.
    pub fn tone_curve(&self) -> ToneCurve {
        ToneCurve {
            kind: self.curve,
            strength: self.last_value,
            points: self.points.clone(),
        }
    }

    /// Records a curve selection.
    pub fn remember(&mut self, curve: &ToneCurve) {
        self.curve = curve.kind;
        self.last_value = clamp_strength(curve.strength);
        self.points = curve.points.clone();
    }

    /// Engine tuning from these settings.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            envelope: self.envelope,
            adaptive: self.adaptive.sanitized(),
        }
    }
}

/// Keeps section headers, `key=value` entries, comments and blank lines.
fn well_formed_lines(text: &str) -> String {
    text.lines()
        .enumerate()
        .filter(|(lineno, raw)| {
            let line = raw.trim();
            let keep = line.is_empty()
                || line.starts_with(';')
                || line.starts_with('#')
                || (line.starts_with('[') && line.ends_with(']'))
                || line.split_once('=').is_some_and(|(key, _)| !key.trim().is_empty());
            if !keep {
                debug!(line = lineno + 1, "skipping malformed config line");
            }
            keep
        })
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn set_f64(slot: &mut f64, value: &str) -> bool {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => {
            *slot = v;
            true
        }
        _ => false,
    }
}

fn set_positive(slot: &mut f64, value: &str) -> bool {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => {
            *slot = v;
            true
        }
        _ => false,
    }
}

fn set_hotkey(slot: &mut HotkeyBinding, value: &str) -> bool {
    match value.parse() {
        Ok(binding) => {
            *slot = binding;
            true
        }
        Err(e) => {
            debug!(error = %e, "invalid hotkey, keeping default");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_roundtrip() {
        let config = Config::default();
        assert_eq!(Config::parse(&config.to_ini()), config);
    }

    #[test]
    fn test_parse_sections() {
        let text = "\
[Gamma]
LastValue=2.2
Curve=cinema
SnapToTicks=false

[Curve]
Points=0:0.1, 0.5:0.6, 1:1

[Hotkeys]
Toggle=ctrl+shift+g

[Adaptive]
MaxAttempts=9
Headroom=1.2

[Envelope]
Slope=2.5
";
        let c = Config::parse(text);
        assert_abs_diff_eq!(c.last_value, 2.2);
        assert_eq!(c.curve, ToneCurveKind::Cinema);
        assert!(!c.snap_to_ticks);
        assert_eq!(c.points.len(), 3);
        assert_eq!(c.hotkeys.toggle.to_string(), "Ctrl+Shift+G");
        assert_eq!(c.hotkeys.increase, Hotkeys::default().increase);
        assert_eq!(c.adaptive.max_attempts, 9);
        assert_abs_diff_eq!(c.adaptive.headroom, 1.2);
        assert_abs_diff_eq!(c.envelope.slope, 2.5);
        assert_abs_diff_eq!(c.envelope.offset, 0.2);
    }

    #[test]
    fn test_malformed_input_falls_back() {
        let text = "\
garbage line
[Gamma]
LastValue=abc
Curve=sepia
[Curve]
Points=nonsense
[Hotkeys]
Reset=Ctrl+Alt
Increase=Hyper+Up+Down
[Unknown]
Foo=bar
";
        let c = Config::parse(text);
        let d = Config::default();
        assert_eq!(c.last_value, d.last_value);
        assert_eq!(c.curve, d.curve);
        assert_eq!(c.points, default_points());
        assert_eq!(c.hotkeys, d.hotkeys);
    }

    #[test]
    fn test_malformed_lines_do_not_hide_neighbours() {
        let text = "\
[Gamma]
this line has no separator
LastValue=2.5
=orphan value
[Broken
SnapToTicks=no
";
        let c = Config::parse(text);
        assert_eq!(c.last_value, 2.5);
        assert!(!c.snap_to_ticks);
    }

    #[test]
    fn test_case_insensitive_names_and_crlf() {
        let c = Config::parse("[GAMMA]\r\nlastvalue=1.8\r\n[window]\r\nMINIMIZETOTRAYONCLOSE=off\r\n");
        assert_eq!(c.last_value, 1.8);
        assert!(!c.minimize_to_tray_on_close);
    }

    #[test]
    fn test_document_sections() {
        let mut c = Config::default();
        c.last_value = 2.2;
        let ini = Ini::load_from_str(&c.to_ini()).unwrap();
        assert_eq!(ini.section(Some("Gamma")).and_then(|s| s.get("LastValue")), Some("2.2"));
        assert_eq!(ini.section(Some("Curve")).and_then(|s| s.get("Points")), Some("0:0,1:1"));
        assert_eq!(ini.section(Some("Hotkeys")).and_then(|s| s.get("Toggle")), Some("Ctrl+Alt+T"));
    }

    #[test]
    fn test_values_clamped() {
        let c = Config::parse("[Gamma]\nLastValue=50\n[Adaptive]\nFallbackScale=4\n");
        assert_eq!(c.last_value, 9.0);
        assert_eq!(c.engine_config().adaptive.fallback_scale, 1.0);
    }

    #[test]
    fn test_hotkey_parse() {
        let hk: HotkeyBinding = "alt+CTRL+up".parse().unwrap();
        assert!(hk.modifiers.ctrl && hk.modifiers.alt);
        assert_eq!(hk.to_string(), "Ctrl+Alt+Up");
        assert!("Ctrl+Alt".parse::<HotkeyBinding>().is_err());
        assert!("Ctrl++R".parse::<HotkeyBinding>().is_err());
        assert_eq!("Win+f5".parse::<HotkeyBinding>().unwrap().to_string(), "Win+F5");
    }

    #[test]
    fn test_load_missing_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("lumen.ini");
        let c = Config::load(&path).unwrap();
        assert_eq!(c, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lumen.ini");
        let mut c = Config::default();
        c.remember(&ToneCurve::custom(vec![
            CurvePoint::new(0.0, 0.0),
            CurvePoint::new(0.3, 0.5),
            CurvePoint::new(1.0, 1.0),
        ]));
        c.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), c);
    }
}
