//! Tone curve selection.
//!
//! [`ToneCurveKind`] picks the curve shape; [`ToneCurve`] bundles the shape
//! with the parameters every shape may need, so switching between kinds keeps
//! the user's strength and custom points.

use crate::point::{default_points, CurvePoint};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default curve strength (no change for PowerLaw).
pub const DEFAULT_STRENGTH: f64 = 1.0;

/// Tone curve shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToneCurveKind {
    /// Pass-through, `y = x`.
    Identity,
    /// Power law `y = x^(1/strength)`.
    #[default]
    PowerLaw,
    /// sRGB-like shadow lift.
    ShadowLift,
    /// Rec.709-like gentle contrast.
    SoftContrast,
    /// Fixed 2.6 power curve.
    Cinema,
    /// Piecewise-linear user curve.
    Custom,
}

impl ToneCurveKind {
    /// Stable name used in configuration files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::PowerLaw => "power",
            Self::ShadowLift => "shadow-lift",
            Self::SoftContrast => "soft-contrast",
            Self::Cinema => "cinema",
            Self::Custom => "custom",
        }
    }

    /// Display label for status output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Identity => "Neutral",
            Self::PowerLaw => "Simple Gamma",
            Self::ShadowLift => "Shadow Lift",
            Self::SoftContrast => "Soft Contrast",
            Self::Cinema => "Cinema",
            Self::Custom => "Custom",
        }
    }

    /// All available kinds.
    pub const fn all() -> &'static [Self] {
        &[
            Self::Identity,
            Self::PowerLaw,
            Self::ShadowLift,
            Self::SoftContrast,
            Self::Cinema,
            Self::Custom,
        ]
    }

    /// Returns `true` if the shape reads the `strength` parameter.
    #[inline]
    pub const fn uses_strength(self) -> bool {
        matches!(self, Self::PowerLaw)
    }
}

impl fmt::Display for ToneCurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToneCurveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "identity" | "linear" | "neutral" => Ok(Self::Identity),
            "power" | "powerlaw" | "power-law" | "gamma" => Ok(Self::PowerLaw),
            "shadow-lift" | "shadowlift" => Ok(Self::ShadowLift),
            "soft-contrast" | "softcontrast" => Ok(Self::SoftContrast),
            "cinema" => Ok(Self::Cinema),
            "custom" => Ok(Self::Custom),
            _ => Err(Error::unknown_curve(s)),
        }
    }
}

/// Complete curve selection: shape, strength and custom points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneCurve {
    /// Selected shape
    pub kind: ToneCurveKind,
    /// Strength, read by [`ToneCurveKind::PowerLaw`] only
    pub strength: f64,
    /// Control points, read by [`ToneCurveKind::Custom`] only
    pub points: Vec<CurvePoint>,
}

impl ToneCurve {
    /// Creates a curve selection with the default custom points.
    pub fn new(kind: ToneCurveKind, strength: f64) -> Self {
        Self {
            kind,
            strength,
            points: default_points(),
        }
    }

    /// Power-law selection with the given strength.
    pub fn power(strength: f64) -> Self {
        Self::new(ToneCurveKind::PowerLaw, strength)
    }

    /// Custom selection over the given points.
    pub fn custom(points: Vec<CurvePoint>) -> Self {
        Self {
            kind: ToneCurveKind::Custom,
            strength: DEFAULT_STRENGTH,
            points,
        }
    }

    /// Points to hand to the evaluator, `None` unless the kind is Custom.
    pub fn active_points(&self) -> Option<&[CurvePoint]> {
        match self.kind {
            ToneCurveKind::Custom => Some(&self.points),
            _ => None,
        }
    }
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::new(ToneCurveKind::PowerLaw, DEFAULT_STRENGTH)
    }
}
