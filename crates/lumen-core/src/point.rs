//! Custom curve control points.
//!
//! A custom curve is an ordered list of [`CurvePoint`]s sorted ascending by
//! `x`, with at least two points, the first at `x = 0` and the last at
//! `x = 1`. The editor in `lumen-transfer` keeps that shape; the evaluator
//! tolerates lists that violate it.
//!
//! The text form used by the configuration file and the command line is a
//! comma-separated `x:y` list:
//!
//! ```text
//! 0:0,0.25:0.4,1:1
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A control point of a user-defined curve, both coordinates in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Normalized input level
    pub x: f64,
    /// Normalized output level
    pub y: f64,
}

impl CurvePoint {
    /// Creates a new control point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for CurvePoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// The default two-point linear curve `[(0,0), (1,1)]`.
pub fn default_points() -> Vec<CurvePoint> {
    vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)]
}

/// Parses a comma-separated `x:y` list.
///
/// Only syntax is checked here. Range and ordering are the editor's job.
///
/// # Example
///
/// ```rust
/// use lumen_core::parse_points;
///
/// let pts = parse_points("0:0, 0.5:0.6, 1:1").unwrap();
/// assert_eq!(pts.len(), 3);
/// assert_eq!(pts[1].y, 0.6);
/// ```
pub fn parse_points(text: &str) -> Result<Vec<CurvePoint>> {
    let mut points = Vec::new();
    for item in text.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let (x, y) = item
            .split_once(':')
            .ok_or_else(|| Error::invalid_point(item, "expected 'x:y'"))?;
        let x: f64 = x
            .trim()
            .parse()
            .map_err(|_| Error::invalid_point(item, "x is not a number"))?;
        let y: f64 = y
            .trim()
            .parse()
            .map_err(|_| Error::invalid_point(item, "y is not a number"))?;
        points.push(CurvePoint::new(x, y));
    }

    if points.len() < 2 {
        return Err(Error::TooFewPoints { count: points.len() });
    }
    Ok(points)
}

/// Formats points in the `x:y,x:y` text form accepted by [`parse_points`].
pub fn format_points(points: &[CurvePoint]) -> String {
    points
        .iter()
        .map(|p| format!("{}:{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(",")
}
