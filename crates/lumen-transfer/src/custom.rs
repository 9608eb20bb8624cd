//! Piecewise-linear custom curves.
//!
//! [`interpolate`] evaluates a control point list; [`CurveEditor`] owns a list
//! and keeps it in the shape the rest of the system expects:
//!
//! - sorted ascending by `x`
//! - at least two points
//! - first point at `x = 0`, last at `x = 1`
//! - both coordinates in [0, 1]

use lumen_core::{default_points, CurvePoint, Envelope};

/// Default pick radius for [`CurveEditor::remove_nearest`].
pub const DEFAULT_REMOVE_RADIUS: f64 = 0.05;

/// Linear interpolation over `points` at `x`.
///
/// Before the first point returns the first `y`, after the last point the
/// last `y`. A zero-width segment yields its left `y`. Callers must pass at
/// least two points.
///
/// # Example
///
/// ```rust
/// use lumen_core::CurvePoint;
/// use lumen_transfer::custom::interpolate;
///
/// let pts = [CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 0.5)];
/// assert_eq!(interpolate(&pts, 0.5), 0.25);
/// ```
pub fn interpolate(points: &[CurvePoint], x: f64) -> f64 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return x;
    };

    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }

    for seg in points.windows(2) {
        let (p1, p2) = (seg[0], seg[1]);
        if x >= p1.x && x <= p2.x {
            let t = if p2.x > p1.x { (x - p1.x) / (p2.x - p1.x) } else { 0.0 };
            return p1.y + t * (p2.y - p1.y);
        }
    }

    // unsorted input with no bracketing segment
    x
}

/// Normalizes a point list into a valid custom curve.
///
/// Drops non-finite points, clamps coordinates to [0, 1], sorts by `x` and
/// pins the endpoints to `x = 0` and `x = 1`. Fewer than two usable points
/// yields the default linear curve.
pub fn normalize(points: Vec<CurvePoint>) -> Vec<CurvePoint> {
    let mut points: Vec<CurvePoint> = points
        .into_iter()
        .filter(CurvePoint::is_finite)
        .map(|p| CurvePoint::new(p.x.clamp(0.0, 1.0), p.y.clamp(0.0, 1.0)))
        .collect();

    if points.len() < 2 {
        return default_points();
    }

    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    if let Some(first) = points.first_mut() {
        first.x = 0.0;
    }
    if let Some(last) = points.last_mut() {
        last.x = 1.0;
    }
    points
}

/// Owns a custom curve and enforces its invariants on every edit.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveEditor {
    points: Vec<CurvePoint>,
}

impl CurveEditor {
    /// Creates an editor from arbitrary points, normalizing them.
    pub fn new(points: Vec<CurvePoint>) -> Self {
        Self {
            points: normalize(points),
        }
    }

    /// Current points.
    #[inline]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Consumes the editor, returning its points.
    #[inline]
    pub fn into_points(self) -> Vec<CurvePoint> {
        self.points
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`, an editor holds at least two points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inserts a point, keeping `y` inside `envelope`. Returns its index.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lumen_core::Envelope;
    /// use lumen_transfer::CurveEditor;
    ///
    /// let mut ed = CurveEditor::default();
    /// let idx = ed.insert(0.1, 0.9, &Envelope::default());
    /// assert_eq!(idx, 1);
    /// assert!((ed.points()[1].y - 0.5).abs() < 1e-12);
    /// ```
    pub fn insert(&mut self, x: f64, y: f64, envelope: &Envelope) -> usize {
        let x = if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.5 };
        let y = if y.is_finite() { envelope.clamp(x, y) } else { x };

        // stay strictly between the pinned endpoints
        let idx = self
            .points
            .partition_point(|p| p.x <= x)
            .clamp(1, self.points.len() - 1);
        self.points.insert(idx, CurvePoint::new(x, y));
        idx
    }

    /// Removes the interior point nearest to `(x, y)` within `radius`.
    ///
    /// Endpoints are never removed.
    pub fn remove_nearest(&mut self, x: f64, y: f64, radius: f64) -> Option<CurvePoint> {
        if self.points.len() <= 2 {
            return None;
        }
        let last = self.points.len() - 1;
        let (idx, _) = self
            .points
            .iter()
            .enumerate()
            .filter(|(i, _)| *i > 0 && *i < last)
            .map(|(i, p)| (i, ((p.x - x).powi(2) + (p.y - y).powi(2)).sqrt()))
            .filter(|(_, dist)| *dist < radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        Some(self.points.remove(idx))
    }

    /// Moves the point at `index`.
    ///
    /// Endpoints keep their `x`; interior points stay between their
    /// neighbours. Returns `false` if `index` is out of range.
    pub fn move_point(&mut self, index: usize, x: f64, y: f64) -> bool {
        let last = self.points.len() - 1;
        if index > last || !x.is_finite() || !y.is_finite() {
            return false;
        }

        let new_x = if index == 0 {
            0.0
        } else if index == last {
            1.0
        } else {
            x.clamp(self.points[index - 1].x, self.points[index + 1].x)
        };
        self.points[index] = CurvePoint::new(new_x, y.clamp(0.0, 1.0));
        true
    }
}

impl Default for CurveEditor {
    fn default() -> Self {
        Self {
            points: default_points(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pts(raw: &[(f64, f64)]) -> Vec<CurvePoint> {
        raw.iter().copied().map(CurvePoint::from).collect()
    }

    #[test]
    fn test_interpolate_segments() {
        let p = pts(&[(0.0, 0.0), (0.5, 0.8), (1.0, 1.0)]);
        assert_abs_diff_eq!(interpolate(&p, 0.25), 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(interpolate(&p, 0.75), 0.9, epsilon = 1e-12);
        assert_eq!(interpolate(&p, 0.5), 0.8);
    }

    #[test]
    fn test_interpolate_zero_width_segment() {
        let p = pts(&[(0.0, 0.0), (0.5, 0.2), (0.5, 0.7), (1.0, 1.0)]);
        assert_eq!(interpolate(&p, 0.5), 0.2);
    }

    #[test]
    fn test_normalize_sorts_and_pins() {
        let n = normalize(pts(&[(0.9, 0.8), (0.1, 0.1), (0.5, 1.4)]));
        assert_eq!(n, pts(&[(0.0, 0.1), (0.5, 1.0), (1.0, 0.8)]));
    }

    #[test]
    fn test_normalize_falls_back() {
        assert_eq!(normalize(pts(&[(0.5, 0.5)])), default_points());
        assert_eq!(normalize(pts(&[(f64::NAN, 0.5), (0.5, 0.5)])), default_points());
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut ed = CurveEditor::default();
        ed.insert(0.7, 0.6, &Envelope::default());
        ed.insert(0.3, 0.4, &Envelope::default());
        let xs: Vec<f64> = ed.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.3, 0.7, 1.0]);
    }

    #[test]
    fn test_insert_at_endpoint_stays_interior() {
        let mut ed = CurveEditor::default();
        let idx = ed.insert(1.0, 0.5, &Envelope::default());
        assert_eq!(idx, 1);
        assert_eq!(ed.points().last().map(|p| p.y), Some(1.0));
    }

    #[test]
    fn test_remove_nearest_spares_endpoints() {
        let mut ed = CurveEditor::new(pts(&[(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)]));
        assert!(ed.remove_nearest(0.0, 0.0, 0.1).is_none());
        assert!(ed.remove_nearest(0.6, 0.6, DEFAULT_REMOVE_RADIUS).is_none());
        assert_eq!(ed.remove_nearest(0.52, 0.49, DEFAULT_REMOVE_RADIUS), Some(CurvePoint::new(0.5, 0.5)));
        assert_eq!(ed.len(), 2);
        assert!(ed.remove_nearest(0.5, 0.5, 1.0).is_none());
    }

    #[test]
    fn test_move_point_constraints() {
        let mut ed = CurveEditor::new(pts(&[(0.0, 0.0), (0.4, 0.4), (0.6, 0.6), (1.0, 1.0)]));
        assert!(ed.move_point(0, 0.3, 0.2));
        assert_eq!(ed.points()[0], CurvePoint::new(0.0, 0.2));
        assert!(ed.move_point(1, 0.9, 1.5));
        assert_eq!(ed.points()[1], CurvePoint::new(0.6, 1.0));
        assert!(!ed.move_point(9, 0.5, 0.5));
    }
}
