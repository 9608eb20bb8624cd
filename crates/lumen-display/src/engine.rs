//! UI-facing gamma engine.
//!
//! [`GammaEngine`] ties the pieces together: it enumerates and captures on
//! construction, turns the current [`ToneCurve`] into a ramp, pushes it to
//! every monitor through the [`AdaptiveApplier`], and restores the captured
//! originals on reset, disable, shutdown and drop.
//!
//! Every method is synchronous and reports success through its return value
//! and [`status_text`](GammaEngine::status_text). Driver errors never escape.

use crate::capture::{self, RestorePoint};
use crate::{AdaptiveApplier, AdaptiveConfig, DisplayBackend, MonitorRegistry, MonitorSnapshot};
use lumen_core::{CurvePoint, Envelope, GammaRamp, ToneCurve, ToneCurveKind, DEFAULT_STRENGTH};
use lumen_ramp::{estimate_strength, identity_ramp, RampBuilder};
use lumen_transfer::{clamp_strength, CurveEditor};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Strength change per `adjust_gamma` step (hotkeys, `up`/`down`).
pub const GAMMA_STEP: f64 = 0.1;

const NO_DISPLAYS: &str = "Warning: no displays found";
const NO_CAPTURE: &str = "Warning: Could not capture original gamma";

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    /// Soft output envelope for ramp synthesis
    pub envelope: Envelope,
    /// Adaptive application tuning
    pub adaptive: AdaptiveConfig,
}

/// Per-monitor result of an engine operation, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplyOutcome {
    /// `true` where the monitor succeeded
    pub per_monitor: Vec<bool>,
}

impl ApplyOutcome {
    /// Every monitor succeeded. `false` when there are no monitors.
    pub fn all_ok(&self) -> bool {
        !self.per_monitor.is_empty() && self.per_monitor.iter().all(|&ok| ok)
    }

    /// At least one monitor succeeded.
    pub fn any_ok(&self) -> bool {
        self.per_monitor.iter().any(|&ok| ok)
    }

    /// Number of monitors that succeeded.
    pub fn succeeded(&self) -> usize {
        self.per_monitor.iter().filter(|&&ok| ok).count()
    }

    /// Number of monitors covered.
    pub fn len(&self) -> usize {
        self.per_monitor.len()
    }

    /// Returns `true` when no monitor was involved.
    pub fn is_empty(&self) -> bool {
        self.per_monitor.is_empty()
    }
}

/// Gamma engine over a display backend.
///
/// Restores the captured originals when dropped unless
/// [`keep_on_exit`](Self::keep_on_exit) was called.
pub struct GammaEngine<D: DisplayBackend + 'static> {
    driver: Arc<D>,
    registry: MonitorRegistry,
    builder: RampBuilder,
    applier: AdaptiveApplier,
    restore_point: Arc<RestorePoint>,
    curve: ToneCurve,
    enabled: bool,
    keep_on_exit: bool,
    shut_down: bool,
    status: String,
}

impl<D: DisplayBackend + 'static> GammaEngine<D> {
    /// Enumerates monitors and captures their current ramps.
    pub fn new(driver: Arc<D>, config: EngineConfig) -> Self {
        let mut registry = MonitorRegistry::enumerate(driver.as_ref());
        let captured = capture::capture_all(&mut registry, driver.as_ref());

        let status = if registry.is_empty() {
            NO_DISPLAYS
        } else if !captured {
            NO_CAPTURE
        } else {
            "Ready"
        };
        info!(monitors = registry.len(), captured, "gamma engine started");

        let restore_point = Arc::new(RestorePoint::new(driver.clone(), &registry));
        Self {
            driver,
            registry,
            builder: RampBuilder::with_envelope(config.envelope),
            applier: AdaptiveApplier::new(config.adaptive),
            restore_point,
            curve: ToneCurve::default(),
            enabled: true,
            keep_on_exit: false,
            shut_down: false,
            status: status.to_string(),
        }
    }

    // === Curve selection ===

    /// Current curve selection.
    #[inline]
    pub fn curve(&self) -> &ToneCurve {
        &self.curve
    }

    /// Selects a curve kind and strength, then applies it.
    ///
    /// The custom points are kept.
    pub fn set_curve(&mut self, kind: ToneCurveKind, strength: f64) -> ApplyOutcome {
        self.curve.kind = kind;
        self.curve.strength = clamp_strength(strength);
        self.apply_all()
    }

    /// Replaces the custom points, switches to the custom kind and applies.
    ///
    /// Points are normalized: sorted, clamped, endpoints pinned.
    pub fn set_custom_points(&mut self, points: Vec<CurvePoint>) -> ApplyOutcome {
        self.curve.points = CurveEditor::new(points).into_points();
        self.curve.kind = ToneCurveKind::Custom;
        self.apply_all()
    }

    /// Replaces the whole selection without applying it.
    pub fn load_curve(&mut self, curve: ToneCurve) {
        self.curve = ToneCurve {
            kind: curve.kind,
            strength: clamp_strength(curve.strength),
            points: CurveEditor::new(curve.points).into_points(),
        };
    }

    /// Ramp for the current selection.
    pub fn build_ramp(&self) -> GammaRamp {
        self.builder.build_curve(&self.curve)
    }

    // === Application ===

    /// Applies the current curve to every monitor.
    pub fn apply_all(&mut self) -> ApplyOutcome {
        let ramp = self.build_ramp();
        self.apply_ramp_all(&ramp)
    }

    /// Applies an externally built ramp (e.g. an imported LUT) to every monitor.
    pub fn apply_ramp_all(&mut self, ramp: &GammaRamp) -> ApplyOutcome {
        if self.registry.is_empty() {
            self.status = NO_DISPLAYS.to_string();
            return ApplyOutcome::default();
        }
        self.enabled = true;

        let driver = self.driver.as_ref();
        let per_monitor = self
            .registry
            .iter_mut()
            .map(|record| self.applier.apply(driver, record, ramp))
            .collect();
        let outcome = ApplyOutcome { per_monitor };
        debug!(ok = outcome.succeeded(), of = outcome.len(), "applied ramp");
        self.status = applied_status(&outcome);
        outcome
    }

    /// Applies the current curve to one monitor.
    pub fn apply_monitor(&mut self, index: usize) -> bool {
        let ramp = self.build_ramp();
        let Some(record) = self.registry.get_mut(index) else {
            return false;
        };
        self.applier.apply(self.driver.as_ref(), record, &ramp)
    }

    // === Restoration ===

    /// Writes every captured original back.
    ///
    /// Monitors without a capture are reported as failed and left alone.
    pub fn restore_all(&mut self) -> ApplyOutcome {
        if self.registry.is_empty() {
            self.status = NO_DISPLAYS.to_string();
            return ApplyOutcome::default();
        }
        let driver = self.driver.as_ref();
        let per_monitor = self
            .registry
            .iter()
            .map(|record| capture::restore(record, driver))
            .collect();
        let outcome = ApplyOutcome { per_monitor };
        if outcome.all_ok() {
            self.status = "Reset to original".to_string();
        } else {
            warn!(ok = outcome.succeeded(), of = outcome.len(), "restore incomplete");
        }
        outcome
    }

    /// Writes one captured original back.
    pub fn restore_monitor(&mut self, index: usize) -> bool {
        self.registry
            .get(index)
            .is_some_and(|record| capture::restore(record, self.driver.as_ref()))
    }

    /// Captures the current ramps again and refreshes the restore point.
    pub fn recapture(&mut self) -> bool {
        let ok = capture::capture_all(&mut self.registry, self.driver.as_ref());
        self.restore_point.refresh(&self.registry);
        if !ok {
            self.status = NO_CAPTURE.to_string();
        }
        ok
    }

    // === Monitors ===

    /// Number of monitors.
    #[inline]
    pub fn monitor_count(&self) -> usize {
        self.registry.len()
    }

    /// Snapshot of monitor `index`.
    pub fn monitor(&self, index: usize) -> Option<MonitorSnapshot> {
        self.registry.snapshot(index)
    }

    /// Snapshots of every monitor.
    pub fn monitors(&self) -> Vec<MonitorSnapshot> {
        self.registry.snapshots()
    }

    /// Index of the primary monitor.
    #[inline]
    pub fn primary_index(&self) -> Option<usize> {
        self.registry.primary_index()
    }

    // === Gamma shortcuts ===

    /// Applies a power-law curve of strength `value`, clamped to [0.1, 9.0].
    pub fn set_gamma(&mut self, value: f64) -> ApplyOutcome {
        self.set_curve(ToneCurveKind::PowerLaw, value)
    }

    /// Changes the power-law strength by `delta`.
    pub fn adjust_gamma(&mut self, delta: f64) -> ApplyOutcome {
        let next = self.curve.strength + delta;
        self.set_gamma(next)
    }

    /// Returns to strength 1.0 and the original ramps.
    ///
    /// When a restore fails the identity ramp is applied instead.
    pub fn reset_gamma(&mut self) -> ApplyOutcome {
        self.curve.kind = ToneCurveKind::PowerLaw;
        self.curve.strength = DEFAULT_STRENGTH;
        self.enabled = true;

        let restored = self.restore_all();
        if restored.is_empty() || restored.all_ok() {
            return restored;
        }

        let outcome = self.apply_ramp_all(&identity_ramp());
        if outcome.any_ok() {
            self.status = "Reset to default (1.0)".to_string();
        }
        outcome
    }

    /// Switches between the current curve and the original ramps.
    pub fn toggle_gamma(&mut self) -> ApplyOutcome {
        if self.enabled {
            let outcome = self.restore_all();
            self.enabled = false;
            if !outcome.is_empty() {
                self.status = "Gamma disabled".to_string();
            }
            outcome
        } else {
            let outcome = self.apply_all();
            if outcome.any_ok() {
                self.status = "Gamma enabled".to_string();
            }
            outcome
        }
    }

    /// `false` after [`toggle_gamma`](Self::toggle_gamma) disabled the curve.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Estimates the power-law strength loaded on the primary monitor.
    ///
    /// Returns 1.0 when there is no monitor or the read fails.
    pub fn read_gamma(&self) -> f64 {
        let Some(record) = self.primary_index().and_then(|i| self.registry.get(i)) else {
            return DEFAULT_STRENGTH;
        };
        match self.driver.read_ramp(record.id()) {
            Ok(ramp) => estimate_strength(&ramp),
            Err(e) => {
                debug!(device = record.name(), error = %e, "read_gamma failed");
                DEFAULT_STRENGTH
            }
        }
    }

    // === Lifecycle ===

    /// Last status line.
    #[inline]
    pub fn status_text(&self) -> &str {
        &self.status
    }

    /// Shared restore point for last-chance restoration.
    pub fn restore_point(&self) -> Arc<RestorePoint> {
        Arc::clone(&self.restore_point)
    }

    /// Leaves the current ramps applied on shutdown and drop.
    pub fn keep_on_exit(&mut self) {
        self.keep_on_exit = true;
    }

    /// Restores the originals (unless kept) and marks the engine shut down.
    ///
    /// Only the first call does anything.
    pub fn shutdown(&mut self) -> bool {
        if self.shut_down {
            return true;
        }
        self.shut_down = true;
        if self.keep_on_exit {
            debug!("leaving ramps applied");
            return true;
        }
        capture::restore_all(&self.registry, self.driver.as_ref())
    }

    /// Display backend.
    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }
}

impl<D: DisplayBackend + 'static> Drop for GammaEngine<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<D: DisplayBackend + 'static> std::fmt::Debug for GammaEngine<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GammaEngine")
            .field("monitors", &self.registry.len())
            .field("curve", &self.curve)
            .field("enabled", &self.enabled)
            .field("status", &self.status)
            .finish()
    }
}

fn applied_status(outcome: &ApplyOutcome) -> String {
    let n = outcome.len();
    match outcome.succeeded() {
        0 => "Failed to apply gamma".to_string(),
        k if k == n && n == 1 => "Applied to 1 display".to_string(),
        k if k == n => format!("Applied to {n} displays"),
        k => format!("Applied to {k} of {n} displays"),
    }
}
