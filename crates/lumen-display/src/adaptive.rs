//! Adaptive ramp application.
//!
//! Some drivers refuse ramps that stray too far from identity, either with an
//! error or by silently keeping (or clamping) the previous ramp. The applier
//! finds the largest fraction of the ideal ramp a monitor accepts:
//!
//! 1. try the ceiling `min(1, safe_scale * headroom)`
//! 2. if rejected, bisect `[0, ceiling]`
//! 3. each trial writes `blend(ideal, identity, scale)` and reads it back
//!
//! The last accepted scale is stored in the [`MonitorRecord`], so repeated
//! applications (slider drags, hotkey steps) usually finish in one write.
//!
//! # Example
//!
//! ```rust
//! use lumen_core::ToneCurveKind;
//! use lumen_display::backend::SimulatedDriver;
//! use lumen_display::{AdaptiveApplier, MonitorRegistry};
//! use lumen_ramp::RampBuilder;
//!
//! let driver = SimulatedDriver::new(1);
//! let mut registry = MonitorRegistry::enumerate(&driver);
//! let ideal = RampBuilder::new().build(ToneCurveKind::PowerLaw, 2.2, None);
//!
//! let applier = AdaptiveApplier::default();
//! assert!(applier.apply(&driver, registry.get_mut(0).unwrap(), &ideal));
//! ```

use crate::{GammaDriver, MonitorRecord};
use lumen_core::{GammaRamp, RAMP_MAX};
use lumen_ramp::{blend, enforce_monotonic, identity_ramp};
use tracing::{debug, trace, warn};

/// Tuning of the trial/verify/bisect protocol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveConfig {
    /// Bisection attempts after the ceiling trial.
    pub max_attempts: u32,
    /// Multiplier on the last safe scale when choosing the ceiling.
    pub headroom: f64,
    /// Per-entry read-back tolerance as a fraction of full range.
    pub match_tolerance: f64,
    /// Bisection stops once the bracket is narrower than this.
    pub convergence: f64,
    /// Safe scale stored after every trial was rejected.
    pub fallback_scale: f64,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            headroom: 1.05,
            match_tolerance: 0.008,
            convergence: 0.02,
            fallback_scale: 0.1,
        }
    }
}

impl AdaptiveConfig {
    /// Returns a copy with every field pulled into a usable range.
    ///
    /// Non-finite values fall back to the defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let pick = |v: f64, lo: f64, hi: f64, dflt: f64| {
            if v.is_finite() { v.clamp(lo, hi) } else { dflt }
        };
        Self {
            max_attempts: self.max_attempts.clamp(1, 32),
            headroom: pick(self.headroom, 1.0, 2.0, d.headroom),
            match_tolerance: pick(self.match_tolerance, 0.0, 0.5, d.match_tolerance),
            convergence: pick(self.convergence, 1e-4, 0.5, d.convergence),
            fallback_scale: pick(self.fallback_scale, 0.0, 1.0, d.fallback_scale),
        }
    }

    /// Read-back tolerance in ramp units.
    #[inline]
    pub fn tolerance_units(&self) -> u16 {
        (self.match_tolerance.clamp(0.0, 1.0) * f64::from(RAMP_MAX)).round() as u16
    }
}

/// Result of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trial {
    Accepted,
    HardReject,
    SilentReject,
}

/// Applies ramps with trial writes, read-back verification and bisection.
///
/// Holds no state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdaptiveApplier {
    config: AdaptiveConfig,
}

impl AdaptiveApplier {
    /// Creates an applier with the given tuning.
    pub fn new(config: AdaptiveConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    /// Active tuning.
    #[inline]
    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    /// Applies as much of `ideal` as the driver accepts.
    ///
    /// Returns `true` if some non-zero-length trial was accepted and left
    /// resident. On total rejection the identity ramp is written, the
    /// record's safe scale drops to the fallback and `false` is returned.
    pub fn apply<D: GammaDriver + ?Sized>(&self, driver: &D, monitor: &mut MonitorRecord, ideal: &GammaRamp) -> bool {
        let cfg = &self.config;
        let identity = identity_ramp();
        let tolerance = cfg.tolerance_units();

        let initial = (monitor.safe_scale() * cfg.headroom).min(1.0);
        let mut resident = driver.read_ramp(monitor.id()).ok();
        trace!(device = monitor.name(), initial, "adaptive apply");

        if self.try_scale(driver, monitor, ideal, &identity, initial, tolerance, &mut resident) == Trial::Accepted {
            monitor.set_safe_scale(initial);
            debug!(device = monitor.name(), scale = initial, "ceiling accepted");
            return true;
        }

        let mut lo = 0.0_f64;
        let mut hi = initial;
        let mut best: Option<f64> = None;
        let mut last = initial;

        for attempt in 0..cfg.max_attempts {
            let trial = (lo + hi) / 2.0;
            last = trial;
            let result = self.try_scale(driver, monitor, ideal, &identity, trial, tolerance, &mut resident);
            trace!(attempt, trial, ?result, "bisect");

            if result == Trial::Accepted {
                lo = trial;
                best = Some(trial);
                monitor.set_safe_scale(trial);
                if hi - lo < cfg.convergence {
                    break;
                }
            } else {
                hi = trial;
            }
        }

        match best {
            Some(scale) => {
                if last != scale {
                    let ramp = candidate(ideal, &identity, scale);
                    if let Err(e) = driver.write_ramp(monitor.id(), &ramp) {
                        warn!(device = monitor.name(), error = %e, "rewrite of best ramp failed");
                    }
                }
                debug!(device = monitor.name(), scale, "converged");
                true
            }
            None => {
                if let Err(e) = driver.write_ramp(monitor.id(), &identity) {
                    warn!(device = monitor.name(), error = %e, "identity fallback failed");
                }
                monitor.set_safe_scale(cfg.fallback_scale);
                warn!(device = monitor.name(), "driver rejected every trial");
                false
            }
        }
    }

    /// Writes one candidate and verifies it by read-back.
    ///
    /// Accepted only if the read-back is within tolerance of the candidate
    /// and strictly closer to it than to the ramp resident before the write.
    /// An unchanged read-back of a near-identity candidate is a rejection.
    /// `resident` is updated to the read-back.
    #[allow(clippy::too_many_arguments)]
    fn try_scale<D: GammaDriver + ?Sized>(
        &self,
        driver: &D,
        monitor: &MonitorRecord,
        ideal: &GammaRamp,
        identity: &GammaRamp,
        scale: f64,
        tolerance: u16,
        resident: &mut Option<GammaRamp>,
    ) -> Trial {
        let ramp = candidate(ideal, identity, scale);
        if driver.write_ramp(monitor.id(), &ramp).is_err() {
            return Trial::HardReject;
        }
        let Ok(back) = driver.read_ramp(monitor.id()) else {
            return Trial::SilentReject;
        };

        let to_candidate = back.max_difference(&ramp);
        let moved = resident
            .as_ref()
            .is_none_or(|prev| to_candidate == 0 || to_candidate < back.max_difference(prev));
        *resident = Some(back);

        if moved && to_candidate <= tolerance {
            Trial::Accepted
        } else {
            Trial::SilentReject
        }
    }
}

fn candidate(ideal: &GammaRamp, identity: &GammaRamp, scale: f64) -> GammaRamp {
    let mut ramp = blend(ideal, identity, scale);
    enforce_monotonic(&mut ramp);
    ramp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AcceptancePolicy, RejectionMode, SimulatedDriver};
    use crate::MonitorRegistry;
    use approx::assert_abs_diff_eq;
    use lumen_core::ToneCurveKind;
    use lumen_ramp::RampBuilder;

    fn ideal() -> GammaRamp {
        RampBuilder::new().build(ToneCurveKind::PowerLaw, 2.2, None)
    }

    fn limited(mode: RejectionMode, max_scale: f64) -> SimulatedDriver {
        SimulatedDriver::new(1)
            .with_policy(AcceptancePolicy::MaxScale {
                reference: ideal(),
                max_scale,
            })
            .with_rejection(mode)
    }

    #[test]
    fn test_accept_all_single_write() {
        let driver = SimulatedDriver::new(1);
        let mut reg = MonitorRegistry::enumerate(&driver);
        let rec = reg.get_mut(0).unwrap();

        assert!(AdaptiveApplier::default().apply(&driver, rec, &ideal()));
        assert_eq!(driver.write_count(0), 1);
        assert_eq!(driver.stored(0), Some(ideal()));
        assert_eq!(rec.safe_scale(), 1.0);
    }

    #[test]
    fn test_converges_on_limit() {
        for mode in [RejectionMode::HardFail, RejectionMode::Ignore] {
            let driver = limited(mode, 0.4);
            let mut reg = MonitorRegistry::enumerate(&driver);
            let rec = reg.get_mut(0).unwrap();
            let cfg = AdaptiveConfig::default();

            assert!(AdaptiveApplier::new(cfg).apply(&driver, rec, &ideal()), "{mode:?}");
            let s = rec.safe_scale();
            assert!(s <= 0.4 && 0.4 - s <= cfg.convergence, "{mode:?} s={s}");
            assert!(driver.write_count(0) <= 1 + cfg.max_attempts as usize + 1);

            let resident = driver.stored(0).unwrap();
            assert_eq!(resident, candidate(&ideal(), &identity_ramp(), s));
        }
    }

    #[test]
    fn test_clamping_driver_accepted_within_tolerance() {
        let driver = limited(RejectionMode::Clamp, 0.4);
        let mut reg = MonitorRegistry::enumerate(&driver);
        let rec = reg.get_mut(0).unwrap();
        let cfg = AdaptiveConfig::default();

        assert!(AdaptiveApplier::new(cfg).apply(&driver, rec, &ideal()));
        let s = rec.safe_scale();
        assert!(s > 0.35 && s < 0.45, "s={s}");

        let resident = driver.stored(0).unwrap();
        let wanted = candidate(&ideal(), &identity_ramp(), s);
        assert!(resident.matches_within(&wanted, cfg.tolerance_units()));
    }

    #[test]
    fn test_headroom_regrows_scale() {
        let driver = SimulatedDriver::new(1);
        let mut reg = MonitorRegistry::enumerate(&driver);
        let rec = reg.get_mut(0).unwrap();
        rec.set_safe_scale(0.5);

        assert!(AdaptiveApplier::default().apply(&driver, rec, &ideal()));
        assert_eq!(driver.write_count(0), 1);
        assert_abs_diff_eq!(rec.safe_scale(), 0.525, epsilon = 1e-12);
    }

    #[test]
    fn test_total_rejection_falls_back_to_identity() {
        for mode in [RejectionMode::HardFail, RejectionMode::Ignore] {
            let driver = SimulatedDriver::new(1)
                .with_policy(AcceptancePolicy::IdentityOnly)
                .with_rejection(mode);
            let mut reg = MonitorRegistry::enumerate(&driver);
            let rec = reg.get_mut(0).unwrap();
            let cfg = AdaptiveConfig {
                fallback_scale: 0.25,
                ..Default::default()
            };

            assert!(!AdaptiveApplier::new(cfg).apply(&driver, rec, &ideal()), "{mode:?}");
            assert_abs_diff_eq!(rec.safe_scale(), 0.25);
            assert_eq!(driver.stored(0), Some(GammaRamp::identity()));
        }
    }

    #[test]
    fn test_ignored_writes_rejected_at_default_tolerance() {
        // candidates near identity fit the default tolerance of an unchanged read-back
        let driver = SimulatedDriver::new(1)
            .with_policy(AcceptancePolicy::IdentityOnly)
            .with_rejection(RejectionMode::Ignore);
        let mut reg = MonitorRegistry::enumerate(&driver);
        let rec = reg.get_mut(0).unwrap();
        let applier = AdaptiveApplier::default();

        assert!(!applier.apply(&driver, rec, &ideal()));
        assert_abs_diff_eq!(rec.safe_scale(), applier.config().fallback_scale);
        assert_eq!(driver.stored(0), Some(GammaRamp::identity()));
    }

    #[test]
    fn test_resident_candidate_accepted() {
        let driver = SimulatedDriver::new(1).with_initial_ramp(ideal());
        let mut reg = MonitorRegistry::enumerate(&driver);
        let rec = reg.get_mut(0).unwrap();

        assert!(AdaptiveApplier::default().apply(&driver, rec, &ideal()));
        assert_eq!(driver.write_count(0), 1);
        assert_eq!(rec.safe_scale(), 1.0);
    }

    #[test]
    fn test_read_failure_counts_as_rejection() {
        let driver = SimulatedDriver::new(1);
        driver.set_read_failure(0, true);
        let mut reg = MonitorRegistry::enumerate(&driver);
        let rec = reg.get_mut(0).unwrap();

        assert!(!AdaptiveApplier::default().apply(&driver, rec, &ideal()));
        assert_eq!(driver.stored(0), Some(GammaRamp::identity()));
    }

    #[test]
    fn test_sanitized() {
        let cfg = AdaptiveConfig {
            max_attempts: 0,
            headroom: f64::NAN,
            match_tolerance: -1.0,
            convergence: 3.0,
            fallback_scale: 7.0,
        }
        .sanitized();
        assert_eq!(cfg.max_attempts, 1);
        assert_eq!(cfg.headroom, 1.05);
        assert_eq!(cfg.match_tolerance, 0.0);
        assert_eq!(cfg.convergence, 0.5);
        assert_eq!(cfg.fallback_scale, 1.0);
        assert_eq!(AdaptiveConfig::default().tolerance_units(), 524);
    }
}
