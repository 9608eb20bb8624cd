//! Integration tests for lumen crates.
//!
//! End-to-end runs of the gamma engine against simulated drivers: curve to
//! ramp, adaptive application, capture and restore, LUT import.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use lumen_core::{GammaRamp, ToneCurve, ToneCurveKind, RAMP_LEN};
    use lumen_display::backend::{AcceptancePolicy, RejectionMode, SimulatedDriver};
    use lumen_display::{AdaptiveConfig, EngineConfig, GammaEngine};
    use lumen_ramp::{cube, RampBuilder};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn power(strength: f64) -> GammaRamp {
        RampBuilder::new().build_curve(&ToneCurve::power(strength))
    }

    fn limited(count: usize, mode: RejectionMode, max_scale: f64) -> Arc<SimulatedDriver> {
        Arc::new(
            SimulatedDriver::new(count)
                .with_policy(AcceptancePolicy::MaxScale {
                    reference: power(2.2),
                    max_scale,
                })
                .with_rejection(mode),
        )
    }

    fn engine_with(driver: &Arc<SimulatedDriver>, adaptive: AdaptiveConfig) -> GammaEngine<SimulatedDriver> {
        GammaEngine::new(
            driver.clone(),
            EngineConfig {
                adaptive,
                ..Default::default()
            },
        )
    }

    /// Warm-tinted ramp standing in for a calibrated display profile.
    fn warm() -> GammaRamp {
        let mut ramp = GammaRamp::identity();
        for i in 0..RAMP_LEN {
            ramp.blue[i] = (f64::from(ramp.blue[i]) * 0.85).round() as u16;
        }
        ramp
    }

    // === Adaptive application ===

    #[test]
    fn test_accept_all_single_write_per_monitor() {
        let driver = Arc::new(SimulatedDriver::new(3));
        let mut engine = engine_with(&driver, AdaptiveConfig::default());

        let outcome = engine.set_gamma(2.2);
        assert!(outcome.all_ok());
        assert_eq!(engine.status_text(), "Applied to 3 displays");
        for i in 0..3 {
            assert_eq!(driver.write_count(i), 1);
            assert_eq!(driver.stored(i), Some(power(2.2)));
            assert_eq!(engine.monitor(i).unwrap().safe_scale, 1.0);
        }
        engine.keep_on_exit();
    }

    #[test]
    fn test_limited_driver_worked_example() {
        // ceiling 1.0 rejected, then .5 .25 .375 .4375 .40625 .390625
        let driver = limited(1, RejectionMode::HardFail, 0.4);
        let mut engine = engine_with(&driver, AdaptiveConfig::default());

        assert!(engine.set_gamma(2.2).all_ok());
        assert_abs_diff_eq!(engine.monitor(0).unwrap().safe_scale, 0.390625, epsilon = 1e-9);
        assert_eq!(driver.write_count(0), 7);
    }

    #[test]
    fn test_convergence_across_configs() {
        let configs = [
            AdaptiveConfig::default(),
            AdaptiveConfig {
                max_attempts: 12,
                convergence: 0.005,
                ..Default::default()
            },
            AdaptiveConfig {
                headroom: 1.5,
                ..Default::default()
            },
        ];

        for cfg in configs {
            for limit in [0.25, 0.6, 0.9] {
                for mode in [RejectionMode::HardFail, RejectionMode::Ignore] {
                    let driver = limited(2, mode, limit);
                    let policy = AcceptancePolicy::MaxScale {
                        reference: power(2.2),
                        max_scale: limit,
                    };
                    let mut engine = engine_with(&driver, cfg);

                    assert!(engine.set_gamma(2.2).all_ok(), "{cfg:?} {limit} {mode:?}");
                    for i in 0..2 {
                        let s = engine.monitor(i).unwrap().safe_scale;
                        assert!(
                            s <= limit && limit - s <= cfg.convergence,
                            "{cfg:?} {limit} {mode:?} s={s}"
                        );
                        assert!(driver.write_count(i) <= 2 + cfg.max_attempts as usize);
                        assert!(policy.accepts(&driver.stored(i).unwrap()));
                    }
                }
            }
        }
    }

    #[test]
    fn test_settled_scale_reapplies_in_one_write() {
        let driver = limited(1, RejectionMode::HardFail, 0.5);
        let cfg = AdaptiveConfig {
            headroom: 1.0,
            ..Default::default()
        };
        let mut engine = engine_with(&driver, cfg);

        assert!(engine.set_gamma(2.2).all_ok());
        let first = driver.write_count(0);
        let s = engine.monitor(0).unwrap().safe_scale;

        assert!(engine.apply_all().all_ok());
        assert_eq!(driver.write_count(0), first + 1);
        assert_eq!(engine.monitor(0).unwrap().safe_scale, s);
    }

    #[test]
    fn test_total_rejection_leaves_identity() {
        for mode in [RejectionMode::HardFail, RejectionMode::Ignore] {
            let driver = Arc::new(
                SimulatedDriver::new(2)
                    .with_policy(AcceptancePolicy::IdentityOnly)
                    .with_rejection(mode),
            );
            let cfg = AdaptiveConfig::default();
            let mut engine = engine_with(&driver, cfg);

            let outcome = engine.set_gamma(2.2);
            assert!(!outcome.any_ok(), "{mode:?}");
            assert_eq!(engine.status_text(), "Failed to apply gamma");
            for i in 0..2 {
                assert_eq!(driver.stored(i), Some(GammaRamp::identity()));
                assert_abs_diff_eq!(engine.monitor(i).unwrap().safe_scale, cfg.fallback_scale);
            }
        }
    }

    // === Capture and restore ===

    #[test]
    fn test_restore_returns_exact_originals() {
        let driver = Arc::new(SimulatedDriver::new(2).with_initial_ramp(warm()));
        let mut engine = engine_with(&driver, AdaptiveConfig::default());
        assert_eq!(engine.status_text(), "Ready");

        engine.set_curve(ToneCurveKind::ShadowLift, 1.0);
        assert_ne!(driver.stored(0), Some(warm()));

        assert!(engine.restore_all().all_ok());
        assert_eq!(engine.status_text(), "Reset to original");
        assert_eq!(driver.stored(0), Some(warm()));
        assert_eq!(driver.stored(1), Some(warm()));
    }

    #[test]
    fn test_drop_restores_originals() {
        let driver = Arc::new(SimulatedDriver::new(1).with_initial_ramp(warm()));
        {
            let mut engine = engine_with(&driver, AdaptiveConfig::default());
            engine.set_gamma(1.6);
            assert_ne!(driver.stored(0), Some(warm()));
        }
        assert_eq!(driver.stored(0), Some(warm()));
    }

    #[test]
    fn test_uncaptured_monitor_is_not_restored() {
        let driver = Arc::new(SimulatedDriver::new(2));
        driver.set_read_failure(1, true);
        let mut engine = engine_with(&driver, AdaptiveConfig::default());
        driver.set_read_failure(1, false);

        assert!(engine.monitor(0).unwrap().has_original);
        assert!(!engine.monitor(1).unwrap().has_original);

        assert!(engine.set_gamma(2.2).all_ok());
        let outcome = engine.restore_all();
        assert_eq!(outcome.per_monitor, vec![true, false]);
        assert_eq!(driver.stored(0), Some(GammaRamp::identity()));
        assert_eq!(driver.stored(1), Some(power(2.2)));

        assert!(engine.recapture());
        assert!(engine.monitor(1).unwrap().has_original);
        engine.keep_on_exit();
    }

    #[test]
    fn test_restore_point_writes_originals() {
        let driver = Arc::new(SimulatedDriver::new(1).with_initial_ramp(warm()));
        let mut engine = engine_with(&driver, AdaptiveConfig::default());
        let point = engine.restore_point();

        engine.set_gamma(2.5);
        driver.set_stored(0, GammaRamp::zeroed());
        assert!(point.restore());
        assert_eq!(driver.stored(0), Some(warm()));
        engine.keep_on_exit();
    }

    // === Hotkey-style sequences ===

    #[test]
    fn test_step_toggle_reset_on_clamping_driver() {
        let policy = AcceptancePolicy::relative_band();
        let driver = Arc::new(
            SimulatedDriver::new(2)
                .with_policy(policy.clone())
                .with_rejection(RejectionMode::Clamp),
        );
        let mut engine = engine_with(&driver, AdaptiveConfig::default());

        engine.set_gamma(2.2);
        for _ in 0..3 {
            engine.adjust_gamma(0.1);
            for i in 0..2 {
                assert!(policy.accepts(&driver.stored(i).unwrap()));
            }
        }
        assert_abs_diff_eq!(engine.curve().strength, 2.5, epsilon = 1e-9);

        engine.toggle_gamma();
        assert!(!engine.is_enabled());
        assert_eq!(engine.status_text(), "Gamma disabled");
        assert_eq!(driver.stored(0), Some(GammaRamp::identity()));

        engine.toggle_gamma();
        assert!(engine.is_enabled());
        assert_ne!(driver.stored(0), Some(GammaRamp::identity()));

        engine.reset_gamma();
        assert_eq!(engine.curve().strength, 1.0);
        assert_eq!(driver.stored(1), Some(GammaRamp::identity()));
    }

    #[test]
    fn test_read_gamma_tracks_applied_curve() {
        let driver = Arc::new(SimulatedDriver::new(1));
        let mut engine = engine_with(&driver, AdaptiveConfig::default());

        assert_abs_diff_eq!(engine.read_gamma(), 1.0, epsilon = 0.05);
        engine.set_gamma(1.8);
        assert_abs_diff_eq!(engine.read_gamma(), 1.8, epsilon = 0.05);
        engine.keep_on_exit();
    }

    // === LUT exchange ===

    #[test]
    fn test_cube_export_then_apply() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cinema.cube");

        let driver = Arc::new(SimulatedDriver::new(1));
        let mut engine = engine_with(&driver, AdaptiveConfig::default());
        engine.load_curve(ToneCurve::new(ToneCurveKind::Cinema, 1.0));
        let ramp = engine.build_ramp();
        cube::write_1d(&path, &ramp, Some("cinema")).unwrap();

        let imported = cube::read_1d(&path).unwrap();
        assert_eq!(imported, ramp);

        assert!(engine.apply_ramp_all(&imported).all_ok());
        assert_eq!(driver.stored(0), Some(ramp));
        engine.keep_on_exit();
    }

    #[test]
    fn test_truncated_cube_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.cube");
        std::fs::write(&path, "LUT_1D_SIZE 256\n0 0 0\n1 1 1\n").unwrap();
        assert!(cube::read_1d(&path).is_err());
    }
}
