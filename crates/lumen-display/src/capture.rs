//! Capture and restore of original ramps.
//!
//! Restore is always direct: the captured ramp is written once, without the
//! adaptive protocol, since the driver handed it out in the first place.
//!
//! [`RestorePoint`] is a detached copy of the captured originals that outlives
//! borrow scopes. Panic hooks and console handlers hold a `Weak` to it and
//! call [`RestorePoint::restore`], which neither blocks nor allocates.

use crate::{DisplayId, GammaDriver, MonitorRecord, MonitorRegistry};
use lumen_core::GammaRamp;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Reads the current ramp of `record` and stores it as the original.
///
/// Returns `false` if the read fails; the record is left untouched.
pub fn capture<D: GammaDriver + ?Sized>(record: &mut MonitorRecord, driver: &D) -> bool {
    match driver.read_ramp(record.id()) {
        Ok(ramp) => {
            record.set_original(ramp);
            debug!(device = record.name(), "captured original ramp");
            true
        }
        Err(e) => {
            warn!(device = record.name(), error = %e, "capture failed");
            false
        }
    }
}

/// Captures every monitor. Successful captures are kept even when others fail.
///
/// Returns `true` only if every capture succeeded.
pub fn capture_all<D: GammaDriver + ?Sized>(registry: &mut MonitorRegistry, driver: &D) -> bool {
    let mut all_ok = true;
    for record in registry.iter_mut() {
        all_ok &= capture(record, driver);
    }
    all_ok
}

/// Writes the captured original back to `record`.
///
/// Returns `false` without writing if nothing was captured.
pub fn restore<D: GammaDriver + ?Sized>(record: &MonitorRecord, driver: &D) -> bool {
    if !record.has_original() {
        debug!(device = record.name(), "no original to restore");
        return false;
    }
    match driver.write_ramp(record.id(), record.original_ramp()) {
        Ok(()) => true,
        Err(e) => {
            warn!(device = record.name(), error = %e, "restore failed");
            false
        }
    }
}

/// Restores every monitor. Returns `true` only if every restore succeeded.
pub fn restore_all<D: GammaDriver + ?Sized>(registry: &MonitorRegistry, driver: &D) -> bool {
    let mut all_ok = true;
    for record in registry {
        all_ok &= restore(record, driver);
    }
    all_ok
}

/// Detached originals for last-chance restoration.
///
/// Only monitors with a captured original are included.
pub struct RestorePoint {
    driver: Arc<dyn GammaDriver>,
    originals: RwLock<Vec<(DisplayId, GammaRamp)>>,
}

impl RestorePoint {
    /// Copies the captured originals out of `registry`.
    pub fn new(driver: Arc<dyn GammaDriver>, registry: &MonitorRegistry) -> Self {
        Self {
            driver,
            originals: RwLock::new(collect(registry)),
        }
    }

    /// Replaces the stored originals after a re-capture.
    pub fn refresh(&self, registry: &MonitorRegistry) {
        let fresh = collect(registry);
        match self.originals.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
    }

    /// Writes every stored original back.
    ///
    /// Never blocks: if the originals are being refreshed concurrently the
    /// call gives up and returns `false`. Safe to call repeatedly.
    pub fn restore(&self) -> bool {
        let guard = match self.originals.try_read() {
            Ok(guard) => guard,
            Err(std::sync::TryLockError::Poisoned(p)) => p.into_inner(),
            Err(std::sync::TryLockError::WouldBlock) => return false,
        };
        let mut all_ok = true;
        for (id, ramp) in guard.iter() {
            all_ok &= self.driver.write_ramp(id, ramp).is_ok();
        }
        all_ok
    }

    /// Number of stored originals.
    pub fn len(&self) -> usize {
        self.originals.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Returns `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for RestorePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestorePoint").field("len", &self.len()).finish()
    }
}

fn collect(registry: &MonitorRegistry) -> Vec<(DisplayId, GammaRamp)> {
    registry
        .iter()
        .filter(|r| r.has_original())
        .map(|r| (r.id().clone(), *r.original_ramp()))
        .collect()
}
