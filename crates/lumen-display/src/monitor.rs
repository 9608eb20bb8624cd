//! Monitor registry.
//!
//! One [`MonitorRecord`] per active output, in enumeration order. Each record
//! owns the ramp captured at startup and the last scale the driver was seen
//! to accept.

use crate::{DisplayId, MonitorEnumerator};
use lumen_core::GammaRamp;
use serde::Serialize;
use tracing::{debug, warn};

/// State of one display output.
#[derive(Debug, Clone)]
pub struct MonitorRecord {
    id: DisplayId,
    is_primary: bool,
    original_ramp: GammaRamp,
    has_original: bool,
    safe_scale: f64,
}

impl MonitorRecord {
    /// Creates a record with no captured original and a safe scale of 1.0.
    pub fn new(id: DisplayId, is_primary: bool) -> Self {
        Self {
            id,
            is_primary,
            original_ramp: GammaRamp::zeroed(),
            has_original: false,
            safe_scale: 1.0,
        }
    }

    /// Output identifier.
    #[inline]
    pub fn id(&self) -> &DisplayId {
        &self.id
    }

    /// Device name.
    #[inline]
    pub fn name(&self) -> &str {
        self.id.name()
    }

    /// `true` for the primary display.
    #[inline]
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Ramp captured at startup. Zeroed until [`has_original`](Self::has_original).
    #[inline]
    pub fn original_ramp(&self) -> &GammaRamp {
        &self.original_ramp
    }

    /// `true` once the original ramp has been captured.
    #[inline]
    pub fn has_original(&self) -> bool {
        self.has_original
    }

    /// Largest blend scale the driver accepted last time, in [0, 1].
    #[inline]
    pub fn safe_scale(&self) -> f64 {
        self.safe_scale
    }

    pub(crate) fn set_original(&mut self, ramp: GammaRamp) {
        self.original_ramp = ramp;
        self.has_original = true;
    }

    pub(crate) fn set_safe_scale(&mut self, scale: f64) {
        self.safe_scale = scale.clamp(0.0, 1.0);
    }

    /// Snapshot at `index` for reporting.
    pub fn snapshot(&self, index: usize) -> MonitorSnapshot {
        MonitorSnapshot {
            index,
            name: self.id.name().to_string(),
            is_primary: self.is_primary,
            has_original: self.has_original,
            safe_scale: self.safe_scale,
        }
    }
}

/// Read-only view of a monitor for UIs and `status --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    /// Position in the registry
    pub index: usize,
    /// Device name
    pub name: String,
    /// `true` for the primary display
    pub is_primary: bool,
    /// `true` once the original ramp has been captured
    pub has_original: bool,
    /// Last accepted blend scale
    pub safe_scale: f64,
}

/// Ordered set of monitor records.
#[derive(Debug, Clone, Default)]
pub struct MonitorRegistry {
    records: Vec<MonitorRecord>,
}

impl MonitorRegistry {
    /// Enumerates outputs through `enumerator`.
    ///
    /// An enumeration failure yields an empty registry.
    pub fn enumerate<E: MonitorEnumerator + ?Sized>(enumerator: &E) -> Self {
        match enumerator.enumerate() {
            Ok(outputs) => {
                let records: Vec<_> = outputs
                    .into_iter()
                    .map(|o| MonitorRecord::new(o.id, o.is_primary))
                    .collect();
                debug!(count = records.len(), "enumerated displays");
                Self { records }
            }
            Err(e) => {
                warn!(error = %e, "display enumeration failed");
                Self::default()
            }
        }
    }

    /// Builds a registry from existing records.
    pub fn from_records(records: Vec<MonitorRecord>) -> Self {
        Self { records }
    }

    /// Number of monitors.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no monitor was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&MonitorRecord> {
        self.records.get(index)
    }

    /// Mutable record at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut MonitorRecord> {
        self.records.get_mut(index)
    }

    /// Iterates records in enumeration order.
    pub fn iter(&self) -> std::slice::Iter<'_, MonitorRecord> {
        self.records.iter()
    }

    /// Iterates records mutably in enumeration order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, MonitorRecord> {
        self.records.iter_mut()
    }

    /// Index of the primary display.
    ///
    /// Falls back to 0 when no record is flagged primary, and `None` when
    /// the registry is empty.
    pub fn primary_index(&self) -> Option<usize> {
        if self.records.is_empty() {
            return None;
        }
        Some(self.records.iter().position(|r| r.is_primary).unwrap_or(0))
    }

    /// Snapshot of the record at `index`.
    pub fn snapshot(&self, index: usize) -> Option<MonitorSnapshot> {
        self.records.get(index).map(|r| r.snapshot(index))
    }

    /// Snapshots of every record.
    pub fn snapshots(&self) -> Vec<MonitorSnapshot> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| r.snapshot(i))
            .collect()
    }
}

impl<'a> IntoIterator for &'a MonitorRegistry {
    type Item = &'a MonitorRecord;
    type IntoIter = std::slice::Iter<'a, MonitorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Enumerates outputs into a fresh registry.
///
/// Shorthand for [`MonitorRegistry::enumerate`].
pub fn enumerate<E: MonitorEnumerator + ?Sized>(enumerator: &E) -> MonitorRegistry {
    MonitorRegistry::enumerate(enumerator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{NullBackend, SimulatedDriver};

    fn record(name: &str, primary: bool) -> MonitorRecord {
        MonitorRecord::new(DisplayId::new(0, name), primary)
    }

    #[test]
    fn test_enumerate_simulated() {
        let driver = SimulatedDriver::new(3);
        let reg = enumerate(&driver);
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.primary_index(), Some(0));
        for r in &reg {
            assert!(!r.has_original());
            assert_eq!(r.safe_scale(), 1.0);
        }
    }

    #[test]
    fn test_enumeration_failure_is_empty() {
        let driver = SimulatedDriver::new(2);
        driver.set_enumeration_failure(true);
        assert!(enumerate(&driver).is_empty());
        assert!(enumerate(&NullBackend).is_empty());
        assert_eq!(enumerate(&NullBackend).primary_index(), None);
    }

    #[test]
    fn test_primary_index_fallback() {
        let reg = MonitorRegistry::from_records(vec![record("A", false), record("B", true)]);
        assert_eq!(reg.primary_index(), Some(1));

        let reg = MonitorRegistry::from_records(vec![record("A", false), record("B", false)]);
        assert_eq!(reg.primary_index(), Some(0));
    }

    #[test]
    fn test_safe_scale_clamped() {
        let mut r = record("A", true);
        r.set_safe_scale(1.7);
        assert_eq!(r.safe_scale(), 1.0);
        r.set_safe_scale(-0.2);
        assert_eq!(r.safe_scale(), 0.0);
    }

    #[test]
    fn test_snapshot() {
        let mut reg = MonitorRegistry::from_records(vec![record("A", false), record("B", true)]);
        reg.get_mut(1).unwrap().set_original(GammaRamp::identity());
        let snaps = reg.snapshots();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[1].name, "B");
        assert!(snaps[1].is_primary);
        assert!(snaps[1].has_original);
        assert!(!snaps[0].has_original);
        assert_eq!(reg.snapshot(5), None);
    }
}
