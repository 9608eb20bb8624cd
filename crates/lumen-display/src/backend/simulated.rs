//! In-memory display backend.
//!
//! Models drivers that refuse ramps too far from identity. Each simulated
//! output stores one ramp; an [`AcceptancePolicy`] decides which writes are
//! acceptable and a [`RejectionMode`] decides what an unacceptable write
//! looks like from the caller's side.
//!
//! # Example
//!
//! ```rust
//! use lumen_core::GammaRamp;
//! use lumen_display::backend::{AcceptancePolicy, RejectionMode, SimulatedDriver};
//! use lumen_display::GammaDriver;
//!
//! let driver = SimulatedDriver::new(1)
//!     .with_policy(AcceptancePolicy::IdentityOnly)
//!     .with_rejection(RejectionMode::Ignore);
//! let id = driver.id(0).unwrap();
//!
//! // accepted by the driver call, but nothing changes
//! driver.write_ramp(&id, &GammaRamp::zeroed()).unwrap();
//! assert_eq!(driver.stored(0), Some(GammaRamp::identity()));
//! ```

use crate::{DisplayId, DisplayOutput, DriverError, DriverResult, GammaDriver, MonitorEnumerator};
use lumen_core::{GammaRamp, RAMP_MAX};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Which ramps a simulated output accepts.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AcceptancePolicy {
    /// Every ramp is stored as written.
    #[default]
    AcceptAll,
    /// Only the identity ramp (within one unit per entry).
    IdentityOnly,
    /// Ramps up to `max_scale` of the way from identity to `reference`.
    ///
    /// Entry `i` may deviate from identity by at most
    /// `max_scale * |reference[i] - identity[i]| + 1`.
    MaxScale {
        /// Ramp whose deviation defines the limit
        reference: GammaRamp,
        /// Accepted fraction of that deviation
        max_scale: f64,
    },
    /// Entries must stay within a band around identity:
    /// `identity * lower - offset` to `identity * upper + offset`, with
    /// `offset` a fraction of full range.
    RelativeBand {
        /// Lower multiplier
        lower: f64,
        /// Upper multiplier
        upper: f64,
        /// Additive slack, fraction of full range
        offset: f64,
    },
}

impl AcceptancePolicy {
    /// A band of 0.5x to 1.5x identity with 5% slack.
    pub fn relative_band() -> Self {
        Self::RelativeBand {
            lower: 0.5,
            upper: 1.5,
            offset: 0.05,
        }
    }

    /// Allowed `[min, max]` for entry `i` of channel `ch`.
    fn bounds(&self, ch: usize, i: usize) -> (f64, f64) {
        let max = f64::from(RAMP_MAX);
        let id = (i * 257) as f64;
        match self {
            Self::AcceptAll => (0.0, max),
            Self::IdentityOnly => (id - 1.0, id + 1.0),
            Self::MaxScale { reference, max_scale } => {
                let r = f64::from(reference.channels()[ch][i]);
                let limit = max_scale.max(0.0) * (r - id).abs() + 1.0;
                (id - limit, id + limit)
            }
            Self::RelativeBand { lower, upper, offset } => {
                let slack = offset * max;
                (id * lower - slack, id * upper + slack)
            }
        }
    }

    /// Returns `true` if every entry is within bounds.
    pub fn accepts(&self, ramp: &GammaRamp) -> bool {
        ramp.channels().iter().enumerate().all(|(ch, values)| {
            values.iter().enumerate().all(|(i, &v)| {
                let (lo, hi) = self.bounds(ch, i);
                let v = f64::from(v);
                v >= lo && v <= hi
            })
        })
    }

    /// Pulls every entry into bounds.
    pub fn clamp(&self, ramp: &GammaRamp) -> GammaRamp {
        let mut out = *ramp;
        for (ch, values) in out.channels_mut().into_iter().enumerate() {
            for (i, v) in values.iter_mut().enumerate() {
                let (lo, hi) = self.bounds(ch, i);
                let lo = lo.max(0.0).ceil();
                let hi = hi.min(f64::from(RAMP_MAX)).floor().max(lo);
                *v = f64::from(*v).clamp(lo, hi) as u16;
            }
        }
        out
    }
}

/// How an output reacts to a ramp its policy does not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RejectionMode {
    /// The write returns an error and nothing changes.
    #[default]
    HardFail,
    /// The write reports success and nothing changes.
    Ignore,
    /// The write reports success and a clamped ramp is stored.
    Clamp,
}

#[derive(Debug, Clone)]
struct SimOutput {
    id: DisplayId,
    is_primary: bool,
    ramp: GammaRamp,
    read_fails: bool,
    writes: usize,
}

/// Simulated display outputs.
///
/// Outputs are named `SIM-DISPLAY1`, `SIM-DISPLAY2`, ...; the first one is
/// primary. All start with the identity ramp.
#[derive(Debug)]
pub struct SimulatedDriver {
    outputs: Mutex<Vec<SimOutput>>,
    policy: AcceptancePolicy,
    rejection: RejectionMode,
    enumeration_fails: AtomicBool,
}

impl SimulatedDriver {
    /// Creates `count` accept-all outputs.
    pub fn new(count: usize) -> Self {
        let outputs = (0..count)
            .map(|i| SimOutput {
                id: DisplayId::new(i as isize + 1, format!("SIM-DISPLAY{}", i + 1)),
                is_primary: i == 0,
                ramp: GammaRamp::identity(),
                read_fails: false,
                writes: 0,
            })
            .collect();
        Self {
            outputs: Mutex::new(outputs),
            policy: AcceptancePolicy::default(),
            rejection: RejectionMode::default(),
            enumeration_fails: AtomicBool::new(false),
        }
    }

    /// Sets the acceptance policy for every output.
    pub fn with_policy(mut self, policy: AcceptancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the rejection mode for every output.
    pub fn with_rejection(mut self, rejection: RejectionMode) -> Self {
        self.rejection = rejection;
        self
    }

    /// Sets the ramp every output starts with.
    pub fn with_initial_ramp(self, ramp: GammaRamp) -> Self {
        for out in self.lock().iter_mut() {
            out.ramp = ramp;
        }
        self
    }

    /// Makes reads of output `index` fail.
    pub fn set_read_failure(&self, index: usize, fails: bool) {
        if let Some(out) = self.lock().get_mut(index) {
            out.read_fails = fails;
        }
    }

    /// Makes enumeration fail.
    pub fn set_enumeration_failure(&self, fails: bool) {
        self.enumeration_fails.store(fails, Ordering::Relaxed);
    }

    /// Ramp currently stored for output `index`.
    pub fn stored(&self, index: usize) -> Option<GammaRamp> {
        self.lock().get(index).map(|o| o.ramp)
    }

    /// Overwrites the stored ramp, bypassing the policy.
    pub fn set_stored(&self, index: usize, ramp: GammaRamp) {
        if let Some(out) = self.lock().get_mut(index) {
            out.ramp = ramp;
        }
    }

    /// Number of `write_ramp` calls made for output `index`, accepted or not.
    pub fn write_count(&self, index: usize) -> usize {
        self.lock().get(index).map_or(0, |o| o.writes)
    }

    /// Identifier of output `index`.
    pub fn id(&self, index: usize) -> Option<DisplayId> {
        self.lock().get(index).map(|o| o.id.clone())
    }

    /// Number of outputs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if there are no outputs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SimOutput>> {
        self.outputs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GammaDriver for SimulatedDriver {
    fn read_ramp(&self, id: &DisplayId) -> DriverResult<GammaRamp> {
        let outputs = self.lock();
        let out = find(&outputs, id)?;
        if out.read_fails {
            return Err(DriverError::ReadFailed {
                device: id.name().to_string(),
            });
        }
        Ok(out.ramp)
    }

    fn write_ramp(&self, id: &DisplayId, ramp: &GammaRamp) -> DriverResult<()> {
        let mut outputs = self.lock();
        let pos = outputs
            .iter()
            .position(|o| o.id.name() == id.name())
            .ok_or_else(|| DriverError::UnknownDevice {
                device: id.name().to_string(),
            })?;
        let out = &mut outputs[pos];
        out.writes += 1;

        if self.policy.accepts(ramp) {
            out.ramp = *ramp;
            return Ok(());
        }

        trace!(device = id.name(), mode = ?self.rejection, "simulated rejection");
        match self.rejection {
            RejectionMode::HardFail => Err(DriverError::WriteFailed {
                device: id.name().to_string(),
            }),
            RejectionMode::Ignore => Ok(()),
            RejectionMode::Clamp => {
                out.ramp = self.policy.clamp(ramp);
                Ok(())
            }
        }
    }
}

impl MonitorEnumerator for SimulatedDriver {
    fn enumerate(&self) -> DriverResult<Vec<DisplayOutput>> {
        if self.enumeration_fails.load(Ordering::Relaxed) {
            return Err(DriverError::Enumeration("simulated failure".into()));
        }
        Ok(self
            .lock()
            .iter()
            .map(|o| DisplayOutput {
                id: o.id.clone(),
                is_primary: o.is_primary,
            })
            .collect())
    }
}

fn find<'a>(outputs: &'a [SimOutput], id: &DisplayId) -> DriverResult<&'a SimOutput> {
    outputs
        .iter()
        .find(|o| o.id.name() == id.name())
        .ok_or_else(|| DriverError::UnknownDevice {
            device: id.name().to_string(),
        })
}
