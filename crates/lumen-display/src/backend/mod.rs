//! Display backends.
//!
//! | Backend | Platform | Use |
//! |---------|----------|-----|
//! | [`win32::Win32Backend`] | Windows | GDI device gamma ramps |
//! | [`SimulatedDriver`] | any | tests, `--simulate` dry runs |
//! | [`NullBackend`] | any | no outputs |
//!
//! [`NativeBackend`] names whichever backend drives real hardware on the
//! current platform.

mod simulated;

#[cfg(windows)]
pub mod win32;

pub use simulated::{AcceptancePolicy, RejectionMode, SimulatedDriver};

use crate::{DisplayId, DisplayOutput, DriverError, DriverResult, GammaDriver, MonitorEnumerator};
use lumen_core::GammaRamp;

/// Backend with no outputs.
///
/// Enumeration succeeds with an empty list, so an engine on top of it
/// reports "no displays found" and never touches hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl GammaDriver for NullBackend {
    fn read_ramp(&self, id: &DisplayId) -> DriverResult<GammaRamp> {
        Err(DriverError::UnknownDevice {
            device: id.name().to_string(),
        })
    }

    fn write_ramp(&self, id: &DisplayId, _ramp: &GammaRamp) -> DriverResult<()> {
        Err(DriverError::UnknownDevice {
            device: id.name().to_string(),
        })
    }
}

impl MonitorEnumerator for NullBackend {
    fn enumerate(&self) -> DriverResult<Vec<DisplayOutput>> {
        Ok(Vec::new())
    }
}

/// Hardware backend for this platform.
#[cfg(windows)]
pub type NativeBackend = win32::Win32Backend;

/// Hardware backend for this platform.
#[cfg(not(windows))]
pub type NativeBackend = NullBackend;

/// Creates the hardware backend for this platform.
pub fn native() -> NativeBackend {
    NativeBackend::default()
}

/// Returns `true` if this platform has a real gamma backend.
pub const fn has_native() -> bool {
    cfg!(windows)
}
