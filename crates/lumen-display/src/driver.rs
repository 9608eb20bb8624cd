//! Display driver boundary.
//!
//! Two narrow traits separate the engine from the platform:
//!
//! - [`MonitorEnumerator`] lists active outputs
//! - [`GammaDriver`] reads and writes one output's ramp
//!
//! A write has three observable outcomes: an error (hard failure), `Ok` with
//! the ramp stored, and `Ok` with the ramp ignored or clamped. The last one
//! is only visible by reading the ramp back, which is what the
//! [`AdaptiveApplier`](crate::AdaptiveApplier) does.

use crate::DriverResult;
use lumen_core::GammaRamp;
use std::fmt;

/// Stable identifier of a display output.
///
/// Holds the platform handle and the device name. The name is also kept as a
/// NUL-terminated UTF-16 buffer, built once, so backends that address outputs
/// by wide name can restore ramps without allocating.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayId {
    handle: isize,
    name: String,
    wide_name: Box<[u16]>,
}

impl DisplayId {
    /// Creates an identifier from a platform handle and device name.
    pub fn new(handle: isize, name: impl Into<String>) -> Self {
        let name = name.into();
        let wide_name = name.encode_utf16().chain(std::iter::once(0)).collect();
        Self {
            handle,
            name,
            wide_name,
        }
    }

    /// Opaque platform handle.
    #[inline]
    pub fn handle(&self) -> isize {
        self.handle
    }

    /// Device name, e.g. `\\.\DISPLAY1`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Device name as NUL-terminated UTF-16.
    #[inline]
    pub fn wide_name(&self) -> &[u16] {
        &self.wide_name
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One enumerated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOutput {
    /// Output identifier
    pub id: DisplayId,
    /// `true` for the primary display
    pub is_primary: bool,
}

/// Reads and writes hardware gamma ramps.
pub trait GammaDriver: Send + Sync {
    /// Reads the ramp currently loaded for `id`.
    fn read_ramp(&self, id: &DisplayId) -> DriverResult<GammaRamp>;

    /// Writes `ramp` to `id`.
    ///
    /// `Ok` only means the driver did not report failure.
    fn write_ramp(&self, id: &DisplayId, ramp: &GammaRamp) -> DriverResult<()>;
}

/// Lists active display outputs.
pub trait MonitorEnumerator {
    /// Enumerates outputs with their primary flag, in platform order.
    fn enumerate(&self) -> DriverResult<Vec<DisplayOutput>>;
}

/// A complete backend: enumeration plus ramp access.
pub trait DisplayBackend: GammaDriver + MonitorEnumerator {}

impl<T: GammaDriver + MonitorEnumerator> DisplayBackend for T {}
