//! # lumen-display
//!
//! Applies gamma ramps to physical display outputs and guarantees the
//! original ramps come back.
//!
//! # Components
//!
//! - [`MonitorRegistry`] - Enumerated outputs and their captured originals
//! - [`capture`] - Direct capture and restore of original ramps, plus the
//!   [`RestorePoint`] used by process-wide safety nets
//! - [`AdaptiveApplier`] - Trial/verify/bisect protocol that finds how much
//!   of a ramp a driver actually honours
//! - [`GammaEngine`] - The synchronous API a UI, CLI or hotkey layer drives
//!
//! # Driver Boundary
//!
//! Backends implement [`GammaDriver`] (read/write one ramp) and
//! [`MonitorEnumerator`] (list outputs):
//!
//! - [`backend::win32::Win32Backend`] - GDI device gamma ramps (Windows)
//! - [`backend::SimulatedDriver`] - In-memory outputs with configurable
//!   acceptance, for tests and dry runs
//! - [`backend::NullBackend`] - No outputs
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use lumen_display::{backend::SimulatedDriver, EngineConfig, GammaEngine};
//!
//! let driver = Arc::new(SimulatedDriver::new(2));
//! let mut engine = GammaEngine::new(driver, EngineConfig::default());
//! let outcome = engine.set_gamma(1.4);
//! assert!(outcome.all_ok());
//! engine.shutdown();
//! ```
//!
//! # Dependencies
//!
//! - [`lumen-core`], [`lumen-transfer`], [`lumen-ramp`] - Curve to ramp
//! - [`tracing`] - Trial and capture diagnostics
//! - `windows` - Win32 backend
//!
//! # Used By
//!
//! - `lumen-cli` - The `lumen` binary

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod adaptive;
pub mod backend;
pub mod capture;
pub mod driver;
pub mod engine;
pub mod error;
pub mod monitor;

pub use adaptive::{AdaptiveApplier, AdaptiveConfig};
pub use capture::RestorePoint;
pub use driver::{DisplayBackend, DisplayId, DisplayOutput, GammaDriver, MonitorEnumerator};
pub use engine::{ApplyOutcome, EngineConfig, GammaEngine, GAMMA_STEP};
pub use error::{DriverError, DriverResult};
pub use monitor::{enumerate, MonitorRecord, MonitorRegistry, MonitorSnapshot};
