//! # lumen-core
//!
//! Core types for display gamma ramp synthesis.
//!
//! This crate provides the foundational types used throughout the Lumen workspace:
//!
//! - [`CurvePoint`] - Control point of a user-defined tone curve
//! - [`ToneCurveKind`], [`ToneCurve`] - Curve selector and full curve selection
//! - [`GammaRamp`] - 3x256 16-bit lookup table as consumed by display drivers
//! - [`Envelope`] - Soft output bound applied before quantization
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. All other Lumen crates depend on
//! `lumen-core`:
//!
//! ```text
//! lumen-core (this crate)
//!    ^
//!    |
//!    +-- lumen-transfer (tone curve math)
//!    +-- lumen-ramp (LUT quantization)
//!    +-- lumen-display (monitors, drivers, adaptive apply)
//!    +-- lumen-cli (the `lumen` binary)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod curve;
pub mod envelope;
pub mod error;
pub mod point;
pub mod ramp;

pub use curve::{ToneCurve, ToneCurveKind, DEFAULT_STRENGTH};
pub use envelope::Envelope;
pub use error::{Error, Result};
pub use point::{default_points, parse_points, format_points, CurvePoint};
pub use ramp::{GammaRamp, RAMP_LEN, RAMP_MAX};

/// Prelude module for convenient imports.
///
/// ```
/// use lumen_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::curve::{ToneCurve, ToneCurveKind};
    pub use crate::envelope::Envelope;
    pub use crate::error::{Error, Result};
    pub use crate::point::CurvePoint;
    pub use crate::ramp::{GammaRamp, RAMP_LEN, RAMP_MAX};
}
