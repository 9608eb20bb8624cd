//! # lumen-ramp
//!
//! Turns a tone curve into a hardware [`GammaRamp`](lumen_core::GammaRamp).
//!
//! # Pipeline
//!
//! For each of the 256 entries:
//!
//! 1. evaluate the curve at `i / 255` ([`lumen_transfer::evaluate`])
//! 2. clamp to [0, 1] and to the soft [`Envelope`](lumen_core::Envelope)
//! 3. quantize to 16 bits, same value in every channel
//!
//! then [`enforce_monotonic`] makes every channel strictly increasing, since
//! drivers reject ramps with flat or decreasing runs.
//!
//! # Usage
//!
//! ```rust
//! use lumen_core::ToneCurveKind;
//! use lumen_ramp::RampBuilder;
//!
//! let ramp = RampBuilder::new().build(ToneCurveKind::PowerLaw, 2.2, None);
//! assert!(ramp.is_strictly_increasing());
//! ```
//!
//! # Also Provided
//!
//! - [`blend`] - Interpolate between identity and a target ramp
//! - [`estimate_strength`] - Recover a power-law strength from a live ramp
//! - [`cube`] - `.cube` 1D LUT export and import
//!
//! # Dependencies
//!
//! - [`lumen-core`] - Ramp and curve types
//! - [`lumen-transfer`] - Curve evaluation
//! - [`thiserror`] - Error handling
//!
//! # Used By
//!
//! - `lumen-display` - Adaptive application
//! - `lumen-cli` - `export` and `apply --lut`

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod blend;
mod builder;
mod error;
mod estimate;
mod monotonic;
pub mod cube;

pub use blend::{blend, identity_ramp};
pub use builder::RampBuilder;
pub use error::{RampError, RampResult};
pub use estimate::estimate_strength;
pub use monotonic::enforce_monotonic;
