//! # accel-axis
//!
//! Polled stepper motor speed ramps with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Incremental ramps**: Constant-acceleration profiles computed one step at a
//!   time, without square roots on the step path
//! - **Seven wiring interfaces**: Step/direction drivers, 2/3/4-wire full step,
//!   3/4-wire half step, and per-step callbacks
//! - **Synchronized moves**: Several axes start and finish a move together
//! - **no_std compatible**: Core library works without standard library
//! - **Configuration-driven**: Define axes and groups in TOML files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use accel_axis::{Axis, Interface, StdClock};
//!
//! let mut axis = Axis::builder()
//!     .pin_output(pins)
//!     .delay(delay)
//!     .clock(StdClock::new())
//!     .interface(Interface::Driver)
//!     .pins(&[0, 1])
//!     .max_speed(400.0)
//!     .acceleration(200.0)
//!     .build()?;
//!
//! axis.move_to(1600);
//! while axis.run()? {
//!     // Other work, as long as the loop comes back in time for the next step
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables `StdClock`, file I/O and TOML parsing
//! - `alloc`: Enables boxed step callbacks for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod fmt;

// Core modules
pub mod clock;
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;
pub mod signal;

// Re-exports for ergonomic API
pub use clock::{Clock, SimClock};
pub use config::{validate_config, AxisConfig, GroupConfig, SystemConfig};
pub use error::{Error, Result};
pub use motion::{Direction, MotionPhase, MotionProfile};
pub use motor::{Axis, AxisBuilder, MultiAxis, Stepper, MAX_AXES};
pub use signal::{Interface, NoPins, OutputPinBank, PinMode, PinOutput, PulseSignaler, NO_PIN};

#[cfg(feature = "std")]
pub use clock::StdClock;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
