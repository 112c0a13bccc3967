//! Motion module for accel-axis.
//!
//! Provides the per-axis speed ramp and step timing gate.

mod profile;

pub use profile::{Direction, MotionPhase, MotionProfile};
