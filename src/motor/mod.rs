//! Axis module for accel-axis.
//!
//! Provides the per-axis driver, its builder and multi-axis coordination.

mod axis;
mod builder;
mod multi;
mod stepper;

pub use axis::Axis;
pub use builder::AxisBuilder;
pub use multi::{MultiAxis, MAX_AXES};
pub use stepper::Stepper;
