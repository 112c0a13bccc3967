//! Object-safe view of an axis for coordination.

use crate::error::Result;

/// The part of an axis a [`MultiAxis`](super::MultiAxis) drives.
///
/// Object safe, so axes with different pin, delay and clock types can be
/// coordinated together as `&mut dyn Stepper`.
pub trait Stepper {
    /// Current position in steps.
    fn current_position(&self) -> i64;

    /// Target position in steps.
    fn target_position(&self) -> i64;

    /// Signed steps from the current position to the target.
    fn distance_to_go(&self) -> i64 {
        self.target_position() - self.current_position()
    }

    /// Maximum speed.
    fn max_speed(&self) -> f32;

    /// Current signed speed.
    fn speed(&self) -> f32;

    /// Set an absolute target.
    fn move_to(&mut self, absolute: i64);

    /// Set the maximum speed.
    fn set_max_speed(&mut self, speed: f32);

    /// Set a constant speed.
    fn set_speed(&mut self, speed: f32);

    /// Take one step at the current speed if it is due.
    fn run_speed(&mut self) -> Result<bool>;
}
