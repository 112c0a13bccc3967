//! Multi-axis coordination.
//!
//! Holds a bounded list of axes and moves them so they all arrive together.

use libm::fabsf;

use crate::error::{MotionError, Result};

use super::stepper::Stepper;

/// Most axes one coordinator sequences.
pub const MAX_AXES: usize = 10;

/// Synchronizes several axes so their moves start and finish together.
///
/// Borrows its axes; it owns no motion state of its own. Axes are polled in
/// the order they were added.
///
/// # Example
///
/// ```rust,ignore
/// let mut arm = MultiAxis::new();
/// arm.add(&mut base);
/// arm.add(&mut shoulder);
///
/// arm.move_to(&[400, -120])?;
/// arm.run_speed_to_position()?;
/// ```
#[derive(Default)]
pub struct MultiAxis<'a> {
    axes: heapless::Vec<&'a mut dyn Stepper, MAX_AXES>,
}

impl<'a> MultiAxis<'a> {
    /// Create an empty coordinator.
    pub fn new() -> Self {
        Self {
            axes: heapless::Vec::new(),
        }
    }

    /// Append an axis. Returns `false` when [`MAX_AXES`] are already held.
    pub fn add(&mut self, axis: &'a mut dyn Stepper) -> bool {
        if self.axes.push(axis).is_err() {
            warn!("coordinator full ({} axes)", MAX_AXES);
            return false;
        }
        true
    }

    /// Number of axes held.
    #[inline]
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    /// Whether no axes are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Borrow the axis at `index`.
    pub fn get(&self, index: usize) -> Option<&dyn Stepper> {
        self.axes.get(index).map(|axis| &**axis)
    }

    /// Set absolute targets for every axis, one per axis in insertion order.
    ///
    /// The axis with the longest move at its own max speed sets the move time;
    /// every other axis is slowed to a constant speed that finishes in that
    /// same time. Each moving axis gets that speed as its new max speed. Axes
    /// already at their target keep their settings. Does nothing when every
    /// axis is already at its target.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::TargetCountMismatch`] when `targets` does not hold
    /// exactly one entry per axis.
    pub fn move_to(&mut self, targets: &[i64]) -> Result<()> {
        if targets.len() != self.axes.len() {
            return Err(MotionError::TargetCountMismatch {
                expected: self.axes.len(),
                actual: targets.len(),
            }
            .into());
        }

        let mut longest = 0.0f32;
        for (axis, &target) in self.axes.iter().zip(targets) {
            let distance = (target - axis.current_position()) as f32;
            if distance == 0.0 {
                continue;
            }
            let time = fabsf(distance) / axis.max_speed();
            if time > longest {
                longest = time;
            }
        }

        if longest == 0.0 {
            return Ok(());
        }
        if !longest.is_finite() {
            warn!("axis with zero max speed cannot reach its target");
            return Ok(());
        }
        debug!("synchronizing {} axes over {}", self.axes.len(), longest);

        for (axis, &target) in self.axes.iter_mut().zip(targets) {
            let distance = (target - axis.current_position()) as f32;
            axis.move_to(target);
            if distance == 0.0 {
                continue;
            }
            let speed = distance / longest;
            axis.set_max_speed(fabsf(speed));
            axis.set_speed(speed);
        }
        Ok(())
    }

    /// Step every axis that still has distance to go, at its constant speed.
    ///
    /// Returns `true` while any axis has distance to go.
    pub fn run(&mut self) -> Result<bool> {
        let mut running = false;
        for axis in self.axes.iter_mut() {
            if axis.distance_to_go() != 0 {
                axis.run_speed()?;
                running = true;
            }
        }
        Ok(running)
    }

    /// Block until every axis reaches its target.
    pub fn run_speed_to_position(&mut self) -> Result<()> {
        while self.run()? {}
        Ok(())
    }
}
