//! Incremental speed ramp.
//!
//! Implements the discretized constant-acceleration recurrence from David Austin's
//! "Generate stepper-motor speed profiles in real time": each step interval is
//! derived from the previous one, so the step path never takes a square root.

use libm::{fabsf, sqrtf};

/// Correction applied to the first interval of a ramp (Equation 15).
const C0_CORRECTION: f32 = 0.676;

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (positive step count).
    Clockwise,
    /// Counter-clockwise (negative step count).
    CounterClockwise,
    /// Not moving.
    #[default]
    Stationary,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        match steps {
            s if s > 0 => Direction::Clockwise,
            s if s < 0 => Direction::CounterClockwise,
            _ => Direction::Stationary,
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
            Direction::Stationary => 0,
        }
    }
}

/// Current phase of the speed ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// No step interval; the axis is at rest.
    Stopped,
    /// Speeding up toward max speed.
    Accelerating,
    /// Running at max speed, or at a constant speed set directly.
    Cruising,
    /// Slowing down toward rest or toward a reversal.
    Decelerating,
}

/// Kinematic state of one axis.
///
/// Positions are in steps. Speeds are in steps per second and intervals in clock
/// units, related through `speed_scale` (clock units per second).
#[derive(Debug, Clone)]
pub struct MotionProfile {
    current_position: i64,
    target_position: i64,

    /// Signed speed; the sign is the direction of travel.
    speed: f32,
    max_speed: f32,
    acceleration: f32,

    /// Interval between steps; zero means no stepping.
    step_interval: f32,
    direction: Direction,

    /// Ramp index: > 0 accelerating, < 0 decelerating, 0 starting from rest.
    n: i64,
    /// First interval of a ramp.
    c0: f32,
    /// Interval of the last computed step.
    cn: f32,
    /// Interval at max speed.
    cmin: f32,
    /// Stepping at a speed set directly rather than by the ramp.
    constant_speed: bool,

    scale: f32,
    last_step_time: f64,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionProfile {
    /// Create a profile at rest at position 0 with max speed 1, acceleration 1
    /// and a speed scale of 1.
    pub fn new() -> Self {
        let mut profile = Self {
            current_position: 0,
            target_position: 0,
            speed: 0.0,
            max_speed: 1.0,
            acceleration: 1.0,
            step_interval: 0.0,
            direction: Direction::Stationary,
            n: 0,
            c0: 0.0,
            cn: 0.0,
            cmin: 1.0,
            constant_speed: false,
            scale: 1.0,
            last_step_time: 0.0,
        };
        profile.c0 = profile.initial_interval();
        profile
    }

    /// Current position in steps.
    #[inline]
    pub fn current_position(&self) -> i64 {
        self.current_position
    }

    /// Most recently set target position in steps.
    #[inline]
    pub fn target_position(&self) -> i64 {
        self.target_position
    }

    /// Steps remaining to the target (positive is clockwise).
    #[inline]
    pub fn distance_to_go(&self) -> i64 {
        self.target_position - self.current_position
    }

    /// Current signed speed in steps per second.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Maximum permitted speed.
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Acceleration and deceleration rate in steps per second squared.
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Clock units per second.
    #[inline]
    pub fn speed_scale(&self) -> f32 {
        self.scale
    }

    /// Direction of the last computed step.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Interval between steps in clock units (zero when not stepping).
    #[inline]
    pub fn step_interval(&self) -> f32 {
        self.step_interval
    }

    /// Signed ramp index.
    #[inline]
    pub fn ramp_index(&self) -> i64 {
        self.n
    }

    /// Clock reading of the last emitted step.
    #[inline]
    pub fn last_step_time(&self) -> f64 {
        self.last_step_time
    }

    /// Whether a step interval is armed.
    #[inline]
    pub fn is_stepping(&self) -> bool {
        self.step_interval > 0.0
    }

    /// Whether the axis is moving or has distance left to go.
    #[inline]
    pub fn is_running(&self) -> bool {
        !(self.speed == 0.0 && self.target_position == self.current_position)
    }

    /// Current ramp phase.
    pub fn phase(&self) -> MotionPhase {
        if !self.is_stepping() {
            MotionPhase::Stopped
        } else if self.n < 0 || (self.n == 0 && !self.constant_speed) {
            // n reaches 0 on the last step of a deceleration
            MotionPhase::Decelerating
        } else if self.constant_speed || self.cn <= self.cmin {
            MotionPhase::Cruising
        } else {
            MotionPhase::Accelerating
        }
    }

    /// Set the maximum speed. Negative values are taken as their magnitude.
    ///
    /// Mid-ramp, the ramp index is rebuilt from the current speed so the ramp
    /// continues from where it is instead of jumping.
    pub fn set_max_speed(&mut self, speed: f32) {
        if speed.is_nan() {
            warn!("ignoring NaN max speed");
            return;
        }
        let speed = fabsf(speed);
        if self.max_speed == speed {
            return;
        }

        self.max_speed = speed;
        self.cmin = self.min_interval();

        if self.n != 0 {
            // Equation 16
            let steps = self.steps_to_stop();
            self.n = if self.n > 0 { steps } else { -steps };
            self.compute_new_speed();
        } else if fabsf(self.speed) > speed {
            self.apply_speed(self.speed);
        }
    }

    /// Set the acceleration rate. Zero is ignored; negative values are taken as
    /// their magnitude.
    pub fn set_acceleration(&mut self, acceleration: f32) {
        if acceleration == 0.0 || !acceleration.is_finite() {
            warn!("ignoring acceleration {}", acceleration);
            return;
        }
        let acceleration = fabsf(acceleration);
        if self.acceleration == acceleration {
            return;
        }

        // Equation 17
        self.n = (self.n as f32 * (self.acceleration / acceleration)) as i64;
        self.acceleration = acceleration;
        self.c0 = self.initial_interval();
        self.compute_new_speed();
    }

    /// Set a constant speed, clamped to `[-max_speed, max_speed]`.
    pub fn set_speed(&mut self, speed: f32) {
        if speed == self.speed {
            return;
        }
        self.apply_speed(speed);
    }

    /// Set the number of clock units per second. Non-positive values are ignored.
    pub fn set_speed_scale(&mut self, scale: f32) {
        if !(scale > 0.0) || !scale.is_finite() {
            warn!("ignoring speed scale {}", scale);
            return;
        }

        self.scale = scale;
        self.c0 = self.initial_interval();
        self.cmin = self.min_interval();
        if self.speed != 0.0 {
            self.cn = fabsf(scale / self.speed);
            self.step_interval = self.cn;
        }
    }

    /// Reset the position without moving. Target follows and the axis stops.
    pub fn set_current_position(&mut self, position: i64) {
        self.target_position = position;
        self.current_position = position;
        self.halt();
    }

    /// Set an absolute target and recompute the ramp.
    ///
    /// Setting the target already in place does nothing, so calling this on
    /// every pass of a control loop does not advance the ramp between steps.
    pub fn move_to(&mut self, absolute: i64) {
        if self.target_position == absolute {
            return;
        }
        trace!("target {} -> {}", self.target_position, absolute);
        self.target_position = absolute;
        self.compute_new_speed();
    }

    /// Set a target relative to the current position.
    pub fn move_by(&mut self, relative: i64) {
        self.move_to(self.current_position + relative);
    }

    /// Retarget so the axis decelerates to rest as quickly as the acceleration
    /// allows. Does nothing when already at zero speed.
    ///
    /// The ramp continues from the current speed, already decelerating, and the
    /// armed interval stands for the next step. A constant speed set with
    /// [`set_speed`](Self::set_speed) ramps down the same way.
    pub fn stop(&mut self) {
        if self.speed == 0.0 {
            return;
        }

        // Equation 16, rounded up
        let steps_to_stop = self.steps_to_stop() + 1;
        if self.n == 0 || self.constant_speed {
            self.cn = fabsf(self.scale / self.speed).max(self.cmin);
        }
        self.n = -steps_to_stop;
        self.constant_speed = false;

        let target = if self.speed > 0.0 {
            self.current_position + steps_to_stop
        } else {
            self.current_position - steps_to_stop
        };
        trace!("stopping at {} from speed {}", target, self.speed);
        self.target_position = target;
    }

    /// Take one step if at least one interval has elapsed since the last one.
    ///
    /// Returns the new position when a step was taken. The caller emits the pulse;
    /// the time that takes is not subtracted from the next interval.
    pub fn poll_step(&mut self, now: f64) -> Option<i64> {
        if !self.is_stepping() {
            return None;
        }
        if now - self.last_step_time < f64::from(self.step_interval) {
            return None;
        }

        if self.direction == Direction::Clockwise {
            self.current_position += 1;
        } else {
            self.current_position -= 1;
        }
        self.last_step_time = now;
        Some(self.current_position)
    }

    /// Point the direction at the target for constant-speed runs.
    ///
    /// Returns `false` when already at the target.
    pub(crate) fn face_target(&mut self) -> bool {
        let distance = self.distance_to_go();
        if distance == 0 {
            return false;
        }
        self.direction = Direction::from_steps(distance);
        true
    }

    /// Compute the interval and speed of the next step.
    ///
    /// Called after every step and whenever the target, max speed or
    /// acceleration changes.
    pub fn compute_new_speed(&mut self) {
        let distance_to = self.distance_to_go();
        let steps_to_stop = self.steps_to_stop();

        if distance_to == 0 && steps_to_stop <= 1 {
            self.halt();
            return;
        }
        if self.max_speed <= 0.0 {
            self.halt();
            return;
        }

        if distance_to > 0 {
            // Target is clockwise of us
            if self.n > 0 {
                if steps_to_stop >= distance_to || self.direction == Direction::CounterClockwise {
                    trace!("decelerating with {} steps to go", distance_to);
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0
                && steps_to_stop < distance_to
                && self.direction == Direction::Clockwise
            {
                trace!("accelerating again with {} steps to go", distance_to);
                self.n = -self.n;
            }
        } else if distance_to < 0 {
            // Target is counter-clockwise of us
            if self.n > 0 {
                if steps_to_stop >= -distance_to || self.direction == Direction::Clockwise {
                    trace!("decelerating with {} steps to go", distance_to);
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0
                && steps_to_stop < -distance_to
                && self.direction == Direction::CounterClockwise
            {
                trace!("accelerating again with {} steps to go", distance_to);
                self.n = -self.n;
            }
        }

        if self.n == 0 {
            // First step from rest
            self.cn = self.c0;
            self.direction = if distance_to > 0 {
                Direction::Clockwise
            } else {
                Direction::CounterClockwise
            };
        } else {
            // Equation 13; n > 0 shortens the interval, n < 0 lengthens it
            self.cn -= (2.0 * self.cn) / ((4.0 * self.n as f32) + 1.0);
        }
        self.cn = self.cn.max(self.cmin);
        self.n += 1;
        self.constant_speed = false;

        self.step_interval = self.cn;
        self.speed = (self.scale / self.cn).min(self.max_speed);
        if self.direction == Direction::CounterClockwise {
            self.speed = -self.speed;
        }
    }

    fn apply_speed(&mut self, speed: f32) {
        if speed.is_nan() {
            warn!("ignoring NaN speed");
            return;
        }
        let speed = speed.clamp(-self.max_speed, self.max_speed);
        self.constant_speed = speed != 0.0;
        if speed == 0.0 {
            self.step_interval = 0.0;
        } else {
            self.step_interval = fabsf(self.scale / speed);
            self.direction = if speed > 0.0 {
                Direction::Clockwise
            } else {
                Direction::CounterClockwise
            };
        }
        self.speed = speed;
    }

    fn halt(&mut self) {
        self.step_interval = 0.0;
        self.speed = 0.0;
        self.n = 0;
        self.constant_speed = false;
        self.direction = Direction::Stationary;
    }

    /// Steps needed to decelerate to rest from the current speed (Equation 16).
    fn steps_to_stop(&self) -> i64 {
        ((self.speed * self.speed) / (2.0 * self.acceleration)) as i64
    }

    fn initial_interval(&self) -> f32 {
        C0_CORRECTION * sqrtf(2.0 / self.acceleration) * self.scale
    }

    fn min_interval(&self) -> f32 {
        if self.max_speed > 0.0 {
            self.scale / self.max_speed
        } else {
            f32::INFINITY
        }
    }
}
