//! A single stepper axis: speed ramp, signalling and hardware in one place.

use embedded_hal::delay::DelayNs;

use crate::clock::Clock;
use crate::error::Result;
use crate::motion::{Direction, MotionPhase, MotionProfile};
use crate::signal::{Interface, PinOutput, PulseSignaler, StepFn};

use super::builder::AxisBuilder;
use super::stepper::Stepper;

/// One stepper axis.
///
/// Generic over:
/// - `P`: pin backend (must implement [`PinOutput`])
/// - `D`: delay provider for DRIVER pulse widths (must implement `DelayNs`)
/// - `C`: time source (must implement [`Clock`])
/// - `F`: step callback type for [`Interface::Function`] (defaults to [`StepFn`])
///
/// Nothing happens until the axis is polled: call [`run`](Self::run) (ramped) or
/// [`run_speed`](Self::run_speed) (constant speed) as often as possible, at least
/// once per step interval.
pub struct Axis<P, D, C, F = StepFn> {
    /// Axis name for logging/debugging.
    name: heapless::String<32>,

    /// Kinematic state and ramp.
    profile: MotionProfile,

    /// Step to signal translation.
    signaler: PulseSignaler<F>,

    /// Pin backend.
    pins: P,

    /// Delay provider for pulse widths.
    delay: D,

    /// Time source.
    clock: C,
}

impl<P, D, C, F> core::fmt::Debug for Axis<P, D, C, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Axis")
            .field("name", &self.name)
            .field("profile", &self.profile)
            .field("signaler", &self.signaler)
            .finish_non_exhaustive()
    }
}

impl<P, D, C> Axis<P, D, C>
where
    P: PinOutput,
    D: DelayNs,
    C: Clock,
{
    /// Start building an axis.
    pub fn builder() -> AxisBuilder<P, D, C> {
        AxisBuilder::new()
    }
}

impl<P, D, C, F> Axis<P, D, C, F>
where
    P: PinOutput,
    D: DelayNs,
    C: Clock,
    F: FnMut() -> Result<()>,
{
    pub(crate) fn from_parts(
        name: heapless::String<32>,
        profile: MotionProfile,
        signaler: PulseSignaler<F>,
        pins: P,
        delay: D,
        clock: C,
    ) -> Self {
        Self {
            name,
            profile,
            signaler,
            pins,
            delay,
            clock,
        }
    }

    /// Get the axis name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Kinematic state.
    #[inline]
    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Signalling configuration.
    #[inline]
    pub fn signaler(&self) -> &PulseSignaler<F> {
        &self.signaler
    }

    /// Wiring interface.
    #[inline]
    pub fn interface(&self) -> Interface {
        self.signaler.interface()
    }

    /// Borrow the pin backend.
    #[inline]
    pub fn pin_output(&self) -> &P {
        &self.pins
    }

    /// Borrow the clock.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Tear the axis down, returning its hardware.
    pub fn release(self) -> (P, D, C) {
        (self.pins, self.delay, self.clock)
    }

    // Motion state

    /// Current position in steps.
    #[inline]
    pub fn current_position(&self) -> i64 {
        self.profile.current_position()
    }

    /// Target position in steps.
    #[inline]
    pub fn target_position(&self) -> i64 {
        self.profile.target_position()
    }

    /// Signed steps from the current position to the target.
    #[inline]
    pub fn distance_to_go(&self) -> i64 {
        self.profile.distance_to_go()
    }

    /// Current signed speed.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.profile.speed()
    }

    /// Maximum speed.
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.profile.max_speed()
    }

    /// Acceleration rate.
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.profile.acceleration()
    }

    /// Clock units per second.
    #[inline]
    pub fn speed_scale(&self) -> f32 {
        self.profile.speed_scale()
    }

    /// Interval to the next step in clock units; zero when stopped.
    #[inline]
    pub fn step_interval(&self) -> f32 {
        self.profile.step_interval()
    }

    /// Direction of the last computed step.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.profile.direction()
    }

    /// Current ramp phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.profile.phase()
    }

    /// Whether the axis is moving or has distance left to go.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.profile.is_running()
    }

    // Motion commands

    /// Set an absolute target.
    pub fn move_to(&mut self, absolute: i64) {
        self.profile.move_to(absolute);
    }

    /// Set a target relative to the current position.
    pub fn move_by(&mut self, relative: i64) {
        self.profile.move_by(relative);
    }

    /// Set the maximum speed.
    pub fn set_max_speed(&mut self, speed: f32) {
        self.profile.set_max_speed(speed);
    }

    /// Set the acceleration rate. Zero is ignored.
    pub fn set_acceleration(&mut self, acceleration: f32) {
        self.profile.set_acceleration(acceleration);
    }

    /// Set a constant speed for [`run_speed`](Self::run_speed).
    pub fn set_speed(&mut self, speed: f32) {
        self.profile.set_speed(speed);
    }

    /// Set the number of clock units per second.
    pub fn set_speed_scale(&mut self, scale: f32) {
        self.profile.set_speed_scale(scale);
    }

    /// Reset the position without moving; the axis stops.
    pub fn set_current_position(&mut self, position: i64) {
        self.profile.set_current_position(position);
    }

    /// Decelerate to rest as quickly as the acceleration allows.
    pub fn stop(&mut self) {
        self.profile.stop();
    }

    // Polling

    /// Take one step at the current speed if it is due.
    ///
    /// Returns `true` when a step was taken. Does not touch the ramp.
    pub fn run_speed(&mut self) -> Result<bool> {
        if !self.profile.is_stepping() {
            return Ok(false);
        }

        let now = self.clock.now();
        match self.profile.poll_step(now) {
            Some(position) => {
                let direction = self.profile.direction();
                self.signaler
                    .step(&mut self.pins, &mut self.delay, direction, position)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Step if due and advance the ramp.
    ///
    /// Returns `true` while the axis is moving or has distance left to go.
    pub fn run(&mut self) -> Result<bool> {
        if self.run_speed()? {
            self.profile.compute_new_speed();
        }
        Ok(self.profile.is_running())
    }

    /// Block until the axis reaches its target and stops.
    pub fn run_to_position(&mut self) -> Result<()> {
        while self.run()? {}
        Ok(())
    }

    /// Set a target and block until it is reached.
    pub fn run_to_new_position(&mut self, position: i64) -> Result<()> {
        self.move_to(position);
        self.run_to_position()
    }

    /// Step toward the target at the constant speed, without ramping.
    ///
    /// Returns `false` once the target is reached or no step was due.
    pub fn run_speed_to_position(&mut self) -> Result<bool> {
        if !self.profile.face_target() {
            return Ok(false);
        }
        self.run_speed()
    }

    // Outputs

    /// Switch the signal pins to outputs and drive the enable pin active.
    pub fn enable_outputs(&mut self) -> Result<()> {
        debug!("enabling outputs on {:?}", self.signaler.pins());
        self.signaler.enable_outputs(&mut self.pins, true)
    }

    /// Drive all signal pins low and the enable pin inactive.
    pub fn disable_outputs(&mut self) -> Result<()> {
        debug!("disabling outputs on {:?}", self.signaler.pins());
        self.signaler.enable_outputs(&mut self.pins, false)
    }

    /// Set the enable pin and drive it active right away.
    ///
    /// [`NO_PIN`](crate::signal::NO_PIN) removes the enable pin.
    pub fn set_enable_pin(&mut self, pin: u8) -> Result<()> {
        self.signaler.set_enable_pin(pin);
        self.signaler.assert_enable(&mut self.pins)
    }

    /// Set whether the enable pin is active low.
    pub fn set_enable_inverted(&mut self, inverted: bool) {
        self.signaler.set_enable_inverted(inverted);
    }

    /// Set the signal pin inversion mask; bit `i` inverts pin `i`.
    pub fn set_pins_inverted(&mut self, mask: u8) {
        self.signaler.set_inverted_mask(mask);
    }

    /// Set DRIVER inversion: pin 0 is STEP, pin 1 is DIR.
    pub fn set_driver_pins_inverted(&mut self, direction: bool, step: bool) {
        self.signaler.set_inverted(&[step, direction]);
    }

    /// Reassign the signal pins.
    pub fn set_pins(&mut self, pins: &[u8]) {
        self.signaler.set_pins(pins);
    }

    /// Set the DRIVER pulse width in microseconds.
    pub fn set_min_pulse_width_us(&mut self, width: u32) {
        self.signaler.set_min_pulse_width_us(width);
    }

    /// Append a clockwise step callback. Returns `false` when the list is full.
    pub fn add_forward(&mut self, callback: F) -> bool {
        self.signaler.add_forward(callback)
    }

    /// Append a counter-clockwise step callback. Returns `false` when the list is full.
    pub fn add_backward(&mut self, callback: F) -> bool {
        self.signaler.add_backward(callback)
    }
}

impl<P, D, C, F> Stepper for Axis<P, D, C, F>
where
    P: PinOutput,
    D: DelayNs,
    C: Clock,
    F: FnMut() -> Result<()>,
{
    fn current_position(&self) -> i64 {
        self.profile.current_position()
    }

    fn target_position(&self) -> i64 {
        self.profile.target_position()
    }

    fn max_speed(&self) -> f32 {
        self.profile.max_speed()
    }

    fn speed(&self) -> f32 {
        self.profile.speed()
    }

    fn move_to(&mut self, absolute: i64) {
        self.profile.move_to(absolute);
    }

    fn set_max_speed(&mut self, speed: f32) {
        self.profile.set_max_speed(speed);
    }

    fn set_speed(&mut self, speed: f32) {
        self.profile.set_speed(speed);
    }

    fn run_speed(&mut self) -> Result<bool> {
        Axis::run_speed(self)
    }
}
