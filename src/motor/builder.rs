//! Builder pattern for Axis.

use embedded_hal::delay::DelayNs;

use crate::clock::Clock;
use crate::config::{AxisConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::motion::MotionProfile;
use crate::signal::{Interface, PinOutput, PulseSignaler, StepFn, MAX_CALLBACKS, MAX_PINS, NO_PIN};

use super::axis::Axis;

/// Builder for creating [`Axis`] instances.
///
/// Defaults match a freshly constructed axis: FUNCTION interface, pins
/// `[0, 1, 2, 3]`, max speed 1, acceleration 1, speed scale 1, 1 µs pulse width,
/// outputs enabled on build.
pub struct AxisBuilder<P, D, C, F = StepFn> {
    pin_output: Option<P>,
    delay: Option<D>,
    clock: Option<C>,
    name: Option<heapless::String<32>>,
    interface: Interface,
    pins: heapless::Vec<u8, MAX_PINS>,
    pins_inverted: u8,
    enable_pin: Option<u8>,
    enable_inverted: bool,
    max_speed: f32,
    acceleration: f32,
    speed: f32,
    speed_scale: f32,
    min_pulse_width_us: u32,
    enable: bool,
    forward: heapless::Vec<F, MAX_CALLBACKS>,
    backward: heapless::Vec<F, MAX_CALLBACKS>,
}

impl<P, D, C, F> Default for AxisBuilder<P, D, C, F> {
    fn default() -> Self {
        let mut pins = heapless::Vec::new();
        for pin in 0..MAX_PINS as u8 {
            let _ = pins.push(pin);
        }
        Self {
            pin_output: None,
            delay: None,
            clock: None,
            name: None,
            interface: Interface::default(),
            pins,
            pins_inverted: 0,
            enable_pin: None,
            enable_inverted: false,
            max_speed: 1.0,
            acceleration: 1.0,
            speed: 0.0,
            speed_scale: 1.0,
            min_pulse_width_us: 1,
            enable: true,
            forward: heapless::Vec::new(),
            backward: heapless::Vec::new(),
        }
    }
}

impl<P, D, C> AxisBuilder<P, D, C> {
    /// Create a new builder with function-pointer callbacks.
    ///
    /// Use [`Default`] to pick another callback type.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P, D, C, F> AxisBuilder<P, D, C, F>
where
    P: PinOutput,
    D: DelayNs,
    C: Clock,
    F: FnMut() -> Result<()>,
{
    /// Set the pin backend.
    pub fn pin_output(mut self, pins: P) -> Self {
        self.pin_output = Some(pins);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: D) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the time source.
    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the axis name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set the wiring interface.
    pub fn interface(mut self, interface: Interface) -> Self {
        self.interface = interface;
        self
    }

    /// Set the signal pins in signal order. At most four are kept.
    pub fn pins(mut self, pins: &[u8]) -> Self {
        self.pins.clear();
        for &pin in pins.iter().take(MAX_PINS) {
            let _ = self.pins.push(pin);
        }
        self
    }

    /// Set per-pin inversion flags.
    pub fn pins_inverted(mut self, flags: &[bool]) -> Self {
        self.pins_inverted = flags
            .iter()
            .take(MAX_PINS)
            .enumerate()
            .fold(0, |mask, (i, &inv)| mask | (u8::from(inv) << i));
        self
    }

    /// Set the enable pin; [`NO_PIN`] leaves it unwired.
    pub fn enable_pin(mut self, pin: u8) -> Self {
        self.enable_pin = (pin != NO_PIN).then_some(pin);
        self
    }

    /// Set whether the enable pin is active low.
    pub fn enable_inverted(mut self, inverted: bool) -> Self {
        self.enable_inverted = inverted;
        self
    }

    /// Set the maximum speed.
    pub fn max_speed(mut self, speed: f32) -> Self {
        self.max_speed = speed;
        self
    }

    /// Set the acceleration rate.
    pub fn acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set the initial constant speed.
    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the number of clock units per second.
    pub fn speed_scale(mut self, scale: f32) -> Self {
        self.speed_scale = scale;
        self
    }

    /// Set the DRIVER pulse width in microseconds.
    pub fn min_pulse_width_us(mut self, width: u32) -> Self {
        self.min_pulse_width_us = width;
        self
    }

    /// Set whether outputs are enabled on build.
    pub fn enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    /// Append a clockwise step callback. Extra callbacks beyond
    /// [`MAX_CALLBACKS`] are dropped.
    pub fn forward(mut self, callback: F) -> Self {
        if self.forward.push(callback).is_err() {
            warn!("forward callback list full");
        }
        self
    }

    /// Append a counter-clockwise step callback. Extra callbacks beyond
    /// [`MAX_CALLBACKS`] are dropped.
    pub fn backward(mut self, callback: F) -> Self {
        if self.backward.push(callback).is_err() {
            warn!("backward callback list full");
        }
        self
    }

    /// Configure from an AxisConfig.
    pub fn from_axis_config(self, config: &AxisConfig) -> Self {
        let mut builder = self
            .interface(config.interface)
            .pins(config.active_pins())
            .pins_inverted(&config.pins_inverted)
            .enable_inverted(config.enable_inverted)
            .max_speed(config.max_speed)
            .acceleration(config.acceleration)
            .speed(config.speed)
            .speed_scale(config.speed_scale)
            .min_pulse_width_us(config.min_pulse_width_us)
            .enable(config.enable);
        builder.enable_pin = config.enable_pin;
        builder
    }

    /// Configure from SystemConfig by axis name.
    pub fn from_config(self, config: &SystemConfig, axis_name: &str) -> Result<Self> {
        let axis_config = config.axis(axis_name).ok_or_else(|| {
            Error::Config(ConfigError::AxisNotFound(
                heapless::String::try_from(axis_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.name(axis_name).from_axis_config(axis_config))
    }

    /// Build the Axis.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin backend, delay or clock is missing, if the
    /// acceleration is zero, if the speed scale is not positive, or if the
    /// interface needs more pins than were given. Enabling outputs may fail
    /// with a pin error.
    pub fn build(self) -> Result<Axis<P, D, C, F>> {
        let pins = self
            .pin_output
            .ok_or(Error::Config(ConfigError::MissingField("pin_output")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;
        let clock = self
            .clock
            .ok_or(Error::Config(ConfigError::MissingField("clock")))?;

        if self.acceleration == 0.0 || !self.acceleration.is_finite() {
            return Err(ConfigError::InvalidAcceleration(self.acceleration).into());
        }
        if !self.max_speed.is_finite() {
            return Err(ConfigError::InvalidMaxSpeed(self.max_speed).into());
        }
        if !(self.speed_scale > 0.0) || !self.speed_scale.is_finite() {
            return Err(ConfigError::InvalidSpeedScale(self.speed_scale).into());
        }
        let required = self.interface.pin_count();
        if self.interface.uses_pins() && self.pins.len() < required {
            return Err(ConfigError::NotEnoughPins {
                interface: self.interface,
                required,
                provided: self.pins.len(),
            }
            .into());
        }

        let name = self
            .name
            .unwrap_or_else(|| heapless::String::try_from("axis").unwrap_or_default());

        let mut profile = MotionProfile::new();
        profile.set_speed_scale(self.speed_scale);
        profile.set_max_speed(self.max_speed);
        profile.set_acceleration(self.acceleration);
        profile.set_speed(self.speed);

        let mut signaler = PulseSignaler::new(self.interface, &self.pins);
        signaler.set_inverted_mask(self.pins_inverted);
        signaler.set_enable_pin(self.enable_pin.unwrap_or(NO_PIN));
        signaler.set_enable_inverted(self.enable_inverted);
        signaler.set_min_pulse_width_us(self.min_pulse_width_us);
        for callback in self.forward {
            signaler.add_forward(callback);
        }
        for callback in self.backward {
            signaler.add_backward(callback);
        }

        let mut axis = Axis::from_parts(name, profile, signaler, pins, delay, clock);
        if self.enable {
            axis.enable_outputs()?;
        }
        Ok(axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimClock;
    use crate::signal::NoPins;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    fn builder() -> AxisBuilder<NoPins, NoopDelay, SimClock> {
        AxisBuilder::new()
            .pin_output(NoPins)
            .delay(NoopDelay::new())
            .clock(SimClock::new(1e-3))
    }

    #[test]
    fn test_defaults() {
        let axis = builder().build().unwrap();
        assert_eq!(axis.name(), "axis");
        assert_eq!(axis.interface(), Interface::Function);
        assert_eq!(axis.max_speed(), 1.0);
        assert_eq!(axis.acceleration(), 1.0);
        assert_eq!(axis.speed_scale(), 1.0);
        assert_eq!(axis.speed(), 0.0);
        assert_eq!(axis.signaler().min_pulse_width_us(), 1);
        assert_eq!(axis.signaler().enable_pin(), None);
    }

    #[test]
    fn test_missing_clock() {
        let result = AxisBuilder::<NoPins, NoopDelay, SimClock>::new()
            .pin_output(NoPins)
            .delay(NoopDelay::new())
            .build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField("clock")))
        ));
    }

    #[test]
    fn test_zero_acceleration_rejected() {
        let result = builder().acceleration(0.0).build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidAcceleration(_)))
        ));
    }

    #[test]
    fn test_bad_scale_rejected() {
        let result = builder().speed_scale(-1.0).build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidSpeedScale(_)))
        ));
    }

    #[test]
    fn test_not_enough_pins() {
        let result = builder()
            .interface(Interface::Half4Wire)
            .pins(&[1, 2, 3])
            .build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::NotEnoughPins {
                required: 4,
                provided: 3,
                ..
            }))
        ));
    }

    #[test]
    fn test_negative_inputs_normalized() {
        let axis = builder()
            .max_speed(-200.0)
            .acceleration(-50.0)
            .speed(-500.0)
            .build()
            .unwrap();
        assert_eq!(axis.max_speed(), 200.0);
        assert_eq!(axis.acceleration(), 50.0);
        assert_eq!(axis.speed(), -200.0);
    }

    #[test]
    fn test_wiring_settings_applied() {
        let axis = builder()
            .name("wrist")
            .interface(Interface::Full3Wire)
            .pins(&[7, 8, 9])
            .pins_inverted(&[false, true, true])
            .enable_pin(12)
            .enable_inverted(true)
            .min_pulse_width_us(20)
            .build()
            .unwrap();

        assert_eq!(axis.name(), "wrist");
        assert_eq!(axis.signaler().pins(), &[7, 8, 9]);
        assert_eq!(axis.signaler().inverted_mask(), 0b110);
        assert_eq!(axis.signaler().enable_pin(), Some(12));
        assert!(axis.signaler().enable_inverted());
        assert_eq!(axis.signaler().min_pulse_width_us(), 20);
    }

    #[test]
    fn test_no_pin_sentinel() {
        let axis = builder().enable_pin(NO_PIN).build().unwrap();
        assert_eq!(axis.signaler().enable_pin(), None);
    }
}
