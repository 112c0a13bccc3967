//! Pulse signaler: turns a step into pin levels or callback invocations.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use crate::error::{MotorError, Result};
use crate::motion::Direction;

use super::interface::{driver_sequence, Interface};
use super::pins::{PinMode, PinOutput};

/// Enable pin index meaning "no enable pin wired".
pub const NO_PIN: u8 = 255;

/// Most signal pins any interface drives.
pub const MAX_PINS: usize = 4;

/// Callbacks per direction for [`Interface::Function`].
pub const MAX_CALLBACKS: usize = 4;

/// Default step callback type.
pub type StepFn = fn() -> Result<()>;

/// Heap-allocated step callback, for closures with captured state.
#[cfg(feature = "alloc")]
pub type BoxedStepFn = alloc::boxed::Box<dyn FnMut() -> Result<()>>;

/// Maps steps to signals for one axis.
///
/// Bit `i` of every mask drives `pins[i]`, flipped when bit `i` of the
/// inversion mask is set.
pub struct PulseSignaler<F = StepFn> {
    interface: Interface,
    pins: [u8; MAX_PINS],
    inverted: u8,
    enable_pin: Option<u8>,
    enable_inverted: bool,
    min_pulse_width_us: u32,
    forward: heapless::Vec<F, MAX_CALLBACKS>,
    backward: heapless::Vec<F, MAX_CALLBACKS>,
}

impl<F> core::fmt::Debug for PulseSignaler<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PulseSignaler")
            .field("interface", &self.interface)
            .field("pins", &self.pins)
            .field("inverted", &self.inverted)
            .field("enable_pin", &self.enable_pin)
            .field("enable_inverted", &self.enable_inverted)
            .field("min_pulse_width_us", &self.min_pulse_width_us)
            .field("forward", &self.forward.len())
            .field("backward", &self.backward.len())
            .finish()
    }
}

impl<F> PulseSignaler<F> {
    /// Create a signaler. Pins not listed keep their default index (0, 1, 2, 3).
    pub fn new(interface: Interface, pins: &[u8]) -> Self {
        let mut signaler = Self {
            interface,
            pins: [0, 1, 2, 3],
            inverted: 0,
            enable_pin: None,
            enable_inverted: false,
            min_pulse_width_us: 1,
            forward: heapless::Vec::new(),
            backward: heapless::Vec::new(),
        };
        signaler.set_pins(pins);
        signaler
    }

    /// Wiring interface.
    #[inline]
    pub fn interface(&self) -> Interface {
        self.interface
    }

    /// Pin indices in signal order.
    #[inline]
    pub fn pins(&self) -> &[u8] {
        &self.pins[..self.interface.pin_count()]
    }

    /// Enable pin index, if one is wired.
    #[inline]
    pub fn enable_pin(&self) -> Option<u8> {
        self.enable_pin
    }

    /// Inversion mask; bit `i` inverts signal pin `i`.
    #[inline]
    pub fn inverted_mask(&self) -> u8 {
        self.inverted
    }

    /// Whether the enable pin is active low.
    #[inline]
    pub fn enable_inverted(&self) -> bool {
        self.enable_inverted
    }

    /// DRIVER pulse width in microseconds.
    #[inline]
    pub fn min_pulse_width_us(&self) -> u32 {
        self.min_pulse_width_us
    }

    /// Reassign signal pins. Extra entries beyond [`MAX_PINS`] are ignored.
    pub fn set_pins(&mut self, pins: &[u8]) {
        for (slot, &pin) in self.pins.iter_mut().zip(pins) {
            *slot = pin;
        }
    }

    /// Set the inversion mask.
    pub fn set_inverted_mask(&mut self, mask: u8) {
        self.inverted = mask;
    }

    /// Set inversion from per-pin flags.
    pub fn set_inverted(&mut self, flags: &[bool]) {
        self.inverted = flags
            .iter()
            .take(MAX_PINS)
            .enumerate()
            .fold(0, |mask, (i, &inv)| mask | (u8::from(inv) << i));
    }

    /// Set the enable pin; [`NO_PIN`] removes it.
    pub fn set_enable_pin(&mut self, pin: u8) {
        self.enable_pin = (pin != NO_PIN).then_some(pin);
    }

    /// Set whether the enable pin is active low.
    pub fn set_enable_inverted(&mut self, inverted: bool) {
        self.enable_inverted = inverted;
    }

    /// Set the DRIVER pulse width in microseconds.
    pub fn set_min_pulse_width_us(&mut self, width: u32) {
        self.min_pulse_width_us = width;
    }

    /// Append a clockwise callback. Returns `false` when the list is full.
    pub fn add_forward(&mut self, callback: F) -> bool {
        self.forward.push(callback).is_ok()
    }

    /// Append a counter-clockwise callback. Returns `false` when the list is full.
    pub fn add_backward(&mut self, callback: F) -> bool {
        self.backward.push(callback).is_ok()
    }

    /// Write a mask to the signal pins, honouring inversion.
    pub fn set_output_pins<P: PinOutput>(&self, pins: &mut P, mask: u8) -> Result<()> {
        for (i, &pin) in self.pins().iter().enumerate() {
            let on = mask & (1 << i) != 0;
            let inverted = self.inverted & (1 << i) != 0;
            write(pins, pin, PinState::from(on ^ inverted))?;
        }
        Ok(())
    }

    /// Power the outputs up or down.
    ///
    /// Enabling switches the signal pins to outputs and drives the enable pin
    /// active. Disabling writes all signal pins low (through inversion) and drives
    /// the enable pin inactive. No-op for [`Interface::Function`].
    pub fn enable_outputs<P: PinOutput>(&self, pins: &mut P, on: bool) -> Result<()> {
        if !self.interface.uses_pins() {
            return Ok(());
        }

        if on {
            for &pin in self.pins() {
                set_mode(pins, pin, PinMode::Output)?;
            }
        } else {
            self.set_output_pins(pins, 0)?;
        }

        if let Some(enable) = self.enable_pin {
            set_mode(pins, enable, PinMode::Output)?;
            write(pins, enable, PinState::from(on ^ self.enable_inverted))?;
        }
        Ok(())
    }

    /// Drive the enable pin active right away, if one is wired.
    pub(crate) fn assert_enable<P: PinOutput>(&self, pins: &mut P) -> Result<()> {
        if let Some(enable) = self.enable_pin {
            set_mode(pins, enable, PinMode::Output)?;
            write(pins, enable, PinState::from(!self.enable_inverted))?;
        }
        Ok(())
    }
}

impl<F: FnMut() -> Result<()>> PulseSignaler<F> {
    /// Signal one step taken in `direction`, landing on position `step`.
    pub fn step<P, D>(
        &mut self,
        pins: &mut P,
        delay: &mut D,
        direction: Direction,
        step: i64,
    ) -> Result<()>
    where
        P: PinOutput,
        D: DelayNs,
    {
        match self.interface {
            Interface::Function => {
                let callbacks = match direction {
                    Direction::Clockwise => &mut self.forward,
                    Direction::CounterClockwise => &mut self.backward,
                    Direction::Stationary => return Ok(()),
                };
                for callback in callbacks.iter_mut() {
                    callback()?;
                }
                Ok(())
            }
            Interface::Driver => {
                let Some([dir, pulse, release]) = driver_sequence(direction) else {
                    return Ok(());
                };
                self.set_output_pins(pins, dir)?;
                self.set_output_pins(pins, pulse)?;
                delay.delay_us(self.min_pulse_width_us);
                self.set_output_pins(pins, release)
            }
            interface => match interface.step_mask(step) {
                Some(mask) => self.set_output_pins(pins, mask),
                None => Ok(()),
            },
        }
    }
}

fn write<P: PinOutput>(pins: &mut P, pin: u8, state: PinState) -> Result<()> {
    pins.write_pin(pin, state)
        .map_err(|_| MotorError::PinError { pin })?;
    Ok(())
}

fn set_mode<P: PinOutput>(pins: &mut P, pin: u8, mode: PinMode) -> Result<()> {
    pins.set_pin_mode(pin, mode)
        .map_err(|_| MotorError::PinError { pin })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[derive(Default)]
    struct Recorder {
        modes: Vec<(u8, PinMode)>,
        writes: Vec<(u8, PinState)>,
    }

    impl ErrorType for Recorder {
        type Error = Infallible;
    }

    impl PinOutput for Recorder {
        fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> core::result::Result<(), Infallible> {
            self.modes.push((pin, mode));
            Ok(())
        }

        fn write_pin(&mut self, pin: u8, state: PinState) -> core::result::Result<(), Infallible> {
            self.writes.push((pin, state));
            Ok(())
        }
    }

    struct Broken;

    impl ErrorType for Broken {
        type Error = ErrorKind;
    }

    impl PinOutput for Broken {
        fn set_pin_mode(&mut self, _: u8, _: PinMode) -> core::result::Result<(), ErrorKind> {
            Err(ErrorKind::Other)
        }

        fn write_pin(&mut self, _: u8, _: PinState) -> core::result::Result<(), ErrorKind> {
            Err(ErrorKind::Other)
        }
    }

    use PinState::{High, Low};

    #[test]
    fn test_full4wire_step_writes_all_pins() {
        let mut signaler: PulseSignaler = PulseSignaler::new(Interface::Full4Wire, &[10, 11, 12, 13]);
        let mut pins = Recorder::default();

        signaler
            .step(&mut pins, &mut NoopDelay::new(), Direction::Clockwise, 1)
            .unwrap();

        // 0b0110
        assert_eq!(pins.writes, [(10, Low), (11, High), (12, High), (13, Low)]);
    }

    #[test]
    fn test_inversion_flips_levels() {
        let mut signaler: PulseSignaler = PulseSignaler::new(Interface::Full2Wire, &[4, 5]);
        signaler.set_inverted(&[true, false]);
        let mut pins = Recorder::default();

        signaler.set_output_pins(&mut pins, 0b11).unwrap();
        assert_eq!(pins.writes, [(4, Low), (5, High)]);
    }

    #[test]
    fn test_driver_sets_direction_before_pulse() {
        let mut signaler: PulseSignaler = PulseSignaler::new(Interface::Driver, &[2, 3]);
        let mut pins = Recorder::default();

        signaler
            .step(&mut pins, &mut NoopDelay::new(), Direction::CounterClockwise, -1)
            .unwrap();

        assert_eq!(
            pins.writes,
            [(2, Low), (3, Low), (2, High), (3, Low), (2, Low), (3, Low)]
        );
    }

    #[test]
    fn test_enable_outputs_drives_enable_pin() {
        let mut signaler: PulseSignaler = PulseSignaler::new(Interface::Full3Wire, &[0, 1, 2]);
        signaler.set_enable_pin(7);
        signaler.set_enable_inverted(true);
        let mut pins = Recorder::default();

        signaler.enable_outputs(&mut pins, true).unwrap();
        assert_eq!(
            pins.modes,
            [
                (0, PinMode::Output),
                (1, PinMode::Output),
                (2, PinMode::Output),
                (7, PinMode::Output)
            ]
        );
        assert_eq!(pins.writes, [(7, Low)]);

        let mut pins = Recorder::default();
        signaler.enable_outputs(&mut pins, false).unwrap();
        assert_eq!(pins.writes, [(0, Low), (1, Low), (2, Low), (7, High)]);
    }

    #[test]
    fn test_no_enable_pin_sentinel() {
        let mut signaler: PulseSignaler = PulseSignaler::new(Interface::Full2Wire, &[0, 1]);
        signaler.set_enable_pin(NO_PIN);
        assert_eq!(signaler.enable_pin(), None);

        let mut pins = Recorder::default();
        signaler.enable_outputs(&mut pins, true).unwrap();
        assert!(pins.writes.is_empty());
        assert_eq!(pins.modes.len(), 2);
    }

    #[test]
    fn test_function_interface_never_touches_pins() {
        let mut signaler: PulseSignaler = PulseSignaler::new(Interface::Function, &[]);
        assert!(signaler.add_forward(|| Ok(())));
        assert!(signaler.enable_outputs(&mut Broken, true).is_ok());
        assert!(signaler
            .step(&mut Broken, &mut NoopDelay::new(), Direction::Clockwise, 1)
            .is_ok());
    }

    #[test]
    fn test_callback_error_propagates() {
        let mut signaler: PulseSignaler = PulseSignaler::new(Interface::Function, &[]);
        signaler.add_backward(|| {
            Err(MotorError::Callback(heapless::String::try_from("jammed").unwrap()).into())
        });

        let result = signaler.step(&mut Recorder::default(), &mut NoopDelay::new(), Direction::CounterClockwise, -1);
        assert!(matches!(result, Err(Error::Motor(MotorError::Callback(_)))));

        // Clockwise list is empty
        assert!(signaler
            .step(&mut Recorder::default(), &mut NoopDelay::new(), Direction::Clockwise, 0)
            .is_ok());
    }

    #[test]
    fn test_callback_list_is_bounded() {
        let mut signaler: PulseSignaler = PulseSignaler::new(Interface::Function, &[]);
        for _ in 0..MAX_CALLBACKS {
            assert!(signaler.add_forward(|| Ok(())));
        }
        assert!(!signaler.add_forward(|| Ok(())));
    }

    #[test]
    fn test_pin_failure_reports_pin() {
        let mut signaler: PulseSignaler = PulseSignaler::new(Interface::Full2Wire, &[6, 9]);
        let result = signaler.step(&mut Broken, &mut NoopDelay::new(), Direction::Clockwise, 0);
        assert_eq!(result, Err(Error::Motor(MotorError::PinError { pin: 6 })));
    }
}
