//! Indexed pin access.
//!
//! Axes address their pins by index so one backend can own every line of a
//! board. [`OutputPinBank`] provides that over a set of embedded-hal
//! [`OutputPin`]s.

use embedded_hal::digital::{Error, ErrorKind, ErrorType, OutputPin, PinState};

/// Pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// High impedance input.
    Input,
    /// Push-pull output.
    Output,
}

/// Pin capability the pulse signaler drives.
///
/// Writes must be idempotent: the same level may be written repeatedly.
pub trait PinOutput: ErrorType {
    /// Configure the direction of a pin.
    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error>;

    /// Drive a pin to a level.
    fn write_pin(&mut self, pin: u8, state: PinState) -> Result<(), Self::Error>;
}

impl<T: PinOutput + ?Sized> PinOutput for &mut T {
    #[inline]
    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error> {
        T::set_pin_mode(self, pin, mode)
    }

    #[inline]
    fn write_pin(&mut self, pin: u8, state: PinState) -> Result<(), Self::Error> {
        T::write_pin(self, pin, state)
    }
}

/// Backend for axes that own no pins, such as callback-driven ones.
///
/// Accepts and discards every request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPins;

impl ErrorType for NoPins {
    type Error = core::convert::Infallible;
}

impl PinOutput for NoPins {
    #[inline]
    fn set_pin_mode(&mut self, _pin: u8, _mode: PinMode) -> Result<(), Self::Error> {
        Ok(())
    }

    #[inline]
    fn write_pin(&mut self, _pin: u8, _state: PinState) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Error from an [`OutputPinBank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankError<E> {
    /// The underlying pin failed.
    Pin(E),
    /// No pin at that index.
    NoSuchPin(u8),
    /// Output-only pins cannot be switched to input.
    InputUnsupported(u8),
}

impl<E: Error> Error for BankError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            BankError::Pin(e) => e.kind(),
            BankError::NoSuchPin(_) | BankError::InputUnsupported(_) => ErrorKind::Other,
        }
    }
}

/// Fixed set of embedded-hal output pins addressed by index.
///
/// Pins are already outputs, so switching to [`PinMode::Output`] only checks
/// the index.
#[derive(Debug)]
pub struct OutputPinBank<P, const N: usize> {
    pins: [P; N],
}

impl<P: OutputPin, const N: usize> OutputPinBank<P, N> {
    /// Wrap pins; index `i` addresses `pins[i]`.
    pub fn new(pins: [P; N]) -> Self {
        Self { pins }
    }

    /// Borrow a pin.
    pub fn pin(&self, index: u8) -> Option<&P> {
        self.pins.get(index as usize)
    }

    /// Release the pins.
    pub fn into_inner(self) -> [P; N] {
        self.pins
    }
}

impl<P: OutputPin, const N: usize> ErrorType for OutputPinBank<P, N> {
    type Error = BankError<P::Error>;
}

impl<P: OutputPin, const N: usize> PinOutput for OutputPinBank<P, N> {
    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error> {
        if self.pins.get(pin as usize).is_none() {
            return Err(BankError::NoSuchPin(pin));
        }
        match mode {
            PinMode::Output => Ok(()),
            PinMode::Input => Err(BankError::InputUnsupported(pin)),
        }
    }

    fn write_pin(&mut self, pin: u8, state: PinState) -> Result<(), Self::Error> {
        self.pins
            .get_mut(pin as usize)
            .ok_or(BankError::NoSuchPin(pin))?
            .set_state(state)
            .map_err(BankError::Pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_bank_writes_by_index() {
        let a = PinMock::new(&[Transaction::set(State::High)]);
        let b = PinMock::new(&[Transaction::set(State::Low), Transaction::set(State::High)]);
        let mut bank = OutputPinBank::new([a, b]);

        bank.write_pin(0, PinState::High).unwrap();
        bank.write_pin(1, PinState::Low).unwrap();
        bank.write_pin(1, PinState::High).unwrap();

        for mut pin in bank.into_inner() {
            pin.done();
        }
    }

    #[test]
    fn test_bank_rejects_unknown_pin() {
        let mut bank = OutputPinBank::new([PinMock::new(&[])]);
        assert!(matches!(
            bank.write_pin(3, PinState::High),
            Err(BankError::NoSuchPin(3))
        ));
        assert!(matches!(
            bank.set_pin_mode(0, PinMode::Input),
            Err(BankError::InputUnsupported(0))
        ));
        assert!(bank.set_pin_mode(0, PinMode::Output).is_ok());

        for mut pin in bank.into_inner() {
            pin.done();
        }
    }
}
