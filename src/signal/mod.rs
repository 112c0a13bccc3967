//! Step signalling: wiring interfaces, indexed pin access and the pulse signaler.

mod interface;
mod pins;
mod signaler;

pub use interface::{driver_sequence, Interface};
pub use pins::{BankError, NoPins, OutputPinBank, PinMode, PinOutput};
#[cfg(feature = "alloc")]
pub use signaler::BoxedStepFn;
pub use signaler::{PulseSignaler, StepFn, MAX_CALLBACKS, MAX_PINS, NO_PIN};
