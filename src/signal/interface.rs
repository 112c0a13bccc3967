//! Wiring interfaces and their coil energizing sequences.

use serde::Deserialize;

use crate::motion::Direction;

/// Full step, 2 wires: `step & 3` selects the mask.
const FULL2WIRE: [u8; 4] = [0b10, 0b11, 0b01, 0b00];

/// Full step, 3 wires: `step mod 3`.
const FULL3WIRE: [u8; 3] = [0b100, 0b001, 0b010];

/// Full step, 4 wires: `step & 3`.
const FULL4WIRE: [u8; 4] = [0b0101, 0b0110, 0b1010, 0b1001];

/// Half step, 3 wires: `step mod 6`.
const HALF3WIRE: [u8; 6] = [0b100, 0b101, 0b001, 0b011, 0b010, 0b110];

/// Half step, 4 wires: `step & 7`.
const HALF4WIRE: [u8; 8] = [
    0b0001, 0b0101, 0b0100, 0b0110, 0b0010, 0b1010, 0b1000, 0b1001,
];

/// How an axis turns steps into signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interface {
    /// No pins; forward/backward callbacks are invoked per step.
    #[default]
    Function,
    /// External step/direction driver: pin 0 is STEP, pin 1 is DIR.
    Driver,
    /// 2-wire full step.
    Full2Wire,
    /// 3-wire full step.
    Full3Wire,
    /// 4-wire full step.
    Full4Wire,
    /// 3-wire half step.
    Half3Wire,
    /// 4-wire half step.
    Half4Wire,
}

impl Interface {
    /// Number of signal pins the interface is wired with.
    #[inline]
    pub const fn pin_count(self) -> usize {
        match self {
            Interface::Function | Interface::Driver | Interface::Full2Wire => 2,
            Interface::Full3Wire | Interface::Half3Wire => 3,
            Interface::Full4Wire | Interface::Half4Wire => 4,
        }
    }

    /// Whether steps are signalled on pins rather than through callbacks.
    #[inline]
    pub const fn uses_pins(self) -> bool {
        !matches!(self, Interface::Function)
    }

    /// Coil sequence for the stepping interfaces; empty for
    /// [`Interface::Function`] and [`Interface::Driver`].
    pub const fn sequence(self) -> &'static [u8] {
        match self {
            Interface::Function | Interface::Driver => &[],
            Interface::Full2Wire => &FULL2WIRE,
            Interface::Full3Wire => &FULL3WIRE,
            Interface::Full4Wire => &FULL4WIRE,
            Interface::Half3Wire => &HALF3WIRE,
            Interface::Half4Wire => &HALF4WIRE,
        }
    }

    /// Output mask for a step index. Negative indices wrap into the sequence.
    pub fn step_mask(self, step: i64) -> Option<u8> {
        let sequence = self.sequence();
        if sequence.is_empty() {
            return None;
        }
        let index = step.rem_euclid(sequence.len() as i64) as usize;
        Some(sequence[index])
    }
}

/// DRIVER masks for one step: direction set, step high, step low.
///
/// Bit 0 is STEP and bit 1 is DIR (set for clockwise). The direction is written
/// before the pulse so the driver never latches a step with a stale direction.
pub const fn driver_sequence(direction: Direction) -> Option<[u8; 3]> {
    match direction {
        Direction::Clockwise => Some([0b10, 0b11, 0b10]),
        Direction::CounterClockwise => Some([0b00, 0b01, 0b00]),
        Direction::Stationary => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masks(interface: Interface, steps: core::ops::Range<i64>) -> Vec<u8> {
        steps.filter_map(|s| interface.step_mask(s)).collect()
    }

    #[test]
    fn test_full2wire_table() {
        assert_eq!(masks(Interface::Full2Wire, 0..4), [0b10, 0b11, 0b01, 0b00]);
    }

    #[test]
    fn test_full3wire_table() {
        assert_eq!(masks(Interface::Full3Wire, 0..3), [0b100, 0b001, 0b010]);
    }

    #[test]
    fn test_full4wire_table() {
        assert_eq!(
            masks(Interface::Full4Wire, 0..4),
            [0b0101, 0b0110, 0b1010, 0b1001]
        );
    }

    #[test]
    fn test_half3wire_table() {
        assert_eq!(
            masks(Interface::Half3Wire, 0..6),
            [0b100, 0b101, 0b001, 0b011, 0b010, 0b110]
        );
    }

    #[test]
    fn test_half4wire_table() {
        assert_eq!(
            masks(Interface::Half4Wire, 0..8),
            [0b0001, 0b0101, 0b0100, 0b0110, 0b0010, 0b1010, 0b1000, 0b1001]
        );
    }

    #[test]
    fn test_sequences_wrap() {
        for interface in [
            Interface::Full2Wire,
            Interface::Full3Wire,
            Interface::Full4Wire,
            Interface::Half3Wire,
            Interface::Half4Wire,
        ] {
            let len = interface.sequence().len() as i64;
            for step in 0..len {
                assert_eq!(interface.step_mask(step), interface.step_mask(step + len));
                assert_eq!(interface.step_mask(step), interface.step_mask(step - 3 * len));
            }
        }
    }

    #[test]
    fn test_no_sequence_for_function_and_driver() {
        assert_eq!(Interface::Function.step_mask(3), None);
        assert_eq!(Interface::Driver.step_mask(3), None);
        assert!(!Interface::Function.uses_pins());
    }

    #[test]
    fn test_pin_counts() {
        assert_eq!(Interface::Driver.pin_count(), 2);
        assert_eq!(Interface::Half3Wire.pin_count(), 3);
        assert_eq!(Interface::Half4Wire.pin_count(), 4);
    }

    #[test]
    fn test_driver_direction_before_pulse() {
        let [dir, pulse, release] = driver_sequence(Direction::Clockwise).unwrap();
        assert_eq!(dir & 0b10, pulse & 0b10);
        assert_eq!(pulse & 0b01, 1);
        assert_eq!(release, dir);
        assert_eq!(driver_sequence(Direction::Stationary), None);
    }
}
