//! Basic axis example.
//!
//! Drives a DRIVER-style axis through one ramped move on the operating system
//! clock and prints the speed profile as it goes.
//!
//! The pins are in-memory stand-ins, so this runs without real hardware.

use accel_axis::{Axis, Interface, OutputPinBank, StdClock};

/// Mock delay provider for demonstration.
struct SpinDelay;

impl embedded_hal::delay::DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let start = std::time::Instant::now();
        while start.elapsed().as_nanos() < u128::from(ns) {}
    }
}

/// Mock output pin for demonstration.
struct MockPin {
    high: bool,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }
}

fn main() {
    println!("=== Basic Axis Example ===\n");

    let pins = OutputPinBank::new([MockPin { high: false }, MockPin { high: false }]);

    let mut axis = Axis::builder()
        .name("demo")
        .pin_output(pins)
        .delay(SpinDelay)
        .clock(StdClock::new())
        .interface(Interface::Driver)
        .pins(&[0, 1])
        .max_speed(400.0)
        .acceleration(800.0)
        .min_pulse_width_us(2)
        .build()
        .expect("Failed to build axis");

    println!("Axis created: {} ({:?})", axis.name(), axis.interface());

    axis.move_to(400);
    let mut last_reported = 0;
    while axis.run().expect("step failed") {
        let position = axis.current_position();
        if position - last_reported >= 25 {
            println!(
                "position {:4}  speed {:7.2}  phase {:?}",
                position,
                axis.speed(),
                axis.phase()
            );
            last_reported = position;
        }
    }

    println!("\nArrived at {}", axis.current_position());

    let (bank, _, _) = axis.release();
    let [step, dir] = bank.into_inner();
    println!("STEP high: {}, DIR high: {}", step.high, dir.high);
}
