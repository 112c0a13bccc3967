//! Synchronized multi-axis example.
//!
//! Builds a two-axis arm from TOML configuration and moves both joints so they
//! start and finish together, counting steps through callbacks.

use std::sync::atomic::{AtomicI64, Ordering};

use accel_axis::{parse_config, AxisBuilder, MultiAxis, NoPins, SimClock};
use embedded_hal_mock::eh1::delay::NoopDelay;

const CONFIG: &str = r#"
[axes.base]
max_speed = 200.0
acceleration = 100.0

[axes.shoulder]
max_speed = 200.0
acceleration = 100.0

[groups.arm]
axes = ["base", "shoulder"]
"#;

static BASE_STEPS: AtomicI64 = AtomicI64::new(0);

fn base_forward() -> accel_axis::Result<()> {
    BASE_STEPS.fetch_add(1, Ordering::Relaxed);
    Ok(())
}

fn base_backward() -> accel_axis::Result<()> {
    BASE_STEPS.fetch_sub(1, Ordering::Relaxed);
    Ok(())
}

fn main() -> accel_axis::Result<()> {
    println!("=== Synchronized Axes Example ===\n");

    let config = parse_config(CONFIG)?;
    let clock = SimClock::new(1e-4);

    let mut joints = Vec::new();
    for name in config.require_group("arm")?.axis_names() {
        let mut builder = AxisBuilder::new()
            .from_config(&config, name)?
            .pin_output(NoPins)
            .delay(NoopDelay::new())
            .clock(&clock);
        if name == "base" {
            builder = builder.forward(base_forward).backward(base_backward);
        }
        joints.push(builder.build()?);
    }

    let mut arm = MultiAxis::new();
    for joint in joints.iter_mut() {
        arm.add(joint);
    }

    for targets in [[400, -100], [0, 300], [-250, 300]] {
        let start = clock.peek();
        arm.move_to(&targets)?;
        arm.run_speed_to_position()?;
        println!(
            "reached {:?} in {:.3} s (simulated)",
            targets,
            clock.peek() - start
        );
    }

    drop(arm);
    println!(
        "\nbase callbacks counted {} net steps, position {}",
        BASE_STEPS.load(Ordering::Relaxed),
        joints[0].current_position()
    );
    Ok(())
}
