//! Unit tests for TOML configuration parsing.

use accel_axis::config::{parse_config, SystemConfig};
use accel_axis::{Axis, AxisBuilder, Interface, NoPins, SimClock};
use embedded_hal_mock::eh1::delay::NoopDelay;

const ARM_CONFIG: &str = r#"
[axes.base]
interface = "half4wire"
pins = [8, 9, 10, 11]
pins_inverted = [false, true, false, false]
enable_pin = 12
enable_inverted = true
max_speed = 300.0
acceleration = 150.0
speed_scale = 1000000.0
enable = false

[axes.shoulder]
interface = "driver"
pins = [2, 3]
max_speed = 800.0
acceleration = 400.0
min_pulse_width_us = 20

[axes.gripper]
max_speed = 10.0
acceleration = 5.0

[groups.arm]
axes = ["base", "shoulder"]
"#;

/// Test parsing every axis field from TOML.
#[test]
fn test_parse_axis_config() {
    let config: SystemConfig = toml::from_str(ARM_CONFIG).expect("Failed to parse TOML");
    let base = config.axis("base").expect("Axis not found");

    assert_eq!(base.interface, Interface::Half4Wire);
    assert_eq!(base.pins.as_slice(), &[8, 9, 10, 11]);
    assert_eq!(base.pins_inverted.as_slice(), &[false, true, false, false]);
    assert_eq!(base.enable_pin, Some(12));
    assert!(base.enable_inverted);
    assert_eq!(base.max_speed, 300.0);
    assert_eq!(base.acceleration, 150.0);
    assert_eq!(base.speed_scale, 1_000_000.0);
    assert!(!base.enable);
}

/// Test defaults for omitted fields.
#[test]
fn test_parse_defaults() {
    let config = parse_config(ARM_CONFIG).expect("valid config");
    let gripper = config.axis("gripper").expect("Axis not found");

    assert_eq!(gripper.interface, Interface::Function);
    assert_eq!(gripper.speed, 0.0);
    assert_eq!(gripper.speed_scale, 1.0);
    assert_eq!(gripper.min_pulse_width_us, 1);
    assert_eq!(gripper.enable_pin, None);
    assert!(gripper.enable);
}

/// Test group listing keeps coordinator order.
#[test]
fn test_parse_groups() {
    let config = parse_config(ARM_CONFIG).expect("valid config");

    let groups: Vec<_> = config.group_names().collect();
    assert_eq!(groups, ["arm"]);

    let members: Vec<_> = config
        .require_group("arm")
        .expect("group exists")
        .axis_names()
        .collect();
    assert_eq!(members, ["base", "shoulder"]);
}

/// Test building an axis from a named configuration.
#[test]
fn test_build_axis_from_config() {
    let config = parse_config(ARM_CONFIG).expect("valid config");

    let axis = AxisBuilder::new()
        .from_config(&config, "shoulder")
        .expect("axis exists")
        .pin_output(NoPins)
        .delay(NoopDelay::new())
        .clock(SimClock::new(1e-3))
        .build()
        .expect("valid axis");

    assert_eq!(axis.name(), "shoulder");
    assert_eq!(axis.interface(), Interface::Driver);
    assert_eq!(axis.max_speed(), 800.0);
    assert_eq!(axis.acceleration(), 400.0);
    assert_eq!(axis.signaler().pins(), &[2, 3]);
    assert_eq!(axis.signaler().min_pulse_width_us(), 20);
}

/// Test the enable pin and inversion survive the round through the builder.
#[test]
fn test_build_axis_wiring_from_config() {
    let config = parse_config(ARM_CONFIG).expect("valid config");

    let axis = Axis::builder()
        .pin_output(NoPins)
        .delay(NoopDelay::new())
        .clock(SimClock::new(1.0))
        .from_config(&config, "base")
        .expect("axis exists")
        .build()
        .expect("valid axis");

    assert_eq!(axis.signaler().enable_pin(), Some(12));
    assert!(axis.signaler().enable_inverted());
    assert_eq!(axis.signaler().inverted_mask(), 0b0010);
    assert_eq!(axis.speed_scale(), 1_000_000.0);
}

/// Test unknown axis name.
#[test]
fn test_unknown_axis_name() {
    let config = parse_config(ARM_CONFIG).expect("valid config");

    let result = AxisBuilder::<NoPins, NoopDelay, SimClock>::new().from_config(&config, "elbow");
    assert!(result.is_err());
}

/// Test unknown group name.
#[test]
fn test_unknown_group_name() {
    let config = parse_config(ARM_CONFIG).expect("valid config");

    assert!(config.group("legs").is_none());
    assert!(matches!(
        config.require_group("legs"),
        Err(accel_axis::Error::Config(
            accel_axis::error::ConfigError::GroupNotFound(_)
        ))
    ));
}
