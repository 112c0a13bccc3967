//! Unit tests for configuration validation.

use accel_axis::config::{parse_config, validate_config, SystemConfig};
use accel_axis::error::{ConfigError, Error};
use accel_axis::Interface;

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
[axes.x]
interface = "full3wire"
pins = [1, 2, 3]
max_speed = 100.0
acceleration = 50.0

[groups.all]
axes = ["x"]
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a group referencing a non-existent axis.
#[test]
fn test_group_invalid_axis_reference() {
    let toml_str = r#"
[axes.x]
max_speed = 100.0
acceleration = 50.0

[groups.bad_ref]
axes = ["x", "nonexistent_axis"]
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    match validate_config(&config) {
        Err(Error::Config(ConfigError::UnknownGroupMember { group, axis })) => {
            assert_eq!(group.as_str(), "bad_ref");
            assert_eq!(axis.as_str(), "nonexistent_axis");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

/// Test validation fails for zero acceleration.
#[test]
fn test_zero_acceleration() {
    let toml_str = r#"
[axes.x]
acceleration = 0.0
"#;

    let result = parse_config(toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidAcceleration(_)))
    ));
}

/// Test validation fails for a non-positive speed scale.
#[test]
fn test_invalid_speed_scale() {
    let toml_str = r#"
[axes.x]
speed_scale = 0.0
"#;

    let result = parse_config(toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidSpeedScale(_)))
    ));
}

/// Test validation fails when the interface needs more pins.
#[test]
fn test_not_enough_pins() {
    let toml_str = r#"
[axes.x]
interface = "half3wire"
pins = [5, 6]
"#;

    let result = parse_config(toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::NotEnoughPins {
            interface: Interface::Half3Wire,
            required: 3,
            provided: 2,
        }))
    ));
}

/// Test validation fails for a group larger than one coordinator.
#[test]
fn test_group_too_large() {
    let mut toml_str = String::new();
    for i in 0..11 {
        toml_str.push_str(&format!("[axes.a{i}]\n"));
    }
    toml_str.push_str("[groups.big]\naxes = [");
    for i in 0..11 {
        toml_str.push_str(&format!("\"a{i}\", "));
    }
    toml_str.push_str("]\n");

    let result = parse_config(&toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::GroupTooLarge { len: 11, .. }))
    ));
}
