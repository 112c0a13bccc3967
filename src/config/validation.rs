//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::axis::{AxisConfig, GroupConfig};
use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Each axis has enough pins for its interface
/// - Acceleration is non-zero and finite, max speed is finite
/// - Speed scale is positive
/// - Groups reference configured axes and fit in one coordinator
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (name, axis) in config.axes.iter() {
        validate_axis(name.as_str(), axis)?;
    }

    for (name, group) in config.groups.iter() {
        validate_group(name.as_str(), group, config)?;
    }

    Ok(())
}

fn validate_axis(_name: &str, config: &AxisConfig) -> Result<()> {
    let required = config.interface.pin_count();
    if config.interface.uses_pins() && config.pins.len() < required {
        return Err(Error::Config(ConfigError::NotEnoughPins {
            interface: config.interface,
            required,
            provided: config.pins.len(),
        }));
    }

    // Zero acceleration would divide by zero in the ramp
    if config.acceleration == 0.0 || !config.acceleration.is_finite() {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration,
        )));
    }

    if !config.max_speed.is_finite() {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed(config.max_speed)));
    }

    if !(config.speed_scale > 0.0) || !config.speed_scale.is_finite() {
        return Err(Error::Config(ConfigError::InvalidSpeedScale(
            config.speed_scale,
        )));
    }

    Ok(())
}

fn validate_group(name: &str, group: &GroupConfig, config: &SystemConfig) -> Result<()> {
    if !group.fits() {
        return Err(Error::Config(ConfigError::GroupTooLarge {
            group: heapless::String::try_from(name).unwrap_or_default(),
            len: group.axes.len(),
        }));
    }

    for axis in group.axes.iter() {
        if config.axis(axis.as_str()).is_none() {
            return Err(Error::Config(ConfigError::UnknownGroupMember {
                group: heapless::String::try_from(name).unwrap_or_default(),
                axis: axis.clone(),
            }));
        }
    }

    Ok(())
}
