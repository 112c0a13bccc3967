//! Configuration module for accel-axis.
//!
//! Provides types for loading and validating axis and group configurations
//! from TOML files (with `std` feature) or pre-parsed data.

mod axis;
mod system;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::{AxisConfig, GroupConfig, MAX_GROUP_ENTRIES};
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
