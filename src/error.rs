//! Error types for accel-axis.
//!
//! Ordinary motion edge cases are normalized rather than reported; these errors
//! cover configuration, pin/callback failures and malformed coordinator requests.

use core::fmt;

use crate::signal::Interface;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all accel-axis operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Pin or callback failure while driving an axis
    Motor(MotorError),
    /// Malformed motion request
    Motion(MotionError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// Group name not found in configuration
    GroupNotFound(heapless::String<32>),
    /// A required builder field was never supplied
    MissingField(&'static str),
    /// Acceleration must be non-zero and finite
    InvalidAcceleration(f32),
    /// Max speed must be finite
    InvalidMaxSpeed(f32),
    /// Speed scale must be positive and finite
    InvalidSpeedScale(f32),
    /// Interface needs more pins than were configured
    NotEnoughPins {
        /// Configured interface
        interface: Interface,
        /// Pins the interface drives
        required: usize,
        /// Pins supplied
        provided: usize,
    },
    /// Group references an axis that is not configured
    UnknownGroupMember {
        /// Group name
        group: heapless::String<32>,
        /// Referenced axis name
        axis: heapless::String<32>,
    },
    /// Group holds more axes than a coordinator can sequence
    GroupTooLarge {
        /// Group name
        group: heapless::String<32>,
        /// Number of axes listed
        len: usize,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Errors raised while emitting steps.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError {
        /// Index of the pin that failed
        pin: u8,
    },
    /// A step callback reported a failure
    Callback(heapless::String<64>),
}

/// Motion request errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// A synchronized move supplied the wrong number of targets
    TargetCountMismatch {
        /// Axes held by the coordinator
        expected: usize,
        /// Targets supplied
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::GroupNotFound(name) => write!(f, "Group '{}' not found", name),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be non-zero", v)
            }
            ConfigError::InvalidMaxSpeed(v) => write!(f, "Invalid max speed: {}", v),
            ConfigError::InvalidSpeedScale(v) => {
                write!(f, "Invalid speed scale: {}. Must be > 0", v)
            }
            ConfigError::NotEnoughPins { interface, required, provided } => write!(
                f,
                "Interface {:?} drives {} pins but only {} configured",
                interface, required, provided
            ),
            ConfigError::UnknownGroupMember { group, axis } => {
                write!(f, "Group '{}' references unknown axis '{}'", group, axis)
            }
            ConfigError::GroupTooLarge { group, len } => write!(
                f,
                "Group '{}' lists {} axes (max {})",
                group,
                len,
                crate::motor::MAX_AXES
            ),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError { pin } => write!(f, "GPIO pin {} operation failed", pin),
            MotorError::Callback(msg) => write!(f, "Step callback failed: {}", msg),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::TargetCountMismatch { expected, actual } => {
                write!(f, "Expected {} targets, got {}", expected, actual)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
