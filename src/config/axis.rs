//! Axis configuration from TOML.

use heapless::{String, Vec};
use serde::Deserialize;

use crate::motor::MAX_AXES;
use crate::signal::{Interface, MAX_PINS};

/// Most axes a single group may list before validation rejects it.
pub const MAX_GROUP_ENTRIES: usize = 16;

/// Complete axis configuration from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxisConfig {
    /// Wiring interface.
    #[serde(default)]
    pub interface: Interface,

    /// Signal pins in signal order.
    #[serde(default = "default_pins")]
    pub pins: Vec<u8, MAX_PINS>,

    /// Per-pin inversion flags.
    #[serde(default)]
    pub pins_inverted: Vec<bool, MAX_PINS>,

    /// Optional enable pin.
    #[serde(default)]
    pub enable_pin: Option<u8>,

    /// Enable pin is active low.
    #[serde(default)]
    pub enable_inverted: bool,

    /// Maximum speed in steps per second.
    #[serde(default = "default_one")]
    pub max_speed: f32,

    /// Acceleration in steps per second squared.
    #[serde(default = "default_one")]
    pub acceleration: f32,

    /// Initial constant speed.
    #[serde(default)]
    pub speed: f32,

    /// Clock units per second.
    #[serde(default = "default_one")]
    pub speed_scale: f32,

    /// DRIVER pulse width in microseconds.
    #[serde(default = "default_pulse_width")]
    pub min_pulse_width_us: u32,

    /// Enable outputs when the axis is built.
    #[serde(default = "default_enable")]
    pub enable: bool,
}

fn default_pins() -> Vec<u8, MAX_PINS> {
    Vec::from_slice(&[0, 1, 2, 3]).unwrap_or_default()
}

fn default_one() -> f32 {
    1.0
}

fn default_pulse_width() -> u32 {
    1
}

fn default_enable() -> bool {
    true
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            interface: Interface::default(),
            pins: default_pins(),
            pins_inverted: Vec::new(),
            enable_pin: None,
            enable_inverted: false,
            max_speed: default_one(),
            acceleration: default_one(),
            speed: 0.0,
            speed_scale: default_one(),
            min_pulse_width_us: default_pulse_width(),
            enable: default_enable(),
        }
    }
}

impl AxisConfig {
    /// Signal pins the interface actually drives.
    pub fn active_pins(&self) -> &[u8] {
        let count = self.interface.pin_count().min(self.pins.len());
        &self.pins[..count]
    }
}

/// A named set of axes moved together by one coordinator.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GroupConfig {
    /// Axis names in coordinator order; at most
    /// [`MAX_AXES`](crate::motor::MAX_AXES) pass validation.
    pub axes: Vec<String<32>, MAX_GROUP_ENTRIES>,
}

impl GroupConfig {
    /// Whether a coordinator can hold every listed axis.
    pub fn fits(&self) -> bool {
        self.axes.len() <= MAX_AXES
    }

    /// Axis names in coordinator order.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|s| s.as_str())
    }
}
