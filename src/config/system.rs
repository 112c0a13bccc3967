//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use crate::error::{ConfigError, Error, Result};

use super::axis::{AxisConfig, GroupConfig};

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Named axis configurations.
    pub axes: FnvIndexMap<String<32>, AxisConfig, 16>,

    /// Named groups of axes for synchronized moves.
    #[serde(default)]
    pub groups: FnvIndexMap<String<32>, GroupConfig, 8>,
}

impl SystemConfig {
    /// Get an axis configuration by name.
    pub fn axis(&self, name: &str) -> Option<&AxisConfig> {
        self.axes
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a group configuration by name.
    pub fn group(&self, name: &str) -> Option<&GroupConfig> {
        self.groups
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a group configuration by name, failing when it is not configured.
    pub fn require_group(&self, name: &str) -> Result<&GroupConfig> {
        self.group(name).ok_or_else(|| {
            Error::Config(ConfigError::GroupNotFound(
                String::try_from(name).unwrap_or_default(),
            ))
        })
    }

    /// List all axis names.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(|s| s.as_str())
    }

    /// List all group names.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_group() {
        let mut config = SystemConfig::default();
        config
            .groups
            .insert(String::try_from("arm").unwrap(), GroupConfig::default())
            .unwrap();

        assert!(config.require_group("arm").is_ok());
        assert!(matches!(
            config.require_group("legs"),
            Err(Error::Config(ConfigError::GroupNotFound(name))) if name == "legs"
        ));
    }
}
