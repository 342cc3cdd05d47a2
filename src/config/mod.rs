//! Blocklist configuration
//!
//! Settings come from the environment (`BINIX_GFX_*`) or from JSON:
//! - `BINIX_GFX_BLOCKLIST_ALL`: `1` blocks every feature, `-1` ignores the
//!   blocklist, `0` enforces it
//! - `BINIX_GFX_DRIVER_VERSION_FORMAT`: `decimal`, `padded` or `integer`
//! - `BINIX_GFX_SPOOF_*`: override parts of the probed system

use serde::{Deserialize, Serialize};

use crate::system::SystemDescriptor;
use crate::utils::ConfigError;
use crate::version::DriverVersionFormat;

pub const ENV_BLOCKLIST_ALL: &str = "BINIX_GFX_BLOCKLIST_ALL";
pub const ENV_DRIVER_VERSION_FORMAT: &str = "BINIX_GFX_DRIVER_VERSION_FORMAT";
pub const ENV_SPOOF_VENDOR_ID: &str = "BINIX_GFX_SPOOF_VENDOR_ID";
pub const ENV_SPOOF_DEVICE_ID: &str = "BINIX_GFX_SPOOF_DEVICE_ID";
pub const ENV_SPOOF_DRIVER_VERSION: &str = "BINIX_GFX_SPOOF_DRIVER_VERSION";
pub const ENV_SPOOF_OS_VERSION: &str = "BINIX_GFX_SPOOF_OS_VERSION";

/// How the blocklist is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlocklistMode {
    #[default]
    Enforce,
    /// Every feature is available
    IgnoreAll,
    /// Every feature is blocked
    BlockAll,
}

impl BlocklistMode {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(Self::Enforce),
            "-1" => Some(Self::IgnoreAll),
            "1" => Some(Self::BlockAll),
            _ => None,
        }
    }
}

/// Values replacing what the platform probe reported, for testing
/// blocklist entries on hardware that isn't at hand
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoofOverrides {
    pub vendor_id: Option<String>,
    pub device_id: Option<String>,
    pub driver_version: Option<String>,
    pub os_version: Option<String>,
}

impl SpoofOverrides {
    pub fn is_empty(&self) -> bool {
        self.vendor_id.is_none()
            && self.device_id.is_none()
            && self.driver_version.is_none()
            && self.os_version.is_none()
    }

    /// Overwrite the primary adapter and OS version fields that are set
    pub fn apply(&self, descriptor: &mut SystemDescriptor) {
        if let Some(vendor_id) = &self.vendor_id {
            descriptor.adapter.vendor_id = vendor_id.clone();
        }
        if let Some(device_id) = &self.device_id {
            descriptor.adapter.device_id = device_id.clone();
        }
        if let Some(driver_version) = &self.driver_version {
            descriptor.adapter.driver_version = driver_version.clone();
        }
        if let Some(os_version) = &self.os_version {
            descriptor.os_version = Some(os_version.clone());
        }
    }
}

/// Blocklist settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocklistConfig {
    pub mode: BlocklistMode,
    pub version_format: DriverVersionFormat,
    pub spoof: SpoofOverrides,
}

impl Default for BlocklistConfig {
    fn default() -> Self {
        Self {
            mode: BlocklistMode::Enforce,
            version_format: DriverVersionFormat::native(),
            spoof: SpoofOverrides::default(),
        }
    }
}

impl BlocklistConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_BLOCKLIST_ALL) {
            config.mode = BlocklistMode::from_env_value(&value).ok_or(ConfigError::InvalidValue {
                key: ENV_BLOCKLIST_ALL,
                value,
            })?;
        }

        if let Some(value) = lookup(ENV_DRIVER_VERSION_FORMAT) {
            config.version_format = DriverVersionFormat::from_str(value.trim()).ok_or(
                ConfigError::InvalidValue {
                    key: ENV_DRIVER_VERSION_FORMAT,
                    value,
                },
            )?;
        }

        let spoof = |key: &str| lookup(key).filter(|value: &String| !value.is_empty());
        config.spoof = SpoofOverrides {
            vendor_id: spoof(ENV_SPOOF_VENDOR_ID),
            device_id: spoof(ENV_SPOOF_DEVICE_ID),
            driver_version: spoof(ENV_SPOOF_DRIVER_VERSION),
            os_version: spoof(ENV_SPOOF_OS_VERSION),
        };

        Ok(config)
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = BlocklistConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BlocklistConfig::default());
        assert_eq!(config.mode, BlocklistMode::Enforce);
        assert!(config.spoof.is_empty());
    }

    #[test]
    fn test_blocklist_all_values() {
        let block = BlocklistConfig::from_lookup(lookup(&[(ENV_BLOCKLIST_ALL, "1")])).unwrap();
        assert_eq!(block.mode, BlocklistMode::BlockAll);

        let ignore = BlocklistConfig::from_lookup(lookup(&[(ENV_BLOCKLIST_ALL, "-1")])).unwrap();
        assert_eq!(ignore.mode, BlocklistMode::IgnoreAll);

        let invalid = BlocklistConfig::from_lookup(lookup(&[(ENV_BLOCKLIST_ALL, "yes")]));
        assert!(matches!(
            invalid,
            Err(ConfigError::InvalidValue { key: ENV_BLOCKLIST_ALL, .. })
        ));
    }

    #[test]
    fn test_version_format_variable() {
        let config =
            BlocklistConfig::from_lookup(lookup(&[(ENV_DRIVER_VERSION_FORMAT, "padded")])).unwrap();
        assert_eq!(config.version_format, DriverVersionFormat::PaddedDecimal);
        assert!(BlocklistConfig::from_lookup(lookup(&[(ENV_DRIVER_VERSION_FORMAT, "hex")])).is_err());
    }

    #[test]
    fn test_spoof_overrides() {
        let config = BlocklistConfig::from_lookup(lookup(&[
            (ENV_SPOOF_VENDOR_ID, "0x10de"),
            (ENV_SPOOF_DRIVER_VERSION, "24.21.13.9826"),
            (ENV_SPOOF_DEVICE_ID, ""),
        ]))
        .unwrap();

        assert_eq!(config.spoof.vendor_id.as_deref(), Some("0x10de"));
        assert_eq!(config.spoof.device_id, None);

        let mut descriptor = SystemDescriptor::default();
        config.spoof.apply(&mut descriptor);
        assert_eq!(descriptor.adapter.vendor_id, "0x10de");
        assert_eq!(descriptor.adapter.driver_version, "24.21.13.9826");
        assert_eq!(descriptor.os_version, None);
    }

    #[test]
    fn test_from_json() {
        let config = BlocklistConfig::from_json(
            r#"{"mode":"block_all","version_format":"padded_decimal","spoof":{"device_id":"0x1234"}}"#,
        )
        .unwrap();
        assert_eq!(config.mode, BlocklistMode::BlockAll);
        assert_eq!(config.version_format, DriverVersionFormat::PaddedDecimal);
        assert_eq!(config.spoof.device_id.as_deref(), Some("0x1234"));

        assert!(matches!(
            BlocklistConfig::from_json("{\"mode\":"),
            Err(ConfigError::Json(_))
        ));
    }
}
