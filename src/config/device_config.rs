use crate::errors::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::fs;

/// MPU-9250 identity register
pub const DEFAULT_WHO_AM_I_REGISTER: u8 = 0x75;
/// Identity value reported by the MPU-9250
pub const DEFAULT_EXPECTED_ID: u8 = 0x71;
pub const DEFAULT_SETTLE_MS: u32 = 100;

/// Root configuration struct expecting `[[device]]` TOML array format
#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    #[serde(rename = "device")]
    pub devices: Vec<DeviceEntry>,
}

/// One device entry, matching each `[[device]]` section
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceEntry {
    pub id: String,
    pub bus: String,
    pub address: u8,
    #[serde(default = "default_who_am_i_register")]
    pub who_am_i_register: u8,
    #[serde(default = "default_expected_id")]
    pub expected_id: Vec<u8>,
    /// Clear the sleep bit in PWR_MGMT_1 before probing
    #[serde(default = "default_wake")]
    pub wake: bool,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u32,
}

fn default_who_am_i_register() -> u8 {
    DEFAULT_WHO_AM_I_REGISTER
}

fn default_expected_id() -> Vec<u8> {
    vec![DEFAULT_EXPECTED_ID]
}

fn default_wake() -> bool {
    true
}

fn default_settle_ms() -> u32 {
    DEFAULT_SETTLE_MS
}

/// Parse device config from TOML text
pub fn parse_device_config(content: &str) -> ConfigResult<DeviceConfig> {
    Ok(toml::from_str(content)?)
}

/// Loads config from TOML file
pub fn load_device_config(path: &str) -> ConfigResult<DeviceConfig> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
        path: path.to_string(),
        source,
    })?;
    parse_device_config(&content)
}
