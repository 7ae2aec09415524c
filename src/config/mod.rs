pub mod bus_config;
pub mod device_config;

pub use bus_config::{load_bus_config, parse_bus_config, BusConfig, BusEntry};
pub use device_config::{load_device_config, parse_device_config, DeviceConfig, DeviceEntry};

use crate::errors::{ConfigError, ConfigResult};
use std::collections::HashSet;
use tracing::info;

/// Highest 7-bit bus address
pub const MAX_DEVICE_ADDRESS: u8 = 0x7F;

/// Both configuration files, checked against each other
#[derive(Debug)]
pub struct PortConfig {
    pub buses: BusConfig,
    pub devices: DeviceConfig,
}

/// Load `buses.toml` and `devices.toml` from `config_path` and validate them
pub fn load_port_config(config_path: &str) -> ConfigResult<PortConfig> {
    let buses = load_bus_config(&format!("{}/buses.toml", config_path))?;
    let devices = load_device_config(&format!("{}/devices.toml", config_path))?;
    info!(
        "[config] loaded {} bus(es), {} device(s) from {}",
        buses.buses.len(),
        devices.devices.len(),
        config_path
    );

    let config = PortConfig { buses, devices };
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &PortConfig) -> ConfigResult<()> {
    let mut bus_ids = HashSet::new();
    for bus in &config.buses.buses {
        if !bus_ids.insert(bus.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate bus id '{}'",
                bus.id
            )));
        }
        if bus.r#type != "i2c" {
            return Err(ConfigError::InvalidValue {
                field: format!("bus.{}.type", bus.id),
                reason: format!("unsupported bus type '{}'", bus.r#type),
            });
        }
    }

    for dev in &config.devices.devices {
        if dev.address > MAX_DEVICE_ADDRESS {
            return Err(ConfigError::InvalidValue {
                field: format!("device.{}.address", dev.id),
                reason: format!("{:#04x} is not a 7-bit address", dev.address),
            });
        }
        if config.buses.find(&dev.bus).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "device '{}' refers to unknown bus '{}'",
                dev.id, dev.bus
            )));
        }
        if dev.expected_id.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("device.{}.expected_id", dev.id),
                reason: "at least one identity value is required".to_string(),
            });
        }
    }

    Ok(())
}
