//! Linux `/dev/i2c-N` bus handle.
//!
//! `linux_embedded_hal::I2cdev` already speaks `embedded_hal::i2c::I2c`, so it
//! plugs into `HardwarePort` unchanged. Combined write/read transfers go out
//! as a single `I2C_RDWR` ioctl, which keeps the repeated START on the wire.

use crate::config::BusEntry;
use crate::errors::{ProbeError, ProbeResult};
use tracing::info;

pub use i2cdev::linux::LinuxI2CError as I2CError;
pub use linux_embedded_hal::Delay as LinuxDelay;
pub use linux_embedded_hal::I2cdev as I2CDevice;

/// Open the bus controller described by `entry`
pub fn open_bus(entry: &BusEntry) -> ProbeResult<I2CDevice> {
    let device = I2CDevice::new(&entry.path).map_err(|source| ProbeError::BusOpen {
        bus: entry.id.clone(),
        path: entry.path.clone(),
        source,
    })?;
    info!("[bus] opened {} at {}", entry.id, entry.path);
    Ok(device)
}
