//! Connectivity check for devices behind a `HardwarePort`.

use crate::clock::{elapsed_between, Clock};
use crate::config::{DeviceConfig, DeviceEntry};
use crate::errors::{PortError, ProbeError, ProbeResult};
use crate::port::HardwarePort;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use tracing::{debug, error, info};

// Register addresses for the MPU-9250
const PWR_MGMT_1: u8 = 0x6B;
const PWR_MGMT_1_AWAKE: u8 = 0x00;

/// Outcome of a successful probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub device: String,
    pub address: u8,
    pub who_am_i: u8,
    /// Wall time spent probing, including the settle delay
    pub elapsed_ms: u32,
}

/// Wake the device if configured, then check its identity register
pub fn probe_device<B, C, D>(
    port: &mut HardwarePort<B, C, D>,
    device: &DeviceEntry,
) -> ProbeResult<ProbeReport>
where
    B: I2c,
    C: Clock,
    D: DelayNs,
{
    let access = |source: PortError| ProbeError::Access {
        device: device.id.clone(),
        source,
    };
    let started = port.get_elapsed_ms();

    if device.wake {
        port.write_bytes(device.address, PWR_MGMT_1, &[PWR_MGMT_1_AWAKE])
            .map_err(access)?;
        debug!(
            "[probe] {} woken, settling {}ms",
            device.id, device.settle_ms
        );
        port.delay_ms(device.settle_ms);
    }

    let mut who_am_i = [0u8; 1];
    port.read_bytes(device.address, device.who_am_i_register, &mut who_am_i)
        .map_err(access)?;

    if !device.expected_id.contains(&who_am_i[0]) {
        return Err(ProbeError::WrongChipId {
            device: device.id.clone(),
            expected: device.expected_id.clone(),
            actual: who_am_i[0],
        });
    }

    let elapsed_ms = elapsed_between(started, port.get_elapsed_ms());
    info!(
        "[probe] {} at {:#04x} answered {:#04x} in {}ms",
        device.id, device.address, who_am_i[0], elapsed_ms
    );

    Ok(ProbeReport {
        device: device.id.clone(),
        address: device.address,
        who_am_i: who_am_i[0],
        elapsed_ms,
    })
}

/// Probe every configured device that sits on `bus_id`, in config order.
///
/// A failing device is logged and does not stop the sweep.
pub fn probe_bus<B, C, D>(
    port: &mut HardwarePort<B, C, D>,
    bus_id: &str,
    devices: &DeviceConfig,
) -> Vec<ProbeResult<ProbeReport>>
where
    B: I2c,
    C: Clock,
    D: DelayNs,
{
    devices
        .devices
        .iter()
        .filter(|d| d.bus == bus_id)
        .map(|d| {
            let result = probe_device(port, d);
            if let Err(e) = &result {
                error!("[probe] {}", e);
            }
            result
        })
        .collect()
}
