//! Hardware access port for the InvenSense MPU-9250 motion driver.
//!
//! The driver reaches the outside world through four calls: register write,
//! register read, millisecond clock and blocking delay. [`HardwarePort`]
//! implements them over an explicit `embedded_hal` bus handle, a [`Clock`] and
//! an `embedded_hal` delay, so the same driver glue runs against Linux
//! `/dev/i2c-N` or the simulated bus in [`sim`].

// Public modules
pub mod access;
pub mod bus;
pub mod clock;
pub mod config;
pub mod errors;
pub mod port;
pub mod probe;
pub mod sim;

// Re-export commonly used types
pub use access::MotionDriverAccess;
pub use clock::{elapsed_between, Clock, SystemClock, SystemDelay};
pub use config::{load_port_config, PortConfig};
pub use errors::{
    status_code, BusError, BusErrorKind, PortError, PortResult, ProbeError, ProbeResult,
    STATUS_FAILURE, STATUS_OK,
};
pub use port::HardwarePort;
pub use probe::{probe_bus, probe_device, ProbeReport};

use tracing_subscriber::EnvFilter;

/// Initialize tracing with default configuration
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}

/// Open every configured bus and probe the devices on it.
///
/// A bus that cannot be opened is logged and every device on it counts as
/// failed; the remaining buses are still probed. Returns the number of
/// devices that failed.
#[cfg(feature = "linux-hal")]
pub fn run_probes(config_path: &str) -> ProbeResult<usize> {
    use tracing::{error, info};

    info!("[mpu9250-port] probing devices...");
    let config = load_port_config(config_path)?;

    let clock = SystemClock::new();
    let mut failures = 0;
    for entry in &config.buses.buses {
        let bus = match bus::open_bus(entry) {
            Ok(bus) => bus,
            Err(e) => {
                error!("[bus] {}", e);
                failures += config
                    .devices
                    .devices
                    .iter()
                    .filter(|d| d.bus == entry.id)
                    .count();
                continue;
            }
        };
        let mut port = HardwarePort::new(bus, clock, bus::linux::LinuxDelay);
        let results = probe_bus(&mut port, &entry.id, &config.devices);
        failures += results.iter().filter(|r| r.is_err()).count();
    }

    info!(
        "[mpu9250-port] {} device(s) probed, {} failed",
        config.devices.devices.len(),
        failures
    );
    Ok(failures)
}
