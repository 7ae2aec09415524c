//! Platform bus handles.
//!
//! Any `embedded_hal::i2c::I2c` implementation can back a `HardwarePort`;
//! this module holds the ones the crate ships for real hardware. Tests and
//! host development use `crate::sim::SimBus` instead.

#[cfg(feature = "linux-hal")]
pub mod linux;

#[cfg(feature = "linux-hal")]
pub use linux::open_bus;
