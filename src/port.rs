//! Hardware access port for the MPU-9250 motion driver.
//!
//! The motion driver needs four things from the platform: a register write, a
//! register read, a millisecond counter and a blocking sleep. `HardwarePort`
//! provides them over an explicit bus handle, clock handle and delay handle.
//!
//! Every call blocks until the underlying primitive returns. The port keeps
//! no state between calls and does not serialize access: callers sharing one
//! bus must not interleave transactions.

use crate::clock::Clock;
use crate::errors::{BusError, PortError, PortResult};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Register address plus the largest payload the motion driver can request
pub const MAX_WRITE_FRAME: usize = 1 + u8::MAX as usize;

/// Register-level access to devices on one bus, plus time keeping
pub struct HardwarePort<B, C, D> {
    bus: B,
    clock: C,
    delay: D,
}

impl<B, C, D> HardwarePort<B, C, D>
where
    B: I2c,
    C: Clock,
    D: DelayNs,
{
    /// Bind the port to its bus, clock and delay handles
    pub fn new(bus: B, clock: C, delay: D) -> Self {
        Self { bus, clock, delay }
    }

    /// Write `data` to consecutive registers starting at `register`.
    ///
    /// One transaction: START, `register`, every byte of `data`, STOP. An
    /// empty `data` sends the register address alone. The bytes are handed to
    /// the bus as a single write so no HAL can split them with a repeated
    /// START.
    pub fn write_bytes(&mut self, device: u8, register: u8, data: &[u8]) -> PortResult<()> {
        let length = data.len() + 1;
        if length > MAX_WRITE_FRAME {
            return Err(PortError::FrameTooLong {
                length,
                max: MAX_WRITE_FRAME,
            });
        }

        let mut frame = [0u8; MAX_WRITE_FRAME];
        frame[0] = register;
        frame[1..length].copy_from_slice(data);

        self.bus
            .write(device, &frame[..length])
            .map_err(|e| BusError::from_hal(device, &e))?;
        Ok(())
    }

    /// Fill `buf` from consecutive registers starting at `register`.
    ///
    /// One transaction: START, `register`, repeated START, `buf.len()` reads,
    /// STOP. If this returns an error the contents of `buf` are unspecified.
    pub fn read_bytes(&mut self, device: u8, register: u8, buf: &mut [u8]) -> PortResult<()> {
        self.bus
            .write_read(device, &[register], buf)
            .map_err(|e| BusError::from_hal(device, &e))?;
        Ok(())
    }

    /// Current value of the wrapping millisecond counter
    pub fn get_elapsed_ms(&self) -> u32 {
        self.clock.now_ms()
    }

    /// Block the calling thread for at least `ms` milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// The bus handle, e.g. to inspect a simulated bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give the handles back
    pub fn release(self) -> (B, C, D) {
        (self.bus, self.clock, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::elapsed_between;
    use crate::errors::BusErrorKind;
    use crate::sim::{Frame, SimBus, SimClock, SimDelay, SimDevice, Transaction};
    use embedded_hal::i2c::ErrorKind;
    use test_case::test_case;

    const MPU_ADDR: u8 = 0x68;
    const PWR_MGMT_1: u8 = 0x6B;
    const WHO_AM_I: u8 = 0x75;

    fn sim_port(device: SimDevice) -> (HardwarePort<SimBus, SimClock, SimDelay>, SimClock) {
        let clock = SimClock::new();
        let bus = SimBus::new().with_device(MPU_ADDR, device);
        (HardwarePort::new(bus, clock.clone(), clock.delay()), clock)
    }

    #[test]
    fn single_register_write_wakes_device() {
        let (mut port, _) = sim_port(SimDevice::new().with_register(PWR_MGMT_1, 0x40));

        assert!(port.write_bytes(MPU_ADDR, PWR_MGMT_1, &[0x00]).is_ok());

        assert_eq!(
            port.bus().transactions(),
            &[Transaction {
                address: MPU_ADDR,
                frames: vec![Frame::Write(vec![PWR_MGMT_1, 0x00])],
            }]
        );
        assert_eq!(port.bus().device(MPU_ADDR).unwrap().register(PWR_MGMT_1), 0x00);
    }

    #[test_case(0 ; "register address only")]
    #[test_case(1 ; "one byte")]
    #[test_case(6 ; "burst")]
    #[test_case(255 ; "largest driver length")]
    fn write_is_one_transaction_of_length_plus_one(length: usize) {
        let (mut port, _) = sim_port(SimDevice::new());
        let data: Vec<u8> = (0..length).map(|i| i as u8).collect();

        port.write_bytes(MPU_ADDR, 0x00, &data).unwrap();

        let log = port.bus().transactions();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].frames.len(), 1);
        assert_eq!(log[0].restarts(), 0);
        assert_eq!(log[0].bytes_written(), length + 1);
    }

    #[test]
    fn burst_write_lands_in_consecutive_registers() {
        let (mut port, _) = sim_port(SimDevice::new());

        port.write_bytes(MPU_ADDR, 0x19, &[0x04, 0x03, 0x02]).unwrap();

        let dev = port.bus().device(MPU_ADDR).unwrap();
        assert_eq!(dev.register(0x19), 0x04);
        assert_eq!(dev.register(0x1A), 0x03);
        assert_eq!(dev.register(0x1B), 0x02);
        assert_eq!(
            port.bus().transactions()[0].frames,
            vec![Frame::Write(vec![0x19, 0x04, 0x03, 0x02])]
        );
    }

    #[test]
    fn oversize_write_is_rejected_before_the_bus() {
        let (mut port, _) = sim_port(SimDevice::new());
        let data = vec![0u8; MAX_WRITE_FRAME];

        let err = port.write_bytes(MPU_ADDR, 0x00, &data).unwrap_err();

        assert_eq!(
            err,
            PortError::FrameTooLong {
                length: MAX_WRITE_FRAME + 1,
                max: MAX_WRITE_FRAME,
            }
        );
        assert!(port.bus().transactions().is_empty());
    }

    #[test]
    fn who_am_i_read_uses_restart() {
        let (mut port, _) = sim_port(SimDevice::new().with_register(WHO_AM_I, 0x71));
        let mut buf = [0u8; 1];

        port.read_bytes(MPU_ADDR, WHO_AM_I, &mut buf).unwrap();

        assert_eq!(buf[0], 0x71);
        assert_eq!(
            port.bus().transactions(),
            &[Transaction {
                address: MPU_ADDR,
                frames: vec![Frame::Write(vec![WHO_AM_I]), Frame::Read(vec![0x71])],
            }]
        );
    }

    #[test_case(0 ; "empty")]
    #[test_case(1 ; "single")]
    #[test_case(14 ; "accel temp gyro block")]
    fn read_fills_buffer_in_register_order(length: usize) {
        let mut device = SimDevice::new();
        for i in 0..length {
            device = device.with_register(0x3B + i as u8, 0xA0 + i as u8);
        }
        let (mut port, _) = sim_port(device);
        let mut buf = vec![0u8; length];

        port.read_bytes(MPU_ADDR, 0x3B, &mut buf).unwrap();

        let expected: Vec<u8> = (0..length).map(|i| 0xA0 + i as u8).collect();
        assert_eq!(buf, expected);
        assert_eq!(port.bus().transactions().len(), 1);
    }

    #[test]
    fn absent_device_reports_nack() {
        let (mut port, _) = sim_port(SimDevice::new());

        let err = port.write_bytes(0x0C, 0x0A, &[0x16]).unwrap_err();
        assert_eq!(
            err,
            PortError::Bus(BusError {
                address: 0x0C,
                kind: BusErrorKind::NoAcknowledge,
            })
        );
    }

    #[test]
    fn bus_failure_is_returned_without_retry() {
        let (mut port, _) = sim_port(SimDevice::new());
        port.bus_mut().fail_next(ErrorKind::Bus);
        let mut buf = [0u8; 2];

        assert!(port.read_bytes(MPU_ADDR, 0x00, &mut buf).is_err());
        assert!(port.bus().transactions().is_empty());
    }

    #[test]
    fn delay_is_visible_on_the_clock() {
        let (mut port, _) = sim_port(SimDevice::new());

        let t1 = port.get_elapsed_ms();
        port.delay_ms(50);
        let t2 = port.get_elapsed_ms();

        assert!(elapsed_between(t1, t2) >= 50);
    }

    #[test]
    fn zero_delay_does_not_advance() {
        let (mut port, clock) = sim_port(SimDevice::new());
        clock.advance(7);

        port.delay_ms(0);
        assert_eq!(port.get_elapsed_ms(), 7);
    }

    #[test]
    fn elapsed_time_across_wraparound() {
        let clock = SimClock::starting_at(u32::MAX - 20);
        let mut port = HardwarePort::new(SimBus::new(), clock.clone(), clock.delay());

        let t1 = port.get_elapsed_ms();
        port.delay_ms(50);
        let t2 = port.get_elapsed_ms();

        assert!(t2 < t1);
        assert_eq!(elapsed_between(t1, t2), 50);
    }

    #[test]
    fn release_returns_handles() {
        let (mut port, _) = sim_port(SimDevice::new());
        port.write_bytes(MPU_ADDR, 0x6A, &[0x20]).unwrap();

        let (bus, clock, _) = port.release();
        assert_eq!(bus.transactions().len(), 1);
        assert_eq!(clock.now_ms(), 0);
    }
}
