//! Status-code interface consumed by the motion driver.
//!
//! The driver passes an explicit length next to each buffer and treats `0` as
//! success for every call. Failures of any kind come back as
//! [`STATUS_FAILURE`](crate::errors::STATUS_FAILURE).

use crate::clock::Clock;
use crate::errors::{status_code, PortError, PortResult, STATUS_OK};
use crate::port::HardwarePort;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub trait MotionDriverAccess {
    /// Write the first `length` bytes of `data` starting at `register`
    fn i2c_write(&mut self, device: u8, register: u8, length: u8, data: &[u8]) -> i32;

    /// Read `length` bytes starting at `register` into the front of `buf`
    fn i2c_read(&mut self, device: u8, register: u8, length: u8, buf: &mut [u8]) -> i32;

    fn get_clock_ms(&self) -> u32;

    /// Always returns [`STATUS_OK`]
    fn delay_ms(&mut self, ms: u32) -> i32;
}

fn check_capacity(length: u8, capacity: usize) -> PortResult<usize> {
    let length = length as usize;
    if capacity < length {
        return Err(PortError::BufferTooShort { length, capacity });
    }
    Ok(length)
}

impl<B, C, D> MotionDriverAccess for HardwarePort<B, C, D>
where
    B: I2c,
    C: Clock,
    D: DelayNs,
{
    fn i2c_write(&mut self, device: u8, register: u8, length: u8, data: &[u8]) -> i32 {
        let result = check_capacity(length, data.len())
            .and_then(|len| self.write_bytes(device, register, &data[..len]));
        status_code(&result)
    }

    fn i2c_read(&mut self, device: u8, register: u8, length: u8, buf: &mut [u8]) -> i32 {
        let result = check_capacity(length, buf.len())
            .and_then(|len| self.read_bytes(device, register, &mut buf[..len]));
        status_code(&result)
    }

    fn get_clock_ms(&self) -> u32 {
        self.get_elapsed_ms()
    }

    fn delay_ms(&mut self, ms: u32) -> i32 {
        HardwarePort::delay_ms(self, ms);
        STATUS_OK
    }
}
