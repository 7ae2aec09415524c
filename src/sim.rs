//! Simulated I2C bus and millisecond clock.
//!
//! `SimBus` stands in for the platform bus controller and records every
//! transaction it sees, so tests can assert on the exact framing a port
//! produced. Like the Linux `I2C_RDWR` path, it never merges operations:
//! each `Operation` gets its own address phase.
//!
//! `SimClock` and `SimDelay` share one counter: sleeping on the delay
//! advances the clock by exactly the requested amount.

use crate::clock::Clock;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// The bytes moved by one `Operation`, after its own address phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Write(Vec<u8>),
    Read(Vec<u8>),
}

/// One START..STOP sequence on the bus.
///
/// Every frame after the first is preceded by a repeated START.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub address: u8,
    pub frames: Vec<Frame>,
}

impl Transaction {
    /// Number of repeated-START conditions in this transaction
    pub fn restarts(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// Total bytes sent by the controller
    pub fn bytes_written(&self) -> usize {
        self.frames
            .iter()
            .map(|f| match f {
                Frame::Write(bytes) => bytes.len(),
                Frame::Read(_) => 0,
            })
            .sum()
    }
}

/// Register-file peripheral with an auto-incrementing register pointer
#[derive(Debug, Clone)]
pub struct SimDevice {
    registers: [u8; 256],
    pointer: u8,
}

impl SimDevice {
    pub fn new() -> Self {
        Self {
            registers: [0; 256],
            pointer: 0,
        }
    }

    /// Preset a register value
    pub fn with_register(mut self, register: u8, value: u8) -> Self {
        self.registers[register as usize] = value;
        self
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers[register as usize]
    }

    /// The first byte after an address phase selects the register
    fn write(&mut self, bytes: &[u8]) {
        if let Some((&pointer, payload)) = bytes.split_first() {
            self.pointer = pointer;
            for &byte in payload {
                self.registers[self.pointer as usize] = byte;
                self.pointer = self.pointer.wrapping_add(1);
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) {
        for slot in buf.iter_mut() {
            *slot = self.registers[self.pointer as usize];
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

impl Default for SimDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulated bus controller with any number of attached devices
#[derive(Debug, Default)]
pub struct SimBus {
    devices: BTreeMap<u8, SimDevice>,
    log: Vec<Transaction>,
    pending_fault: Option<ErrorKind>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a device at `address`
    pub fn with_device(mut self, address: u8, device: SimDevice) -> Self {
        self.devices.insert(address, device);
        self
    }

    pub fn device(&self, address: u8) -> Option<&SimDevice> {
        self.devices.get(&address)
    }

    /// Make the next transaction fail with `kind` before any byte moves
    pub fn fail_next(&mut self, kind: ErrorKind) {
        self.pending_fault = Some(kind);
    }

    /// Every completed transaction, oldest first
    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }
}

impl ErrorType for SimBus {
    type Error = ErrorKind;
}

impl I2c for SimBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if let Some(kind) = self.pending_fault.take() {
            return Err(kind);
        }
        let device = self
            .devices
            .get_mut(&address)
            .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))?;

        let mut frames = Vec::with_capacity(operations.len());
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    device.write(bytes);
                    frames.push(Frame::Write(bytes.to_vec()));
                }
                Operation::Read(buf) => {
                    device.read(buf);
                    frames.push(Frame::Read(buf.to_vec()));
                }
            }
        }

        self.log.push(Transaction { address, frames });
        Ok(())
    }
}

/// Manually advanced millisecond counter
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    ticks: Arc<AtomicU32>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the counter at `ms`, e.g. just before wraparound
    pub fn starting_at(ms: u32) -> Self {
        Self {
            ticks: Arc::new(AtomicU32::new(ms)),
        }
    }

    pub fn advance(&self, ms: u32) {
        // fetch_add wraps on overflow
        self.ticks.fetch_add(ms, Ordering::SeqCst);
    }

    /// A delay handle that advances this clock
    pub fn delay(&self) -> SimDelay {
        SimDelay {
            clock: self.clone(),
        }
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u32 {
        self.ticks.load(Ordering::SeqCst)
    }
}

/// Delay handle bound to a `SimClock`.
///
/// Sub-millisecond delays are rounded up to whole milliseconds.
#[derive(Debug, Clone)]
pub struct SimDelay {
    clock: SimClock,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance(ns.div_ceil(1_000_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance(us.div_ceil(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance(ms);
    }
}
