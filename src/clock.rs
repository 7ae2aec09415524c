//! Millisecond time source and blocking sleep for the host platform.

use embedded_hal::delay::DelayNs;
use std::time::{Duration, Instant};

/// Free-running millisecond counter.
///
/// The count starts at an arbitrary epoch, never decreases, and wraps to zero
/// after `u32::MAX` milliseconds (about 49.7 days).
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Milliseconds from `earlier` to `later`, correct across a single wraparound
pub fn elapsed_between(earlier: u32, later: u32) -> u32 {
    later.wrapping_sub(earlier)
}

/// Monotonic clock counting from its construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the wraparound.
        self.epoch.elapsed().as_millis() as u32
    }
}

/// Blocking sleep on the calling thread.
///
/// Nothing else on this thread runs until the sleep returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDelay;

impl DelayNs for SystemDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}
