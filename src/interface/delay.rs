//! Blocking delays.
//!
//! Drivers take their delay source as an injected dependency so the
//! data-ready poll loops can run in tests without real time passing.

use std::{thread, time::Duration};

pub trait Delay {
    /// Pauses execution for `us` microseconds
    fn delay_us(&mut self, us: u32);

    /// Pauses execution for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }
}

/// Delay backed by `thread::sleep`.
pub struct TimerDelay;

impl Delay for TimerDelay {
    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us.into()));
    }
}

/// Delay that returns immediately.
pub struct NoDelay;

impl Delay for NoDelay {
    fn delay_us(&mut self, _us: u32) {}
}
