//! Monotonic clock backed by the embassy time driver

use embassy_time::Instant;
use motorlink_hal::MonotonicClock;

/// Microseconds since boot from the RP2040 timer
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
