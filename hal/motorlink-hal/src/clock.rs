//! Monotonic time source
//!
//! Deadlines in the link are absolute microsecond timestamps compared against
//! this clock, so tests can drive time explicitly.

/// Monotonic microsecond clock
pub trait MonotonicClock {
    /// Microseconds since an arbitrary fixed epoch (typically boot)
    fn now_us(&self) -> u64;

    /// Microseconds elapsed since `since`, saturating at zero
    fn elapsed_since(&self, since: u64) -> u64 {
        self.now_us().saturating_sub(since)
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
