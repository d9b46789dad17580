//! Timed status indicator
//!
//! A good/error colour is shown for a fixed hold time after each frame
//! event, then the LED falls back to the idle colour. The indicator has no
//! timer of its own; the control loop calls [`StatusIndicator::poll`] every
//! iteration.

use crate::traits::{Rgb, StatusPixel};

/// Default hold time for a triggered colour
pub const INDICATOR_HOLD_US: u64 = 500_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum IndicatorState {
    Idle,
    Active { color: Rgb, deadline_us: u64 },
}

/// Status LED with a revert deadline
pub struct StatusIndicator<P: StatusPixel> {
    pixel: P,
    state: IndicatorState,
    idle: Rgb,
    hold_us: u64,
}

impl<P: StatusPixel> StatusIndicator<P> {
    /// Take over the pixel and show the idle colour
    pub fn new(pixel: P) -> Self {
        Self::with_hold(pixel, INDICATOR_HOLD_US)
    }

    /// Same as [`new`](Self::new) with a custom hold time
    pub fn with_hold(mut pixel: P, hold_us: u64) -> Self {
        pixel.show(Rgb::IDLE);
        Self {
            pixel,
            state: IndicatorState::Idle,
            idle: Rgb::IDLE,
            hold_us,
        }
    }

    /// Show `color` now and schedule the return to idle
    ///
    /// A pending deadline is always replaced, so back-to-back events keep
    /// the LED lit for a full hold time after the last one.
    pub fn trigger(&mut self, color: Rgb, now_us: u64) {
        self.state = IndicatorState::Active {
            color,
            deadline_us: now_us.saturating_add(self.hold_us),
        };
        self.pixel.show(color);
    }

    /// Revert to idle once the deadline has passed
    ///
    /// Returns true on the call that performed the revert.
    pub fn poll(&mut self, now_us: u64) -> bool {
        match self.state {
            IndicatorState::Active { deadline_us, .. } if now_us >= deadline_us => {
                self.state = IndicatorState::Idle;
                self.pixel.show(self.idle);
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, IndicatorState::Active { .. })
    }

    /// Colour currently on the LED
    pub fn color(&self) -> Rgb {
        match self.state {
            IndicatorState::Idle => self.idle,
            IndicatorState::Active { color, .. } => color,
        }
    }

    /// Deadline of the active colour, if any
    pub fn deadline_us(&self) -> Option<u64> {
        match self.state {
            IndicatorState::Idle => None,
            IndicatorState::Active { deadline_us, .. } => Some(deadline_us),
        }
    }

    pub fn pixel(&self) -> &P {
        &self.pixel
    }
}
