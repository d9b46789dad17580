//! Servo controller trait
//!
//! The sender drives hobby servos through an external controller. Each
//! channel carries its own angle range and output mode; positions are in
//! whole degrees inside that range.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output mode of a servo channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ServoMode {
    /// Move straight to every commanded position
    #[default]
    Fast,
    /// Output held low; the servo goes limp
    Off,
}

/// Servo capability interface
pub trait ServoController {
    /// Error type for controller operations
    type Error;

    /// Number of channels the controller exposes
    fn channel_count(&self) -> u8;

    /// Set the angle range a channel maps onto its pulse range
    fn set_range(&mut self, channel: u8, min_deg: i16, max_deg: i16) -> Result<(), Self::Error>;

    /// Set the output mode of a channel
    fn set_mode(&mut self, channel: u8, mode: ServoMode) -> Result<(), Self::Error>;

    /// Move a channel to `degrees`, clamped to its range
    fn set_position(&mut self, channel: u8, degrees: i16) -> Result<(), Self::Error>;
}
