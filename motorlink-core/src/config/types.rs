//! Configuration type definitions

use heapless::FnvIndexSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use motorlink_protocol::{FRAME_TIMEOUT_US, PAYLOAD_LEN};

use crate::traits::ServoMode;

/// Number of GPIO pins on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Number of servos the sender drives
pub const SERVO_COUNT: usize = 4;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Key not valid in its section
    UnknownKey,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// The same GPIO is assigned twice
    DuplicatePin(u8),
    /// GPIO number does not exist on the chip
    PinOutOfRange(u8),
}

/// Serial link timing shared by both nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Link baud rate
    pub baud_rate: u32,
    /// Window for completing a frame after its sync byte
    pub frame_timeout_ms: u16,
    /// How long a good/error colour stays on the status LED
    pub indicator_hold_ms: u16,
    /// How long the sender waits for the receiver's echo line
    pub echo_timeout_ms: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            frame_timeout_ms: (FRAME_TIMEOUT_US / 1000) as u16,
            indicator_hold_ms: 500,
            echo_timeout_ms: 1000,
        }
    }
}

impl LinkConfig {
    pub fn frame_timeout_us(&self) -> u64 {
        self.frame_timeout_ms as u64 * 1000
    }

    pub fn indicator_hold_us(&self) -> u64 {
        self.indicator_hold_ms as u64 * 1000
    }

    pub fn echo_timeout_us(&self) -> u64 {
        self.echo_timeout_ms as u64 * 1000
    }

    /// Builder: set the baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

/// The two GPIOs driving one motor channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinPair {
    pub forward: u8,
    pub reverse: u8,
}

impl PinPair {
    pub const fn new(forward: u8, reverse: u8) -> Self {
        Self { forward, reverse }
    }
}

/// Motor channel to GPIO table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelMap {
    pub channels: [PinPair; PAYLOAD_LEN],
}

impl Default for ChannelMap {
    /// Forward on even GPIOs 0-14, reverse on odd GPIOs 1-15, so each
    /// channel owns both halves of one PWM slice.
    fn default() -> Self {
        let mut channels = [PinPair::default(); PAYLOAD_LEN];
        for (i, pair) in channels.iter_mut().enumerate() {
            *pair = PinPair::new(2 * i as u8, 2 * i as u8 + 1);
        }
        Self { channels }
    }
}

impl ChannelMap {
    /// Build from separate forward and reverse pin lists
    pub fn from_pins(forward: [u8; PAYLOAD_LEN], reverse: [u8; PAYLOAD_LEN]) -> Self {
        let mut channels = [PinPair::default(); PAYLOAD_LEN];
        for (i, pair) in channels.iter_mut().enumerate() {
            *pair = PinPair::new(forward[i], reverse[i]);
        }
        Self { channels }
    }

    /// Every pin must exist and be used exactly once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut used: FnvIndexSet<u8, 32> = FnvIndexSet::new();
        for pair in &self.channels {
            for pin in [pair.forward, pair.reverse] {
                if pin >= GPIO_COUNT {
                    return Err(ConfigError::PinOutOfRange(pin));
                }
                if !used.insert(pin).map_err(|_| ConfigError::PinOutOfRange(pin))? {
                    return Err(ConfigError::DuplicatePin(pin));
                }
            }
        }
        Ok(())
    }

    /// Iterate over every configured pin
    pub fn pins(&self) -> impl Iterator<Item = u8> + '_ {
        self.channels.iter().flat_map(|p| [p.forward, p.reverse])
    }
}

/// Receiver node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReceiverConfig {
    pub link: LinkConfig,
    pub channels: ChannelMap,
    /// Write duty registers for accepted frames; when false the node only
    /// reports frames
    pub drive_outputs: bool,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            channels: ChannelMap::default(),
            drive_outputs: true,
        }
    }
}

/// Servo controller settings on the sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServoConfig {
    /// Drive servos at all
    pub enabled: bool,
    /// 7-bit I2C address of the controller
    pub i2c_address: u8,
    /// Servo refresh rate, 24-1526 Hz
    pub pwm_frequency_hz: u16,
    /// Pulse width at `min_degrees`
    pub min_pulse_us: u16,
    /// Pulse width at `max_degrees`
    pub max_pulse_us: u16,
    pub min_degrees: i16,
    pub max_degrees: i16,
    /// Controller channel of the first servo; the rest follow in order
    pub first_channel: u8,
    pub mode: ServoMode,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            i2c_address: 0x40,
            pwm_frequency_hz: 50,
            min_pulse_us: 500,
            max_pulse_us: 2500,
            min_degrees: -90,
            max_degrees: 90,
            first_channel: 0,
            mode: ServoMode::Fast,
        }
    }
}

impl ServoConfig {
    /// Controller channel driving servo `index`
    pub fn channel(&self, index: usize) -> u8 {
        self.first_channel + index as u8
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_degrees >= self.max_degrees
            || self.min_pulse_us >= self.max_pulse_us
            || !(24..=1526).contains(&self.pwm_frequency_hz)
            || self.first_channel as usize + SERVO_COUNT > 16
            || self.i2c_address > 0x7F
        {
            return Err(ConfigError::InvalidValue);
        }
        Ok(())
    }
}

/// Sender node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SenderConfig {
    pub link: LinkConfig,
    pub servos: ServoConfig,
    /// Wait for the receiver's echo line after each frame
    pub wait_for_echo: bool,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            servos: ServoConfig::default(),
            wait_for_echo: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_link() {
        let link = LinkConfig::default();
        assert_eq!(link.baud_rate, 9600);
        assert_eq!(link.frame_timeout_us(), 100_000);
        assert_eq!(link.indicator_hold_us(), 500_000);
        assert_eq!(link.echo_timeout_us(), 1_000_000);
    }

    #[test]
    fn test_default_channel_map() {
        let map = ChannelMap::default();
        assert_eq!(map.channels[0], PinPair::new(0, 1));
        assert_eq!(map.channels[7], PinPair::new(14, 15));
        assert_eq!(map.validate(), Ok(()));
        assert_eq!(map.pins().count(), 16);
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let mut map = ChannelMap::default();
        map.channels[3].reverse = 2;
        assert_eq!(map.validate(), Err(ConfigError::DuplicatePin(2)));
    }

    #[test]
    fn test_pin_out_of_range_rejected() {
        let mut map = ChannelMap::default();
        map.channels[0].forward = 30;
        assert_eq!(map.validate(), Err(ConfigError::PinOutOfRange(30)));
    }

    #[test]
    fn test_servo_defaults() {
        let servos = ServoConfig::default();
        assert_eq!(servos.i2c_address, 0x40);
        assert_eq!(servos.channel(3), 3);
        assert_eq!(servos.validate(), Ok(()));

        let bad = ServoConfig {
            min_degrees: 10,
            max_degrees: 10,
            ..servos
        };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidValue));
    }
}
