//! Command-to-duty actuator mapper
//!
//! Each motor channel is an H-bridge input pair. A positive command drives
//! the forward pin, a negative one the reverse pin, and the magnitude is
//! doubled into the 8-bit duty range:
//!
//! | command | forward | reverse |
//! |---------|---------|---------|
//! | `v > 0` | `min(2v, 254)` | 0 |
//! | `v < 0` | 0 | `min(2·|v|, 254)` |
//! | `0`     | 0 | 0 |
//!
//! Applying the same vector twice leaves the registers unchanged.

use motorlink_hal::PwmOutput;
use motorlink_protocol::{CommandVector, PAYLOAD_LEN};

use crate::config::ChannelMap;

/// Highest duty a command can produce
pub const MAX_DUTY: u8 = 254;

/// Duty pair of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelDuty {
    pub forward: u8,
    pub reverse: u8,
}

/// Forward and reverse duty for one command
pub fn drive_levels(command: i8) -> ChannelDuty {
    let magnitude = (command.unsigned_abs() as u16 * 2).min(MAX_DUTY as u16) as u8;
    match command {
        c if c > 0 => ChannelDuty {
            forward: magnitude,
            reverse: 0,
        },
        c if c < 0 => ChannelDuty {
            forward: 0,
            reverse: magnitude,
        },
        _ => ChannelDuty::default(),
    }
}

/// Writes command vectors to the motor PWM pins
pub struct ActuatorMapper<P: PwmOutput> {
    output: P,
    channels: ChannelMap,
    duties: [ChannelDuty; PAYLOAD_LEN],
}

impl<P: PwmOutput> ActuatorMapper<P> {
    /// Create a mapper over `output` wired as `channels`
    ///
    /// Nothing is written until [`stop_all`](Self::stop_all) or
    /// [`apply`](Self::apply) is called.
    pub fn new(output: P, channels: ChannelMap) -> Self {
        Self {
            output,
            channels,
            duties: [ChannelDuty::default(); PAYLOAD_LEN],
        }
    }

    /// Drive every channel to (0, 0)
    pub fn stop_all(&mut self) -> Result<(), P::Error> {
        self.apply(&[0; PAYLOAD_LEN])
    }

    /// Write one command vector to all channels
    pub fn apply(&mut self, commands: &CommandVector) -> Result<(), P::Error> {
        for (i, &command) in commands.iter().enumerate() {
            self.set_channel(i, drive_levels(command))?;
        }
        Ok(())
    }

    fn set_channel(&mut self, index: usize, duty: ChannelDuty) -> Result<(), P::Error> {
        let pins = self.channels.channels[index];
        // Release the idle side first so both inputs are never high together
        if duty.forward == 0 {
            self.output.set_level(pins.forward, 0)?;
            self.output.set_level(pins.reverse, duty.reverse)?;
        } else {
            self.output.set_level(pins.reverse, 0)?;
            self.output.set_level(pins.forward, duty.forward)?;
        }
        self.duties[index] = duty;
        Ok(())
    }

    /// Last duty written per channel
    pub fn duties(&self) -> &[ChannelDuty; PAYLOAD_LEN] {
        &self.duties
    }

    pub fn channels(&self) -> &ChannelMap {
        &self.channels
    }

    pub fn output(&self) -> &P {
        &self.output
    }
}
