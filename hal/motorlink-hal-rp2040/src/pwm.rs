//! Motor PWM bank
//!
//! Eight PWM slices, each driving one forward/reverse pin pair. The counter
//! wraps at 255 so the 8-bit duty maps straight onto the compare register.

use embassy_rp::pwm::{Config, Pwm};
use fixed::types::extra::U4;
use fixed::FixedU16;
use motorlink_hal::pwm::PWM_WRAP;
use motorlink_hal::PwmOutput;

use crate::pins::{pwm_slot, SliceHalf, MOTOR_BANK_PINS, SLICE_COUNT};

/// Clock divider for the motor slices
///
/// 125 MHz / 16 / 256 gives a PWM frequency of about 30 kHz.
pub const PWM_DIVIDER: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// GPIO is not wired to the bank
    UnmappedPin(u8),
}

/// Slice configuration shared by every motor output, both halves low
pub fn slice_config() -> Config {
    let mut config = Config::default();
    config.top = PWM_WRAP;
    config.divider = FixedU16::<U4>::from_num(PWM_DIVIDER);
    config.compare_a = 0;
    config.compare_b = 0;
    config
}

/// All eight motor slices, addressed by GPIO number
pub struct PwmBank<'d> {
    slices: [Pwm<'d>; SLICE_COUNT],
    configs: [Config; SLICE_COUNT],
}

impl<'d> PwmBank<'d> {
    /// Take slices created with [`slice_config`], slice `i` on GPIO `2i`/`2i+1`
    pub fn new(slices: [Pwm<'d>; SLICE_COUNT]) -> Self {
        Self {
            slices,
            configs: core::array::from_fn(|_| slice_config()),
        }
    }

    /// Current compare level of a GPIO
    pub fn level(&self, pin: u8) -> Option<u8> {
        if pin >= MOTOR_BANK_PINS {
            return None;
        }
        let (slice, half) = pwm_slot(pin);
        let config = &self.configs[slice];
        let compare = match half {
            SliceHalf::A => config.compare_a,
            SliceHalf::B => config.compare_b,
        };
        Some(compare as u8)
    }
}

impl PwmOutput for PwmBank<'_> {
    type Error = PwmError;

    fn set_level(&mut self, pin: u8, duty: u8) -> Result<(), Self::Error> {
        if pin >= MOTOR_BANK_PINS {
            return Err(PwmError::UnmappedPin(pin));
        }
        let (slice, half) = pwm_slot(pin);
        let config = &mut self.configs[slice];
        match half {
            SliceHalf::A => config.compare_a = duty as u16,
            SliceHalf::B => config.compare_b = duty as u16,
        }
        self.slices[slice].set_config(config);
        Ok(())
    }
}
