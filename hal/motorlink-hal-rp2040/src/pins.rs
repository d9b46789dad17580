//! Pin checks for config-driven wiring
//!
//! The motor bank owns PWM slices 0-7 wired to GPIO 0-15, so a channel
//! table loaded from config must stay inside those pins. Every GPIO `n`
//! drives half `A` (even) or `B` (odd) of slice `(n >> 1) & 7`.

use heapless::FnvIndexSet;
use motorlink_core::config::ChannelMap;

/// Number of PWM slices on the RP2040
pub const SLICE_COUNT: usize = 8;

/// GPIOs wired to the motor PWM bank (0..16)
pub const MOTOR_BANK_PINS: u8 = 16;

/// Half of a PWM slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SliceHalf {
    A,
    B,
}

/// Error when checking a pin table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin is outside the motor bank
    OutsideBank(u8),
    /// Pin used twice
    AlreadyTaken(u8),
    /// Pin reserved for the link, the pixel or the bus
    Reserved(u8),
}

/// PWM slice and half driven by a GPIO
pub const fn pwm_slot(gpio: u8) -> (usize, SliceHalf) {
    let slice = ((gpio >> 1) & 7) as usize;
    if gpio % 2 == 0 {
        (slice, SliceHalf::A)
    } else {
        (slice, SliceHalf::B)
    }
}

/// Check that a channel table fits the motor bank and avoids `reserved`
pub fn check_motor_pins(channels: &ChannelMap, reserved: &[u8]) -> Result<(), PinError> {
    let mut taken: FnvIndexSet<u8, 32> = FnvIndexSet::new();
    for pin in channels.pins() {
        if pin >= MOTOR_BANK_PINS {
            return Err(PinError::OutsideBank(pin));
        }
        if reserved.contains(&pin) {
            return Err(PinError::Reserved(pin));
        }
        if !taken.insert(pin).map_err(|_| PinError::AlreadyTaken(pin))? {
            return Err(PinError::AlreadyTaken(pin));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pwm_slot() {
        assert_eq!(pwm_slot(0), (0, SliceHalf::A));
        assert_eq!(pwm_slot(1), (0, SliceHalf::B));
        assert_eq!(pwm_slot(14), (7, SliceHalf::A));
        assert_eq!(pwm_slot(15), (7, SliceHalf::B));
        assert_eq!(pwm_slot(16), (0, SliceHalf::A));
    }

    #[test]
    fn test_default_table_fits_bank() {
        assert_eq!(check_motor_pins(&ChannelMap::default(), &[16, 28, 29]), Ok(()));
    }

    #[test]
    fn test_rejects_pins_outside_bank() {
        let mut forward = [0, 2, 4, 6, 8, 10, 12, 14];
        forward[3] = 20;
        let map = ChannelMap::from_pins(forward, [1, 3, 5, 7, 9, 11, 13, 15]);
        assert_eq!(check_motor_pins(&map, &[]), Err(PinError::OutsideBank(20)));
    }

    #[test]
    fn test_rejects_reserved_pin() {
        let map = ChannelMap::default();
        assert_eq!(check_motor_pins(&map, &[5]), Err(PinError::Reserved(5)));
    }
}
