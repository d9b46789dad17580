//! PWM output abstractions
//!
//! Duty registers are addressed by GPIO number. On the RP2040 every GPIO
//! maps onto one half of a PWM slice, so a pin table is all the mapper
//! needs to know about the wiring.

/// A bank of PWM-capable pins with 8-bit duty registers
pub trait PwmOutput {
    /// Error type for PWM operations
    type Error;

    /// Set the compare level for the given GPIO
    ///
    /// `duty` is out of a wrap of 255; 0 holds the pin low.
    fn set_level(&mut self, pin: u8, duty: u8) -> Result<(), Self::Error>;
}

impl<T: PwmOutput + ?Sized> PwmOutput for &mut T {
    type Error = T::Error;

    fn set_level(&mut self, pin: u8, duty: u8) -> Result<(), Self::Error> {
        (**self).set_level(pin, duty)
    }
}

/// PWM counter wrap used for every motor slice
pub const PWM_WRAP: u16 = 255;
