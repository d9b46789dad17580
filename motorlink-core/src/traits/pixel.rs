//! Status pixel trait

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Frame accepted
    pub const GOOD: Self = Self::new(0, 255, 0);

    /// Frame rejected
    pub const ERROR: Self = Self::new(255, 0, 0);

    /// Resting colour, dim white
    pub const IDLE: Self = Self::new(16, 16, 16);

    /// 24-bit word in WS2812 wire order (green, red, blue)
    pub const fn to_grb(self) -> u32 {
        ((self.g as u32) << 16) | ((self.r as u32) << 8) | self.b as u32
    }
}

/// A single addressable LED
///
/// Writing a colour is fire-and-forget; the pixel keeps showing it until
/// the next write.
pub trait StatusPixel {
    /// Push one colour value to the LED
    fn show(&mut self, color: Rgb);
}

impl<T: StatusPixel + ?Sized> StatusPixel for &mut T {
    fn show(&mut self, color: Rgb) {
        (**self).show(color)
    }
}
