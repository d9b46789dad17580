//! RP2040-specific HAL for the motorlink nodes
//!
//! Implements the `motorlink-hal` traits on embassy-rp peripherals:
//!
//! - Polled UART for the link and the operator console
//! - A bank of eight PWM slices addressed by GPIO number
//! - PIO-driven WS2812 status pixel
//! - I2C adapter for any `embedded-hal` bus
//! - Microsecond clock backed by `embassy-time`
//! - Pin checks for config-driven wiring

#![no_std]

pub mod clock;
pub mod i2c;
pub mod pins;
pub mod pwm;
pub mod uart;
pub mod ws2812;

pub use clock::EmbassyClock;
pub use i2c::HalI2c;
pub use pwm::{PwmBank, PwmError};
pub use uart::BlockingUart;
pub use ws2812::Ws2812;
