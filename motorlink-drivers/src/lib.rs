//! Peripheral drivers
//!
//! Concrete implementations of the capability traits in `motorlink-core`
//! for parts that sit on a bus rather than on a chip peripheral:
//!
//! - Servo controllers (PCA9685 over I2C)

#![no_std]
#![deny(unsafe_code)]

pub mod servo;

pub use servo::pca9685::{Pca9685, Pca9685Config, ServoError};
