//! Servo controller drivers

pub mod pca9685;
