//! motorlink Hardware Abstraction Layer
//!
//! This crate defines the hardware capabilities the link nodes need, so the
//! frame engine and the command logic can be exercised on the host with
//! in-memory doubles and on the RP2040 with real peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Firmware (motorlink-receiver / -sender)    │
//! └─────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────┐
//! │  motorlink-hal (this crate - traits)        │
//! └─────────────────────────────────────────────┘
//!                       │
//!                       ▼
//!             ┌───────────────────┐
//!             │ motorlink-hal-    │
//!             │     rp2040        │
//!             └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`pwm::PwmOutput`] - Per-GPIO duty registers
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`clock::MonotonicClock`] - Microsecond time source

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod i2c;
pub mod pwm;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::MonotonicClock;
pub use i2c::I2cBus;
pub use pwm::PwmOutput;
pub use uart::{Uart, UartRx, UartTx};
