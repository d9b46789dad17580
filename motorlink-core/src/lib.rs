//! Board-agnostic logic for both link nodes
//!
//! This crate contains everything that does not depend on a specific chip:
//!
//! - Capability traits for the status pixel and the servo controller
//! - The timed status indicator
//! - The command-to-duty actuator mapper
//! - The receiver loop context (reader, mapper, indicator, diagnostics)
//! - Sender input parsing, frame dispatch and echo collection
//! - Configuration types and the embedded config parser
//!
//! Time is always injected through [`motorlink_hal::MonotonicClock`]; no
//! module keeps global state.

#![no_std]
#![deny(unsafe_code)]

pub mod actuator;
pub mod config;
pub mod indicator;
pub mod receiver;
pub mod sender;
pub mod traits;

pub use actuator::{drive_levels, ActuatorMapper, ChannelDuty};
pub use indicator::StatusIndicator;
pub use receiver::{LinkEvent, Receiver, ReceiverError};
pub use sender::{OperatorCommand, Sender, SenderError};
