//! motorlink wire protocol
//!
//! This crate defines the serial link between the sender (operator-facing
//! controller) and the receiver (motor node). Commands travel as a fixed
//! 10-byte binary frame; the receiver answers every frame event with one
//! line of text.
//!
//! # Frame Format
//!
//! ```text
//! ┌──────┬────┬────┬────┬────┬────┬────┬────┬────┬──────────┐
//! │ SYNC │ M1 │ M2 │ M3 │ M4 │ M5 │ M6 │ M7 │ M8 │ CHECKSUM │
//! │ 0xAA │ i8 │ i8 │ i8 │ i8 │ i8 │ i8 │ i8 │ i8 │ XOR M1-8 │
//! └──────┴────┴────┴────┴────┴────┴────┴────┴────┴──────────┘
//! ```
//!
//! There is no length field, no acknowledgement and no retransmission. The
//! reader resynchronises on the next sync byte after any failure.

#![no_std]
#![deny(unsafe_code)]

pub mod diagnostics;
pub mod frame;
pub mod reader;

pub use diagnostics::{Diagnostic, DiagnosticLine, MAX_LINE_LEN};
pub use frame::{
    checksum, clamp_command, encode, validate, CommandVector, Frame, FrameError, FRAME_LEN,
    FRAME_SYNC, PAYLOAD_LEN,
};
pub use reader::{FrameReader, FRAME_TIMEOUT_US};
