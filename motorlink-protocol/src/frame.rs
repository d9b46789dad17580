//! Frame encoding and validation.
//!
//! Frame format:
//! - SYNC (1 byte): 0xAA
//! - PAYLOAD (8 bytes): one signed motor command per channel
//! - CHECKSUM (1 byte): XOR of the 8 payload bytes
//!
//! The XOR checksum detects any single-bit error but accepts corruptions in
//! two payload bytes whose bit flips coincide. That weakness is part of the
//! wire format and is not compensated for here.

/// Frame synchronization byte
pub const FRAME_SYNC: u8 = 0xAA;

/// Number of motor channels carried per frame
pub const PAYLOAD_LEN: usize = 8;

/// Complete frame size (SYNC + PAYLOAD + CHECKSUM)
pub const FRAME_LEN: usize = 1 + PAYLOAD_LEN + 1;

/// Raw frame bytes
pub type Frame = [u8; FRAME_LEN];

/// One signed command per motor channel
pub type CommandVector = [i8; PAYLOAD_LEN];

/// Errors reported by the frame reader and validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Sync seen but the frame did not complete within the timeout
    Timeout,
    /// Trailing checksum does not match the payload
    ChecksumMismatch {
        /// XOR computed over the received payload
        expected: u8,
        /// Checksum byte found at the end of the frame
        received: u8,
    },
}

/// XOR of all bytes
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &b| acc ^ b)
}

/// Clamp an operator-supplied integer into the signed 8-bit command range
pub fn clamp_command(value: i32) -> i8 {
    value.clamp(i8::MIN as i32, i8::MAX as i32) as i8
}

/// Build the wire frame for a command vector
pub fn encode(commands: &CommandVector) -> Frame {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = FRAME_SYNC;
    for (slot, &value) in frame[1..=PAYLOAD_LEN].iter_mut().zip(commands) {
        *slot = value as u8;
    }
    frame[FRAME_LEN - 1] = checksum(&frame[1..=PAYLOAD_LEN]);
    frame
}

/// Check a complete frame and extract its commands
///
/// Only the checksum is verified; the reader guarantees byte 0 is the sync
/// byte.
pub fn validate(frame: &Frame) -> Result<CommandVector, FrameError> {
    let payload = &frame[1..=PAYLOAD_LEN];
    let expected = checksum(payload);
    let received = frame[FRAME_LEN - 1];
    if expected != received {
        return Err(FrameError::ChecksumMismatch { expected, received });
    }

    let mut commands = [0i8; PAYLOAD_LEN];
    for (command, &byte) in commands.iter_mut().zip(payload) {
        *command = byte as i8;
    }
    Ok(commands)
}
