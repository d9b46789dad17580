//! Receiver diagnostic lines
//!
//! After every frame event the receiver writes one newline-terminated text
//! line back over the link:
//!
//! - `ERROR: Packet timeout/incomplete`
//! - `ERROR: Bad checksum`
//! - `[MOTORS] M1: 10 M2: -20 ... M8: -80`
//!
//! The sender shows the line to the operator as an echo. It is never fed
//! back into protocol state.

use core::fmt::Write;

use heapless::String;

use crate::frame::{CommandVector, FrameError, PAYLOAD_LEN};

/// Line reported when a frame times out
pub const MSG_TIMEOUT: &str = "ERROR: Packet timeout/incomplete";

/// Line reported when a frame fails its checksum
pub const MSG_BAD_CHECKSUM: &str = "ERROR: Bad checksum";

/// Prefix of the accepted-frame report
pub const MOTORS_PREFIX: &str = "[MOTORS]";

/// Longest diagnostic line, newline included
///
/// `[MOTORS]` plus eight ` Mn: -128` fields plus `\n`.
pub const MAX_LINE_LEN: usize = 8 + PAYLOAD_LEN * 9 + 1;

/// A formatted diagnostic line
pub type DiagnosticLine = String<MAX_LINE_LEN>;

/// One frame event as reported over the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// A frame was accepted with these commands
    Motors(CommandVector),
    /// A frame timed out before completing
    Timeout,
    /// A frame failed its checksum
    BadChecksum,
}

impl Diagnostic {
    /// Diagnostic for a reader outcome
    pub fn from_outcome(outcome: &Result<CommandVector, FrameError>) -> Self {
        match outcome {
            Ok(commands) => Diagnostic::Motors(*commands),
            Err(FrameError::Timeout) => Diagnostic::Timeout,
            Err(FrameError::ChecksumMismatch { .. }) => Diagnostic::BadChecksum,
        }
    }

    /// Render as a newline-terminated line
    pub fn to_line(&self) -> DiagnosticLine {
        let mut line = DiagnosticLine::new();
        // Capacity covers the longest line, so the writes cannot fail.
        match self {
            Diagnostic::Timeout => {
                let _ = line.push_str(MSG_TIMEOUT);
            }
            Diagnostic::BadChecksum => {
                let _ = line.push_str(MSG_BAD_CHECKSUM);
            }
            Diagnostic::Motors(commands) => {
                let _ = line.push_str(MOTORS_PREFIX);
                for (i, value) in commands.iter().enumerate() {
                    let _ = write!(line, " M{}: {}", i + 1, value);
                }
            }
        }
        let _ = line.push('\n');
        line
    }

    /// Classify a line received from the receiver
    ///
    /// Trailing whitespace and line endings are ignored. Returns `None` for
    /// anything that is not a well-formed diagnostic.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end();
        match line {
            MSG_TIMEOUT => return Some(Diagnostic::Timeout),
            MSG_BAD_CHECKSUM => return Some(Diagnostic::BadChecksum),
            _ => {}
        }

        let mut fields = line.strip_prefix(MOTORS_PREFIX)?.split_whitespace();
        let mut commands = [0i8; PAYLOAD_LEN];
        for (i, command) in commands.iter_mut().enumerate() {
            let label = fields.next()?;
            let index: usize = label.strip_prefix('M')?.strip_suffix(':')?.parse().ok()?;
            if index != i + 1 {
                return None;
            }
            *command = fields.next()?.parse().ok()?;
        }
        if fields.next().is_some() {
            return None;
        }
        Some(Diagnostic::Motors(commands))
    }
}
