//! Bounded wait for the receiver's echo line

use heapless::Vec;

use motorlink_hal::{MonotonicClock, UartRx};
use motorlink_protocol::Diagnostic;

use super::SenderError;

/// Echo buffer size; one byte is kept free, so lines of up to 127
/// characters fit
pub const ECHO_CAPACITY: usize = 128;

/// Default wait for the echo line
pub const ECHO_TIMEOUT_US: u64 = 1_000_000;

/// Text received from the receiver after a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Echo {
    bytes: Vec<u8, ECHO_CAPACITY>,
    complete: bool,
}

impl Echo {
    /// Line text without its terminator
    ///
    /// Stops at the first invalid UTF-8 byte.
    pub fn as_str(&self) -> &str {
        let text = match core::str::from_utf8(&self.bytes) {
            Ok(text) => text,
            Err(e) => core::str::from_utf8(&self.bytes[..e.valid_up_to()]).unwrap_or_default(),
        };
        text.trim_end_matches(['\r', '\n'])
    }

    /// True if the line ended with a newline rather than a full buffer or
    /// the deadline
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Classify the line as a receiver diagnostic
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        Diagnostic::parse(self.as_str())
    }
}

/// Collect one line from `rx`, giving up `timeout_us` after the call
///
/// Bytes are read until a newline, until the buffer is full or until the
/// deadline. A partial line is still returned; only silence is an error.
pub fn wait_for_echo<R, C>(rx: &mut R, clock: &C, timeout_us: u64) -> Result<Echo, SenderError>
where
    R: UartRx,
    C: MonotonicClock,
{
    let started = clock.now_us();
    let mut echo = Echo {
        bytes: Vec::new(),
        complete: false,
    };

    while clock.elapsed_since(started) < timeout_us {
        let Some(byte) = rx.try_read_byte().map_err(|_| SenderError::Link)? else {
            continue;
        };
        if byte == b'\n' {
            echo.complete = true;
            break;
        }
        // Capacity is checked before the push, so this cannot fail
        let _ = echo.bytes.push(byte);
        if echo.bytes.len() >= ECHO_CAPACITY - 1 {
            break;
        }
    }

    if echo.bytes.is_empty() && !echo.complete {
        return Err(SenderError::NoAcknowledgement);
    }
    Ok(echo)
}
