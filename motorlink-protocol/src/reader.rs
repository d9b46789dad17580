//! Time-bounded frame synchronisation.
//!
//! The reader is fed from a polling loop: every iteration hands it the
//! current time and at most one byte. Bytes are discarded until a sync byte
//! arrives; the remaining nine bytes must then arrive before the frame
//! timeout, measured from the moment the sync byte was taken.
//!
//! A timed-out frame is dropped whole. Nothing collected inside the aborted
//! window is rescanned, so a sync byte that arrived there is lost and the
//! reader resynchronises on the next one.

use crate::frame::{validate, CommandVector, Frame, FrameError, FRAME_LEN, FRAME_SYNC};

/// Default window for completing a frame after its sync byte
pub const FRAME_TIMEOUT_US: u64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    /// Discarding bytes until a sync byte
    Scanning,
    /// Collecting the frame that started at `started_at`
    Assembling { started_at: u64 },
}

/// Frame reader state machine
#[derive(Debug, Clone)]
pub struct FrameReader {
    state: ReadState,
    buffer: Frame,
    filled: usize,
    timeout_us: u64,
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReader {
    /// Create a reader with the default 100 ms frame timeout
    pub fn new() -> Self {
        Self::with_timeout(FRAME_TIMEOUT_US)
    }

    /// Create a reader with a custom frame timeout
    pub fn with_timeout(timeout_us: u64) -> Self {
        Self {
            state: ReadState::Scanning,
            buffer: [0; FRAME_LEN],
            filled: 0,
            timeout_us,
        }
    }

    /// Frame timeout in microseconds
    pub fn timeout_us(&self) -> u64 {
        self.timeout_us
    }

    /// True while a frame is partially collected
    pub fn is_assembling(&self) -> bool {
        matches!(self.state, ReadState::Assembling { .. })
    }

    /// Drop any partial frame and go back to scanning
    pub fn reset(&mut self) {
        self.state = ReadState::Scanning;
        self.filled = 0;
    }

    /// Abort the frame in progress if its window has closed
    ///
    /// Returns `Some(FrameError::Timeout)` exactly once per aborted frame.
    pub fn expire(&mut self, now_us: u64) -> Option<FrameError> {
        match self.state {
            ReadState::Assembling { started_at }
                if now_us.saturating_sub(started_at) >= self.timeout_us =>
            {
                self.reset();
                Some(FrameError::Timeout)
            }
            _ => None,
        }
    }

    /// Feed one byte received at `now_us`
    ///
    /// Returns `Some(Ok(commands))` for a valid frame, `Some(Err(..))` for a
    /// failed one and `None` while more bytes are needed. The caller should
    /// call [`expire`](Self::expire) first; a byte arriving after the
    /// window is treated as the first byte of a new scan.
    pub fn feed(&mut self, byte: u8, now_us: u64) -> Option<Result<CommandVector, FrameError>> {
        match self.state {
            ReadState::Scanning => {
                if byte == FRAME_SYNC {
                    self.buffer[0] = byte;
                    self.filled = 1;
                    self.state = ReadState::Assembling { started_at: now_us };
                }
                None
            }
            ReadState::Assembling { .. } => {
                self.buffer[self.filled] = byte;
                self.filled += 1;
                if self.filled < FRAME_LEN {
                    return None;
                }

                let frame = self.buffer;
                self.reset();
                Some(validate(&frame))
            }
        }
    }

    /// One loop iteration: expire the current window, then consume `byte`
    ///
    /// A timeout and a new sync byte can arrive in the same call; the
    /// timeout is reported and the sync starts the next frame.
    pub fn poll(
        &mut self,
        now_us: u64,
        byte: Option<u8>,
    ) -> Option<Result<CommandVector, FrameError>> {
        let expired = self.expire(now_us).map(Err);
        let fed = byte.and_then(|b| self.feed(b, now_us));
        expired.or(fed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::encode;

    fn feed_all(reader: &mut FrameReader, bytes: &[u8], now_us: u64) -> Option<Result<CommandVector, FrameError>> {
        let mut last = None;
        for &byte in bytes {
            if let Some(result) = reader.poll(now_us, Some(byte)) {
                last = Some(result);
            }
        }
        last
    }

    #[test]
    fn test_complete_frame() {
        let mut reader = FrameReader::new();
        let frame = encode(&[1, -2, 3, -4, 5, -6, 7, -8]);

        assert_eq!(feed_all(&mut reader, &frame, 0), Some(Ok([1, -2, 3, -4, 5, -6, 7, -8])));
        assert!(!reader.is_assembling());
    }

    #[test]
    fn test_garbage_before_sync_is_skipped() {
        let mut reader = FrameReader::new();
        for byte in [0x00, 0xFF, 0x12, 0x34] {
            assert_eq!(reader.poll(0, Some(byte)), None);
            assert!(!reader.is_assembling());
        }
        let frame = encode(&[9; 8]);
        assert_eq!(feed_all(&mut reader, &frame, 10), Some(Ok([9; 8])));
    }

    #[test]
    fn test_timeout_after_partial_frame() {
        let mut reader = FrameReader::new();
        feed_all(&mut reader, &[FRAME_SYNC, 1, 2, 3], 0);
        assert!(reader.is_assembling());

        assert_eq!(reader.poll(99_999, None), None);
        assert_eq!(reader.poll(100_000, None), Some(Err(FrameError::Timeout)));
        assert!(!reader.is_assembling());
        assert_eq!(reader.poll(200_000, None), None);
    }

    #[test]
    fn test_window_measured_from_sync() {
        let mut reader = FrameReader::new();
        reader.poll(1_000, Some(FRAME_SYNC));
        reader.poll(60_000, Some(0x01));
        assert_eq!(reader.poll(100_999, None), None);
        assert_eq!(reader.poll(101_000, None), Some(Err(FrameError::Timeout)));
    }

    #[test]
    fn test_sync_inside_aborted_window_is_lost() {
        let mut reader = FrameReader::new();
        let frame = encode(&[5; 8]);

        // A second sync arrives while the first frame is still open and is
        // swallowed as payload.
        feed_all(&mut reader, &[FRAME_SYNC, 0x01], 0);
        feed_all(&mut reader, &frame[..4], 10);
        assert_eq!(reader.poll(150_000, None), Some(Err(FrameError::Timeout)));

        // The tail of the second frame has no sync byte of its own.
        assert_eq!(feed_all(&mut reader, &frame[4..], 150_010), None);
        assert!(!reader.is_assembling());
    }

    #[test]
    fn test_late_sync_reports_timeout_and_starts_next_frame() {
        let mut reader = FrameReader::new();
        feed_all(&mut reader, &[FRAME_SYNC, 7, 7], 0);

        let frame = encode(&[3; 8]);
        assert_eq!(reader.poll(120_000, Some(frame[0])), Some(Err(FrameError::Timeout)));
        assert!(reader.is_assembling());
        assert_eq!(feed_all(&mut reader, &frame[1..], 120_500), Some(Ok([3; 8])));
    }

    #[test]
    fn test_checksum_failure_resyncs() {
        let mut reader = FrameReader::new();
        let mut bad = encode(&[1; 8]);
        bad[3] ^= 0x10;
        let good = encode(&[2; 8]);

        assert!(matches!(
            feed_all(&mut reader, &bad, 0),
            Some(Err(FrameError::ChecksumMismatch { .. }))
        ));
        assert_eq!(feed_all(&mut reader, &good, 10), Some(Ok([2; 8])));
    }

    #[test]
    fn test_custom_timeout() {
        let mut reader = FrameReader::with_timeout(5_000);
        reader.poll(0, Some(FRAME_SYNC));
        assert_eq!(reader.poll(5_000, None), Some(Err(FrameError::Timeout)));
        assert_eq!(reader.timeout_us(), 5_000);
    }
}
