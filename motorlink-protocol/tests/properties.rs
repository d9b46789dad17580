use motorlink_protocol::{
    checksum, encode, validate, Diagnostic, FrameError, FrameReader, FRAME_LEN, FRAME_SYNC,
    FRAME_TIMEOUT_US,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn encode_then_validate_returns_commands(commands in any::<[i8; 8]>()) {
        let frame = encode(&commands);
        prop_assert_eq!(frame[0], FRAME_SYNC);
        prop_assert_eq!(validate(&frame), Ok(commands));
    }

    #[test]
    fn single_bit_flip_is_detected(
        commands in any::<[i8; 8]>(),
        byte in 1usize..FRAME_LEN,
        bit in 0u8..8,
    ) {
        let mut frame = encode(&commands);
        frame[byte] ^= 1 << bit;
        let is_mismatch = matches!(validate(&frame), Err(FrameError::ChecksumMismatch { .. }));
        prop_assert!(is_mismatch);
    }

    #[test]
    fn validator_agrees_with_checksum(bytes in any::<[u8; 9]>()) {
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = FRAME_SYNC;
        frame[1..].copy_from_slice(&bytes);
        let matches = checksum(&frame[1..9]) == frame[9];
        prop_assert_eq!(validate(&frame).is_ok(), matches);
    }

    #[test]
    fn cancelling_pair_goes_undetected(
        commands in any::<[i8; 8]>(),
        first in 1usize..9,
        offset in 1usize..8,
        mask in 1u8..=255,
    ) {
        let second = 1 + (first - 1 + offset) % 8;
        let mut frame = encode(&commands);
        frame[first] ^= mask;
        frame[second] ^= mask;
        prop_assert!(validate(&frame).is_ok());
    }

    #[test]
    fn reader_recovers_after_truncated_frame(
        partial in proptest::collection::vec(any::<u8>(), 0..9),
        commands in any::<[i8; 8]>(),
    ) {
        let mut reader = FrameReader::new();
        let mut outcomes = Vec::new();

        outcomes.extend(reader.poll(0, Some(FRAME_SYNC)));
        for &byte in &partial {
            outcomes.extend(reader.poll(1_000, Some(byte)));
        }

        let later = FRAME_TIMEOUT_US + 5_000;
        for &byte in &encode(&commands) {
            outcomes.extend(reader.poll(later, Some(byte)));
        }

        prop_assert_eq!(outcomes, vec![Err(FrameError::Timeout), Ok(commands)]);
    }

    #[test]
    fn diagnostics_parse_back(commands in any::<[i8; 8]>()) {
        let line = Diagnostic::Motors(commands).to_line();
        prop_assert_eq!(Diagnostic::parse(&line), Some(Diagnostic::Motors(commands)));
    }
}
