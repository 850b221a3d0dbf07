//! Frame assembly and decomposition
//!
//! Composes a transmittable frame from a payload and a sync schedule, and
//! performs the inverse on received byte buffers. Whether a frame carries a
//! trailing checksum byte is command-specific, so the checksum is treated as
//! an ordinary payload element by the caller; the assembler never appends
//! one implicitly.

use thiserror::Error;

use crate::codec::{extract_payload, interleave, SyncPattern};
use crate::direction::{Direction, END_MARKER};

/// A received buffer that does not decompose into a valid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("frame too short: {len} bytes, need at least 2")]
    TooShort { len: usize },

    #[error("invalid start marker: expected 0x{expected:02X}, found 0x{found:02X}")]
    InvalidStartMarker { expected: u8, found: u8 },

    #[error("invalid end marker: expected 0x00, found 0x{found:02X}")]
    InvalidEndMarker { found: u8 },
}

/// Build a complete outbound-ready frame:
/// start marker ++ interleaved payload ++ end marker.
///
/// If the command calls for a checksum, the caller appends it to `payload`
/// before building.
pub fn build_frame(direction: Direction, payload: &[u8], pattern: &SyncPattern) -> Vec<u8> {
    let body = interleave(payload, direction, pattern);
    let mut frame = Vec::with_capacity(body.len() + 2);
    frame.push(direction.start_marker());
    frame.extend_from_slice(&body);
    frame.push(END_MARKER);
    frame
}

/// Decompose a received buffer into its payload.
///
/// Validates the direction's start marker and the end marker, then strips
/// sync filler. The caller separates any trailing checksum byte it expects.
pub fn decode_frame(bytes: &[u8], direction: Direction) -> Result<Vec<u8>, DecodeError> {
    if bytes.len() < 2 {
        return Err(DecodeError::TooShort { len: bytes.len() });
    }
    if bytes[0] != direction.start_marker() {
        return Err(DecodeError::InvalidStartMarker {
            expected: direction.start_marker(),
            found: bytes[0],
        });
    }
    let last = bytes[bytes.len() - 1];
    if last != END_MARKER {
        return Err(DecodeError::InvalidEndMarker { found: last });
    }

    Ok(extract_payload(&bytes[1..bytes.len() - 1], direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::checksum;
    use crate::direction::{RX_START, TX_START};

    #[test]
    fn test_build_decode_inverse() {
        let payload = [0xFD, 0xF9, 0x59, 0x57, 0xF3, 0x71, 0x83];
        let pattern = SyncPattern::new(vec![1, 1, 1, 0, 2, 1, 0]);
        let frame = build_frame(Direction::Outbound, &payload, &pattern);
        assert_eq!(frame[0], TX_START);
        assert_eq!(*frame.last().unwrap(), 0x00);
        assert_eq!(decode_frame(&frame, Direction::Outbound).unwrap(), payload);
    }

    #[test]
    fn test_build_with_trailing_checksum() {
        let mut payload = vec![0xFD, 0xF9];
        payload.push(checksum(&payload).value);
        let frame = build_frame(Direction::Outbound, &payload, &SyncPattern::none(3));
        assert_eq!(frame, vec![TX_START, 0xFD, 0xF9, 0x04, 0x00]);

        let decoded = decode_frame(&frame, Direction::Outbound).unwrap();
        let (data, sum) = decoded.split_at(decoded.len() - 1);
        assert_eq!(sum[0], checksum(data).value);
    }

    #[test]
    fn test_decode_rejects_wrong_start() {
        let frame = [RX_START, 0xCA, 0x00];
        assert_eq!(
            decode_frame(&frame, Direction::Outbound),
            Err(DecodeError::InvalidStartMarker {
                expected: TX_START,
                found: RX_START
            })
        );
    }

    #[test]
    fn test_decode_rejects_missing_end() {
        let frame = [TX_START, 0xCA, 0x01];
        assert_eq!(
            decode_frame(&frame, Direction::Outbound),
            Err(DecodeError::InvalidEndMarker { found: 0x01 })
        );
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        assert_eq!(
            decode_frame(&[TX_START], Direction::Outbound),
            Err(DecodeError::TooShort { len: 1 })
        );
        assert_eq!(
            decode_frame(&[], Direction::Outbound),
            Err(DecodeError::TooShort { len: 0 })
        );
    }

    #[test]
    fn test_decode_captured_response() {
        // Response frame observed from the unit during a 10 degree tilt.
        let frame = [
            0x98, 0x16, 0xF2, 0x16, 0xCA, 0x16, 0xE6, 0x16, 0xB2, 0xAE, 0x9E, 0xFE, 0xFE, 0x3E,
            0x3A, 0x3E, 0x3E, 0x3E, 0x3E, 0x16, 0xA2, 0x16, 0xE2, 0x06, 0x00,
        ];
        let payload = decode_frame(&frame, Direction::Inbound).unwrap();
        assert_eq!(
            payload,
            vec![
                0xF2, 0xCA, 0xE6, 0xB2, 0xAE, 0x9E, 0xFE, 0xFE, 0x3E, 0x3A, 0x3E, 0x3E, 0x3E,
                0x3E, 0xA2, 0xE2, 0x06
            ]
        );
    }
}
