//! Command byte tables recovered from logic-analyzer captures
//!
//! These are the exact frames the vendor software was observed sending, plus
//! a captured response used by simulate mode. The mapping from a target
//! angle to payload bytes has not been recovered yet, so [`tilt_command`]
//! returns the one captured movement frame regardless of the requested
//! angle.

use thiserror::Error;
use tracing::warn;

use oe10_protocol::{decode_frame, DecodeError, Direction};

/// First command of the initialization exchange.
pub const INIT_COMMAND_1: [u8; 15] = [
    0x58, 0x8B, 0xFD, 0x8B, 0xF9, 0x8B, 0x7D, 0x59, 0x8B, 0x8B, 0xD9, 0x8B, 0x71, 0x83, 0x00,
];

/// Second command of the initialization exchange.
pub const INIT_COMMAND_2: [u8; 15] = [
    0x58, 0x8B, 0xFD, 0x8B, 0xF9, 0x8B, 0x59, 0x57, 0x8B, 0x8B, 0xF3, 0x8B, 0x71, 0x83, 0x00,
];

/// Status poll sent at the 1 Hz keepalive cadence. Byte-identical to the
/// second init command in every capture taken so far.
pub const STATUS_COMMAND: [u8; 15] = INIT_COMMAND_2;

/// Movement command captured during a 10 degree tilt.
pub const TILT_COMMAND_10_DEG: [u8; 18] = [
    0x58, 0x8B, 0xFD, 0x8B, 0xF3, 0x8B, 0x5F, 0x5F, 0x8B, 0x9D, 0x8F, 0x9F, 0x8B, 0x85, 0x8B,
    0x71, 0x83, 0x00,
];

/// Response captured from the unit after the 10 degree tilt command.
/// Used by simulate mode to exercise the decode path without hardware.
pub const CAPTURED_RESPONSE: [u8; 25] = [
    0x98, 0x16, 0xF2, 0x16, 0xCA, 0x16, 0xE6, 0x16, 0xB2, 0xAE, 0x9E, 0xFE, 0xFE, 0x3E, 0x3A,
    0x3E, 0x3E, 0x3E, 0x3E, 0x16, 0xA2, 0x16, 0xE2, 0x06, 0x00,
];

/// Data byte the unit repeats in position feedback runs.
pub const POSITION_FEEDBACK_BYTE: u8 = 0x3E;

/// The two-command initialization sequence, in dispatch order.
pub fn init_commands() -> [&'static [u8]; 2] {
    [&INIT_COMMAND_1, &INIT_COMMAND_2]
}

/// Build a movement command for `angle` degrees.
///
/// The angle encoding is still undetermined; until it is recovered from
/// further captures this returns the frame observed for a 10 degree tilt.
pub fn tilt_command(angle: f64) -> Vec<u8> {
    if (angle - 10.0).abs() > f64::EPSILON {
        warn!("Angle encoding undetermined; sending captured 10 degree frame for {angle} degrees");
    }
    TILT_COMMAND_10_DEG.to_vec()
}

/// Render bytes the way the vendor logs did: `0x58 0x8B ...`.
pub fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A received response buffer that failed to decode.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response too short: {len} bytes")]
    TooShort { len: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Decoded fields of a unit response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSummary {
    /// Data bytes with markers and sync filler stripped.
    pub data: Vec<u8>,
    /// Occurrences of the position feedback byte within the data.
    pub position_feedback: usize,
    /// Raw length of the response, markers included.
    pub raw_len: usize,
}

/// Decode an inbound response buffer into its data bytes.
///
/// Validates the RX markers and strips sync filler. Responses shorter than
/// three bytes cannot carry data and are rejected outright.
pub fn decode_response(bytes: &[u8]) -> Result<ResponseSummary, ResponseError> {
    if bytes.len() < 3 {
        return Err(ResponseError::TooShort { len: bytes.len() });
    }

    let data = decode_frame(bytes, Direction::Inbound)?;
    let position_feedback = data
        .iter()
        .filter(|&&b| b == POSITION_FEEDBACK_BYTE)
        .count();

    Ok(ResponseSummary {
        data,
        position_feedback,
        raw_len: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oe10_protocol::{build_frame, SyncPattern};

    #[test]
    fn test_canned_frames_are_well_formed() {
        for frame in [
            INIT_COMMAND_1.as_slice(),
            INIT_COMMAND_2.as_slice(),
            TILT_COMMAND_10_DEG.as_slice(),
        ] {
            assert_eq!(frame[0], Direction::Outbound.start_marker());
            assert_eq!(*frame.last().unwrap(), 0x00);
        }
        assert_eq!(CAPTURED_RESPONSE[0], Direction::Inbound.start_marker());
        assert_eq!(*CAPTURED_RESPONSE.last().unwrap(), 0x00);
    }

    #[test]
    fn test_status_command_round_trips_through_assembler() {
        let (payload, pattern) =
            SyncPattern::from_frame_bytes(&STATUS_COMMAND, Direction::Outbound).unwrap();
        let rebuilt = build_frame(Direction::Outbound, &payload, &pattern);
        assert_eq!(rebuilt, STATUS_COMMAND.to_vec());
    }

    #[test]
    fn test_decode_captured_response() {
        let summary = decode_response(&CAPTURED_RESPONSE).unwrap();
        assert_eq!(summary.raw_len, 25);
        assert_eq!(summary.position_feedback, 5);
        assert_eq!(summary.data.len(), 17);
        assert_eq!(summary.data[0], 0xF2);
    }

    #[test]
    fn test_decode_rejects_bad_markers() {
        assert!(matches!(
            decode_response(&[0x58, 0x01, 0x00]),
            Err(ResponseError::Decode(_))
        ));
        assert!(matches!(
            decode_response(&[0x98, 0x01]),
            Err(ResponseError::TooShort { len: 2 })
        ));
    }

    #[test]
    fn test_tilt_command_is_canned() {
        assert_eq!(tilt_command(10.0), TILT_COMMAND_10_DEG.to_vec());
        assert_eq!(tilt_command(0.0), TILT_COMMAND_10_DEG.to_vec());
    }
}
