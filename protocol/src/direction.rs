//! Direction-specific protocol constants
//!
//! The OE10 link uses different start and sync-filler byte values depending
//! on which end is talking. Both directions share the `0x00` end marker.

/// Start marker for frames sent to the unit.
pub const TX_START: u8 = 0x58;

/// Sync filler byte on the outbound (command) direction.
pub const TX_SYNC: u8 = 0x8B;

/// Start marker for frames received from the unit.
pub const RX_START: u8 = 0x98;

/// Sync filler byte on the inbound (response) direction.
pub const RX_SYNC: u8 = 0x16;

/// End marker, both directions.
pub const END_MARKER: u8 = 0x00;

/// Transfer direction of a frame.
///
/// The direction fixes which byte value is treated as sync filler versus
/// literal data, so it must be known before a frame can be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Host to unit (commands).
    Outbound,
    /// Unit to host (responses).
    Inbound,
}

impl Direction {
    /// Start marker byte for this direction.
    pub fn start_marker(&self) -> u8 {
        match self {
            Direction::Outbound => TX_START,
            Direction::Inbound => RX_START,
        }
    }

    /// Sync filler byte for this direction.
    pub fn sync_filler(&self) -> u8 {
        match self {
            Direction::Outbound => TX_SYNC,
            Direction::Inbound => RX_SYNC,
        }
    }

    /// Infer the direction from a frame's start marker, if recognized.
    pub fn from_start_marker(byte: u8) -> Option<Direction> {
        match byte {
            TX_START => Some(Direction::Outbound),
            RX_START => Some(Direction::Inbound),
            _ => None,
        }
    }

    /// Start markers for both directions, for segmenting mixed captures.
    pub fn all_start_markers() -> [u8; 2] {
        [TX_START, RX_START]
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Outbound => write!(f, "TX"),
            Direction::Inbound => write!(f, "RX"),
        }
    }
}
