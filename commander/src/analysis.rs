//! Sequence analysis over segmented capture frames
//!
//! Summarizes individual frames (data bytes, filler counts, wire timing)
//! and diffs two frames against each other, which is how the sync and
//! checksum conventions were originally teased out of TX/RX capture pairs.

use oe10_protocol::{extract_payload, Direction, Frame};

/// Per-frame summary statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceStats {
    /// Data bytes, markers and sync filler excluded.
    pub data_bytes: Vec<u8>,
    /// Count of sync filler bytes in the frame.
    pub sync_count: usize,
    /// Total frame length, markers included.
    pub len: usize,
    /// Timestamp of the start marker.
    pub start_time: f64,
    /// Timestamp of the end marker.
    pub end_time: f64,
}

impl SequenceStats {
    /// Wire time spanned by the frame, in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Summarize one segmented frame.
///
/// The direction (and so which byte counts as filler) is inferred from the
/// frame's start marker; frames with an unrecognized marker never come out
/// of the segmenter.
pub fn sequence_stats(frame: &Frame) -> SequenceStats {
    let bytes = frame.bytes();
    let direction = frame.direction().unwrap_or(Direction::Outbound);
    let sync = direction.sync_filler();

    SequenceStats {
        data_bytes: extract_payload(&bytes, direction),
        sync_count: bytes.iter().filter(|&&b| b == sync).count(),
        len: frame.len(),
        start_time: frame.start_time(),
        end_time: frame.end_time(),
    }
}

/// Differences between two frames.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDiff {
    /// Length of `b` minus length of `a`, in bytes.
    pub length_delta: isize,
    /// Positions where the raw bytes differ, with both values.
    pub differing_bytes: Vec<(usize, u8, u8)>,
    /// Start-time of `b` minus start-time of `a`, in seconds.
    pub start_delta: f64,
}

/// Compare two frames byte-for-byte over their common prefix.
pub fn compare(a: &Frame, b: &Frame) -> SequenceDiff {
    let bytes_a = a.bytes();
    let bytes_b = b.bytes();

    SequenceDiff {
        length_delta: bytes_b.len() as isize - bytes_a.len() as isize,
        differing_bytes: bytes_a
            .iter()
            .zip(bytes_b.iter())
            .enumerate()
            .filter(|(_, (x, y))| x != y)
            .map(|(i, (&x, &y))| (i, x, y))
            .collect(),
        start_delta: b.start_time() - a.start_time(),
    }
}
