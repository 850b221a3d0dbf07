//! Sync/data codec
//!
//! OE10 frames interleave direction-specific sync filler bytes with the data
//! bytes. Filler carries no information and is distinguishable from data
//! only by value, not position, so decoding is a plain filter. Encoding is
//! the opposite: the filler schedule is protocol-specific and cannot be
//! derived from the payload, so the caller supplies it as a [`SyncPattern`].

use crate::direction::{Direction, END_MARKER};

/// Per-position sync filler schedule for encoding a payload.
///
/// Holds, for each payload position, how many sync bytes precede that data
/// byte. Captures of the real unit show both single and doubled filler
/// before a data byte, hence a count rather than a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPattern {
    before: Vec<u8>,
}

impl SyncPattern {
    /// Build a pattern from per-position sync counts.
    pub fn new(before: Vec<u8>) -> Self {
        Self { before }
    }

    /// Build a pattern from per-position flags (one sync byte where true).
    pub fn from_flags(flags: &[bool]) -> Self {
        Self {
            before: flags.iter().map(|&f| u8::from(f)).collect(),
        }
    }

    /// A pattern with no filler anywhere, for `len` payload bytes.
    pub fn none(len: usize) -> Self {
        Self {
            before: vec![0; len],
        }
    }

    /// Number of sync bytes preceding payload position `index`.
    pub fn sync_count_before(&self, index: usize) -> usize {
        self.before.get(index).copied().unwrap_or(0) as usize
    }

    /// Number of payload positions covered by the pattern.
    pub fn len(&self) -> usize {
        self.before.len()
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty()
    }

    /// Recover a payload and its sync pattern from a complete raw frame.
    ///
    /// Returns `None` if the frame does not carry the expected start and end
    /// markers for `direction`. Filler trailing the last data byte is not
    /// positional information the pattern can carry and is dropped; the
    /// observed captures never place filler there.
    pub fn from_frame_bytes(bytes: &[u8], direction: Direction) -> Option<(Vec<u8>, SyncPattern)> {
        if bytes.len() < 2
            || bytes[0] != direction.start_marker()
            || bytes[bytes.len() - 1] != END_MARKER
        {
            return None;
        }

        let mut payload = Vec::new();
        let mut before = Vec::new();
        let mut pending_syncs: u8 = 0;
        for &b in &bytes[1..bytes.len() - 1] {
            if b == direction.sync_filler() {
                pending_syncs = pending_syncs.saturating_add(1);
            } else {
                payload.push(b);
                before.push(pending_syncs);
                pending_syncs = 0;
            }
        }

        Some((payload, SyncPattern { before }))
    }
}

/// Extract the data-bearing bytes from a raw frame.
///
/// Drops the start marker, the end marker, and every occurrence of the
/// direction's sync filler; all remaining bytes are payload, in order.
/// Bytes that are not a recognized marker pass through untouched, so this
/// is safe to call on a frame slice with or without its markers.
pub fn extract_payload(frame: &[u8], direction: Direction) -> Vec<u8> {
    frame
        .iter()
        .copied()
        .filter(|&b| {
            b != direction.sync_filler() && b != direction.start_marker() && b != END_MARKER
        })
        .collect()
}

/// Interleave sync filler into a payload per the supplied schedule.
///
/// Purely mechanical: each payload byte is preceded by the number of sync
/// bytes the pattern prescribes for its position. Positions beyond the
/// pattern's length get no filler.
pub fn interleave(payload: &[u8], direction: Direction, pattern: &SyncPattern) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + pattern.len());
    for (i, &b) in payload.iter().enumerate() {
        for _ in 0..pattern.sync_count_before(i) {
            out.push(direction.sync_filler());
        }
        out.push(b);
    }
    out
}
