//! Frame segmentation of a captured sample stream
//!
//! Splits a raw timestamped byte stream into marker-delimited frames. A
//! frame opens at a recognized start marker and closes at the `0x00` end
//! marker. Anything left open at a new start marker or at end of input is
//! an incomplete frame and is dropped, never emitted.

use crate::direction::{Direction, END_MARKER};
use crate::sample::Sample;

/// A complete, marker-delimited frame cut from a capture.
///
/// Invariant: the first sample's value is a recognized start marker and the
/// last sample's value is [`END_MARKER`], so `len() >= 2` always holds for
/// frames produced by [`segment`].
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    samples: Vec<Sample>,
}

impl Frame {
    /// The samples making up this frame, start and end markers included.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The frame's raw byte values, in wire order.
    pub fn bytes(&self) -> Vec<u8> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// Number of bytes in the frame, markers included.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for segmenter output; present for completeness.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The start marker byte.
    pub fn start_byte(&self) -> u8 {
        self.samples[0].value
    }

    /// The end marker byte.
    pub fn end_byte(&self) -> u8 {
        self.samples[self.samples.len() - 1].value
    }

    /// Direction inferred from the start marker.
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_start_marker(self.start_byte())
    }

    /// Timestamp of the first byte.
    pub fn start_time(&self) -> f64 {
        self.samples[0].timestamp
    }

    /// Timestamp of the last byte.
    pub fn end_time(&self) -> f64 {
        self.samples[self.samples.len() - 1].timestamp
    }

    /// Wire time spanned by the frame, in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// True if any byte in the frame carried a UART error flag.
    pub fn has_errors(&self) -> bool {
        self.samples.iter().any(|s| s.has_error())
    }
}

/// Partition a sample stream into complete frames.
///
/// Scans in order: a byte in `start_markers` opens a new frame, discarding
/// any unterminated frame in progress; an [`END_MARKER`] byte closes and
/// emits the open frame. A frame still open at end of input is discarded.
///
/// Every returned [`Frame`] starts with a byte from `start_markers` and
/// ends with [`END_MARKER`].
pub fn segment(samples: &[Sample], start_markers: &[u8]) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut open: Option<Vec<Sample>> = None;

    for sample in samples {
        if start_markers.contains(&sample.value) {
            // A new start marker abandons any unterminated frame.
            open = Some(vec![*sample]);
        } else if let Some(current) = open.as_mut() {
            current.push(*sample);
            if sample.value == END_MARKER {
                if let Some(samples) = open.take() {
                    frames.push(Frame { samples });
                }
            }
        }
        // Bytes before the first start marker are line noise, skipped.
    }

    frames
}

/// Segment a mixed capture using both directions' start markers.
pub fn segment_all(samples: &[Sample]) -> Vec<Frame> {
    segment(samples, &Direction::all_start_markers())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::{RX_START, TX_START, TX_SYNC};

    fn stream(bytes: &[u8]) -> Vec<Sample> {
        bytes
            .iter()
            .enumerate()
            .map(|(i, &b)| Sample::new(i as f64 * 0.001, b))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(segment(&[], &[TX_START]).is_empty());
    }

    #[test]
    fn test_no_start_marker() {
        let samples = stream(&[0x01, 0x02, 0x00]);
        assert!(segment(&samples, &[TX_START]).is_empty());
    }

    #[test]
    fn test_lone_end_marker_yields_nothing() {
        let samples = stream(&[0x00]);
        assert!(segment_all(&samples).is_empty());
    }

    #[test]
    fn test_single_tx_frame() {
        // Observed shape: start, sync, data, end
        let samples = vec![
            Sample::new(0.0, TX_START),
            Sample::new(0.001, TX_SYNC),
            Sample::new(0.002, 0xFD),
            Sample::new(0.003, 0x00),
        ];
        let frames = segment(&samples, &[TX_START]);
        assert_eq!(frames.len(), 1);
        let frame = &frames[0];
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.start_byte(), TX_START);
        assert_eq!(frame.end_byte(), 0x00);
        assert_eq!(frame.direction(), Some(Direction::Outbound));
        assert_eq!(
            crate::codec::extract_payload(&frame.bytes(), Direction::Outbound),
            vec![0xFD]
        );
    }

    #[test]
    fn test_two_frames_in_order() {
        let samples = stream(&[TX_START, 0xFD, 0x00, 0x42, RX_START, 0xCA, 0x00]);
        let frames = segment_all(&samples);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].start_byte(), TX_START);
        assert_eq!(frames[1].start_byte(), RX_START);
        assert!(frames[0].start_time() < frames[1].start_time());
    }

    #[test]
    fn test_unterminated_frame_discarded_at_new_start() {
        // First TX frame never sees an end marker before the next start.
        let samples = stream(&[TX_START, 0xFD, TX_START, 0xF9, 0x00]);
        let frames = segment(&samples, &[TX_START]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes(), vec![TX_START, 0xF9, 0x00]);
    }

    #[test]
    fn test_trailing_open_frame_discarded() {
        let samples = stream(&[TX_START, 0xFD, 0x00, TX_START, 0xF9]);
        let frames = segment(&samples, &[TX_START]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].end_byte(), 0x00);
    }

    #[test]
    fn test_emitted_frames_satisfy_invariant() {
        let samples = stream(&[
            0x11, TX_START, 0xFD, 0x00, RX_START, RX_START, 0xCA, 0x00, TX_START,
        ]);
        for frame in segment_all(&samples) {
            assert!(Direction::from_start_marker(frame.start_byte()).is_some());
            assert_eq!(frame.end_byte(), 0x00);
            assert!(frame.len() >= 2);
        }
    }

    #[test]
    fn test_resegmentation_is_idempotent() {
        let samples = stream(&[TX_START, TX_SYNC, 0xFD, 0x57, 0x00]);
        let frames = segment(&samples, &[TX_START]);
        assert_eq!(frames.len(), 1);

        // Feed the emitted frame back through as a fresh stream.
        let again = segment(frames[0].samples(), &[TX_START]);
        assert_eq!(again.len(), 1);
        assert_eq!(again[0], frames[0]);
    }

    #[test]
    fn test_error_flags_carried_through() {
        let mut samples = stream(&[TX_START, 0xFD, 0x00]);
        samples[1].framing_error = true;
        let frames = segment(&samples, &[TX_START]);
        assert!(frames[0].has_errors());
    }
}
