//! A single byte observation from a logic-analyzer capture

/// One byte captured on the serial line, with UART error flags.
///
/// Samples within a capture are ordered by timestamp, monotonically
/// non-decreasing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Capture time in seconds, relative to the analyzer's trigger.
    pub timestamp: f64,
    /// The byte value seen on the line.
    pub value: u8,
    /// UART parity error reported by the analyzer.
    pub parity_error: bool,
    /// UART framing error reported by the analyzer.
    pub framing_error: bool,
}

impl Sample {
    /// A clean sample with no error flags.
    pub fn new(timestamp: f64, value: u8) -> Self {
        Self {
            timestamp,
            value,
            parity_error: false,
            framing_error: false,
        }
    }

    /// True if the analyzer flagged any UART error on this byte.
    pub fn has_error(&self) -> bool {
        self.parity_error || self.framing_error
    }
}
