//! OE10 pan/tilt unit link driver and capture tooling
//!
//! Drives the wire protocol implemented in `oe10-protocol` against a serial
//! transport, reproducing the timing the vendor software was observed to use
//! on the logic analyzer: per-byte transmit pacing, a fixed silent delay
//! before listening, a bounded response window, and a 1 Hz status polling
//! cadence between movement commands.
//!
//! Also provides the logic-analyzer capture reader and the sequence analysis
//! helpers used by the `analyze_capture` binary.

pub mod analysis;
pub mod capture;
pub mod clock;
pub mod commands;
pub mod link;
pub mod transport;

pub use capture::{read_capture, CaptureError, CaptureReader};
pub use clock::{Clock, MonotonicClock};
pub use link::{LinkConfig, LinkOutcome, LinkSession, PollReport};
pub use transport::{SerialTransport, Transport, TransportError};
