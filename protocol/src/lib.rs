//! OE10 pan/tilt unit serial protocol engine
//!
//! This crate implements the wire-level protocol of the OE10 pan/tilt
//! positioning unit, reverse-engineered from logic-analyzer captures of the
//! vendor control software:
//!
//! - segmentation of a timestamped byte stream into marker-delimited frames
//! - the direction-specific sync-filler convention separating line filler
//!   from data bytes
//! - the XOR-fold checksum with its two documented substitution rules
//! - frame assembly and decomposition for outbound commands and inbound
//!   responses
//!
//! No I/O lives here; the `oe10-commander` crate drives this engine against
//! a serial transport.

mod checksum;
mod codec;
mod direction;
mod frame;
mod sample;
mod segmenter;

pub use checksum::{checksum, Checksum, ChecksumTag};
pub use codec::{extract_payload, interleave, SyncPattern};
pub use direction::{Direction, END_MARKER, RX_START, RX_SYNC, TX_START, TX_SYNC};
pub use frame::{build_frame, decode_frame, DecodeError};
pub use sample::Sample;
pub use segmenter::{segment, segment_all, Frame};
