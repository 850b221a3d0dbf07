//! Byte transport abstraction over the serial link
//!
//! The link state machine depends only on this narrow trait: byte-oriented
//! writes with explicit flush, a non-blocking available-byte count, and
//! bounded reads. [`SerialTransport`] is the hardware implementation; tests
//! substitute a scripted mock.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use thiserror::Error;
use tracing::info;

/// Transport I/O failure. Fatal to the current send/receive cycle; the
/// session should be reconnected before further use.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimal byte-oriented transport the link state machine drives.
pub trait Transport {
    /// Write all of `bytes` to the device.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Block until written bytes are physically handed to the device.
    fn flush(&mut self) -> Result<(), TransportError>;

    /// Number of received bytes ready to read without blocking.
    fn bytes_available(&mut self) -> Result<usize, TransportError>;

    /// Read up to `buf.len()` bytes, returning the count read.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Discard any pending input and output.
    fn clear_buffers(&mut self) -> Result<(), TransportError>;
}

/// Serial port transport for the OE10 link.
///
/// Opens the port at 8N1 with no flow control and raises RTS/DTR, which the
/// unit's 3.3V CMOS level shifter needs before it will respond.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

/// Read timeout handed to the serialport crate. Short, because the link
/// state machine does its own poll/timeout bookkeeping above this layer.
const PORT_READ_TIMEOUT: Duration = Duration::from_millis(100);

impl SerialTransport {
    /// Open `path` at `baud` and prepare the line for the OE10.
    pub fn open(path: &str, baud: u32) -> Result<Self, TransportError> {
        info!("Opening serial port: {path} at {baud} bps");

        let mut port = serialport::new(path, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(PORT_READ_TIMEOUT)
            .open()?;

        // Level shifter wants RTS/DTR asserted before the unit talks.
        port.write_request_to_send(true)?;
        port.write_data_terminal_ready(true)?;
        port.clear(ClearBuffer::All)?;

        Ok(Self { port })
    }

    /// The OS name of the open port, if known.
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.port.flush()?;
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let n = self.port.read(buf)?;
        Ok(n)
    }

    fn clear_buffers(&mut self) -> Result<(), TransportError> {
        self.port.clear(ClearBuffer::All)?;
        Ok(())
    }
}
