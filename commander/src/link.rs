//! Timed command/response link state machine
//!
//! The OE10 is strictly half duplex and timing sensitive. A cycle runs
//! IDLE -> TRANSMITTING -> LISTENING -> (RESPONSE_RECEIVED | TIMED_OUT) ->
//! IDLE, with the delays the logic analyzer measured on the vendor link:
//!
//! - 1.7 ms of silence after the start byte, 1 ms after every other byte
//! - 15 ms of silence before the first read attempt
//! - a 40 ms overall listen window, polled at 100 us
//! - at least 1 s between consecutive command dispatches when polling
//!
//! A timed-out listen is a first-class outcome, not an error; only transport
//! failures abort a cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use oe10_protocol::END_MARKER;

use crate::clock::Clock;
use crate::transport::{Transport, TransportError};

/// Link timing parameters. Defaults are the values measured from captures
/// of the vendor software; all are tunable.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Silence after the start byte, before the second byte.
    pub first_byte_delay: Duration,
    /// Silence after every byte other than the first.
    pub inter_byte_delay: Duration,
    /// Silence between end of transmission and the first read attempt.
    pub pre_listen_delay: Duration,
    /// Overall bound on the listen window.
    pub listen_timeout: Duration,
    /// Interval between read attempts while listening.
    pub listen_poll_interval: Duration,
    /// Minimum spacing between consecutive command dispatches.
    pub command_spacing: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            first_byte_delay: Duration::from_micros(1700),
            inter_byte_delay: Duration::from_millis(1),
            pre_listen_delay: Duration::from_millis(15),
            listen_timeout: Duration::from_millis(40),
            listen_poll_interval: Duration::from_micros(100),
            command_spacing: Duration::from_secs(1),
        }
    }
}

/// Terminal state of one listen phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The completeness criterion was met before the window closed.
    Response(Vec<u8>),
    /// The window closed first; carries whatever was accumulated,
    /// possibly nothing.
    TimedOut(Vec<u8>),
}

impl LinkOutcome {
    /// The accumulated response bytes, complete or not.
    pub fn bytes(&self) -> &[u8] {
        match self {
            LinkOutcome::Response(b) | LinkOutcome::TimedOut(b) => b,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, LinkOutcome::TimedOut(_))
    }
}

/// Tally of a polling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Command dispatches completed.
    pub cycles: u64,
    /// Cycles that ended in `Response`.
    pub responses: u64,
    /// Cycles that ended in `TimedOut`.
    pub timeouts: u64,
    /// True if the run stopped on the cancel flag rather than the duration.
    pub cancelled: bool,
}

/// One exclusive session on an OE10 link.
///
/// Owns the transport; all delays are blocking waits on the calling thread
/// (half-duplex discipline, no overlap of transmit and listen).
pub struct LinkSession<T: Transport, C: Clock> {
    transport: T,
    clock: C,
    config: LinkConfig,
    last_dispatch: Option<Duration>,
}

impl<T: Transport, C: Clock> LinkSession<T, C> {
    pub fn new(transport: T, clock: C, config: LinkConfig) -> Self {
        Self {
            transport,
            clock,
            config,
            last_dispatch: None,
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Transmit one frame with the captured byte pacing.
    ///
    /// Pending input is discarded first so the listen phase only sees bytes
    /// provoked by this frame. Each byte is written and flushed
    /// individually; the start byte is followed by the longer wake delay.
    pub fn send_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        self.transport.clear_buffers()?;

        for (i, byte) in frame.iter().enumerate() {
            self.transport.write_all(std::slice::from_ref(byte))?;
            self.transport.flush()?;
            let delay = if i == 0 {
                self.config.first_byte_delay
            } else {
                self.config.inter_byte_delay
            };
            self.clock.sleep(delay);
        }

        self.last_dispatch = Some(self.clock.now());
        debug!("Transmitted {} bytes", frame.len());
        Ok(())
    }

    /// Listen for a response, treating a seen end marker as complete.
    pub fn await_response(&mut self) -> Result<LinkOutcome, TransportError> {
        self.await_response_with(|buf| buf.len() >= 2 && buf[buf.len() - 1] == END_MARKER)
    }

    /// Listen for a response with a caller-supplied completeness criterion.
    ///
    /// Waits out the pre-listen delay, then polls the transport at the
    /// configured interval, accumulating bytes until `complete` returns true
    /// (`Response`) or the listen timeout elapses (`TimedOut`). The state
    /// machine does not validate frame content here; decoding is the
    /// caller's concern.
    pub fn await_response_with(
        &mut self,
        complete: impl Fn(&[u8]) -> bool,
    ) -> Result<LinkOutcome, TransportError> {
        self.clock.sleep(self.config.pre_listen_delay);

        let start = self.clock.now();
        let mut response = Vec::new();
        let mut scratch = [0u8; 64];

        while self.clock.now() - start < self.config.listen_timeout {
            let available = self.transport.bytes_available()?;
            if available > 0 {
                let want = available.min(scratch.len());
                let n = self.transport.read(&mut scratch[..want])?;
                response.extend_from_slice(&scratch[..n]);
                debug!("Received {n} bytes ({} total)", response.len());
                if complete(&response) {
                    return Ok(LinkOutcome::Response(response));
                }
            }
            self.clock.sleep(self.config.listen_poll_interval);
        }

        Ok(LinkOutcome::TimedOut(response))
    }

    /// Run one full command/response cycle.
    pub fn transact(&mut self, frame: &[u8]) -> Result<LinkOutcome, TransportError> {
        self.send_frame(frame)?;
        self.await_response()
    }

    /// Repeatedly dispatch `frame` as a keepalive for `duration`.
    ///
    /// Enforces the configured minimum spacing between dispatches no matter
    /// how quickly responses arrive. The cancel flag is honored at phase
    /// boundaries only; a frame that has started transmitting always
    /// completes.
    pub fn poll(
        &mut self,
        frame: &[u8],
        duration: Duration,
        cancel: &AtomicBool,
    ) -> Result<PollReport, TransportError> {
        let start = self.clock.now();
        let mut report = PollReport::default();
        info!("Starting polling sequence for {:.1}s", duration.as_secs_f64());

        while self.clock.now() - start < duration {
            if cancel.load(Ordering::Relaxed) {
                report.cancelled = true;
                break;
            }

            // Hold the cadence: at least command_spacing since last dispatch.
            if let Some(last) = self.last_dispatch {
                let since = self.clock.now().saturating_sub(last);
                if since < self.config.command_spacing {
                    self.clock.sleep(self.config.command_spacing - since);
                }
            }

            // Re-check at the phase boundary: the cadence sleep may have
            // consumed the rest of the run, and cancellation must not
            // interrupt a transmission once started.
            if cancel.load(Ordering::Relaxed) {
                report.cancelled = true;
                break;
            }
            if self.clock.now() - start >= duration {
                break;
            }

            match self.transact(frame)? {
                LinkOutcome::Response(bytes) => {
                    debug!("Poll response: {} bytes", bytes.len());
                    report.responses += 1;
                }
                LinkOutcome::TimedOut(bytes) => {
                    debug!("Poll timed out with {} bytes", bytes.len());
                    report.timeouts += 1;
                }
            }
            report.cycles += 1;
        }

        info!(
            "Polling complete: {} cycles, {} responses, {} timeouts",
            report.cycles, report.responses, report.timeouts
        );
        Ok(report)
    }
}
