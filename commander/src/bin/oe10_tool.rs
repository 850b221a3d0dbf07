//! CLI tool for the OE10 pan/tilt unit.
//!
//! Subcommands:
//! - `simulate`: generate a movement command and decode a captured response,
//!   no hardware required
//! - `send`: drive a tilt command over a serial port with the captured
//!   link timing, bracketed by status polling phases
//! - `poll`: run the 1 Hz status keepalive for a fixed duration

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use oe10_commander::commands::{
    decode_response, format_bytes, init_commands, tilt_command, CAPTURED_RESPONSE,
    STATUS_COMMAND,
};
use oe10_commander::{LinkConfig, LinkSession, MonotonicClock, SerialTransport};
use oe10_protocol::checksum;

/// Serial connection options shared by the hardware subcommands.
#[derive(Args, Debug, Clone)]
struct PortArgs {
    /// Serial port path (e.g. /dev/ttyUSB0)
    #[arg(long, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Baud rate
    #[arg(long, default_value = "9600")]
    baud: u32,
}

impl PortArgs {
    fn connect(&self) -> Result<LinkSession<SerialTransport, MonotonicClock>> {
        let transport = SerialTransport::open(&self.port, self.baud)
            .with_context(|| format!("Failed to open serial port {}", self.port))?;
        Ok(LinkSession::new(
            transport,
            MonotonicClock::new(),
            LinkConfig::default(),
        ))
    }
}

/// OE10 Pan/Tilt Unit Commander
#[derive(Parser, Debug)]
#[command(name = "oe10_tool")]
#[command(about = "Command generator and link driver for the OE10 pan/tilt unit")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a command and decode a captured response without hardware
    Simulate {
        /// Tilt angle in degrees
        #[arg(short, long, default_value = "10.0")]
        angle: f64,
    },

    /// Send a tilt command to the unit
    Send {
        #[command(flatten)]
        port: PortArgs,

        /// Tilt angle in degrees
        #[arg(short, long, default_value = "10.0")]
        angle: f64,

        /// Seconds of status polling before and after the movement command
        #[arg(long, default_value = "2.0")]
        settle: f64,
    },

    /// Run the status keepalive loop
    Poll {
        #[command(flatten)]
        port: PortArgs,

        /// Polling duration in seconds
        #[arg(short, long, default_value = "5.0")]
        duration: f64,
    },
}

fn run_simulate(angle: f64) -> Result<()> {
    let command = tilt_command(angle);
    println!("Generated command for {angle} degree tilt:");
    println!("  {}", format_bytes(&command));

    let payload = oe10_protocol::decode_frame(&command, oe10_protocol::Direction::Outbound)?;
    let sum = checksum(&payload);
    println!(
        "  payload: {} (checksum 0x{:02X} '{}')",
        format_bytes(&payload),
        sum.value,
        sum.tag.indicator()
    );

    let summary = decode_response(&CAPTURED_RESPONSE)?;
    println!("\nCaptured response decode ({} bytes):", summary.raw_len);
    println!("  data: {}", format_bytes(&summary.data));
    println!("  position feedback bytes: {}", summary.position_feedback);
    Ok(())
}

fn run_send(port: &PortArgs, angle: f64, settle: f64) -> Result<()> {
    let mut link = port.connect()?;
    let cancel = AtomicBool::new(false);
    let settle = Duration::from_secs_f64(settle);

    info!("Running initialization sequence...");
    for (i, frame) in init_commands().into_iter().enumerate() {
        let outcome = link.transact(frame)?;
        if outcome.is_timeout() {
            warn!("No response to init command {}", i + 1);
        }
    }

    info!("Establishing communication...");
    link.poll(&STATUS_COMMAND, settle, &cancel)?;

    let command = tilt_command(angle);
    info!("Sending tilt command: {}", format_bytes(&command));
    let outcome = link.transact(&command)?;

    if outcome.is_timeout() && outcome.bytes().is_empty() {
        warn!("No response received for angle {angle}");
    } else {
        match decode_response(outcome.bytes()) {
            Ok(summary) => info!(
                "Response: {} ({} position feedback bytes)",
                format_bytes(&summary.data),
                summary.position_feedback
            ),
            Err(e) => warn!(
                "Response failed to decode ({e}): {}",
                format_bytes(outcome.bytes())
            ),
        }
    }

    info!("Continuing communication...");
    link.poll(&STATUS_COMMAND, settle, &cancel)?;
    Ok(())
}

fn run_poll(port: &PortArgs, duration: f64) -> Result<()> {
    let mut link = port.connect()?;
    let cancel = AtomicBool::new(false);

    let report = link.poll(
        &STATUS_COMMAND,
        Duration::from_secs_f64(duration),
        &cancel,
    )?;

    println!(
        "Polling finished: {} cycles, {} responses, {} timeouts",
        report.cycles, report.responses, report.timeouts
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Simulate { angle } => run_simulate(*angle),
        Command::Send { port, angle, settle } => run_send(port, *angle, *settle),
        Command::Poll { port, duration } => run_poll(port, *duration),
    }
}
