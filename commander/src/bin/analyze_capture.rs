//! Analyze logic-analyzer captures of the OE10 serial link.
//!
//! Segments one or two capture exports into command frames and prints
//! per-frame statistics. Given a TX/RX pair, also diffs the first frame of
//! each and reports the response delay.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use oe10_commander::analysis::{compare, sequence_stats};
use oe10_commander::commands::format_bytes;
use oe10_commander::read_capture;
use oe10_protocol::{segment_all, Frame};

/// OE10 capture analyzer
#[derive(Parser, Debug)]
#[command(name = "analyze_capture")]
#[command(about = "Segment and analyze OE10 logic-analyzer captures")]
struct Args {
    /// TX-side capture export
    #[arg(long)]
    tx: Option<PathBuf>,

    /// RX-side capture export
    #[arg(long)]
    rx: Option<PathBuf>,

    /// Print every frame, not just the first per file
    #[arg(long)]
    all: bool,
}

fn analyze_file(path: &PathBuf, label: &str, all: bool) -> Result<Vec<Frame>> {
    println!("\nAnalyzing {label} file: {}", path.display());
    println!("{}", "-".repeat(50));

    let (samples, skipped) = read_capture(path)?;
    if skipped > 0 {
        info!("Skipped {skipped} malformed records");
    }

    let frames = segment_all(&samples);
    println!("Found {} frames in {} samples", frames.len(), samples.len());

    let shown: &[Frame] = if all { &frames } else { &frames[..frames.len().min(1)] };
    for frame in shown {
        let stats = sequence_stats(frame);
        let direction = frame
            .direction()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "??".into());
        println!(
            "\n{direction} frame: {} bytes, {:.4}s - {:.4}s ({:.4}s on the wire)",
            stats.len,
            stats.start_time,
            stats.end_time,
            stats.duration()
        );
        println!("  raw:  {}", format_bytes(&frame.bytes()));
        println!("  data: {}", format_bytes(&stats.data_bytes));
        println!("  sync filler bytes: {}", stats.sync_count);
        if frame.has_errors() {
            println!("  capture reported UART errors in this frame");
        }
    }

    Ok(frames)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if args.tx.is_none() && args.rx.is_none() {
        bail!("Provide --tx and/or --rx capture files");
    }

    let tx_frames = match &args.tx {
        Some(path) => analyze_file(path, "TX", args.all)?,
        None => Vec::new(),
    };
    let rx_frames = match &args.rx {
        Some(path) => analyze_file(path, "RX", args.all)?,
        None => Vec::new(),
    };

    if let (Some(tx), Some(rx)) = (tx_frames.first(), rx_frames.first()) {
        println!("\nTX-RX comparison");
        println!("{}", "=".repeat(50));
        let diff = compare(tx, rx);
        println!("Length delta: {} bytes", diff.length_delta);
        println!("Response delay: {:.4}s", diff.start_delta);
        if diff.differing_bytes.is_empty() {
            println!("No differing bytes over the common prefix");
        } else {
            println!("Differing bytes (index, tx, rx):");
            for (i, a, b) in &diff.differing_bytes {
                println!("  [{i:3}] 0x{a:02X} -> 0x{b:02X}");
            }
        }
    }

    Ok(())
}
