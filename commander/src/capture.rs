//! Logic-analyzer capture reader
//!
//! Parses the analyzer's async-serial CSV export into [`Sample`] records:
//!
//! ```text
//! Time [s],Value,Parity Error,Framing Error
//! 0.000000,0x58,,
//! 0.001700,0x8B,,Error
//! ```
//!
//! Malformed lines come back as explicit `Err` variants for the caller to
//! filter; one bad line never aborts the read.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use oe10_protocol::Sample;

/// Capture file read or parse failure.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open capture: {0}")]
    Open(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("bad byte value {value:?} on record {record}")]
    BadValue { record: u64, value: String },
}

/// One raw CSV row, headers as the analyzer writes them.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Time [s]")]
    time: f64,
    #[serde(rename = "Value")]
    value: String,
    #[serde(rename = "Parity Error", default)]
    parity_error: Option<String>,
    #[serde(rename = "Framing Error", default)]
    framing_error: Option<String>,
}

/// The analyzer leaves error columns blank on clean bytes.
fn flag_set(field: &Option<String>) -> bool {
    field
        .as_deref()
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false)
}

fn parse_value(raw: &str, record: u64) -> Result<u8, CaptureError> {
    let digits = raw.trim().trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(digits, 16).map_err(|_| CaptureError::BadValue {
        record,
        value: raw.to_string(),
    })
}

/// Streaming reader over a capture export.
///
/// Restartable per invocation: open a fresh reader to re-scan a file.
pub struct CaptureReader<R: Read> {
    inner: csv::Reader<R>,
}

impl CaptureReader<File> {
    /// Open a capture file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        Ok(Self::from_reader(File::open(path)?))
    }
}

impl<R: Read> CaptureReader<R> {
    /// Wrap any byte source producing the CSV export format.
    pub fn from_reader(reader: R) -> Self {
        Self {
            inner: csv::ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_reader(reader),
        }
    }

    /// Iterate the capture as parse results, one per CSV record.
    pub fn samples(self) -> impl Iterator<Item = Result<Sample, CaptureError>> {
        self.inner
            .into_deserialize::<RawRecord>()
            .enumerate()
            .map(|(i, record)| {
                let record_no = i as u64 + 1;
                let raw = record?;
                let value = parse_value(&raw.value, record_no)?;
                Ok(Sample {
                    timestamp: raw.time,
                    value,
                    parity_error: flag_set(&raw.parity_error),
                    framing_error: flag_set(&raw.framing_error),
                })
            })
    }
}

/// Read a capture file, dropping malformed records.
///
/// Returns the parsed samples plus the number of records skipped. Skips are
/// logged at warn level with the offending record number.
pub fn read_capture<P: AsRef<Path>>(path: P) -> Result<(Vec<Sample>, usize), CaptureError> {
    let reader = CaptureReader::open(path)?;
    let mut samples = Vec::new();
    let mut skipped = 0;

    for result in reader.samples() {
        match result {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                warn!("Skipping capture record: {e}");
                skipped += 1;
            }
        }
    }

    Ok((samples, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE: &str = "\
Time [s],Value,Parity Error,Framing Error
0.000000,0x58,,
0.001700,0x8B,,
0.002700,0xFD,Error,
0.003700,0x00,,Error
";

    fn parse_all(text: &str) -> Vec<Result<Sample, CaptureError>> {
        CaptureReader::from_reader(text.as_bytes())
            .samples()
            .collect()
    }

    #[test]
    fn test_well_formed_capture() {
        let results = parse_all(CAPTURE);
        assert_eq!(results.len(), 4);
        let samples: Vec<Sample> = results.into_iter().map(|r| r.unwrap()).collect();

        assert_eq!(samples[0].value, 0x58);
        assert_eq!(samples[0].timestamp, 0.0);
        assert!(!samples[0].has_error());

        assert!(samples[2].parity_error);
        assert!(!samples[2].framing_error);
        assert!(samples[3].framing_error);
    }

    #[test]
    fn test_bad_value_is_err_variant_not_abort() {
        let text = "\
Time [s],Value,Parity Error,Framing Error
0.0,0x58,,
0.1,garbage,,
0.2,0x00,,
";
        let results = parse_all(text);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(CaptureError::BadValue { record: 2, .. })
        ));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_hex_without_prefix() {
        let text = "Time [s],Value,Parity Error,Framing Error\n0.0,9F,,\n";
        let results = parse_all(text);
        assert_eq!(results[0].as_ref().unwrap().value, 0x9F);
    }

    #[test]
    fn test_segments_cleanly_after_read() {
        let samples: Vec<Sample> = parse_all(CAPTURE).into_iter().map(|r| r.unwrap()).collect();
        let frames = oe10_protocol::segment_all(&samples);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), 4);
    }
}
