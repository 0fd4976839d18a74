//! JSON-lines scan logs: one wire-encoded scan per line.
//!
//! Blank lines and lines starting with `#` are skipped. A line that fails
//! to decode is reported and skipped; the rest of the log still loads.

use scanviz_core::wire::{decode_scan, encode_scan, WireError};
use scanviz_env::RangeScan;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use thiserror::Error;
use tracing::warn;

/// Errors raised while reading or writing a scan log.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    
    #[error("Line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: WireError,
    },
    
    #[error("Encode error: {0}")]
    Encode(#[from] WireError),
}

/// Scans loaded from a log, plus the lines that were rejected.
#[derive(Debug, Default)]
pub struct ScanLog {
    pub scans: Vec<RangeScan>,
    pub rejected: Vec<ReplayError>,
}

/// Reads a scan log from any buffered reader.
pub fn read_scan_log<R: BufRead>(reader: R) -> io::Result<ScanLog> {
    let mut log = ScanLog::default();
    
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        
        match decode_scan(trimmed) {
            Ok(scan) => log.scans.push(scan),
            Err(source) => {
                let err = ReplayError::Decode { line: i + 1, source };
                warn!("Skipping scan: {}", err);
                log.rejected.push(err);
            }
        }
    }
    
    Ok(log)
}

/// Loads a scan log from a file.
pub fn load_scan_log(path: &str) -> io::Result<ScanLog> {
    read_scan_log(BufReader::new(File::open(path)?))
}

/// Writes scans as JSON lines.
pub fn write_scan_log<W: Write>(writer: W, scans: &[RangeScan]) -> Result<(), ReplayError> {
    let mut writer = BufWriter::new(writer);
    for scan in scans {
        writeln!(writer, "{}", encode_scan(scan)?)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes scans to a JSON-lines file.
pub fn save_scan_log(path: &str, scans: &[RangeScan]) -> Result<(), ReplayError> {
    write_scan_log(File::create(path)?, scans)
}
