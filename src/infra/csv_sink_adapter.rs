use csv::{Terminator, WriterBuilder};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::app::ports::{RecordSink, SinkReceipt};
use crate::error::{MergeError, Result};
use crate::types::FinalRecord;

/// File-backed implementation of RecordSink writing a single CSV file
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvFileSink;

impl CsvFileSink {
    pub fn new() -> Self {
        Self
    }
}

impl RecordSink for CsvFileSink {
    fn write(&self, path: &Path, records: &[FinalRecord]) -> Result<SinkReceipt> {
        let bytes = encode_records(records)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, &bytes)?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(receipt_for(&bytes))
    }
}

/// Encodes records as CSV with a header row, CRLF line endings and null
/// fields written empty. The header is present even with no records.
pub fn encode_records(records: &[FinalRecord]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(FinalRecord::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.into_inner().map_err(|e| MergeError::Io(e.into_error()))
}

pub fn receipt_for(bytes: &[u8]) -> SinkReceipt {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    SinkReceipt {
        bytes_written: bytes.len(),
        sha256: hex::encode(hasher.finalize()),
    }
}
