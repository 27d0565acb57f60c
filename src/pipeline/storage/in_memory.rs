use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::app::ports::{RecordSink, SinkReceipt, SourceReader};
use crate::error::{MergeError, Result};
use crate::infra::csv_sink_adapter::{encode_records, receipt_for};
use crate::infra::csv_source_adapter::parse_csv;
use crate::types::{FinalRecord, Row};

/// In-memory CSV sources for development/testing. Content goes through the
/// same parser as the file adapter.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.with_bytes(path, content.as_bytes().to_vec())
    }

    pub fn with_bytes(mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        self.files.insert(path.into(), bytes);
        self
    }
}

impl SourceReader for InMemorySource {
    fn read(&self, path: &Path) -> Result<Vec<Row>> {
        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| MergeError::SourceNotFound(path.display().to_string()))?;
        parse_csv(bytes)
    }
}

/// In-memory sink keeping the encoded CSV per path.
/// Clones share the same storage.
#[derive(Debug, Default, Clone)]
pub struct InMemorySink {
    written: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    fail_writes: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every write fails with a permission error
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Encoded CSV last written to `path`, if any
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.written.lock().ok()?.get(path).cloned()
    }
}

impl RecordSink for InMemorySink {
    fn write(&self, path: &Path, records: &[FinalRecord]) -> Result<SinkReceipt> {
        if self.fail_writes {
            return Err(MergeError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("write to {} refused", path.display()),
            )));
        }
        let bytes = encode_records(records)?;
        let receipt = receipt_for(&bytes);
        let mut written = self
            .written
            .lock()
            .map_err(|_| MergeError::Sink("in-memory sink lock poisoned".to_string()))?;
        written.insert(path.to_path_buf(), bytes);
        debug!("Stored {} records for {}", records.len(), path.display());
        Ok(receipt)
    }
}
