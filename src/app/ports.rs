use std::path::Path;

use crate::error::Result;
use crate::types::{FinalRecord, Row};

/// Reads a tabular source into header-keyed rows.
/// Implementations return the rows as parsed; tier tagging happens in the loader.
pub trait SourceReader {
    fn read(&self, path: &Path) -> Result<Vec<Row>>;
}

/// Persists the final records.
pub trait RecordSink {
    fn write(&self, path: &Path, records: &[FinalRecord]) -> Result<SinkReceipt>;
}

/// What a sink reports back after a successful write
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkReceipt {
    pub bytes_written: usize,
    /// Hex SHA-256 of the bytes written
    pub sha256: String,
}
