use csv::ReaderBuilder;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::app::ports::SourceReader;
use crate::error::Result;
use crate::types::Row;

/// File-backed implementation of SourceReader for CSV exports
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvFileSource;

impl CsvFileSource {
    pub fn new() -> Self {
        Self
    }
}

impl SourceReader for CsvFileSource {
    fn read(&self, path: &Path) -> Result<Vec<Row>> {
        let bytes = fs::read(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        parse_csv(&bytes)
    }
}

/// Parses CSV text using the first record as the header.
///
/// Records whose fields are all empty are skipped. Short records leave the
/// missing trailing columns absent and extra trailing fields are dropped.
/// Invalid UTF-8 is decoded lossily, so a bad byte costs one character and
/// not the row.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        if record.iter().all(<[u8]>::is_empty) {
            continue;
        }
        let row: Row = headers
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                record
                    .get(i)
                    .map(|value| (name.as_str(), Some(String::from_utf8_lossy(value).into_owned())))
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_uses_header_as_field_names() {
        let rows = parse_csv(b"DOMAIN,COMPANY,TAGS\na.com,A,x:y\nb.com,B,\n").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("DOMAIN"), Some("a.com"));
        assert_eq!(rows[0].get("TAGS"), Some("x:y"));
        assert_eq!(rows[1].get("COMPANY"), Some("B"));
        assert_eq!(rows[1].get("TAGS"), Some(""));
    }

    #[test]
    fn test_parse_csv_skips_empty_rows() {
        let rows = parse_csv(b"DOMAIN,COMPANY\n\na.com,A\n,\n\nb.com,B\n").unwrap();
        let domains: Vec<_> = rows.iter().map(|r| r.get("DOMAIN")).collect();
        assert_eq!(domains, vec![Some("a.com"), Some("b.com")]);
    }

    #[test]
    fn test_parse_csv_tolerates_ragged_rows() {
        let rows = parse_csv(b"DOMAIN,COMPANY,TAGS\na.com\nb.com,B,t,extra\n").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("DOMAIN"), Some("a.com"));
        assert!(!rows[0].contains_key("COMPANY"));
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_parse_csv_handles_quoted_fields() {
        let rows = parse_csv(b"DOMAIN,COMPANY\n\"a.com\",\"Acme, Inc.\"\n").unwrap();
        assert_eq!(rows[0].get("COMPANY"), Some("Acme, Inc."));
    }

    #[test]
    fn test_parse_csv_decodes_invalid_utf8_lossily() {
        let rows = parse_csv(b"DOMAIN,COMPANY\na.com,A\nb.com,Soci\xe9te\nc.com,C\n").unwrap();

        let domains: Vec<_> = rows.iter().map(|r| r.get("DOMAIN")).collect();
        assert_eq!(domains, vec![Some("a.com"), Some("b.com"), Some("c.com")]);
        assert_eq!(rows[1].get("COMPANY"), Some("Soci\u{FFFD}te"));
    }

    #[test]
    fn test_parse_csv_strips_bom_from_header() {
        let rows = parse_csv(b"\xef\xbb\xbfDOMAIN,COMPANY\na.com,A\n").unwrap();
        assert_eq!(rows[0].get("DOMAIN"), Some("a.com"));
    }

    #[test]
    fn test_parse_csv_empty_input() {
        assert!(parse_csv(b"").unwrap().is_empty());
        assert!(parse_csv(b"DOMAIN,COMPANY\n").unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let source = CsvFileSource::new();
        assert!(source.read(Path::new("/nonexistent/platinum.csv")).is_err());
    }
}
