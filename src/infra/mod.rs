pub mod csv_sink_adapter;
pub mod csv_source_adapter;

pub use csv_sink_adapter::CsvFileSink;
pub use csv_source_adapter::CsvFileSource;
