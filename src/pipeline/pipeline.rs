use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

use crate::app::ports::{RecordSink, SourceReader};
use crate::error::Result;
use crate::infra::{CsvFileSink, CsvFileSource};
use crate::observability::metrics;
use crate::pipeline::pipeline_config::PipelineConfig;
use crate::pipeline::processing::classify::classify;
use crate::pipeline::processing::impact::ImpactIndex;
use crate::pipeline::processing::loader::{self, LoadedSource};
use crate::pipeline::processing::merge::merge;
use crate::pipeline::processing::project::project;
use crate::types::{FinalRecord, Tier};

/// How one input file fared
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub path: String,
    pub tier: Tier,
    pub rows: usize,
    pub error: Option<String>,
}

impl SourceSummary {
    fn new(path: &Path, loaded: &LoadedSource) -> Self {
        Self {
            path: path.display().to_string(),
            tier: loaded.tier,
            rows: loaded.rows.len(),
            error: loaded.error.clone(),
        }
    }
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub sources: Vec<SourceSummary>,
    pub impact_source: SourceSummary,
    pub impact_entries: usize,
    pub rows_loaded: usize,
    pub unique_domains: usize,
    pub duplicates_dropped: usize,
    pub records_written: usize,
    pub output_file: String,
    /// Hex SHA-256 of the written CSV; identical inputs give identical digests
    pub output_sha256: Option<String>,
    pub write_error: Option<String>,
}

impl PipelineResult {
    /// False when the output file could not be written
    pub fn is_complete(&self) -> bool {
        self.write_error.is_none()
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceSummary> {
        self.sources
            .iter()
            .chain(std::iter::once(&self.impact_source))
            .filter(|s| s.error.is_some())
    }

    /// Persist this result as pretty JSON
    pub fn write_report(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json_content = serde_json::to_string_pretty(self)?;
        fs::write(path, json_content)?;
        Ok(())
    }
}

/// Runs loader, impact index, merge, classify, project and write in order
pub struct Pipeline {
    reader: Arc<dyn SourceReader>,
    sink: Arc<dyn RecordSink>,
}

impl Pipeline {
    pub fn new(reader: Arc<dyn SourceReader>, sink: Arc<dyn RecordSink>) -> Self {
        Self { reader, sink }
    }

    /// Pipeline reading and writing CSV files on disk
    pub fn with_csv_files() -> Self {
        Self::new(Arc::new(CsvFileSource::new()), Arc::new(CsvFileSink::new()))
    }

    /// Run the whole merge. Source and write failures are logged and
    /// reported in the result; nothing here aborts the run.
    #[instrument(skip(self, config), fields(output = %config.output.display()))]
    pub fn run(&self, config: &PipelineConfig) -> PipelineResult {
        let started_at = Utc::now();
        let t_pipeline = Instant::now();
        info!("🚀 Merging {} sources into {}", config.sources.len(), config.output.display());

        let impact_load = loader::load(&*self.reader, &config.impact);
        let index = ImpactIndex::build(&impact_load.rows);
        info!("📇 Impact index holds {} domains", index.len());

        let merged = merge(&*self.reader, &config.sources, &index, config.order);

        let records: Vec<FinalRecord> = merged.rows.iter().map(|row| project(&classify(row))).collect();

        let (output_sha256, write_error, records_written) = match self.sink.write(&config.output, &records) {
            Ok(receipt) => {
                info!(
                    "💾 Mapped and filtered CSV file saved as \"{}\" ({} records, sha256 {})",
                    config.output.display(),
                    records.len(),
                    receipt.sha256
                );
                metrics::sink::records_written(records.len());
                (Some(receipt.sha256), None, records.len())
            }
            Err(e) => {
                error!("Error writing CSV file {}: {}", config.output.display(), e);
                metrics::sink::write_failure();
                (None, Some(e.to_string()), 0)
            }
        };

        let duration_secs = t_pipeline.elapsed().as_secs_f64();
        metrics::pipeline_duration(duration_secs);

        PipelineResult {
            started_at,
            duration_secs,
            sources: merged
                .sources
                .iter()
                .map(|s| SourceSummary::new(&s.path, &s.loaded))
                .collect(),
            impact_source: SourceSummary::new(&config.impact, &impact_load),
            impact_entries: index.len(),
            rows_loaded: merged.rows_in,
            unique_domains: merged.rows.len(),
            duplicates_dropped: merged.duplicates_dropped,
            records_written,
            output_file: config.output.display().to_string(),
            output_sha256,
            write_error,
        }
    }
}
