//! Metric names and recording helpers for the merge pipeline.
//!
//! Recording goes through the `metrics` facade. Nothing here installs an
//! exporter; without a global recorder every call is a no-op.

use std::fmt;

use crate::types::Tier;

/// Enum representing all metric names used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Loader metrics
    LoaderRowsLoaded,
    LoaderSourceFailures,

    // Impact index metrics
    ImpactIndexEntries,

    // Merge metrics
    MergeRowsIn,
    MergeImpactMisses,
    MergeDuplicatesDropped,
    MergeUniqueDomains,

    // Classifier metrics
    ClassifyUnmatchedTokens,

    // Sink metrics
    SinkRecordsWritten,
    SinkWriteFailures,

    PipelineDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::LoaderRowsLoaded => "tier_merge_loader_rows_loaded_total",
            MetricName::LoaderSourceFailures => "tier_merge_loader_source_failures_total",
            MetricName::ImpactIndexEntries => "tier_merge_impact_index_entries",
            MetricName::MergeRowsIn => "tier_merge_merge_rows_in_total",
            MetricName::MergeImpactMisses => "tier_merge_merge_impact_misses_total",
            MetricName::MergeDuplicatesDropped => "tier_merge_merge_duplicates_dropped_total",
            MetricName::MergeUniqueDomains => "tier_merge_merge_unique_domains",
            MetricName::ClassifyUnmatchedTokens => "tier_merge_classify_unmatched_tokens_total",
            MetricName::SinkRecordsWritten => "tier_merge_sink_records_written_total",
            MetricName::SinkWriteFailures => "tier_merge_sink_write_failures_total",
            MetricName::PipelineDuration => "tier_merge_pipeline_duration_seconds",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Loader Metrics
// ============================================================================

pub mod loader {
    use super::{MetricName, Tier};

    pub fn rows_loaded(tier: Tier, count: usize) {
        ::metrics::counter!(MetricName::LoaderRowsLoaded.as_str(), "tier" => tier.to_string())
            .increment(count as u64);
    }

    pub fn source_failure(tier: Tier) {
        ::metrics::counter!(MetricName::LoaderSourceFailures.as_str(), "tier" => tier.to_string())
            .increment(1);
    }
}

// ============================================================================
// Impact Index Metrics
// ============================================================================

pub mod impact {
    use super::MetricName;

    pub fn index_entries(count: usize) {
        ::metrics::gauge!(MetricName::ImpactIndexEntries.as_str()).set(count as f64);
    }
}

// ============================================================================
// Merge Metrics
// ============================================================================

pub mod merge {
    use super::MetricName;

    pub fn rows_in(count: usize) {
        ::metrics::counter!(MetricName::MergeRowsIn.as_str()).increment(count as u64);
    }

    pub fn impact_misses(count: usize) {
        ::metrics::counter!(MetricName::MergeImpactMisses.as_str()).increment(count as u64);
    }

    pub fn duplicates_dropped(count: usize) {
        ::metrics::counter!(MetricName::MergeDuplicatesDropped.as_str()).increment(count as u64);
    }

    pub fn unique_domains(count: usize) {
        ::metrics::gauge!(MetricName::MergeUniqueDomains.as_str()).set(count as f64);
    }
}

// ============================================================================
// Classifier Metrics
// ============================================================================

pub mod classify {
    use super::MetricName;

    pub fn unmatched_tokens(count: usize) {
        ::metrics::counter!(MetricName::ClassifyUnmatchedTokens.as_str()).increment(count as u64);
    }
}

// ============================================================================
// Sink Metrics
// ============================================================================

pub mod sink {
    use super::MetricName;

    pub fn records_written(count: usize) {
        ::metrics::counter!(MetricName::SinkRecordsWritten.as_str()).increment(count as u64);
    }

    pub fn write_failure() {
        ::metrics::counter!(MetricName::SinkWriteFailures.as_str()).increment(1);
    }
}

pub fn pipeline_duration(secs: f64) {
    ::metrics::histogram!(MetricName::PipelineDuration.as_str()).record(secs);
}
