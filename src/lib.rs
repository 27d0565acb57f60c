//! Merges tiered risk-assessment CSV exports into one deduplicated,
//! classified CSV keyed by domain.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod observability;
pub mod pipeline;
pub mod types;

pub use error::{MergeError, Result};
pub use pipeline::{Pipeline, PipelineConfig, PipelineResult};
pub use types::{FinalRecord, OutputOrder, Row, Tier};
