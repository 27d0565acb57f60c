// Merge pipeline: stage processing, run orchestration and in-memory storage

pub mod pipeline;
pub mod pipeline_config;
pub mod processing;
pub mod storage;

pub use pipeline::{Pipeline, PipelineResult, SourceSummary};
pub use pipeline_config::PipelineConfig;
