use std::path::PathBuf;

use crate::constants::{DEFAULT_IMPACT_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_SOURCES};
use crate::types::OutputOrder;

/// Inputs and output for one merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Tier exports, loaded and concatenated in this order
    pub sources: Vec<PathBuf>,
    /// Business-impact reference file
    pub impact: PathBuf,
    pub output: PathBuf,
    pub order: OutputOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(PathBuf::from).collect(),
            impact: PathBuf::from(DEFAULT_IMPACT_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            order: OutputOrder::default(),
        }
    }
}
