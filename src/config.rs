use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MergeError, Result};
use crate::pipeline::PipelineConfig;
use crate::types::OutputOrder;

/// Run configuration as read from a TOML file. Every key is optional; the
/// defaults reproduce the reference run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sources: Vec<PathBuf>,
    pub impact: PathBuf,
    pub output: PathBuf,
    pub order: OutputOrder,
    /// Directory for JSON log files; console only when unset
    pub log_dir: Option<PathBuf>,
    /// Where to write the JSON run report
    pub report: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            sources: pipeline.sources,
            impact: pipeline.impact,
            output: pipeline.output,
            order: pipeline.order,
            log_dir: None,
            report: None,
        }
    }
}

/// Command-line values that take precedence over the file.
/// Empty `sources` and `None` fields leave the file's value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub sources: Vec<PathBuf>,
    pub impact: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub order: Option<OutputOrder>,
    pub report: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            MergeError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if !overrides.sources.is_empty() {
            self.sources = overrides.sources;
        }
        if let Some(impact) = overrides.impact {
            self.impact = impact;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(order) = overrides.order {
            self.order = order;
        }
        if overrides.report.is_some() {
            self.report = overrides.report;
        }
        if overrides.log_dir.is_some() {
            self.log_dir = overrides.log_dir;
        }
        self
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            sources: self.sources.clone(),
            impact: self.impact.clone(),
            output: self.output.clone(),
            order: self.order,
        }
    }
}
