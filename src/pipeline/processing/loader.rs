use std::path::Path;
use tracing::{error, info, instrument};

use crate::app::ports::SourceReader;
use crate::constants::TIER_FIELD;
use crate::observability::metrics;
use crate::types::{Row, Tier};

/// Rows loaded from one source, together with how the load went
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub tier: Tier,
    pub rows: Vec<Row>,
    /// Read or parse failure message; `rows` is empty when set
    pub error: Option<String>,
}

/// Loads one source and tags every row with the tier inferred from its path.
///
/// A failing source is logged and yields no rows so the remaining sources
/// still go through.
#[instrument(skip(reader), fields(path = %path.display()))]
pub fn load(reader: &dyn SourceReader, path: &Path) -> LoadedSource {
    let tier = Tier::from_path(path);
    match reader.read(path) {
        Ok(rows) => {
            let rows: Vec<Row> = rows
                .into_iter()
                .map(|row| row.with(TIER_FIELD, tier.label().map(str::to_string)))
                .collect();
            info!("Loaded {} rows from {} (tier {})", rows.len(), path.display(), tier);
            metrics::loader::rows_loaded(tier, rows.len());
            LoadedSource { tier, rows, error: None }
        }
        Err(e) => {
            error!("Error reading file {}: {}", path.display(), e);
            metrics::loader::source_failure(tier);
            LoadedSource {
                tier,
                rows: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
