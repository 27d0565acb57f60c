use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::constants::{REFERENCE_DOMAIN_FIELD, REFERENCE_IMPACT_FIELD};
use crate::observability::metrics;
use crate::types::{FieldValue, Row};

/// Read-only mapping from domain to business impact.
///
/// Keys are taken verbatim from the reference file's `domain` column. Reference
/// rows without a domain share the separate `missing_domain` slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImpactIndex {
    entries: HashMap<String, FieldValue>,
    missing_domain: Option<FieldValue>,
}

impl ImpactIndex {
    /// Builds the index; a repeated domain keeps the value of its last row.
    #[instrument(skip(rows), fields(rows = rows.len()))]
    pub fn build(rows: &[Row]) -> Self {
        let mut index = Self::default();
        for row in rows {
            let impact = row.get(REFERENCE_IMPACT_FIELD).map(str::to_string);
            match row.get(REFERENCE_DOMAIN_FIELD) {
                Some(domain) => {
                    index.entries.insert(domain.to_string(), impact);
                }
                None => index.missing_domain = Some(impact),
            }
        }
        debug!("Built impact index with {} domains", index.len());
        metrics::impact::index_entries(index.len());
        index
    }

    /// Business impact for `domain`. Misses and empty impact values are `None`.
    pub fn lookup(&self, domain: Option<&str>) -> Option<&str> {
        let impact = match domain {
            Some(domain) => self.entries.get(domain),
            None => self.missing_domain.as_ref(),
        };
        impact
            .and_then(|impact| impact.as_deref())
            .filter(|impact| !impact.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len() + usize::from(self.missing_domain.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
