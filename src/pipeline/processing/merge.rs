//! Concatenation, business-impact join and domain deduplication.

use indexmap::map::Entry;
use indexmap::IndexMap;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::app::ports::SourceReader;
use crate::constants::{BUSINESS_IMPACT_FIELD, DOMAIN_FIELD};
use crate::observability::metrics;
use crate::pipeline::processing::impact::ImpactIndex;
use crate::pipeline::processing::loader::{self, LoadedSource};
use crate::types::{FieldValue, OutputOrder, Row};

/// Per-source outcome of the load step
#[derive(Debug, Clone)]
pub struct SourceLoad {
    pub path: PathBuf,
    pub loaded: LoadedSource,
}

/// Result of merging a list of sources
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// One row per distinct domain
    pub rows: Vec<Row>,
    pub sources: Vec<SourceLoad>,
    pub rows_in: usize,
    pub impact_misses: usize,
    pub duplicates_dropped: usize,
}

/// Returns `row` with its Business Impact field set from the index
pub fn attach_impact(row: Row, index: &ImpactIndex) -> Row {
    let impact = index.lookup(row.get(DOMAIN_FIELD)).map(str::to_string);
    row.with(BUSINESS_IMPACT_FIELD, impact)
}

/// True when `candidate` should replace `incumbent` for the same domain.
/// Only a strictly higher tier wins, so on equal tiers the first row stays.
pub fn outranks(candidate: &Row, incumbent: &Row) -> bool {
    candidate.tier().priority() > incumbent.tier().priority()
}

/// Collapses rows sharing a DOMAIN value to the single highest-tier row.
///
/// Rows without a domain share one slot. Losing rows are dropped whole.
/// The result is in order of each domain's first appearance.
pub fn dedup_by_domain<I>(rows: I) -> (Vec<Row>, usize)
where
    I: IntoIterator<Item = Row>,
{
    let mut dropped = 0;
    let slots = rows
        .into_iter()
        .fold(IndexMap::<FieldValue, Row>::new(), |mut slots, row| {
            let key = row.get(DOMAIN_FIELD).map(str::to_string);
            match slots.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(mut slot) => {
                    if outranks(&row, slot.get()) {
                        debug!(domain = ?slot.key(), "Replacing {} row with {} row", slot.get().tier(), row.tier());
                        slot.insert(row);
                    }
                    dropped += 1;
                }
            }
            slots
        });
    (slots.into_values().collect(), dropped)
}

/// Puts deduplicated rows into the requested output order
pub fn order_rows(mut rows: Vec<Row>, order: OutputOrder) -> Vec<Row> {
    if order == OutputOrder::Domain {
        rows.sort_by(|a, b| a.get(DOMAIN_FIELD).cmp(&b.get(DOMAIN_FIELD)));
    }
    rows
}

/// Loads every source in list order, joins business impact and deduplicates
/// by domain. A source listed twice contributes its rows twice.
#[instrument(skip(reader, index), fields(sources = sources.len()))]
pub fn merge(reader: &dyn SourceReader, sources: &[PathBuf], index: &ImpactIndex, order: OutputOrder) -> MergeOutcome {
    let loads: Vec<SourceLoad> = sources
        .iter()
        .map(|path| SourceLoad {
            path: path.clone(),
            loaded: loader::load(reader, path),
        })
        .collect();

    let joined: Vec<Row> = loads
        .iter()
        .flat_map(|load| load.loaded.rows.iter().cloned())
        .map(|row| attach_impact(row, index))
        .collect();
    let rows_in = joined.len();
    let impact_misses = joined
        .iter()
        .filter(|row| row.get(BUSINESS_IMPACT_FIELD).is_none())
        .count();

    let (unique, duplicates_dropped) = dedup_by_domain(joined);
    let rows = order_rows(unique, order);

    info!(
        "Merged {} rows into {} domains ({} duplicates dropped, {} without business impact)",
        rows_in,
        rows.len(),
        duplicates_dropped,
        impact_misses
    );
    metrics::merge::rows_in(rows_in);
    metrics::merge::impact_misses(impact_misses);
    metrics::merge::duplicates_dropped(duplicates_dropped);
    metrics::merge::unique_domains(rows.len());

    MergeOutcome {
        rows,
        sources: loads,
        rows_in,
        impact_misses,
        duplicates_dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COMPANY_FIELD, TIER_FIELD};
    use crate::pipeline::storage::in_memory::InMemorySource;
    use crate::types::Tier;

    fn tier_row(domain: Option<&str>, company: &str, tier: Tier) -> Row {
        Row::new()
            .with(DOMAIN_FIELD, domain.map(str::to_string))
            .with(COMPANY_FIELD, Some(company.to_string()))
            .with(TIER_FIELD, tier.label().map(str::to_string))
    }

    fn companies(rows: &[Row]) -> Vec<&str> {
        rows.iter().filter_map(|r| r.get(COMPANY_FIELD)).collect()
    }

    #[test]
    fn test_higher_tier_wins_regardless_of_order() {
        let silver_first = vec![
            tier_row(Some("a.com"), "silver", Tier::Silver),
            tier_row(Some("a.com"), "platinum", Tier::Platinum),
        ];
        let platinum_first = vec![
            tier_row(Some("a.com"), "platinum", Tier::Platinum),
            tier_row(Some("a.com"), "silver", Tier::Silver),
        ];

        let (rows, dropped) = dedup_by_domain(silver_first);
        assert_eq!(companies(&rows), vec!["platinum"]);
        assert_eq!(dropped, 1);

        let (rows, _) = dedup_by_domain(platinum_first);
        assert_eq!(companies(&rows), vec!["platinum"]);
    }

    #[test]
    fn test_equal_tier_keeps_first_seen() {
        let (rows, dropped) = dedup_by_domain(vec![
            tier_row(Some("a.com"), "first", Tier::Gold),
            tier_row(Some("a.com"), "second", Tier::Gold),
            tier_row(Some("a.com"), "third", Tier::Silver),
        ]);

        assert_eq!(companies(&rows), vec!["first"]);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_untiered_row_loses_to_any_tier() {
        let (rows, _) = dedup_by_domain(vec![
            tier_row(Some("a.com"), "untiered", Tier::None),
            tier_row(Some("a.com"), "silver", Tier::Silver),
        ]);
        assert_eq!(companies(&rows), vec!["silver"]);
    }

    #[test]
    fn test_domain_key_is_case_sensitive() {
        let (rows, dropped) = dedup_by_domain(vec![
            tier_row(Some("a.com"), "lower", Tier::Gold),
            tier_row(Some("A.com"), "upper", Tier::Gold),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_rows_without_domain_share_a_slot() {
        let (rows, dropped) = dedup_by_domain(vec![
            tier_row(None, "no-domain-silver", Tier::Silver),
            tier_row(Some("a.com"), "a", Tier::Silver),
            tier_row(None, "no-domain-gold", Tier::Gold),
        ]);

        assert_eq!(companies(&rows), vec!["no-domain-gold", "a"]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_loser_fields_are_not_merged() {
        let winner = tier_row(Some("a.com"), "winner", Tier::Platinum);
        let loser = tier_row(Some("a.com"), "loser", Tier::Silver).with("EXTRA", Some("x".to_string()));

        let (rows, _) = dedup_by_domain(vec![loser, winner.clone()]);
        assert_eq!(rows, vec![winner]);
    }

    #[test]
    fn test_order_rows_by_domain() {
        let rows = vec![
            tier_row(Some("c.com"), "c", Tier::Gold),
            tier_row(None, "none", Tier::Gold),
            tier_row(Some("a.com"), "a", Tier::Gold),
        ];

        let first_seen = order_rows(rows.clone(), OutputOrder::FirstSeen);
        assert_eq!(companies(&first_seen), vec!["c", "none", "a"]);

        let sorted = order_rows(rows, OutputOrder::Domain);
        assert_eq!(companies(&sorted), vec!["none", "a", "c"]);
    }

    #[test]
    fn test_attach_impact() {
        let index = ImpactIndex::build(&[Row::new()
            .with("domain", Some("x.com".to_string()))
            .with("businessImpact", Some("High".to_string()))]);

        let hit = attach_impact(tier_row(Some("x.com"), "x", Tier::Gold), &index);
        let miss = attach_impact(tier_row(Some("y.com"), "y", Tier::Gold), &index);

        assert_eq!(hit.get(BUSINESS_IMPACT_FIELD), Some("High"));
        assert!(miss.contains_key(BUSINESS_IMPACT_FIELD));
        assert_eq!(miss.get(BUSINESS_IMPACT_FIELD), None);
    }

    #[test]
    fn test_merge_keeps_winner_impact_only() {
        let source = InMemorySource::new()
            .with_file("silver.csv", "DOMAIN,COMPANY\na.com,A-old\nb.com,B\n")
            .with_file("platinum.csv", "DOMAIN,COMPANY\na.com,A\n");
        let index = ImpactIndex::build(&[Row::new()
            .with("domain", Some("a.com".to_string()))
            .with("businessImpact", Some("Medium".to_string()))]);

        let outcome = merge(
            &source,
            &[PathBuf::from("silver.csv"), PathBuf::from("platinum.csv"), PathBuf::from("missing.csv")],
            &index,
            OutputOrder::FirstSeen,
        );

        assert_eq!(outcome.rows_in, 3);
        assert_eq!(outcome.duplicates_dropped, 1);
        assert_eq!(outcome.impact_misses, 1);
        assert_eq!(companies(&outcome.rows), vec!["A", "B"]);
        assert_eq!(outcome.rows[0].get(TIER_FIELD), Some("platinum"));
        assert_eq!(outcome.rows[0].get(BUSINESS_IMPACT_FIELD), Some("Medium"));
        assert!(outcome.sources[2].loaded.error.is_some());
    }

    #[test]
    fn test_merge_duplicate_source_listing() {
        let source = InMemorySource::new().with_file("silver.csv", "DOMAIN,COMPANY\na.com,A\n");
        let index = ImpactIndex::default();

        let outcome = merge(
            &source,
            &[PathBuf::from("silver.csv"), PathBuf::from("silver.csv")],
            &index,
            OutputOrder::FirstSeen,
        );

        assert_eq!(outcome.rows_in, 2);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.duplicates_dropped, 1);
    }
}
