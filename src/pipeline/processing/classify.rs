//! Decomposes the TAGS column into likelihood, status and lifecycle fields.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::trace;

use crate::constants::{LIFECYCLE_FIELD, LIKELIHOOD_FIELD, STATUS_FIELD, TAGS_FIELD, TAG_SEPARATOR};
use crate::observability::metrics;
use crate::types::Row;

/// Classification axis a tag token can feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Likelihood,
    Status,
    Lifecycle,
}

/// Lookup tables in the order tokens are checked against them
static TAG_TABLES: Lazy<[(Axis, HashMap<&'static str, &'static str>); 3]> = Lazy::new(|| {
    [
        (
            Axis::Likelihood,
            HashMap::from([
                ("Breach Likelihood Assessment - Low", "low"),
                ("Breach Likelihood Assessment - Medium", "medium"),
                ("Breach Likelihood Assessment - High", "high"),
                ("Breach Likelihood Assessment - Critical", "critical"),
            ]),
        ),
        (
            Axis::Status,
            HashMap::from([
                ("Active engagement - Proactive", "trending_down"),
                ("Active engagement - Reactive", "needs_attention"),
                ("Active engagement - Escalation", "risk_escalating"),
                ("Active engagement - Breach", "active_breach"),
            ]),
        ),
        (
            Axis::Lifecycle,
            HashMap::from([
                ("Engagement lifecycle - Onboarding", "assess"),
                ("Engagement lifecycle - Assessment", "monitor"),
                ("Engagement lifecycle - Remediation", "respond"),
                ("Engagement lifecycle - Maintenance", "maintain"),
            ]),
        ),
    ]
});

/// The axis and value a single token maps to, if any. Keys match exactly.
pub fn lookup_tag(token: &str) -> Option<(Axis, &'static str)> {
    TAG_TABLES
        .iter()
        .find_map(|(axis, table)| table.get(token).map(|value| (*axis, *value)))
}

/// Values derived from one TAGS string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub likelihood: Option<&'static str>,
    pub status: Option<&'static str>,
    pub lifecycle: Option<&'static str>,
    pub unmatched_tokens: usize,
}

/// Classifies a TAGS string left to right. A later token on an axis
/// overwrites an earlier one.
pub fn classify_tags(tags: Option<&str>) -> Classification {
    let mut classification = Classification::default();
    let Some(tags) = tags.filter(|t| !t.is_empty()) else {
        return classification;
    };

    for token in tags.split(TAG_SEPARATOR) {
        match lookup_tag(token) {
            Some((Axis::Likelihood, value)) => classification.likelihood = Some(value),
            Some((Axis::Status, value)) => classification.status = Some(value),
            Some((Axis::Lifecycle, value)) => classification.lifecycle = Some(value),
            None => {
                trace!("Ignoring unrecognized tag token {:?}", token);
                classification.unmatched_tokens += 1;
            }
        }
    }
    classification
}

/// Returns `row` plus Likelihood, Status and Lifecycle fields
pub fn classify(row: &Row) -> Row {
    let classification = classify_tags(row.get(TAGS_FIELD));
    if classification.unmatched_tokens > 0 {
        metrics::classify::unmatched_tokens(classification.unmatched_tokens);
    }
    row.clone()
        .with(LIKELIHOOD_FIELD, classification.likelihood.map(str::to_string))
        .with(STATUS_FIELD, classification.status.map(str::to_string))
        .with(LIFECYCLE_FIELD, classification.lifecycle.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(tags: Option<&str>) -> Row {
        Row::new()
            .with("DOMAIN", Some("a.com".to_string()))
            .with(TAGS_FIELD, tags.map(str::to_string))
    }

    #[test]
    fn test_classify_likelihood_and_status() {
        let row = classify(&tagged(Some("Breach Likelihood Assessment - High:Active engagement - Breach")));

        assert_eq!(row.get(LIKELIHOOD_FIELD), Some("high"));
        assert_eq!(row.get(STATUS_FIELD), Some("active_breach"));
        assert_eq!(row.get(LIFECYCLE_FIELD), None);
        assert!(row.contains_key(LIFECYCLE_FIELD));
    }

    #[test]
    fn test_empty_or_missing_tags_give_nulls() {
        for row in [tagged(Some("")), tagged(None), Row::new()] {
            let classified = classify(&row);
            assert_eq!(classified.get(LIKELIHOOD_FIELD), None);
            assert_eq!(classified.get(STATUS_FIELD), None);
            assert_eq!(classified.get(LIFECYCLE_FIELD), None);
        }
    }

    #[test]
    fn test_unrecognized_tokens_are_ignored() {
        let c = classify_tags(Some("VIP:Engagement lifecycle - Remediation:breach likelihood assessment - low"));

        assert_eq!(c.lifecycle, Some("respond"));
        assert_eq!(c.likelihood, None);
        assert_eq!(c.unmatched_tokens, 2);
    }

    #[test]
    fn test_last_match_per_axis_wins() {
        let c = classify_tags(Some(
            "Active engagement - Proactive:Breach Likelihood Assessment - Low:Active engagement - Escalation",
        ));

        assert_eq!(c.status, Some("risk_escalating"));
        assert_eq!(c.likelihood, Some("low"));
    }

    #[test]
    fn test_tokens_are_not_trimmed() {
        let c = classify_tags(Some("Active engagement - Reactive: Engagement lifecycle - Assessment"));

        assert_eq!(c.status, Some("needs_attention"));
        assert_eq!(c.lifecycle, None);
    }

    #[test]
    fn test_every_table_entry_resolves() {
        let expected = [
            ("Breach Likelihood Assessment - Critical", Axis::Likelihood, "critical"),
            ("Breach Likelihood Assessment - Medium", Axis::Likelihood, "medium"),
            ("Active engagement - Reactive", Axis::Status, "needs_attention"),
            ("Engagement lifecycle - Onboarding", Axis::Lifecycle, "assess"),
            ("Engagement lifecycle - Assessment", Axis::Lifecycle, "monitor"),
            ("Engagement lifecycle - Maintenance", Axis::Lifecycle, "maintain"),
        ];
        for (token, axis, value) in expected {
            assert_eq!(lookup_tag(token), Some((axis, value)), "token {token}");
        }
    }

    #[test]
    fn test_classify_does_not_mutate_input() {
        let row = tagged(Some("Breach Likelihood Assessment - Low"));
        let before = row.clone();
        let _ = classify(&row);
        assert_eq!(row, before);
    }
}
