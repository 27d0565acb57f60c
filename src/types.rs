use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::constants::TIER_FIELD;

/// A single field value. `None` stands for a column the row does not carry.
pub type FieldValue = Option<String>;

/// A CSV row with a dynamic, insertion-ordered field set.
///
/// Stages never mutate a row they were handed; they build a new one with
/// [`Row::with`] so each step produces its own value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: IndexMap<String, FieldValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `key`, or `None` when the field is absent or null
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns this row with `key` set to `value`. An existing field keeps its
    /// position; a new one is appended.
    pub fn with(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The tier this row was loaded under
    pub fn tier(&self) -> Tier {
        Tier::from_label(self.get(TIER_FIELD))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Risk-engagement tier of a source export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Platinum,
    Gold,
    Silver,
    None,
}

impl Tier {
    /// Infers the tier from a source path by case-insensitive substring match.
    /// Platinum beats gold beats silver when several keywords appear.
    pub fn from_path(path: &Path) -> Self {
        let lower = path.to_string_lossy().to_lowercase();
        if lower.contains("platinum") {
            Tier::Platinum
        } else if lower.contains("gold") {
            Tier::Gold
        } else if lower.contains("silver") {
            Tier::Silver
        } else {
            Tier::None
        }
    }

    /// Parses the label stored in a row's Tier field
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("platinum") => Tier::Platinum,
            Some("gold") => Tier::Gold,
            Some("silver") => Tier::Silver,
            _ => Tier::None,
        }
    }

    /// Label written into rows; `None` for untiered sources
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Tier::Platinum => Some("platinum"),
            Tier::Gold => Some("gold"),
            Tier::Silver => Some("silver"),
            Tier::None => None,
        }
    }

    /// Dedup priority. `None` orders below every `Some`, so untiered rows
    /// lose to any tiered row.
    pub fn priority(&self) -> Option<u8> {
        match self {
            Tier::Platinum => Some(3),
            Tier::Gold => Some(2),
            Tier::Silver => Some(1),
            Tier::None => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().unwrap_or("none"))
    }
}

/// Order of the deduplicated output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputOrder {
    /// Order in which each domain first appeared across the concatenated sources
    #[default]
    #[value(name = "first_seen")]
    FirstSeen,
    /// Ascending by domain, rows without a domain first
    Domain,
}

/// The published record shape. Field order here is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalRecord {
    #[serde(rename = "Company Name")]
    pub company_name: FieldValue,
    #[serde(rename = "Domain")]
    pub domain: FieldValue,
    #[serde(rename = "Business Impact")]
    pub business_impact: FieldValue,
    #[serde(rename = "Tier")]
    pub tier: FieldValue,
    #[serde(rename = "Likelihood")]
    pub likelihood: FieldValue,
    #[serde(rename = "Status")]
    pub status: FieldValue,
    #[serde(rename = "Custom Tags")]
    pub custom_tags: String,
}

impl FinalRecord {
    /// Header row written ahead of the records
    pub const COLUMNS: [&'static str; 7] = [
        "Company Name",
        "Domain",
        "Business Impact",
        "Tier",
        "Likelihood",
        "Status",
        "Custom Tags",
    ];
}
