use crate::constants::{
    BUSINESS_IMPACT_FIELD, COMPANY_FIELD, DOMAIN_FIELD, LIKELIHOOD_FIELD, STATUS_FIELD, TIER_FIELD,
};
use crate::types::{FinalRecord, Row};

/// Maps a classified row onto the published schema. Every other field,
/// Lifecycle included, is dropped.
pub fn project(row: &Row) -> FinalRecord {
    let field = |name: &str| row.get(name).map(str::to_string);
    FinalRecord {
        company_name: field(COMPANY_FIELD),
        domain: field(DOMAIN_FIELD),
        business_impact: field(BUSINESS_IMPACT_FIELD),
        tier: field(TIER_FIELD),
        likelihood: field(LIKELIHOOD_FIELD),
        status: field(STATUS_FIELD),
        custom_tags: String::new(),
    }
}
