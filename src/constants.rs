/// Column names shared across pipeline stages.
/// Tier exports use upper-case headers; the business-impact reference file
/// uses camelCase headers, so the two domain columns differ in case.

// Tier export columns
pub const DOMAIN_FIELD: &str = "DOMAIN";
pub const COMPANY_FIELD: &str = "COMPANY";
pub const TAGS_FIELD: &str = "TAGS";

// Business-impact reference columns
pub const REFERENCE_DOMAIN_FIELD: &str = "domain";
pub const REFERENCE_IMPACT_FIELD: &str = "businessImpact";

// Fields attached by the pipeline
pub const TIER_FIELD: &str = "Tier";
pub const BUSINESS_IMPACT_FIELD: &str = "Business Impact";
pub const LIKELIHOOD_FIELD: &str = "Likelihood";
pub const STATUS_FIELD: &str = "Status";
pub const LIFECYCLE_FIELD: &str = "Lifecycle";

/// Separator between tokens in the TAGS column
pub const TAG_SEPARATOR: char = ':';

// Reference run defaults
pub const DEFAULT_SOURCES: [&str; 3] = [
    "./data/example/Platinum-test.csv",
    "./data/example/Silver-test.csv",
    "./data/example/Silver-test.csv",
];
pub const DEFAULT_IMPACT_FILE: &str = "./data/example/AllCompanies-filtered.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "merged_output.csv";
pub const DEFAULT_LOG_FILE: &str = "tier_merge.log";
