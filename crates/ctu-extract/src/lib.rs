//! Field extractor: flattens one trial JSON object into flat rows.
//!
//! Three facets per trial (basic identity, interventions, locations) merged
//! by trial id. List-valued facets are deduplicated order-preserving: first
//! occurrence wins, later duplicates are dropped.

pub mod dedup;
pub mod fields;
pub mod output;

pub use dedup::dedup_first_occurrence;
pub use fields::{
    COUNTRY_ALLOW_LIST, ExtractSummary, TrialFields, extract_basic_fields,
    extract_intervention_fields, extract_location_fields, extract_trials,
};
pub use output::write_field_extractions;
