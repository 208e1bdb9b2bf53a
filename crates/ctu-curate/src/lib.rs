//! Curation engine and rule-builder.
//!
//! [`apply_curation`] joins instance rows against resource lookup tables and
//! unions the matching tag sets onto each row; [`build_selection_rules`]
//! compiles the curated rows into one boolean selection expression per
//! trial. Both are pure over their inputs.

pub mod engine;
pub mod output;
pub mod rules;

pub use engine::{LookupStats, apply_curation};
pub use output::{write_curated_table, write_selection_rules};
pub use rules::build_selection_rules;

/// Curation tag name that is never looked up independently; it only shapes
/// the gene×alteration handling at rule-building time.
pub const TYPE_TAG: &str = "type";
