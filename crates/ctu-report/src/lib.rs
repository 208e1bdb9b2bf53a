//! Aggregator: outer-joins the core field table with per-criterion
//! extraction tables into one multi-level summary table and exports it.
//!
//! Column labels are parsed once at ingestion into a typed
//! (criterion, direction, field) triple; presentation order is a fixed
//! configuration, not derived from the data.

pub mod aggregate;
pub mod columns;
pub mod export;

pub use aggregate::{
    OverrideEntry, SummaryTable, apply_overrides, apply_presence_flag, apply_removals,
    drop_missing_intervention, load_core_table, load_criterion_tables, load_overrides,
    load_removals, outer_join,
};
pub use columns::{CORE_CRITERION, ColumnLabel};
pub use export::write_summary;
