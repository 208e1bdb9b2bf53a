//! CSV ingestion for the curation pipeline.
//!
//! Two directory loaders: per-criterion instance extraction files
//! (`*_instances.csv`, one row per eligibility statement) and resource
//! lookup tables (`*.csv` with `_lookup_`/`_curation_` columns). Malformed
//! tables are skipped with a warning; an empty instance directory is fatal.

pub mod csv_rows;
pub mod instances;
pub mod resources;

pub use csv_rows::{csv_files, read_csv_rows, read_csv_table};
pub use instances::load_instance_tables;
pub use resources::load_resource_tables;
