//! CSV output for extracted field rows.

use std::path::Path;

use anyhow::{Context, Result};

use crate::fields::TrialFields;

/// Output column order. List-valued fields serialize `;`-joined.
pub const FIELD_COLUMNS: &[&str] = &[
    "nctId",
    "briefTitle",
    "leadSponsor",
    "interventionType",
    "interventionName",
    "interventionOtherNames",
    "facility",
    "address",
];

pub fn write_field_extractions(path: &Path, rows: &[TrialFields]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create field extractions file: {}", path.display()))?;
    writer.write_record(FIELD_COLUMNS)?;
    for row in rows {
        writer.write_record([
            row.nct_id.as_str(),
            row.brief_title.as_str(),
            row.lead_sponsor.as_str(),
            &row.intervention_types.join(";"),
            &row.intervention_names.join(";"),
            &row.intervention_other_names.join(";"),
            &row.facilities.join(";"),
            &row.addresses.join(";"),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("flush field extractions file: {}", path.display()))?;
    Ok(())
}
