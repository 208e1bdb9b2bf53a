//! Serialization of the curated instance table and the selection rules.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

use ctu_model::{CurationColumn, InstanceRow, ResourceTable, SelectionRule};

const BASE_COLUMNS: &[&str] = &["trialId", "Incl/Excl", "criterion_class"];

/// Columns kept in the curated output: the base trio, every field that is a
/// lookup field of some resource table, and every curation column present on
/// any row. Raw extraction fields that fed no lookup are dropped.
fn curated_columns(
    rows: &[InstanceRow],
    resources: &[ResourceTable],
) -> (Vec<String>, Vec<CurationColumn>) {
    let lookup_fields: BTreeSet<String> = resources
        .iter()
        .flat_map(|table| table.schema.lookup_fields.iter().cloned())
        .collect();
    let curation_columns: BTreeSet<CurationColumn> = rows
        .iter()
        .flat_map(|row| row.curations.keys().cloned())
        .collect();
    (
        lookup_fields.into_iter().collect(),
        curation_columns.into_iter().collect(),
    )
}

/// Write `criterion_curations.csv`: one row per instance, tag sets
/// serialized sorted and `;`-joined.
pub fn write_curated_table(
    path: &Path,
    rows: &[InstanceRow],
    resources: &[ResourceTable],
) -> Result<()> {
    let (lookup_fields, curation_columns) = curated_columns(rows, resources);

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create curated table: {}", path.display()))?;

    let mut header: Vec<String> = BASE_COLUMNS.iter().map(ToString::to_string).collect();
    header.extend(lookup_fields.iter().cloned());
    header.extend(curation_columns.iter().map(CurationColumn::label));
    writer.write_record(&header)?;

    for row in rows {
        let mut record: Vec<String> = vec![
            row.trial_id.to_string(),
            row.direction.to_string(),
            row.criterion_class.to_string(),
        ];
        for field in &lookup_fields {
            record.push(row.field(field).unwrap_or_default().to_string());
        }
        for column in &curation_columns {
            record.push(
                row.curations
                    .get(column)
                    .map(|tags| tags.to_cell())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("flush curated table: {}", path.display()))?;
    Ok(())
}

/// Write `selection_rules.csv`: one row per trial, sorted by trial id.
pub fn write_selection_rules(path: &Path, rules: &[SelectionRule]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create selection rules: {}", path.display()))?;
    writer.write_record(["trialId", "selection_rule"])?;
    for rule in rules {
        writer.write_record([rule.trial_id.as_str(), rule.expression.as_str()])?;
    }
    writer
        .flush()
        .with_context(|| format!("flush selection rules: {}", path.display()))?;
    Ok(())
}
