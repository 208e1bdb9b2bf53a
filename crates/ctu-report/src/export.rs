//! Summary table export with a three-row column header.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::aggregate::SummaryTable;

/// Write the summary as CSV with three header rows (criterion, direction,
/// field). The trial id is the first column; its label sits on the field
/// row so the criterion and direction rows stay blank above it.
pub fn write_summary(summary: &SummaryTable, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("create summary file: {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    let mut criterion_row = vec![String::new()];
    let mut direction_row = vec![String::new()];
    let mut field_row = vec!["trialId".to_string()];
    for column in &summary.columns {
        criterion_row.push(column.criterion.clone());
        direction_row.push(
            column
                .direction
                .map(|direction| direction.as_str().to_string())
                .unwrap_or_default(),
        );
        field_row.push(column.field.clone());
    }
    writer.write_record(&criterion_row)?;
    writer.write_record(&direction_row)?;
    writer.write_record(&field_row)?;

    for (trial_id, cells) in &summary.rows {
        let mut record = vec![trial_id.to_string()];
        for column in &summary.columns {
            record.push(cells.get(column).cloned().unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!(
        file = %path.display(),
        trials = summary.rows.len(),
        columns = summary.columns.len(),
        "wrote summary table"
    );
    Ok(())
}
