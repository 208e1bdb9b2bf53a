//! Outer join of the core field table with per-criterion extraction tables,
//! plus the presentation transforms applied before export.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use ctu_ingest::{csv_files, read_csv_table};
use ctu_model::TrialId;

use crate::columns::ColumnLabel;

const EXTRACTION_SUFFIX: &str = "_extractions.csv";

/// The joined summary: typed column labels in presentation order and one
/// label-to-cell map per trial. Trial ids key the rows; they are not a
/// column themselves.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    pub columns: Vec<ColumnLabel>,
    pub rows: BTreeMap<TrialId, BTreeMap<ColumnLabel, String>>,
}

/// A static Core-field override: external curated data, not derived logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    pub trial_id: TrialId,
    pub field: String,
    pub value: String,
}

fn load_labeled_table(path: &Path, default_criterion: Option<&str>) -> Result<SummaryTable> {
    let (headers, raw_rows) = read_csv_table(path)?;

    let id_column = if headers.iter().any(|header| header == "trialId") {
        "trialId"
    } else if headers.iter().any(|header| header == "nctId") {
        "nctId"
    } else {
        bail!("{} lacks a 'trialId' or 'nctId' column", path.display());
    };

    let labeled_headers: Vec<(String, ColumnLabel)> = headers
        .iter()
        .filter(|header| header.as_str() != id_column && !header.is_empty())
        .map(|header| (header.clone(), ColumnLabel::parse(header, default_criterion)))
        .collect();
    let columns: Vec<ColumnLabel> = labeled_headers
        .iter()
        .map(|(_, label)| label.clone())
        .collect();

    let mut rows: BTreeMap<TrialId, BTreeMap<ColumnLabel, String>> = BTreeMap::new();
    for (number, raw) in raw_rows.iter().enumerate() {
        let id_value = raw.get(id_column).map(String::as_str).unwrap_or("");
        let Ok(trial_id) = TrialId::new(id_value) else {
            warn!(file = %path.display(), row = number + 1, "row without trial id skipped");
            continue;
        };
        let cells = rows.entry(trial_id).or_default();
        for (header, label) in &labeled_headers {
            if let Some(value) = raw.get(header) {
                cells.insert(label.clone(), value.clone());
            }
        }
    }

    Ok(SummaryTable { columns, rows })
}

/// Load the core field table; every column is a Core field with no
/// direction.
pub fn load_core_table(path: &Path) -> Result<SummaryTable> {
    info!(file = %path.display(), "loading core field extractions");
    load_labeled_table(path, None).with_context(|| format!("load core table: {}", path.display()))
}

/// Load every `*_extractions.csv` under `dir`; the file stem supplies the
/// default criterion for `INCL:field`/`EXCL:field` labels.
pub fn load_criterion_tables(dir: &Path) -> Result<Vec<SummaryTable>> {
    let mut tables = Vec::new();
    for path in csv_files(dir, EXTRACTION_SUFFIX)? {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        let stem = file_name
            .strip_suffix(EXTRACTION_SUFFIX)
            .unwrap_or(&file_name);
        info!(file = %file_name, criterion = stem, "loading criterion extractions");
        let table = load_labeled_table(&path, Some(stem))
            .with_context(|| format!("load criterion table: {}", path.display()))?;
        tables.push(table);
    }
    Ok(tables)
}

/// Outer join on trial id; cell maps merge, later tables never overwrite an
/// existing label. Columns end up in fixed presentation order.
pub fn outer_join(tables: Vec<SummaryTable>) -> SummaryTable {
    let mut columns: Vec<ColumnLabel> = Vec::new();
    let mut seen: BTreeSet<ColumnLabel> = BTreeSet::new();
    let mut rows: BTreeMap<TrialId, BTreeMap<ColumnLabel, String>> = BTreeMap::new();

    for table in tables {
        for column in table.columns {
            if seen.insert(column.clone()) {
                columns.push(column);
            }
        }
        for (trial_id, cells) in table.rows {
            let merged = rows.entry(trial_id).or_default();
            for (label, value) in cells {
                merged.entry(label).or_insert(value);
            }
        }
    }

    columns.sort_by_key(ColumnLabel::sort_key);
    SummaryTable { columns, rows }
}

/// Add a `Core`/`curated` flag column and warn about trials that have no
/// curated rows.
pub fn apply_presence_flag(summary: &mut SummaryTable, curated_trials: &BTreeSet<TrialId>) {
    let flag = ColumnLabel::core("curated");
    if !summary.columns.contains(&flag) {
        summary.columns.push(flag.clone());
        summary.columns.sort_by_key(ColumnLabel::sort_key);
    }

    let mut missing = Vec::new();
    for (trial_id, cells) in &mut summary.rows {
        let present = curated_trials.contains(trial_id);
        cells.insert(
            flag.clone(),
            if present { "yes".to_string() } else { String::new() },
        );
        if !present {
            missing.push(trial_id.to_string());
        }
    }
    if !missing.is_empty() {
        warn!(
            count = missing.len(),
            trials = %missing.join(", "),
            "trials without curated rows"
        );
    }
}

/// Apply Core-field overrides; unknown trials are warned about and skipped.
pub fn apply_overrides(summary: &mut SummaryTable, overrides: &[OverrideEntry]) {
    for entry in overrides {
        let Some(cells) = summary.rows.get_mut(&entry.trial_id) else {
            warn!(trial = %entry.trial_id, "override for unknown trial skipped");
            continue;
        };
        let label = ColumnLabel::core(entry.field.clone());
        if !summary.columns.contains(&label) {
            summary.columns.push(label.clone());
            summary.columns.sort_by_key(ColumnLabel::sort_key);
        }
        cells.insert(label, entry.value.clone());
    }
}

/// Drop listed trials entirely.
pub fn apply_removals(summary: &mut SummaryTable, removals: &BTreeSet<TrialId>) {
    let before = summary.rows.len();
    summary.rows.retain(|trial_id, _| !removals.contains(trial_id));
    let dropped = before - summary.rows.len();
    if dropped > 0 {
        info!(dropped, "removed trials listed for removal");
    }
}

/// Drop rows whose `Core`/`interventionName` is empty. Returns
/// (before, after) row counts.
pub fn drop_missing_intervention(summary: &mut SummaryTable) -> (usize, usize) {
    let label = ColumnLabel::core("interventionName");
    let before = summary.rows.len();
    if !summary.columns.contains(&label) {
        warn!("Core/interventionName column not found, empty-intervention filter skipped");
        return (before, before);
    }
    summary.rows.retain(|_, cells| {
        cells
            .get(&label)
            .is_some_and(|value| !value.trim().is_empty())
    });
    let after = summary.rows.len();
    info!(before, after, "filtered rows with empty Core/interventionName");
    (before, after)
}

/// Read `trialId,field,value` override rows.
pub fn load_overrides(path: &Path) -> Result<Vec<OverrideEntry>> {
    let (_, rows) = read_csv_table(path)?;
    let mut overrides = Vec::new();
    for (number, row) in rows.iter().enumerate() {
        let trial = row.get("trialId").map(String::as_str).unwrap_or("");
        let field = row.get("field").map(String::as_str).unwrap_or("");
        let Ok(trial_id) = TrialId::new(trial) else {
            warn!(file = %path.display(), row = number + 1, "override without trial id skipped");
            continue;
        };
        if field.is_empty() {
            warn!(file = %path.display(), row = number + 1, "override without field skipped");
            continue;
        }
        overrides.push(OverrideEntry {
            trial_id,
            field: field.to_string(),
            value: row.get("value").cloned().unwrap_or_default(),
        });
    }
    Ok(overrides)
}

/// Read a removal list: one trial id per line, `#` comments allowed.
pub fn load_removals(path: &Path) -> Result<BTreeSet<TrialId>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read removal list: {}", path.display()))?;
    let mut removals = BTreeSet::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Ok(trial_id) = TrialId::new(line) {
            removals.insert(trial_id);
        }
    }
    Ok(removals)
}
