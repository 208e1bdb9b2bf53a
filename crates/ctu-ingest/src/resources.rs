//! Loader for resource lookup tables.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use ctu_model::{
    CriterionClass, CurationColumn, ResourceRow, ResourceSchema, ResourceTable, TagSet,
    normalize_key,
};

use crate::csv_rows::{csv_files, read_csv_table};

const LOOKUP_MARKER: &str = "_lookup_";
const CURATION_MARKER: &str = "_curation_";
const MOVE_TO_COLUMN: &str = "Move_to";

/// Load every `*.csv` under `dir` as a resource lookup table.
///
/// The schema is resolved once per file: the criterion class is the prefix
/// of the first lookup column, lookup keys are normalized lowercase-trimmed
/// and curation cells parse comma-delimited. A table without at least one
/// lookup and one curation column is skipped with a warning, not a fatal
/// error.
pub fn load_resource_tables(dir: &Path) -> Result<Vec<ResourceTable>> {
    let mut tables = Vec::new();
    for path in csv_files(dir, ".csv")? {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        match load_resource_table(&path, &name)? {
            Some(table) => {
                info!(table = %table.name, rows = table.rows.len(), "loaded resource table");
                tables.push(table);
            }
            None => {
                warn!(table = %name, "missing lookup or curation columns, table skipped");
            }
        }
    }
    Ok(tables)
}

fn load_resource_table(path: &Path, name: &str) -> Result<Option<ResourceTable>> {
    let (headers, raw_rows) = read_csv_table(path)?;

    let mut criterion: Option<CriterionClass> = None;
    let mut lookup_columns: Vec<(String, String)> = Vec::new();
    let mut curation_columns: Vec<CurationColumn> = Vec::new();

    for header in &headers {
        if let Some((prefix, field)) = header.split_once(LOOKUP_MARKER) {
            let Ok(prefix) = CriterionClass::new(prefix) else {
                warn!(table = name, column = %header, "lookup column without criterion prefix skipped");
                continue;
            };
            match &criterion {
                None => criterion = Some(prefix),
                Some(existing) if *existing != prefix => {
                    warn!(
                        table = name,
                        column = %header,
                        expected = %existing,
                        "lookup column with mismatched criterion prefix skipped"
                    );
                    continue;
                }
                Some(_) => {}
            }
            lookup_columns.push((header.clone(), field.to_string()));
        } else if header.contains(CURATION_MARKER) {
            match CurationColumn::parse_label(header) {
                Ok(column) => curation_columns.push(column),
                Err(error) => {
                    warn!(table = name, column = %header, %error, "curation column skipped");
                }
            }
        }
    }

    let Some(criterion) = criterion else {
        return Ok(None);
    };
    if lookup_columns.is_empty() || curation_columns.is_empty() {
        return Ok(None);
    }

    let has_move_to = headers.iter().any(|header| header == MOVE_TO_COLUMN);

    let mut rows = Vec::with_capacity(raw_rows.len());
    for raw in &raw_rows {
        let mut keys = BTreeMap::new();
        for (header, field) in &lookup_columns {
            let value = raw.get(header).map(String::as_str).unwrap_or("");
            keys.insert(field.clone(), normalize_key(value));
        }

        let mut tags = BTreeMap::new();
        for column in &curation_columns {
            let cell = raw.get(&column.label()).map(String::as_str).unwrap_or("");
            tags.insert(column.clone(), TagSet::from_comma_cell(cell));
        }

        let move_to = if has_move_to {
            raw.get(MOVE_TO_COLUMN)
                .map(String::as_str)
                .and_then(|target| CriterionClass::new(target).ok())
        } else {
            None
        };

        rows.push(ResourceRow {
            keys,
            tags,
            move_to,
        });
    }

    let schema = ResourceSchema {
        criterion,
        lookup_fields: lookup_columns.into_iter().map(|(_, field)| field).collect(),
        tag_fields: curation_columns.into_iter().map(|column| column.tag).collect(),
    };

    Ok(Some(ResourceTable {
        name: name.to_string(),
        schema,
        rows,
    }))
}
