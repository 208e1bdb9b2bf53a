//! Lookup/curation engine: match instance rows against resource tables and
//! union curated tag sets onto them.

use std::collections::HashMap;

use tracing::{info, warn};

use ctu_model::{CurationColumn, InstanceRow, ResourceTable, normalize_key};

use crate::TYPE_TAG;

/// Per-lookup match accounting, surfaced in the CLI summary.
#[derive(Debug, Clone)]
pub struct LookupStats {
    pub table: String,
    pub lookup_field: String,
    pub matched_rows: usize,
    pub union_events: usize,
}

/// Apply every resource table to the combined instance rows.
///
/// For each lookup field of each table, instance rows whose criterion class
/// matches the table's criterion are joined on the normalized field value;
/// every matching resource row unions its tag sets into the instance row's
/// output column. `Move_to` redirects the output to the target criterion's
/// namespace. Matches are additive across tables, lookup fields and
/// resource rows. A curation field named `type` is never unioned.
///
/// Inputs are not mutated; the augmented rows are returned together with
/// per-lookup statistics.
pub fn apply_curation(
    rows: &[InstanceRow],
    resources: &[ResourceTable],
) -> (Vec<InstanceRow>, Vec<LookupStats>) {
    let mut curated: Vec<InstanceRow> = rows.to_vec();
    let mut stats = Vec::new();

    for table in resources {
        info!(table = %table.name, "applying resource table");

        for lookup_field in &table.schema.lookup_fields {
            // Key index over this table's rows, empty keys skipped.
            let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
            for (row_idx, resource_row) in table.rows.iter().enumerate() {
                let Some(key) = resource_row.keys.get(lookup_field) else {
                    continue;
                };
                if key.is_empty() {
                    continue;
                }
                index.entry(key.as_str()).or_default().push(row_idx);
            }

            let field_present = curated
                .iter()
                .filter(|row| row.criterion_class == table.schema.criterion)
                .any(|row| row.field(lookup_field).is_some());
            if !field_present {
                warn!(
                    table = %table.name,
                    field = %lookup_field,
                    "no instance row carries the lookup field, lookup skipped"
                );
                continue;
            }

            let mut matched_rows = 0usize;
            let mut union_events = 0usize;

            for row in curated
                .iter_mut()
                .filter(|row| row.criterion_class == table.schema.criterion)
            {
                let Some(value) = row.field(lookup_field) else {
                    continue;
                };
                let key = normalize_key(value);
                if key.is_empty() {
                    continue;
                }
                let Some(hits) = index.get(key.as_str()) else {
                    continue;
                };

                matched_rows += 1;
                for &hit_idx in hits {
                    let hit = &table.rows[hit_idx];
                    for (column, tags) in &hit.tags {
                        if tags.is_empty() || column.tag == TYPE_TAG {
                            continue;
                        }
                        let output_column = match &hit.move_to {
                            Some(target) => CurationColumn::new(target.clone(), column.tag.clone()),
                            None => column.clone(),
                        };
                        row.union_curation(output_column, tags);
                        union_events += 1;
                    }
                }
            }

            info!(
                table = %table.name,
                field = %lookup_field,
                matched_rows,
                union_events,
                "lookup applied"
            );
            stats.push(LookupStats {
                table: table.name.clone(),
                lookup_field: lookup_field.clone(),
                matched_rows,
                union_events,
            });
        }
    }

    (curated, stats)
}
