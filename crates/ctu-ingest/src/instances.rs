//! Loader for per-criterion instance extraction files.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use ctu_model::{CriterionClass, CurationColumn, Direction, InstanceRow, TagSet, TrialId};

use crate::csv_rows::{csv_files, read_csv_rows};

const INSTANCE_SUFFIX: &str = "_instances.csv";
const TRIAL_ID_COLUMN: &str = "trialId";
const DIRECTION_COLUMN: &str = "Incl/Excl";

/// Load every `*_instances.csv` under `dir` into one combined instance list.
///
/// The criterion class is the file stem minus the suffix. Rows without a
/// trial id are skipped with a warning. Columns that already follow the
/// `_curation_` convention (re-ingesting curated output) parse as
/// semicolon-delimited tag sets; everything else becomes a free-text field.
///
/// An empty directory is an invariant violation: the curation run has
/// nothing to operate on.
pub fn load_instance_tables(dir: &Path) -> Result<Vec<InstanceRow>> {
    let files = csv_files(dir, INSTANCE_SUFFIX)?;
    if files.is_empty() {
        bail!("no *_instances.csv files found in {}", dir.display());
    }

    let mut combined = Vec::new();
    for path in files {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        let stem = file_name
            .strip_suffix(INSTANCE_SUFFIX)
            .unwrap_or(&file_name);
        let criterion = CriterionClass::new(stem)
            .with_context(|| format!("criterion class from file name: {file_name}"))?;

        let rows = read_csv_rows(&path)?;
        let mut loaded = 0usize;
        for (number, row) in rows.iter().enumerate() {
            let trial_id = row.get(TRIAL_ID_COLUMN).map(String::as_str).unwrap_or("");
            let Ok(trial_id) = TrialId::new(trial_id) else {
                warn!(
                    file = %file_name,
                    row = number + 1,
                    "instance row without trial id skipped"
                );
                continue;
            };
            let direction = row
                .get(DIRECTION_COLUMN)
                .map(|value| Direction::from_field(value))
                .unwrap_or_default();

            let mut instance = InstanceRow::new(trial_id, direction, criterion.clone());
            for (column, value) in row {
                if column == TRIAL_ID_COLUMN || column == DIRECTION_COLUMN {
                    continue;
                }
                if column.contains("_curation_") {
                    match CurationColumn::parse_label(column) {
                        Ok(curation_column) => {
                            instance.union_curation(
                                curation_column,
                                &TagSet::from_semicolon_cell(value),
                            );
                        }
                        Err(error) => {
                            warn!(file = %file_name, column, %error, "curation column skipped");
                        }
                    }
                } else if !column.is_empty() {
                    instance.fields.insert(column.clone(), value.clone());
                }
            }
            combined.push(instance);
            loaded += 1;
        }
        info!(criterion = %criterion, rows = loaded, "loaded instance table");
    }

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "ctu-instances-{name}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn tags_rows_with_criterion_class_from_file_name() {
        let dir = temp_dir("load");
        std::fs::write(
            dir.join("PrimaryTumorCriterion_instances.csv"),
            "trialId,Incl/Excl,tumor_type\nNCT1,INCL,melanoma\nNCT2,EXCL,nsclc\n,INCL,orphan\n",
        )
        .unwrap();
        let rows = load_instance_tables(&dir).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].criterion_class.as_str(), "PrimaryTumorCriterion");
        assert_eq!(rows[0].direction, Direction::Incl);
        assert_eq!(rows[0].field("tumor_type"), Some("melanoma"));
        assert_eq!(rows[1].direction, Direction::Excl);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn reingests_serialized_curation_columns() {
        let dir = temp_dir("curated");
        std::fs::write(
            dir.join("GeneAlterationCriterion_instances.csv"),
            "trialId,Incl/Excl,GeneAlterationCriterion_curation_gene\nNCT1,INCL,EGFR;KRAS\n",
        )
        .unwrap();
        let rows = load_instance_tables(&dir).unwrap();
        let (column, tags) = rows[0].curations.iter().next().unwrap();
        assert_eq!(column.tag, "gene");
        assert_eq!(tags.to_cell(), "EGFR;KRAS");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_directory_is_fatal() {
        let dir = temp_dir("empty");
        assert!(load_instance_tables(&dir).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
