use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::ReaderBuilder;

/// Read a CSV file into ordered maps of trimmed header to trimmed cell.
///
/// Headers are BOM-stripped; blank cells stay as empty strings so callers
/// can distinguish "column absent" from "cell empty".
pub fn read_csv_rows(path: &Path) -> Result<Vec<BTreeMap<String, String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read headers: {}", path.display()))?
        .clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim()
                .trim_matches('\u{feff}')
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Like [`read_csv_rows`], but also returns the headers in file order.
pub fn read_csv_table(path: &Path) -> Result<(Vec<String>, Vec<BTreeMap<String, String>>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("read headers: {}", path.display()))?
        .iter()
        .map(|header| header.trim().trim_matches('\u{feff}').to_string())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers.get(idx).cloned().unwrap_or_default();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok((headers, rows))
}

/// CSV files directly under `dir` whose name ends with `suffix`
/// (case-insensitive extension), sorted for deterministic load order.
pub fn csv_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read directory: {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read directory entry: {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if name.to_lowercase().ends_with(&suffix.to_lowercase()) {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "ctu-ingest-{name}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn trims_headers_and_cells() {
        let dir = temp_dir("rows");
        let path = dir.join("table.csv");
        std::fs::write(&path, "\u{feff}trialId , value\n NCT1 , hello \n").unwrap();
        let rows = read_csv_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["trialId"], "NCT1");
        assert_eq!(rows[0]["value"], "hello");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn csv_files_filters_by_suffix() {
        let dir = temp_dir("glob");
        std::fs::write(dir.join("a_instances.csv"), "trialId\n").unwrap();
        std::fs::write(dir.join("b.csv"), "trialId\n").unwrap();
        std::fs::write(dir.join("notes.txt"), "").unwrap();
        let instances = csv_files(&dir, "_instances.csv").unwrap();
        assert_eq!(instances.len(), 1);
        let all = csv_files(&dir, ".csv").unwrap();
        assert_eq!(all.len(), 2);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
