//! Newline-delimited JSON corpus of downloaded studies.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

/// Write one study object per line.
pub fn write_corpus(path: &Path, studies: &[Value]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("create corpus file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for study in studies {
        serde_json::to_writer(&mut writer, study)
            .with_context(|| format!("serialize study to corpus: {}", path.display()))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the corpus back. Blank lines are ignored; a malformed line is
/// skipped with a warning rather than aborting the run.
pub fn read_corpus(path: &Path) -> Result<Vec<Value>> {
    let file = File::open(path)
        .with_context(|| format!("open corpus file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut studies = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read corpus line: {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(study) => studies.push(study),
            Err(error) => {
                warn!(line = number + 1, %error, "malformed corpus line skipped");
            }
        }
    }
    Ok(studies)
}
