//! Subcommand implementations.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use ctu_curate::{
    LookupStats, apply_curation, build_selection_rules, write_curated_table,
    write_selection_rules,
};
use ctu_extract::{ExtractSummary, extract_trials, write_field_extractions};
use ctu_ingest::{load_instance_tables, load_resource_tables, read_csv_rows};
use ctu_model::TrialId;
use ctu_registry::{
    DownloadSummary, RegistryClient, default_query_terms, download_all, read_corpus, write_corpus,
};
use ctu_report::{
    apply_overrides, apply_presence_flag, apply_removals, drop_missing_intervention,
    load_core_table, load_criterion_tables, load_overrides, load_removals, outer_join,
    write_summary,
};

use crate::cli::{AggregateArgs, CurateArgs, DownloadArgs, ExtractArgs};

pub const CORPUS_FILE: &str = "studies.ndjson";
pub const CURATED_FILE: &str = "criterion_curations.csv";
pub const RULES_FILE: &str = "selection_rules.csv";
pub const SUMMARY_FILE: &str = "trial_summary.csv";

pub struct DownloadOutcome {
    pub summary: DownloadSummary,
    pub corpus_path: PathBuf,
}

pub struct ExtractOutcome {
    pub summary: ExtractSummary,
    pub output_file: PathBuf,
}

pub struct CurateOutcome {
    pub instances: usize,
    pub resource_tables: usize,
    pub stats: Vec<LookupStats>,
    pub rules: usize,
    pub nonempty_rules: usize,
    pub curated_path: PathBuf,
    pub rules_path: PathBuf,
}

pub struct AggregateOutcome {
    pub trials: usize,
    pub columns: usize,
    pub dropped_missing_intervention: usize,
    pub output_path: PathBuf,
}

pub fn run_download(args: &DownloadArgs) -> Result<DownloadOutcome> {
    let span = info_span!("download", output_dir = %args.output_dir.display());
    let _guard = span.enter();

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("create output directory: {}", args.output_dir.display()))?;
    let client = RegistryClient::new(args.page_size)?;
    let terms = if args.query_term.is_empty() {
        default_query_terms()
    } else {
        args.query_term.clone()
    };
    info!(stages = terms.len(), page_size = client.page_size(), "starting download");

    let (studies, summary) = download_all(&client, &terms)?;
    let corpus_path = args.output_dir.join(CORPUS_FILE);
    write_corpus(&corpus_path, &studies)?;
    info!(file = %corpus_path.display(), studies = studies.len(), "wrote corpus");

    Ok(DownloadOutcome {
        summary,
        corpus_path,
    })
}

pub fn run_extract(args: &ExtractArgs) -> Result<ExtractOutcome> {
    let span = info_span!("extract", corpus = %args.corpus.display());
    let _guard = span.enter();

    ensure_parent_dir(&args.output_file)?;
    let studies = read_corpus(&args.corpus)?;
    let (rows, summary) = extract_trials(&studies);
    write_field_extractions(&args.output_file, &rows)?;
    info!(
        read = summary.read,
        extracted = summary.extracted,
        retained = summary.retained,
        file = %args.output_file.display(),
        "wrote field extractions"
    );

    Ok(ExtractOutcome {
        summary,
        output_file: args.output_file.clone(),
    })
}

pub fn run_curate(args: &CurateArgs) -> Result<CurateOutcome> {
    let span = info_span!("curate", instance_dir = %args.instance_dir.display());
    let _guard = span.enter();

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("create output directory: {}", args.output_dir.display()))?;
    let rows = load_instance_tables(&args.instance_dir)?;
    let resources = load_resource_tables(&args.resource_dir)?;
    if resources.is_empty() {
        warn!(dir = %args.resource_dir.display(), "no usable resource tables found");
    }

    let (curated, stats) = apply_curation(&rows, &resources);
    let curated_path = args.output_dir.join(CURATED_FILE);
    write_curated_table(&curated_path, &curated, &resources)?;

    let rules = build_selection_rules(&curated);
    let nonempty_rules = rules.iter().filter(|rule| !rule.is_empty()).count();
    let rules_path = args.output_dir.join(RULES_FILE);
    write_selection_rules(&rules_path, &rules)?;
    info!(
        instances = rows.len(),
        tables = resources.len(),
        rules = rules.len(),
        nonempty_rules,
        "curation finished"
    );

    Ok(CurateOutcome {
        instances: rows.len(),
        resource_tables: resources.len(),
        stats,
        rules: rules.len(),
        nonempty_rules,
        curated_path,
        rules_path,
    })
}

pub fn run_aggregate(args: &AggregateArgs) -> Result<AggregateOutcome> {
    let span = info_span!("aggregate", core_file = %args.core_file.display());
    let _guard = span.enter();

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("create output directory: {}", args.output_dir.display()))?;
    let mut tables = vec![load_core_table(&args.core_file)?];
    tables.extend(load_criterion_tables(&args.criterion_dir)?);
    let mut summary = outer_join(tables);

    let (before, after) = drop_missing_intervention(&mut summary);
    if let Some(path) = &args.overrides {
        apply_overrides(&mut summary, &load_overrides(path)?);
    }
    if let Some(path) = &args.removals {
        apply_removals(&mut summary, &load_removals(path)?);
    }
    let curated_trials = curated_trial_ids(&args.curated_file)?;
    apply_presence_flag(&mut summary, &curated_trials);

    let output_path = args.output_dir.join(SUMMARY_FILE);
    write_summary(&summary, &output_path)?;

    Ok(AggregateOutcome {
        trials: summary.rows.len(),
        columns: summary.columns.len(),
        dropped_missing_intervention: before - after,
        output_path,
    })
}

/// Trial ids that carry at least one curated instance row.
fn curated_trial_ids(path: &Path) -> Result<BTreeSet<TrialId>> {
    let rows = read_csv_rows(path)?;
    let mut trials = BTreeSet::new();
    for row in &rows {
        let id = row.get("trialId").map(String::as_str).unwrap_or("");
        if let Ok(trial_id) = TrialId::new(id) {
            trials.insert(trial_id);
        }
    }
    Ok(trials)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory: {}", parent.display()))?;
    }
    Ok(())
}
