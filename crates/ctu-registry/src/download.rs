//! Multi-stage paged download with cross-stage deduplication.

use std::collections::BTreeSet;
use std::thread;

use serde_json::Value;
use tracing::{debug, info};

use crate::client::{PAUSE_BETWEEN_PAGES, RegistryClient};
use crate::error::Result;
use crate::page::SearchPage;

/// Per-query-stage accounting, surfaced in the CLI summary.
#[derive(Debug, Clone)]
pub struct StageSummary {
    pub stage: usize,
    pub pages: usize,
    pub records: usize,
    pub reported_total: Option<u64>,
}

/// Whole-download accounting.
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    pub stages: Vec<StageSummary>,
    pub raw_count: usize,
    pub unique_count: usize,
}

/// The registry identifier of one study object, if present.
pub fn nct_id(study: &Value) -> Option<&str> {
    study
        .get("protocolSection")?
        .get("identificationModule")?
        .get("nctId")?
        .as_str()
}

/// Flatten pages into their studies, preserving page order.
pub fn collect_studies<I>(pages: I) -> Vec<Value>
where
    I: IntoIterator<Item = SearchPage>,
{
    pages.into_iter().flat_map(|page| page.studies).collect()
}

/// Deduplicate studies by NCT id: first occurrence wins, order preserved.
///
/// Studies without an id cannot be joined downstream and are dropped.
pub fn dedup_by_nct_id(studies: Vec<Value>) -> Vec<Value> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut unique = Vec::with_capacity(studies.len());
    for study in studies {
        let Some(id) = nct_id(&study) else {
            debug!("study without NCT id skipped");
            continue;
        };
        if seen.insert(id.to_string()) {
            unique.push(study);
        }
    }
    unique
}

/// Run every query stage to exhaustion and return the deduplicated studies.
///
/// A page-fetch failure (after the client's retry budget) aborts the whole
/// download; there is no partial-result salvage.
pub fn download_all(
    client: &RegistryClient,
    query_terms: &[String],
) -> Result<(Vec<Value>, DownloadSummary)> {
    let mut all_studies: Vec<Value> = Vec::new();
    let mut stages = Vec::with_capacity(query_terms.len());

    for (index, query_term) in query_terms.iter().enumerate() {
        let stage = index + 1;
        info!(stage, total_stages = query_terms.len(), "starting query stage");

        let mut reported_total = None;
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;
        let mut records = 0usize;

        loop {
            let page = client.fetch_page(query_term, page_token.as_deref())?;
            if reported_total.is_none() {
                reported_total = page.total_count;
            }
            pages += 1;
            records += page.studies.len();
            info!(
                stage,
                page = pages,
                on_page = page.studies.len(),
                reported_total = reported_total.unwrap_or(0),
                accumulated = all_studies.len() + records,
                "fetched page"
            );

            let next = page.next_page_token.clone();
            all_studies.extend(page.studies);
            match next {
                Some(token) => {
                    page_token = Some(token);
                    thread::sleep(PAUSE_BETWEEN_PAGES);
                }
                None => break,
            }
        }

        stages.push(StageSummary {
            stage,
            pages,
            records,
            reported_total,
        });
    }

    let raw_count = all_studies.len();
    let unique = dedup_by_nct_id(all_studies);
    info!(raw = raw_count, unique = unique.len(), "finished all query stages");

    let summary = DownloadSummary {
        stages,
        raw_count,
        unique_count: unique.len(),
    };
    Ok((unique, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn study(id: &str) -> Value {
        json!({
            "protocolSection": {
                "identificationModule": { "nctId": id, "briefTitle": format!("Trial {id}") }
            }
        })
    }

    #[test]
    fn nct_id_reads_nested_path() {
        assert_eq!(nct_id(&study("NCT0001")), Some("NCT0001"));
        assert_eq!(nct_id(&json!({})), None);
    }

    #[test]
    fn duplicate_across_pages_collapses() {
        let pages = vec![
            SearchPage {
                studies: vec![study("NCT0001"), study("NCT0002")],
                total_count: Some(3),
                next_page_token: Some("t".to_string()),
            },
            SearchPage {
                studies: vec![study("NCT0002"), study("NCT0003")],
                total_count: None,
                next_page_token: None,
            },
        ];
        let raw = collect_studies(pages);
        assert_eq!(raw.len(), 4);
        let unique = dedup_by_nct_id(raw);
        let ids: Vec<&str> = unique.iter().filter_map(nct_id).collect();
        assert_eq!(ids, vec!["NCT0001", "NCT0002", "NCT0003"]);
    }

    #[test]
    fn studies_without_id_are_dropped() {
        let unique = dedup_by_nct_id(vec![study("NCT0001"), json!({"other": 1})]);
        assert_eq!(unique.len(), 1);
    }
}
