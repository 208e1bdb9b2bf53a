//! Registry download client for the ClinicalTrials.gov v2 REST API.
//!
//! Pages through a search query, retries transient failures with exponential
//! backoff, deduplicates the accumulated studies by NCT id and persists the
//! result as a newline-delimited JSON corpus. Accumulation and dedup are
//! pure functions over parsed pages so they can be exercised without a
//! network.

pub mod client;
pub mod corpus;
pub mod download;
pub mod error;
pub mod page;
pub mod query;

pub use client::RegistryClient;
pub use corpus::{read_corpus, write_corpus};
pub use download::{DownloadSummary, StageSummary, collect_studies, dedup_by_nct_id, download_all, nct_id};
pub use error::{RegistryError, Result};
pub use page::SearchPage;
pub use query::default_query_terms;
