//! Blocking HTTP client for the registry search endpoint.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, warn};

use crate::error::{RegistryError, Result};
use crate::page::SearchPage;

/// Registry search endpoint.
pub const API_BASE_URL: &str = "https://clinicaltrials.gov/api/v2/studies";

/// Maximum page size the registry accepts.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause between successful page fetches, to respect rate limits.
pub const PAUSE_BETWEEN_PAGES: Duration = Duration::from_millis(500);

/// Attempts per page before the error propagates.
const MAX_ATTEMPTS: u32 = 8;

/// Base delay for exponential backoff (doubles per retry).
const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Client for the registry search API.
pub struct RegistryClient {
    client: Client,
    base_url: String,
    page_size: usize,
}

impl RegistryClient {
    /// Create a client against the public registry endpoint.
    pub fn new(page_size: usize) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    /// Override the endpoint (used by tests against a local server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch one page, retrying transient failures with exponential backoff.
    ///
    /// Exhausting the retry budget surfaces the last error; there is no
    /// partial-result salvage.
    pub fn fetch_page(&self, query_term: &str, page_token: Option<&str>) -> Result<SearchPage> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_page_once(query_term, page_token) {
                Ok(page) => return Ok(page),
                Err(error) if attempt < MAX_ATTEMPTS && error.is_retryable() => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        attempt,
                        max_attempts = MAX_ATTEMPTS,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "page fetch failed, retrying"
                    );
                    thread::sleep(delay);
                }
                Err(error) if attempt >= MAX_ATTEMPTS => {
                    return Err(RegistryError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(error),
                    });
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn fetch_page_once(&self, query_term: &str, page_token: Option<&str>) -> Result<SearchPage> {
        let page_size = self.page_size.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("format", "json"),
            ("countTotal", "true"),
            ("pageSize", &page_size),
            ("query.term", query_term),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        debug!(page_token = page_token.unwrap_or("<first>"), "fetching page");
        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(RegistryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json()?)
    }
}

/// Delay before retry number `attempt + 1`: base * 2^(attempt - 1).
fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_BASE * 2u32.saturating_pow(attempt.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(4), Duration::from_secs(8));
    }

    #[test]
    fn page_size_is_capped() {
        let client = RegistryClient::new(5000).unwrap();
        assert_eq!(client.page_size(), MAX_PAGE_SIZE);
    }
}
