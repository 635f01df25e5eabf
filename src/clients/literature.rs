//! Literature snippet search client (xDD-style API).
//!
//! The API returns highlight snippets per document under a `success`
//! envelope with a `next_page` URL; an empty `next_page` ends pagination.
//! Pagination is sequential: each page's URL gates the next request.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::extract::SnippetRecord;

use super::http::build_api_client;
use super::{ClientError, SearchStatus};

/// Default snippet search API base URL.
const DEFAULT_BASE_URL: &str = "https://geodeepdive.org/api";

/// Default API route; search terms are only available on snippets.
const DEFAULT_ROUTE: &str = "snippets";

/// Default query parameters for snippet search.
pub const DEFAULT_PARAMS: &str = "full_results&clean&inclusive=true";

// ==================== Search API Response Types ====================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    success: Option<SearchSuccess>,
}

#[derive(Debug, Deserialize)]
struct SearchSuccess {
    #[serde(default)]
    hits: u64,
    #[serde(default)]
    data: Vec<SearchRecord>,
    #[serde(default)]
    next_page: String,
}

#[derive(Debug, Deserialize)]
struct SearchRecord {
    #[serde(rename = "_gddid")]
    document_id: String,
    #[serde(default)]
    doi: String,
    #[serde(default)]
    highlight: Vec<String>,
}

impl From<SearchRecord> for SnippetRecord {
    fn from(record: SearchRecord) -> Self {
        Self {
            document_id: record.document_id,
            document_doi: (!record.doi.is_empty()).then_some(record.doi),
            highlights: record.highlight,
        }
    }
}

// ==================== Outcome Types ====================

/// Result of one page fetch.
#[derive(Debug)]
pub enum PageFetch {
    /// A successful page with its records and the next page's URL, if any.
    Page {
        /// Total hits the API reports for the query.
        hits: u64,
        /// Snippet records on this page.
        records: Vec<SnippetRecord>,
        /// URL of the next page; `None` ends pagination.
        next_page: Option<String>,
    },
    /// 200 response without the expected success envelope.
    NoData(String),
    /// Transport/HTTP failure or malformed body.
    Error(String),
}

/// Accumulated result of a search across all pages (and terms).
#[derive(Debug)]
pub struct SearchOutcome {
    /// Terminal status; callers check this rather than catching errors.
    pub status: SearchStatus,
    /// Human-readable status detail.
    pub message: String,
    /// Total hits summed over successful queries.
    pub hits: u64,
    /// All snippet records accumulated before termination.
    pub records: Vec<SnippetRecord>,
}

impl SearchOutcome {
    fn empty() -> Self {
        Self {
            status: SearchStatus::Success,
            message: "successful response".to_string(),
            hits: 0,
            records: Vec::new(),
        }
    }

    /// Downgrades the outcome status, keeping the most severe seen.
    fn degrade(&mut self, status: SearchStatus, message: String) {
        let severity = |s: SearchStatus| match s {
            SearchStatus::Success => 0,
            SearchStatus::NoData => 1,
            SearchStatus::Error => 2,
        };
        if severity(status) > severity(self.status) {
            self.status = status;
            self.message = message;
        }
    }
}

// ==================== Client ====================

/// Client for the literature snippet search API.
pub struct LiteratureSearchClient {
    client: Client,
    base_url: String,
    route: String,
}

impl LiteratureSearchClient {
    /// Creates a client against the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when HTTP client construction fails.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when HTTP client construction fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = build_api_client().map_err(ClientError::build)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            route: DEFAULT_ROUTE.to_string(),
        })
    }

    /// Builds the first-page query URL for a term.
    #[must_use]
    pub fn query_url(&self, term: &str) -> String {
        format!(
            "{}/{}?term={}&{DEFAULT_PARAMS}",
            self.base_url,
            self.route,
            urlencoding::encode(term)
        )
    }

    /// Searches one term, following pagination to exhaustion.
    ///
    /// The loop terminates on exhausted pagination, a non-success HTTP
    /// status, or a malformed/no-data response body.
    #[tracing::instrument(skip(self))]
    pub async fn search_term(&self, term: &str) -> SearchOutcome {
        let mut outcome = SearchOutcome::empty();
        self.paginate_into(term, &mut outcome).await;
        outcome
    }

    /// Searches every term, accumulating records across terms.
    ///
    /// The outcome carries the most severe status any term hit; records
    /// gathered before a failure are kept.
    #[tracing::instrument(skip(self, terms), fields(term_count = terms.len()))]
    pub async fn search_terms(&self, terms: &[String]) -> SearchOutcome {
        let mut outcome = SearchOutcome::empty();
        for term in terms {
            self.paginate_into(term, &mut outcome).await;
        }
        debug!(
            status = ?outcome.status,
            record_count = outcome.records.len(),
            "literature search finished"
        );
        outcome
    }

    async fn paginate_into(&self, term: &str, outcome: &mut SearchOutcome) {
        let mut next = Some(self.query_url(term));
        let mut first_page = true;
        while let Some(url) = next.take() {
            match self.fetch_page(&url).await {
                PageFetch::Page {
                    hits,
                    records,
                    next_page,
                } => {
                    // Hits are reported per query, not per page; count once.
                    if first_page {
                        outcome.hits += hits;
                        first_page = false;
                    }
                    outcome.records.extend(records);
                    next = next_page;
                }
                PageFetch::NoData(message) => {
                    outcome.degrade(SearchStatus::NoData, message);
                }
                PageFetch::Error(message) => {
                    outcome.degrade(SearchStatus::Error, message);
                }
            }
        }
    }

    /// Fetches a single page.
    pub async fn fetch_page(&self, url: &str) -> PageFetch {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, "literature search request failed");
                return PageFetch::Error(format!("request failed: {error}"));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "literature search returned error status");
            return PageFetch::Error(format!(
                "request returned status code {}",
                status.as_u16()
            ));
        }

        let body = match response.json::<SearchResponse>().await {
            Ok(body) => body,
            Err(error) => {
                warn!(error = %error, "literature search response body malformed");
                return PageFetch::Error(format!("malformed response body: {error}"));
            }
        };

        match body.success {
            Some(success) => PageFetch::Page {
                hits: success.hits,
                records: success.data.into_iter().map(Into::into).collect(),
                next_page: (!success.next_page.is_empty()).then_some(success.next_page),
            },
            None => {
                PageFetch::NoData("request returned no data; verify request is valid".to_string())
            }
        }
    }
}

impl std::fmt::Debug for LiteratureSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiteratureSearchClient")
            .field("base_url", &self.base_url)
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}
