//! Citation events client (Crossref event-data-style API).
//!
//! Events relate a subject (citing publication) to an object (cited work)
//! through a relation type. Pagination is cursor-based: each response
//! carries a `next-cursor`, and a null cursor terminates the loop.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::doi::canonicalize;
use crate::reconcile::RelationPair;

use super::http::build_api_client;
use super::{ClientError, SearchStatus};

/// Default events API base URL.
const DEFAULT_BASE_URL: &str = "https://api.eventdata.crossref.org/v1/events";

/// Rows requested per page.
const DEFAULT_ROWS: u32 = 10_000;

/// DOI URL prefix used by the events API in subject/object ids.
const DOI_URL_PREFIX: &str = "https://doi.org/";

/// Relation the pipeline consumes; other event relation types are skipped.
const REFERENCES_RELATION: &str = "references";

/// Which filter the events query uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    /// Query a specific DOI (`obj-id`).
    Doi,
    /// Query a DOI prefix (`obj-id.prefix`).
    DoiPrefix,
}

// ==================== Events API Response Types ====================

/// One citation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier.
    #[serde(default)]
    pub id: String,
    /// Object of the relation, a `https://doi.org/...` URL for DOI events.
    #[serde(default)]
    pub obj_id: String,
    /// Subject of the relation.
    #[serde(default)]
    pub subj_id: String,
    /// Relation type, e.g. `references`.
    #[serde(default)]
    pub relation_type_id: String,
    /// Upstream source that produced the event.
    #[serde(default)]
    pub source_id: String,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct EventsMessage {
    #[serde(rename = "total-results", default)]
    total_results: u64,
    #[serde(default)]
    events: Vec<Event>,
    #[serde(rename = "next-cursor")]
    next_cursor: Option<String>,
}

/// Accumulated result of an events search across all cursor pages.
#[derive(Debug)]
pub struct EventsOutcome {
    /// Terminal status; callers check this rather than catching errors.
    pub status: SearchStatus,
    /// Human-readable status detail.
    pub message: String,
    /// Total results the API reports for the query.
    pub hits: u64,
    /// All events accumulated before termination.
    pub events: Vec<Event>,
}

/// A publication-to-DOI relation extracted from an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRelation {
    /// Event identifier.
    pub event_id: String,
    /// Canonicalized DOI of the citing publication (event subject).
    pub subject_doi: String,
    /// Canonicalized DOI of the cited work (event object).
    pub object_doi: String,
    /// Upstream source that produced the event.
    pub source: String,
}

impl EventRelation {
    /// Projects the relation to a reconciler pair: publication as subject,
    /// cited DOI as object.
    #[must_use]
    pub fn to_pair(&self) -> RelationPair {
        RelationPair::new(self.subject_doi.clone(), self.object_doi.clone())
    }
}

// ==================== Client ====================

/// Client for the citation events API.
pub struct EventsClient {
    client: Client,
    base_url: String,
    mailto: String,
}

impl EventsClient {
    /// Creates a client against the production API.
    ///
    /// `mailto` is the contact email the API operator requests with every
    /// query.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when HTTP client construction fails.
    pub fn new(mailto: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_base_url(mailto, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when HTTP client construction fails.
    pub fn with_base_url(
        mailto: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let client = build_api_client().map_err(ClientError::build)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            mailto: mailto.into(),
        })
    }

    /// Builds the query URL for a term and filter, without a cursor.
    #[must_use]
    pub fn query_url(&self, term: &str, filter: EventFilter) -> String {
        let term = term.to_uppercase();
        let filter_param = match filter {
            EventFilter::Doi => "obj-id",
            EventFilter::DoiPrefix => "obj-id.prefix",
        };
        format!(
            "{}?mailto={}&rows={DEFAULT_ROWS}&{filter_param}={}",
            self.base_url,
            urlencoding::encode(&self.mailto),
            urlencoding::encode(&term)
        )
    }

    /// Searches events for a term, following the cursor to exhaustion.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, term: &str, filter: EventFilter) -> EventsOutcome {
        let base_query = self.query_url(term, filter);
        let mut outcome = EventsOutcome {
            status: SearchStatus::Success,
            message: "successful response".to_string(),
            hits: 0,
            events: Vec::new(),
        };

        let mut next = Some(base_query.clone());
        while let Some(url) = next.take() {
            let response = match self.client.get(&url).send().await {
                Ok(response) => response,
                Err(error) => {
                    warn!(error = %error, "events request failed");
                    outcome.status = SearchStatus::Error;
                    outcome.message = format!("request failed: {error}");
                    break;
                }
            };

            let status = response.status();
            if !status.is_success() {
                warn!(status = status.as_u16(), "events request returned error status");
                outcome.status = SearchStatus::Error;
                outcome.message =
                    format!("request returned status code {}", status.as_u16());
                break;
            }

            let body = match response.json::<EventsResponse>().await {
                Ok(body) => body,
                Err(error) => {
                    warn!(error = %error, "events response body malformed");
                    outcome.status = SearchStatus::Error;
                    outcome.message = format!("malformed response body: {error}");
                    break;
                }
            };

            if body.status != "ok" {
                outcome.status = SearchStatus::NoData;
                outcome.message = format!("failed request: {}", body.message);
                break;
            }

            let message: EventsMessage = match serde_json::from_value(body.message) {
                Ok(message) => message,
                Err(error) => {
                    warn!(error = %error, "events message envelope malformed");
                    outcome.status = SearchStatus::Error;
                    outcome.message = format!("malformed message envelope: {error}");
                    break;
                }
            };

            outcome.hits = message.total_results;
            outcome.events.extend(message.events);
            next = message
                .next_cursor
                .map(|cursor| format!("{base_query}&cursor={}", urlencoding::encode(&cursor)));
        }

        debug!(
            status = ?outcome.status,
            event_count = outcome.events.len(),
            "events search finished"
        );
        outcome
    }
}

impl std::fmt::Debug for EventsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventsClient")
            .field("base_url", &self.base_url)
            .field("mailto", &self.mailto)
            .finish_non_exhaustive()
    }
}

/// Extracts publication/DOI relations from events.
///
/// Keeps only `references` events whose subject and object ids are both
/// `https://doi.org/` URLs; DOIs are canonicalized so they compare equal to
/// extraction output downstream.
#[must_use]
pub fn related_pairs(events: &[Event]) -> Vec<EventRelation> {
    events
        .iter()
        .filter(|event| {
            event.relation_type_id == REFERENCES_RELATION
                && event.obj_id.starts_with(DOI_URL_PREFIX)
                && event.subj_id.starts_with(DOI_URL_PREFIX)
        })
        .map(|event| EventRelation {
            event_id: event.id.clone(),
            subject_doi: canonicalize(&event.subj_id),
            object_doi: canonicalize(&event.obj_id),
            source: event.source_id.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, subj: &str, obj: &str, relation: &str) -> Event {
        Event {
            id: id.to_string(),
            obj_id: obj.to_string(),
            subj_id: subj.to_string(),
            relation_type_id: relation.to_string(),
            source_id: "crossref".to_string(),
        }
    }

    #[test]
    fn test_related_pairs_keeps_references_between_dois() {
        let events = vec![event(
            "66b96593",
            "https://doi.org/10.1111/eva.12645",
            "https://doi.org/10.6084/m9.figshare.5234068",
            "references",
        )];
        let relations = related_pairs(&events);
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].subject_doi, "10.1111/EVA.12645");
        assert_eq!(relations[0].object_doi, "10.6084/M9.FIGSHARE.5234068");
        assert_eq!(relations[0].source, "crossref");
    }

    #[test]
    fn test_related_pairs_skips_other_relation_types() {
        let events = vec![event(
            "e1",
            "https://doi.org/10.1111/eva.12645",
            "https://doi.org/10.6084/m9.figshare.5234068",
            "discusses",
        )];
        assert!(related_pairs(&events).is_empty());
    }

    #[test]
    fn test_related_pairs_skips_non_doi_ids() {
        let events = vec![event(
            "e2",
            "https://twitter.com/some/status",
            "https://doi.org/10.6084/m9.figshare.5234068",
            "references",
        )];
        assert!(related_pairs(&events).is_empty());
    }

    #[test]
    fn test_query_url_doi_prefix_filter() {
        let client = EventsClient::with_base_url("dev@example.com", "https://example.org/events")
            .expect("client builds");
        let url = client.query_url("10.5066", EventFilter::DoiPrefix);
        assert_eq!(
            url,
            "https://example.org/events?mailto=dev%40example.com&rows=10000&obj-id.prefix=10.5066"
        );
    }

    #[test]
    fn test_event_relation_to_pair_orientation() {
        let relation = EventRelation {
            event_id: "e3".to_string(),
            subject_doi: "10.1111/EVA.12645".to_string(),
            object_doi: "10.5066/P9IGEC9G".to_string(),
            source: "crossref".to_string(),
        };
        let pair = relation.to_pair();
        assert_eq!(pair.subject_doi, "10.1111/EVA.12645");
        assert_eq!(pair.object_doi, "10.5066/P9IGEC9G");
    }
}
