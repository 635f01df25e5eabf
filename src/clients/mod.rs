//! External API clients consumed by the pipeline.
//!
//! - [`LiteratureSearchClient`] - snippet search over the literature corpus
//!   with sequential `next_page` pagination
//! - [`EventsClient`] - citation-events search with cursor pagination
//! - [`http`] - shared HTTP client construction policy
//!
//! Expected failures (transport errors, no-data responses) surface as
//! explicit status values on each outcome, never as errors the caller must
//! catch; callers check the status field.

pub mod http;

mod events;
mod literature;

pub use events::{
    Event, EventFilter, EventRelation, EventsClient, EventsOutcome, related_pairs,
};
pub use literature::{LiteratureSearchClient, PageFetch, SearchOutcome};

use serde::Serialize;
use thiserror::Error;

/// Terminal status of a search against an external API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// At least one page returned data and no page failed.
    Success,
    /// The API answered but without the expected success envelope.
    NoData,
    /// Transport/HTTP failure (non-200 status, connection failure,
    /// malformed body).
    Error,
}

/// Errors that can occur constructing an API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be built.
    #[error("HTTP client construction failed: {source}")]
    Build {
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// Creates a build error from a reqwest error.
    #[must_use]
    pub fn build(source: reqwest::Error) -> Self {
        Self::Build { source }
    }
}
