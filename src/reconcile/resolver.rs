//! DOI resolvability probing.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::clients::ClientError;
use crate::clients::http::build_probe_client;
use crate::doi::DOI_BASE_URL;

/// Resolvability collaborator for the reconciler.
///
/// Uses `async_trait` so reconciliation can hold a `dyn DoiResolver`; tests
/// substitute canned implementations.
#[async_trait]
pub trait DoiResolver: Send + Sync {
    /// Returns true when the DOI is registered and redirects on dereference.
    async fn resolves(&self, doi: &str) -> bool;
}

/// Probes `https://doi.org/<DOI>` with an HTTP HEAD request.
///
/// The success criterion is a status of exactly 302. The handle proxy
/// answers registered DOIs with a found-redirect; a 301 or other 3xx is
/// treated as not resolving under current policy. Redirects are never
/// followed, so the literal status is observed.
pub struct HttpDoiResolver {
    client: Client,
    base_url: String,
}

impl HttpDoiResolver {
    /// Creates a resolver probing against `doi.org`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when HTTP client construction fails.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(DOI_BASE_URL)
    }

    /// Creates a resolver with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when HTTP client construction fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = build_probe_client().map_err(ClientError::build)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl std::fmt::Debug for HttpDoiResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDoiResolver")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DoiResolver for HttpDoiResolver {
    #[tracing::instrument(skip(self), fields(doi = %doi))]
    async fn resolves(&self, doi: &str) -> bool {
        let url = format!("{}/{doi}", self.base_url);
        match self.client.head(&url).send().await {
            Ok(response) => {
                let status = response.status();
                let resolves = status == StatusCode::FOUND;
                debug!(status = status.as_u16(), resolves, "DOI resolution probe");
                resolves
            }
            Err(error) => {
                // A transport failure classifies this DOI unresolved; it
                // must not abort the surrounding batch.
                warn!(error = %error, "DOI resolution probe failed");
                false
            }
        }
    }
}
