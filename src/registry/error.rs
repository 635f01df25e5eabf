//! Error types for DOI-registry operations.

use thiserror::Error;

/// Errors surfaced by a [`super::RegistryClient`] collaborator.
///
/// These are expected failure paths: a fetch or update that the registry
/// rejects is reported, never retried automatically, and never panics.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The registry could not return the requested record.
    #[error("registry fetch failed for {doi}: {message}")]
    Fetch {
        /// The DOI being fetched.
        doi: String,
        /// Collaborator-provided failure detail.
        message: String,
    },

    /// The registry rejected or failed the update call.
    #[error("registry update failed for {doi}: {message}")]
    Update {
        /// The DOI being updated.
        doi: String,
        /// Collaborator-provided failure detail.
        message: String,
    },

    /// The session is missing or no longer authenticated.
    #[error("registry authentication failed: {message}")]
    Auth {
        /// Collaborator-provided failure detail.
        message: String,
    },
}

impl RegistryError {
    /// Creates a fetch error.
    #[must_use]
    pub fn fetch(doi: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            doi: doi.into(),
            message: message.into(),
        }
    }

    /// Creates an update error.
    #[must_use]
    pub fn update(doi: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Update {
            doi: doi.into(),
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }
}
