//! DOI-registry interface: record model, client trait, and the updater that
//! merges newly discovered relationships into existing registry records.
//!
//! The registry itself is an external collaborator. This module owns the
//! schema types written back to it and the merge semantics; the HTTP/session
//! plumbing lives behind the [`RegistryClient`] trait.

mod error;
mod updater;

pub use error::RegistryError;
pub use updater::{MergeOutcome, UpdateReport, UpdateStatus, apply_relationships, merge};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// DataCite-style relation vocabulary, serialized in the registry's
/// SCREAMING_SNAKE_CASE form (`IS_CITED_BY`, `REFERENCES`, ...).
///
/// Relation types are fixed constants chosen per call site, never inferred
/// from snippet content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    IsCitedBy,
    Cites,
    References,
    IsReferencedBy,
    IsDocumentedBy,
    Documents,
}

impl RelationType {
    /// Returns the registry wire form of the relation type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsCitedBy => "IS_CITED_BY",
            Self::Cites => "CITES",
            Self::References => "REFERENCES",
            Self::IsReferencedBy => "IS_REFERENCED_BY",
            Self::IsDocumentedBy => "IS_DOCUMENTED_BY",
            Self::Documents => "DOCUMENTS",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One related-identifier entry on a registry record.
///
/// `relation_type` stays a plain string on this type so existing registry
/// entries round-trip even when they use vocabulary this crate does not
/// know; unknown sibling fields are preserved through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedIdentifier {
    /// The related DOI as an `https://doi.org/...` URL.
    pub related_identifier: String,
    /// Relation type in registry wire form.
    pub relation_type: String,
    /// Identifier scheme; always `"DOI"` for entries this crate creates.
    pub related_identifier_type: String,
    /// Fields this crate does not model, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RelatedIdentifier {
    /// Creates a DOI related-identifier entry.
    #[must_use]
    pub fn doi(url: impl Into<String>, relation_type: RelationType) -> Self {
        Self {
            related_identifier: url.into(),
            relation_type: relation_type.as_str().to_string(),
            related_identifier_type: "DOI".to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A mutable DOI-registry record.
///
/// Only `related_identifiers` is ever modified, and only by appending; every
/// other field the registry returned is carried through `extra` untouched so
/// updates never drop registry-side data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryDoiRecord {
    /// The record's DOI.
    pub doi: String,
    /// Existing related-identifier entries.
    #[serde(default)]
    pub related_identifiers: Vec<RelatedIdentifier>,
    /// Fields this crate does not model, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// DOI-registry collaborator: fetch a record, submit an updated one.
///
/// Implementations own session/authentication concerns. Uses `async_trait`
/// so the pipeline can hold a `dyn RegistryClient`.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetches the registry record for a DOI.
    async fn fetch(&self, doi: &str) -> Result<RegistryDoiRecord, RegistryError>;

    /// Submits an updated record. Not retried automatically.
    async fn update(&self, record: &RegistryDoiRecord) -> Result<(), RegistryError>;
}

/// Credentials for the registry session, passed explicitly to client
/// constructors instead of living in process-wide globals.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryCredentials {
    /// Registry account name.
    pub username: String,
    password: String,
}

impl RegistryCredentials {
    /// Creates credentials from explicit values.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads credentials from the `DOI_USER` / `DOI_PW` environment
    /// variables; returns `None` when either is missing.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("DOI_USER").ok()?;
        let password = std::env::var("DOI_PW").ok()?;
        Some(Self::new(username, password))
    }

    /// Returns the password for client construction.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Manual Debug keeps the password out of logs and error chains.
impl std::fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
