//! Citelink Core Library
//!
//! This library links scholarly publications to the datasets they cite by
//! discovering DOI mentions inside noisy, machine-extracted full-text
//! snippets, validating them, and producing deduplicated relationship
//! records suitable for DOI-registry write-back.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`doi`] - text cleanup and canonical DOI formatting
//! - [`extract`] - mention extraction strategies and confidence tiers
//! - [`reconcile`] - pair deduplication, resolution probing, relationship building
//! - [`registry`] - registry record model, client trait, and relation merging
//! - [`clients`] - literature search and citation events API clients
//! - [`pipeline`] - end-to-end orchestration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clients;
pub mod doi;
pub mod extract;
pub mod pipeline;
pub mod reconcile;
pub mod registry;

// Re-export commonly used types
pub use clients::{EventsClient, LiteratureSearchClient, SearchStatus};
pub use extract::{Confidence, MatchStrategy, Mention, SnippetRecord};
pub use reconcile::{DoiResolver, HttpDoiResolver, RelationPair, RelationshipRecord};
pub use registry::{RegistryClient, RegistryDoiRecord, RelationType};
