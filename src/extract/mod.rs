//! Mention extraction: locating DOI-shaped substrings in degraded snippets.
//!
//! Machine-extracted full text breaks DOIs across line and page boundaries,
//! wraps them in markup, and sprinkles stray codepoints around them. This
//! module reconstructs canonical DOIs from that text and tags each with a
//! confidence tier.
//!
//! # Architecture
//!
//! - [`spaced_variants`] - search-term expansion tolerating page-break splits
//! - [`usgs`] - structural reconstruction anchored on the fixed-length USGS DOI shape
//! - [`generic`] - fixed-width window reconstruction for arbitrary 7-char prefixes
//! - [`collect_mentions`] - uniform [`Mention`] records per strategy

mod error;
mod generic;
mod mentions;
mod terms;
mod usgs;

pub use error::ExtractError;
pub use generic::reconstruct_fixed_width;
pub use mentions::{Confidence, MatchStrategy, Mention, SnippetRecord, collect_mentions};
pub use terms::{split_terms, spaced_variants};
pub use usgs::{USGS_DOI_PREFIX, reconstruct_usgs_mentions};
