//! DOI string handling: text cleanup and canonical formatting.
//!
//! Literature-extracted snippets arrive with HTML markup, stray unicode
//! codepoints, and loosely formatted DOI strings (URL prefixes, `doi:`
//! prefixes, embedded spaces). This module reduces all of that to plain
//! text and canonical `10.NNNN/SUFFIX` DOIs before extraction runs.

mod canonical;
mod normalize;

pub use canonical::canonicalize;
pub use normalize::{strip_artifacts, strip_markup};

/// Base URL DOIs resolve against.
pub const DOI_BASE_URL: &str = "https://doi.org";

/// Builds the `https://doi.org/<doi>` form of a DOI.
#[must_use]
pub fn doi_url(doi: &str) -> String {
    format!("{DOI_BASE_URL}/{doi}")
}
