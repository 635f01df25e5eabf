//! Mention records and the matching strategies that produce them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::doi::canonicalize;

use super::ExtractError;
use super::generic::reconstruct_fixed_width;
use super::usgs::{USGS_DOI_PREFIX, reconstruct_usgs_mentions};

/// How much of a reconstructed DOI was inferred versus literally matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// The candidate hit the expected DOI shape exactly.
    MostCertain,
    /// A literal term match with no structural reconstruction.
    Certain,
    /// The candidate was longer than expected and was truncated; the tail
    /// may have included garbage.
    LessCertain,
}

impl Confidence {
    /// Returns the wire/reporting form of the tier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MostCertain => "most_certain",
            Self::Certain => "certain",
            Self::LessCertain => "less_certain",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw snippet record from the literature search collaborator: one source
/// document, its own DOI when known, and the highlight fragments that
/// matched the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetRecord {
    /// Source-document identifier assigned by the search API.
    pub document_id: String,
    /// The source document's own DOI, when the API knows it.
    pub document_doi: Option<String>,
    /// Raw text fragments containing the search term.
    pub highlights: Vec<String>,
}

/// A detected occurrence of a search term or reconstructed DOI inside a
/// snippet. Ephemeral: consumed immediately by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// Source-document identifier.
    pub document_id: String,
    /// Canonicalized DOI of the source document, when known.
    pub document_doi: Option<String>,
    /// The term found: the search term itself for exact matching, or the
    /// reconstructed DOI for the structural strategies.
    pub found_term: String,
    /// The (cleaned, upper-cased) highlight the term was found in.
    pub matched_text: String,
    /// Confidence tier for this mention.
    pub confidence: Confidence,
}

/// Extraction strategy selecting how mentions are located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Literal substring match of each search term.
    ExactTerm {
        /// When true, found terms are canonicalized as DOIs.
        terms_are_dois: bool,
    },
    /// Structural reconstruction anchored on the USGS DOI shape.
    UsgsDoi,
    /// Fixed-width window reconstruction; each term is a 7-char DOI prefix.
    Prefix,
}

/// Produces uniform [`Mention`] records from snippet records.
///
/// One mention is created per (snippet highlight, found term) match. Document
/// DOIs are canonicalized on ingest; records without one still yield
/// mentions, they just cannot form relation pairs later.
///
/// # Errors
///
/// Returns [`ExtractError`] when the [`MatchStrategy::Prefix`] strategy is
/// given a term that is not exactly 7 characters.
pub fn collect_mentions(
    records: &[SnippetRecord],
    search_terms: &[String],
    strategy: &MatchStrategy,
) -> Result<Vec<Mention>, ExtractError> {
    let mut mentions = Vec::new();
    for record in records {
        let document_doi = record
            .document_doi
            .as_deref()
            .filter(|doi| !doi.is_empty())
            .map(canonicalize);
        for highlight in &record.highlights {
            match strategy {
                MatchStrategy::ExactTerm { terms_are_dois } => exact_mentions(
                    record,
                    document_doi.as_deref(),
                    highlight,
                    search_terms,
                    *terms_are_dois,
                    &mut mentions,
                ),
                MatchStrategy::UsgsDoi => {
                    let (cleaned, found) =
                        reconstruct_usgs_mentions(highlight, search_terms, USGS_DOI_PREFIX);
                    for (doi, confidence) in found {
                        mentions.push(Mention {
                            document_id: record.document_id.clone(),
                            document_doi: document_doi.clone(),
                            found_term: doi,
                            matched_text: cleaned.clone(),
                            confidence,
                        });
                    }
                }
                MatchStrategy::Prefix => {
                    for term in search_terms {
                        for doi in reconstruct_fixed_width(highlight, term)? {
                            mentions.push(Mention {
                                document_id: record.document_id.clone(),
                                document_doi: document_doi.clone(),
                                found_term: doi,
                                matched_text: highlight.to_uppercase(),
                                confidence: Confidence::Certain,
                            });
                        }
                    }
                }
            }
        }
    }
    debug!(
        mention_count = mentions.len(),
        record_count = records.len(),
        "collected mentions"
    );
    Ok(mentions)
}

fn exact_mentions(
    record: &SnippetRecord,
    document_doi: Option<&str>,
    highlight: &str,
    search_terms: &[String],
    terms_are_dois: bool,
    mentions: &mut Vec<Mention>,
) {
    let upper = highlight.to_uppercase();
    for term in search_terms {
        let term_upper = term.to_uppercase();
        if upper.contains(&term_upper) {
            let found_term = if terms_are_dois {
                canonicalize(term)
            } else {
                term_upper
            };
            mentions.push(Mention {
                document_id: record.document_id.clone(),
                document_doi: document_doi.map(ToString::to_string),
                found_term,
                matched_text: upper.clone(),
                confidence: Confidence::Certain,
            });
        }
    }
}
