//! Structural DOI reconstruction anchored on the fixed USGS DOI shape.
//!
//! USGS data DOIs are always 16 characters: `10.5066/XXXXXXXX` (2-digit
//! class, 4-digit registrant, 8-character suffix). That fixed shape lets the
//! extractor accept partial matches and re-join DOIs split across token
//! boundaries without requiring an exact term hit.

use tracing::trace;

use crate::doi::{canonicalize, strip_artifacts, strip_markup};

use super::Confidence;

/// Registrant prefix shared by all USGS data DOIs.
pub const USGS_DOI_PREFIX: &str = "10.5066";

/// Expected total DOI length for the structural strategy.
const TARGET_DOI_LEN: usize = 16;

/// Initial candidate cap: target length plus up to 3 separator/stray chars.
const CANDIDATE_WINDOW: usize = 18;

/// Reconstructs USGS data DOIs from a raw highlight snippet.
///
/// The snippet is upper-cased and cleaned (markup, stray codepoints), every
/// occurrence of a spaced search-term variant is collapsed back to `prefix`,
/// and each distinct token containing the prefix becomes a mention anchor.
/// Per anchor, zero or one DOI is reconstructed with a confidence tier.
///
/// The accept/extend loop prefers the shortest extension that reaches the
/// expected fixed length; longer reconstructions are tagged `less_certain`
/// since they likely include trailing garbage.
#[must_use]
pub fn reconstruct_usgs_mentions(
    highlight: &str,
    search_terms: &[String],
    prefix: &str,
) -> (String, Vec<(String, Confidence)>) {
    let cleaned = clean_highlight(highlight, search_terms, prefix);
    let words: Vec<&str> = cleaned.split(' ').collect();

    let mut anchors: Vec<&str> = Vec::new();
    for &word in &words {
        if word.contains(prefix) && !anchors.contains(&word) {
            anchors.push(word);
        }
    }

    let mut found = Vec::new();
    for anchor in anchors {
        if let Some((doi, confidence)) = extract_doi(&words, anchor, prefix) {
            trace!(doi = %doi, confidence = %confidence, "reconstructed DOI from anchor");
            found.push((doi, confidence));
        }
    }
    (cleaned, found)
}

/// Cleans a highlight for tokenization: upper-case, strip markup and
/// artifacts, then collapse every spaced search-term variant back to the
/// unbroken prefix.
fn clean_highlight(highlight: &str, search_terms: &[String], prefix: &str) -> String {
    let upper = highlight.to_uppercase();
    let mut cleaned = strip_artifacts(&strip_markup(&upper));
    for term in search_terms {
        let term_upper = term.to_uppercase();
        if cleaned.contains(&term_upper) {
            cleaned = cleaned.replace(&term_upper, prefix);
        }
    }
    cleaned
}

/// Reconstructs at most one DOI from the anchor word, consuming following
/// tokens while the candidate is shorter than the target length.
fn extract_doi(words: &[&str], anchor: &str, prefix: &str) -> Option<(String, Confidence)> {
    let (_, after) = anchor.split_once(prefix)?;
    let mut candidate: String = format!("{prefix}{after}")
        .chars()
        .take(CANDIDATE_WINDOW)
        .collect();

    let mut accepted = evaluate(&candidate);
    if accepted.is_none() {
        // DOI split across a token boundary: extend one token at a time.
        let anchor_idx = words.iter().position(|w| *w == anchor)?;
        let mut next = anchor_idx + 1;
        while accepted.is_none() && next < words.len() {
            candidate.push_str(words[next]);
            accepted = evaluate(&candidate);
            next += 1;
        }
    }

    let (doi, confidence) = accepted?;
    // Guard against partial/false anchors: the canonical form must literally
    // begin with the prefix followed by the suffix separator.
    if !canonicalize(&doi).starts_with(&format!("{prefix}/")) {
        return None;
    }
    Some((doi, confidence))
}

/// Applies the fixed-length accept rule to a candidate string.
fn evaluate(candidate: &str) -> Option<(String, Confidence)> {
    let len = candidate.chars().count();
    if len == TARGET_DOI_LEN {
        Some((candidate.to_string(), Confidence::MostCertain))
    } else if len == TARGET_DOI_LEN + 1 && candidate.ends_with('.') {
        Some((take_target(candidate), Confidence::MostCertain))
    } else if len > TARGET_DOI_LEN {
        Some((take_target(candidate), Confidence::LessCertain))
    } else {
        None
    }
}

fn take_target(candidate: &str) -> String {
    candidate.chars().take(TARGET_DOI_LEN).collect()
}
