//! Fixed-width DOI reconstruction for arbitrary registrant prefixes.
//!
//! Unlike the anchor/extend strategy in [`super::usgs`], this strategy slices
//! a fixed character window after each prefix occurrence and reassembles it
//! into DOI shape. The slice offsets assume a 7-character prefix such as
//! `10.5066`; other lengths are rejected rather than silently mis-sliced.

use tracing::trace;

use crate::doi::{strip_artifacts, strip_markup};

use super::ExtractError;
use super::error::FIXED_PREFIX_LEN;

/// Window taken after each prefix occurrence before punctuation cleanup.
const WINDOW: usize = 18;

/// Characters removed from the window before fixed-width reassembly:
/// separators and stray punctuation that page extraction injects into DOIs.
const STRIP_CLASS: [char; 9] = ['.', '/', ' ', '-', ',', ';', ':', '(', ')'];

/// Reconstructs DOIs carrying `prefix` from a raw snippet.
///
/// When the raw text contains the prefix in a bare-number context (isolated
/// by spaces/punctuation), the whole snippet is skipped as a false positive:
/// it is a plain numeric mention, not a DOI fragment. Otherwise each prefix
/// occurrence in the markup-stripped text yields one candidate built by
/// cleaning an 18-character window and re-slicing it into `10.NNNN/SSSSSSSS`.
/// Results are deduplicated within the snippet.
///
/// # Errors
///
/// Returns [`ExtractError::UnsupportedPrefixLength`] when `prefix` is not
/// exactly 7 characters.
pub fn reconstruct_fixed_width(snippet: &str, prefix: &str) -> Result<Vec<String>, ExtractError> {
    if prefix.chars().count() != FIXED_PREFIX_LEN {
        return Err(ExtractError::unsupported_prefix(prefix));
    }

    let prefix_upper = prefix.to_uppercase();
    let raw_upper = snippet.to_uppercase();

    let bare_number_patterns = [
        format!(" {prefix_upper} "),
        format!(" {prefix_upper},"),
        format!(" {prefix_upper}."),
        format!(" -{prefix_upper}"),
    ];
    if bare_number_patterns
        .iter()
        .any(|pattern| raw_upper.contains(pattern.as_str()))
    {
        trace!(prefix = %prefix_upper, "prefix appears as bare number; skipping snippet");
        return Ok(Vec::new());
    }

    let mut text = strip_artifacts(&strip_markup(&raw_upper));
    let mut found: Vec<String> = Vec::new();
    while let Some(idx) = text.find(&prefix_upper) {
        let window: String = text[idx..].chars().take(WINDOW).collect();
        let cleaned: String = window.chars().filter(|c| !STRIP_CLASS.contains(c)).collect();
        if let Some(doi) = reassemble(&cleaned)
            && !found.contains(&doi)
        {
            trace!(doi = %doi, "reconstructed DOI from fixed-width window");
            found.push(doi);
        }
        // Blank out the consumed occurrence so the scan advances.
        text.replace_range(idx..idx + prefix_upper.len(), "");
    }
    Ok(found)
}

/// Re-slices a cleaned window into DOI shape: `[0:2] + "." + [2:6] + "/" + [6:14]`.
///
/// Accepts only windows with enough characters for a full 16-character DOI.
fn reassemble(cleaned: &str) -> Option<String> {
    let chars: Vec<char> = cleaned.chars().collect();
    if chars.len() < 14 {
        return None;
    }
    let class: String = chars[0..2].iter().collect();
    let registrant: String = chars[2..6].iter().collect();
    let suffix: String = chars[6..14].iter().collect();
    Some(format!("{class}.{registrant}/{suffix}"))
}
