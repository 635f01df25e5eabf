//! Cleanup of raw highlight text before mention extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Matches HTML tags in highlight snippets (the search API wraps matched
/// terms in `<em>`). Content between tags is kept.
#[allow(clippy::expect_used)]
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag regex is valid")); // Static pattern, safe to panic

/// Stray codepoints seen in machine-extracted full text: zero-width space,
/// thin space, hair space, no-break space. Reported upstream; stripped here.
const ARTIFACT_CODEPOINTS: [char; 4] = ['\u{200B}', '\u{2009}', '\u{200A}', '\u{00A0}'];

/// Removes HTML tags and decodes the named entities that show up in
/// highlight fields, returning plain text content.
///
/// Decoding is single-pass: a double-encoded entity such as `&amp;lt;`
/// yields `&lt;` and is not decoded further. Entity decoding runs after tag
/// removal so decoded angle brackets are not re-interpreted as markup.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    let without_tags = TAG_PATTERN.replace_all(text, "");
    without_tags
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Removes known zero-width/narrow-space artifacts with no other changes.
///
/// Pure and idempotent: `strip_artifacts(strip_artifacts(x)) == strip_artifacts(x)`.
#[must_use]
pub fn strip_artifacts(text: &str) -> String {
    text.chars()
        .filter(|c| !ARTIFACT_CODEPOINTS.contains(c))
        .collect()
}
