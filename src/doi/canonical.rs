//! Canonical formatting for loosely structured DOI strings.

/// Known resolver/label prefixes, longest match first. Order matters: the
/// `DOI:`-suffixed URL forms must be tried before their bare counterparts.
const KNOWN_PREFIXES: [&str; 9] = [
    "HTTPS://DOI.ORG/DOI:",
    "HTTPS://DX.DOI.ORG/DOI:",
    "HTTP://DOI.ORG/DOI:",
    "HTTP://DX.DOI.ORG/DOI:",
    "HTTPS://DOI.ORG/",
    "HTTPS://DX.DOI.ORG/",
    "HTTP://DOI.ORG/",
    "HTTP://DX.DOI.ORG/",
    "DOI:",
];

/// Reformats a loosely structured DOI to canonical `10.NNNN/SUFFIX` form.
///
/// Upper-cases the input, removes all whitespace, and strips the first
/// matching known URL or `doi:` prefix. A string already starting with `10`
/// after whitespace removal is returned as-is, and so is anything that
/// matches no prefix rule: no shape validation happens here. Malformed input
/// passes through unchanged and surfaces later at resolution time.
///
/// Idempotent: `canonicalize(canonicalize(x)) == canonicalize(x)`.
///
/// # Examples
///
/// ```
/// use citelink_core::doi::canonicalize;
///
/// assert_eq!(canonicalize("https://doi.org/doi:10.5066/p9lyufrh"), "10.5066/P9LYUFRH");
/// assert_eq!(canonicalize("10.5066/P9LY UFRH"), "10.5066/P9LYUFRH");
/// ```
#[must_use]
pub fn canonicalize(raw: &str) -> String {
    let squeezed: String = raw
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    // A bare DOI is never prefix-stripped, even though "10..." could in
    // principle collide with a prefix fragment.
    if squeezed.starts_with("10") {
        return squeezed;
    }

    for prefix in KNOWN_PREFIXES {
        if let Some(rest) = squeezed.strip_prefix(prefix) {
            return rest.to_string();
        }
    }

    squeezed
}
