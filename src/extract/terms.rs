//! Search-term expansion for split-tolerant matching.

/// Splits a comma-separated search-term string into trimmed terms.
///
/// Empty segments are dropped, so `"10.5066,,10.4344"` yields two terms.
#[must_use]
pub fn split_terms(terms_csv: &str) -> Vec<String> {
    terms_csv
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Expands a term into itself plus one variant per internal character
/// position with a single space inserted there.
///
/// Article processing occasionally splits words at page breaks; querying
/// every spaced variant recovers those matches. Variants are siblings of the
/// original term, so the original always comes first.
///
/// # Examples
///
/// ```
/// use citelink_core::extract::spaced_variants;
///
/// assert_eq!(
///     spaced_variants("fun"),
///     vec!["fun".to_string(), "f un".to_string(), "fu n".to_string()]
/// );
/// ```
#[must_use]
pub fn spaced_variants(term: &str) -> Vec<String> {
    let chars: Vec<char> = term.chars().collect();
    let mut variants = Vec::with_capacity(chars.len());
    variants.push(term.to_string());
    for i in 1..chars.len() {
        let mut variant: String = chars[..i].iter().collect();
        variant.push(' ');
        variant.extend(&chars[i..]);
        variants.push(variant);
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced_variants_usgs_prefix() {
        let expected = vec![
            "10.5066", "1 0.5066", "10 .5066", "10. 5066", "10.5 066", "10.50 66", "10.506 6",
        ];
        assert_eq!(spaced_variants("10.5066"), expected);
    }

    #[test]
    fn test_spaced_variants_single_char_has_no_variants() {
        assert_eq!(spaced_variants("a"), vec!["a".to_string()]);
    }

    #[test]
    fn test_split_terms_commas_and_whitespace() {
        assert_eq!(
            split_terms("10.5066, 10.4344,,"),
            vec!["10.5066".to_string(), "10.4344".to_string()]
        );
    }

    #[test]
    fn test_split_terms_empty_input() {
        assert!(split_terms("").is_empty());
    }
}
