//! Error types for mention extraction.

use thiserror::Error;

/// Prefix length the fixed-width reconstruction strategy is derived for.
pub const FIXED_PREFIX_LEN: usize = 7;

/// Errors that can occur during mention extraction.
///
/// An extraction *miss* (no DOI reconstructable from an anchor) is not an
/// error; it just yields zero mentions. Errors are reserved for inputs the
/// strategy is structurally unable to handle.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// The fixed-width strategy hardcodes slice offsets for a 7-character
    /// registrant prefix; other lengths would be silently mis-sliced.
    #[error(
        "search prefix '{prefix}' has {actual} characters; fixed-width reconstruction requires exactly {expected}"
    )]
    UnsupportedPrefixLength {
        /// The rejected prefix.
        prefix: String,
        /// Required character count.
        expected: usize,
        /// Actual character count.
        actual: usize,
    },
}

impl ExtractError {
    /// Creates an `UnsupportedPrefixLength` error for the given prefix.
    #[must_use]
    pub fn unsupported_prefix(prefix: &str) -> Self {
        Self::UnsupportedPrefixLength {
            prefix: prefix.to_string(),
            expected: FIXED_PREFIX_LEN,
            actual: prefix.chars().count(),
        }
    }
}
