//! Tag key classification.
//!
//! OSM keys such as `addr:street` carry a namespace before the first colon.
//! The classifier splits that namespace off into the tag `type` column and
//! rejects keys containing characters that do not survive a round trip into
//! the tabular outputs.

use std::sync::LazyLock;

use regex::Regex;

/// Tag type assigned to keys without a namespace.
pub const DEFAULT_TAG_TYPE: &str = "regular";

/// Characters that disqualify a key: `= + / & < > ; ' " ? % # $ @ , .` and
/// tab, space, carriage return and line feed.
const PROBLEM_CHARS_PATTERN: &str = r#"[=\+/&<>;'"\?%#$@,\. \t\r\n]"#;

#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static PROBLEM_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PROBLEM_CHARS_PATTERN).expect("valid problem-character pattern"));

#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static LOWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_]*$").expect("valid lower-case pattern"));

#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static LOWER_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_]*:[a-z_]*$").expect("valid lower-colon pattern"));

/// Result of classifying a raw tag key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKey<'a> {
    /// The key is usable; `tag_type` is its namespace or [`DEFAULT_TAG_TYPE`].
    Accepted {
        /// Namespace before the first colon, or `"regular"`.
        tag_type: &'a str,
        /// Everything after the first colon, or the whole key.
        key: &'a str,
    },
    /// The key contains a problem character and must be dropped.
    Rejected,
}

/// Classify a raw tag key.
///
/// Only the first colon splits; later colons stay in the key.
///
/// # Examples
/// ```
/// use osmshape_core::{TagKey, classify};
///
/// assert_eq!(
///     classify("addr:street:name"),
///     TagKey::Accepted { tag_type: "addr", key: "street:name" },
/// );
/// assert_eq!(
///     classify("amenity"),
///     TagKey::Accepted { tag_type: "regular", key: "amenity" },
/// );
/// assert_eq!(classify("name.en"), TagKey::Rejected);
/// ```
#[must_use]
pub fn classify(raw_key: &str) -> TagKey<'_> {
    if has_problem_chars(raw_key) {
        return TagKey::Rejected;
    }
    match raw_key.split_once(':') {
        Some((tag_type, key)) => TagKey::Accepted { tag_type, key },
        None => TagKey::Accepted {
            tag_type: DEFAULT_TAG_TYPE,
            key: raw_key,
        },
    }
}

/// Whether the key contains any problem character.
#[must_use]
pub fn has_problem_chars(raw_key: &str) -> bool {
    PROBLEM_CHARS.is_match(raw_key)
}

/// Coarse key shape used when profiling a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCategory {
    /// Only lower-case letters and underscores.
    Lower,
    /// Two lower-case segments joined by a single colon.
    LowerColon,
    /// Contains a problem character.
    ProblemChars,
    /// Anything else (upper case, digits, several colons, ...).
    Other,
}

impl KeyCategory {
    /// Categorise a raw key. The checks run in declaration order.
    #[must_use]
    pub fn of(raw_key: &str) -> Self {
        if LOWER.is_match(raw_key) {
            Self::Lower
        } else if LOWER_COLON.is_match(raw_key) {
            Self::LowerColon
        } else if has_problem_chars(raw_key) {
            Self::ProblemChars
        } else {
            Self::Other
        }
    }
}

#[cfg(test)]
mod tests;
