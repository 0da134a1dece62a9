//! Constraint boundedness checks and version extraction.
//!
//! A constraint is *bounded* when it cannot silently admit a future major
//! version: pessimistic (`~> 1.2`), exact (`= 1.2.3`) or a bare literal
//! (`1.2.3`). Open-ended operators (`>=`, `>`) and the wildcard (`*`) are
//! unbounded. Anything unrecognized is treated as unbounded.

use super::version::parse_version;
use regex::Regex;
use std::sync::LazyLock;

// First digits-and-dots run, with an optional pre-release suffix
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+(?:\.[0-9]+){0,2}(?:-[0-9A-Za-z.\-]+)?").expect("Invalid regex")
});

/// The wildcard constraint literal.
pub const WILDCARD: &str = "*";

/// Pull the first version-shaped substring out of a constraint.
///
/// This is textual matching, not parsing: `>= 1.0.0, < 2.0.0` yields
/// `1.0.0`.
///
/// # Example
///
/// ```rust
/// use bumpwatch::analyzer::extract_version;
///
/// assert_eq!(extract_version("~> 5.0").as_deref(), Some("5.0"));
/// assert_eq!(extract_version("latest"), None);
/// ```
#[must_use]
pub fn extract_version(constraint: &str) -> Option<String> {
    VERSION_PATTERN
        .find(constraint)
        .map(|m| m.as_str().to_string())
}

/// Returns true if the trimmed constraint is the wildcard literal.
#[must_use]
pub fn is_wildcard(constraint: &str) -> bool {
    constraint.trim() == WILDCARD
}

/// Check whether a constraint bounds the major version.
#[must_use]
pub fn is_bounded(constraint: &str) -> bool {
    let constraint = constraint.trim();

    if constraint.starts_with('>') || constraint == WILDCARD {
        return false;
    }

    let bounded_shape = constraint.starts_with("~>")
        || constraint.starts_with('=')
        || constraint.starts_with(|c: char| c.is_ascii_digit());
    if !bounded_shape {
        return false;
    }

    extract_version(constraint)
        .and_then(|version| parse_version(&version))
        .is_some()
}
