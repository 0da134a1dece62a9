//! Version string parsing and comparison.
//!
//! Version strings found in provider constraints are often partial
//! (`5.0`, `4`) or carry a `v` prefix. They are normalized to a full
//! `MAJOR.MINOR.PATCH` triple before being handed to [`semver`].

use semver::Version;

/// Signed per-component difference between two versions (`new - old`).
///
/// Only the sign of each component is meaningful to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionDelta {
    /// Major component difference
    pub major: i64,
    /// Minor component difference
    pub minor: i64,
    /// Patch component difference
    pub patch: i64,
}

impl VersionDelta {
    /// Returns true if all three components are equal.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.major == 0 && self.minor == 0 && self.patch == 0
    }
}

/// Parse a possibly partial version string.
///
/// Missing minor/patch components are padded with zero, leading zeros
/// are dropped and so is a leading `v`/`V`. Pre-release and build suffixes are kept.
/// Returns `None` when the string is not a version.
///
/// # Example
///
/// ```rust
/// use bumpwatch::analyzer::parse_version;
///
/// assert_eq!(parse_version("v1.2").unwrap().to_string(), "1.2.0");
/// assert!(parse_version("latest").is_none());
/// ```
#[must_use]
pub fn parse_version(input: &str) -> Option<Version> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split_at);

    // semver rejects leading zeros such as 2023.01.0
    let parts = core
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<u64>>>()?;
    if parts.len() > 3 {
        return None;
    }

    let mut components = parts.into_iter().chain(std::iter::repeat(0)).take(3);
    let (major, minor, patch) = (components.next()?, components.next()?, components.next()?);
    let normalized = format!("{major}.{minor}.{patch}{suffix}");

    Version::parse(&normalized).ok()
}

/// Compare two version strings component-wise.
///
/// Returns `None` if either side does not parse. Pre-release and build
/// metadata do not contribute to the delta.
#[must_use]
pub fn compare_versions(old: &str, new: &str) -> Option<VersionDelta> {
    let old = parse_version(old)?;
    let new = parse_version(new)?;

    Some(VersionDelta {
        major: component_diff(new.major, old.major),
        minor: component_diff(new.minor, old.minor),
        patch: component_diff(new.patch, old.patch),
    })
}

fn component_diff(new: u64, old: u64) -> i64 {
    match new.cmp(&old) {
        std::cmp::Ordering::Greater => i64::try_from(new - old).unwrap_or(i64::MAX),
        std::cmp::Ordering::Less => i64::try_from(old - new).map_or(i64::MIN, |d| -d),
        std::cmp::Ordering::Equal => 0,
    }
}
