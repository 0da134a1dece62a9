//! Pairing of old and new declarations and issue detection.

use super::constraint::{is_bounded, is_wildcard};
use super::version::{compare_versions, VersionDelta};
use crate::config::Config;
use crate::types::{DeclaredDependency, Issue, IssueKind, VersionChange};
use std::collections::HashMap;

/// Turns dependency declarations into version changes and issues.
///
/// # Example
///
/// ```rust
/// use bumpwatch::analyzer::ChangeAnalyzer;
/// use bumpwatch::Config;
///
/// let config = Config::default();
/// let analyzer = ChangeAnalyzer::new(&config);
/// let issues = analyzer.detect(&[]);
/// assert!(issues.is_empty());
/// ```
pub struct ChangeAnalyzer<'a> {
    config: &'a Config,
}

impl<'a> ChangeAnalyzer<'a> {
    /// Create a new analyzer with the given configuration.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Pair new declarations with old ones by package name.
    ///
    /// Output follows the order of `new`. A package missing from `old`
    /// yields a change with no prior version.
    #[must_use]
    pub fn analyze(old: &[DeclaredDependency], new: &[DeclaredDependency]) -> Vec<VersionChange> {
        let previous: HashMap<&str, &DeclaredDependency> = old
            .iter()
            .map(|dep| (dep.package_name.as_str(), dep))
            .collect();

        new.iter()
            .map(|dep| {
                let before = previous.get(dep.package_name.as_str());
                VersionChange {
                    package_name: dep.package_name.clone(),
                    old_version: before.map(|b| b.extracted_version.clone()),
                    new_version: dep.extracted_version.clone(),
                    old_constraint: before.map(|b| b.version_constraint.clone()),
                    new_constraint: dep.version_constraint.clone(),
                    file_path: dep.file_path.clone(),
                }
            })
            .collect()
    }

    /// Classify a delta by its highest nonzero component.
    #[must_use]
    pub const fn classify(delta: VersionDelta) -> Option<IssueKind> {
        if delta.major > 0 {
            Some(IssueKind::MajorBump)
        } else if delta.major < 0 {
            Some(IssueKind::MajorDowngrade)
        } else if delta.minor > 0 {
            Some(IssueKind::MinorBump)
        } else if delta.minor < 0 {
            Some(IssueKind::MinorDowngrade)
        } else if delta.patch > 0 {
            Some(IssueKind::PatchBump)
        } else if delta.patch < 0 {
            Some(IssueKind::PatchDowngrade)
        } else {
            None
        }
    }

    /// Detect issues in a list of changes.
    ///
    /// Each change may yield an unbound-constraint issue followed by a
    /// version-change issue. Ignored packages yield nothing.
    #[must_use]
    pub fn detect(&self, changes: &[VersionChange]) -> Vec<Issue> {
        let mut issues = Vec::new();

        for change in changes {
            if self.config.should_ignore(&change.package_name) {
                tracing::debug!(package = %change.package_name, "Skipping ignored package");
                continue;
            }

            if let Some(issue) = self.check_unbound(change) {
                issues.push(issue);
            }
            if let Some(issue) = self.check_version_change(change) {
                issues.push(issue);
            }
        }

        issues
    }

    fn check_unbound(&self, change: &VersionChange) -> Option<Issue> {
        if is_bounded(&change.new_constraint) {
            return None;
        }

        let suggestion = if is_wildcard(&change.new_constraint) {
            "Wildcard constraints are strictly forbidden. Use a specific version like \
             '= 1.2.3' or a bounded constraint like '~> 1.2'"
                .to_string()
        } else {
            format!(
                "Consider using '~> {}' to bound to major version",
                change.new_version
            )
        };

        tracing::debug!(
            package = %change.package_name,
            constraint = %change.new_constraint,
            "Unbound constraint"
        );

        Some(self.issue(
            IssueKind::UnboundVersion,
            format!(
                "Unbound version constraint '{}' for {}",
                change.new_constraint, change.package_name
            ),
            change,
            suggestion,
        ))
    }

    fn check_version_change(&self, change: &VersionChange) -> Option<Issue> {
        let old = change.old_version.as_deref()?;
        let new = change.new_version.as_str();
        if old == new {
            return None;
        }

        let Some(delta) = compare_versions(old, new) else {
            tracing::debug!(
                package = %change.package_name,
                old,
                new,
                "Versions not comparable, skipping"
            );
            return None;
        };
        let kind = Self::classify(delta)?;

        tracing::debug!(package = %change.package_name, %kind, old, new, "Version change");

        let pkg = &change.package_name;
        let (message, suggestion) = match kind {
            IssueKind::MajorDowngrade => (
                format!(
                    "Major version downgrade detected: {pkg} changed from {old} to {new} - \
                     potential feature loss and security vulnerabilities"
                ),
                format!(
                    "Major downgrades are risky. Review security implications and removed \
                     features between {pkg} {new} and {old}"
                ),
            ),
            IssueKind::MinorDowngrade => (
                format!(
                    "Minor version downgrade detected: {pkg} changed from {old} to {new} - \
                     potential feature loss and missing bug fixes"
                ),
                format!(
                    "Review removed features and bug fixes between {pkg} {new} and {old}"
                ),
            ),
            IssueKind::PatchDowngrade => (
                format!(
                    "Patch version downgrade detected: {pkg} changed from {old} to {new} - \
                     missing bug fixes and security patches"
                ),
                format!(
                    "Check for missing bug fixes and security patches between \
                     {pkg} {new} and {old}"
                ),
            ),
            _ => (
                format!("{} detected: {pkg} changed from {old} to {new}", kind.title()),
                format!(
                    "Review breaking changes in {pkg} changelog between versions {old} and {new}"
                ),
            ),
        };

        Some(self.issue(kind, message, change, suggestion))
    }

    fn issue(
        &self,
        kind: IssueKind,
        message: String,
        change: &VersionChange,
        suggestion: String,
    ) -> Issue {
        Issue {
            severity: self.config.resolve_severity(kind, &change.package_name),
            kind,
            message,
            change: change.clone(),
            suggestion: Some(suggestion),
        }
    }
}
