//! Core data types used throughout Bumpwatch.
//!
//! This module defines the fundamental data structures for representing:
//! - Dependency declarations extracted from Terraform files
//! - Version changes between two revisions of a file
//! - Issues, their kinds and severity levels
//! - Report formats

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single dependency declaration found in a file.
///
/// Produced by a [`DependencyParser`](crate::parser::DependencyParser).
/// The package name is unique per file and parse pass only.
///
/// # Example HCL
///
/// ```hcl
/// terraform {
///   required_providers {
///     aws = {
///       source  = "hashicorp/aws"
///       version = "~> 5.0"
///     }
///   }
/// }
/// ```
///
/// yields `package_name = "hashicorp/aws"`, `version_constraint = "~> 5.0"`
/// and `extracted_version = "5.0"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredDependency {
    /// Canonical dependency identifier (provider source address)
    pub package_name: String,

    /// The raw constraint string as written
    pub version_constraint: String,

    /// Representative version pulled out of the constraint, or the raw
    /// constraint when it holds nothing version-shaped
    pub extracted_version: String,

    /// File where the dependency is declared
    pub file_path: PathBuf,
}

/// A dependency as it looks after a change, paired with its prior state.
///
/// `old_version` and `old_constraint` are `None` exactly when the dependency
/// was not declared at the base revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionChange {
    /// Canonical dependency identifier
    pub package_name: String,

    /// Representative version at the base revision
    pub old_version: Option<String>,

    /// Representative version now
    pub new_version: String,

    /// Constraint at the base revision
    pub old_constraint: Option<String>,

    /// Constraint now
    pub new_constraint: String,

    /// File where the dependency is declared
    pub file_path: PathBuf,
}

impl VersionChange {
    /// Returns true if the dependency did not exist at the base revision.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.old_version.is_none()
    }
}

/// Severity level for issues.
///
/// Ordered ascending: `Info < Warning < Error < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational finding
    Info,
    /// Warning - potential issue
    Warning,
    /// Error - definite problem
    Error,
    /// Critical - severe issue requiring immediate attention
    Critical,
}

impl Severity {
    /// Lowercase name, as used in configuration files and JSON reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Marker shown in front of text report entries.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Info => "ℹ️",
            Self::Warning => "⚠️",
            Self::Error => "❌",
            Self::Critical => "🚨",
        }
    }

    /// Returns true for severities that fail a run.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Kind of issue found for a dependency.
///
/// At most one bump/downgrade kind applies to a change. `UnboundVersion` is
/// independent and may accompany one of them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum IssueKind {
    /// Major component increased
    #[serde(rename = "major_version_bump")]
    MajorBump,
    /// Minor component increased
    #[serde(rename = "minor_version_bump")]
    MinorBump,
    /// Patch component increased
    #[serde(rename = "patch_version_bump")]
    PatchBump,
    /// Major component decreased
    #[serde(rename = "major_version_downgrade")]
    MajorDowngrade,
    /// Minor component decreased
    #[serde(rename = "minor_version_downgrade")]
    MinorDowngrade,
    /// Patch component decreased
    #[serde(rename = "patch_version_downgrade")]
    PatchDowngrade,
    /// Constraint admits future major versions
    #[serde(rename = "unbound_version")]
    UnboundVersion,
    /// Constraint is looser than it should be
    #[serde(rename = "loose_constraint")]
    LooseConstraint,
}

impl IssueKind {
    /// Every issue kind, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::MajorBump,
        Self::MinorBump,
        Self::PatchBump,
        Self::MajorDowngrade,
        Self::MinorDowngrade,
        Self::PatchDowngrade,
        Self::UnboundVersion,
        Self::LooseConstraint,
    ];

    /// Wire name used in configuration files and JSON reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MajorBump => "major_version_bump",
            Self::MinorBump => "minor_version_bump",
            Self::PatchBump => "patch_version_bump",
            Self::MajorDowngrade => "major_version_downgrade",
            Self::MinorDowngrade => "minor_version_downgrade",
            Self::PatchDowngrade => "patch_version_downgrade",
            Self::UnboundVersion => "unbound_version",
            Self::LooseConstraint => "loose_constraint",
        }
    }

    /// Human-readable title, e.g. "Major Version Bump".
    #[must_use]
    pub fn title(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported finding.
///
/// Built once per detected condition by the
/// [`ChangeAnalyzer`](crate::analyzer::ChangeAnalyzer) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Severity after configuration overrides
    pub severity: Severity,

    /// What was detected
    pub kind: IssueKind,

    /// Human-readable message
    pub message: String,

    /// The change this issue is about
    pub change: VersionChange,

    /// Suggested fix
    pub suggestion: Option<String>,
}

/// Result of a detection run over one or more files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Issues in file order, then declaration order
    pub issues: Vec<Issue>,

    /// Files that were handed to a parser
    pub files_checked: Vec<PathBuf>,

    /// Files that were skipped because a collaborator failed
    pub failed_files: usize,
}

impl DetectionResult {
    /// Check if there are any error-level issues.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity.is_failure())
    }

    /// Check if there are any warning-level issues.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|i| matches!(i.severity, Severity::Warning))
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// Plain text format
    #[default]
    Text,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(old: Option<&str>) -> VersionChange {
        VersionChange {
            package_name: "hashicorp/aws".to_string(),
            old_version: old.map(String::from),
            new_version: "5.0.0".to_string(),
            old_constraint: old.map(|v| format!("~> {v}")),
            new_constraint: "~> 5.0.0".to_string(),
            file_path: PathBuf::from("versions.tf"),
        }
    }

    fn issue(severity: Severity) -> Issue {
        Issue {
            severity,
            kind: IssueKind::MajorBump,
            message: "msg".to_string(),
            change: change(Some("4.0.0")),
            suggestion: None,
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn test_severity_wire_names() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
        assert_eq!(Severity::Warning.as_str(), "warning");
        assert_eq!(Severity::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_issue_kind_wire_names() {
        for kind in IssueKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: IssueKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_issue_kind_title() {
        assert_eq!(IssueKind::MajorBump.title(), "Major Version Bump");
        assert_eq!(IssueKind::UnboundVersion.title(), "Unbound Version");
        assert_eq!(IssueKind::PatchDowngrade.title(), "Patch Version Downgrade");
    }

    #[test]
    fn test_version_change_is_new() {
        assert!(change(None).is_new());
        assert!(!change(Some("4.0.0")).is_new());
    }

    #[test]
    fn test_detection_result_flags() {
        let mut result = DetectionResult::default();
        assert!(!result.has_errors());
        assert!(!result.has_warnings());

        result.issues.push(issue(Severity::Warning));
        assert!(!result.has_errors());
        assert!(result.has_warnings());

        result.issues.push(issue(Severity::Critical));
        assert!(result.has_errors());
    }
}
