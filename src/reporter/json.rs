//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{Issue, IssueKind, Severity};
use serde::Serialize;

/// JSON report generator.
///
/// Emits a JSON array with one object per issue.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub const fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, issues: &[Issue]) -> Result<String> {
        let report: Vec<JsonIssue<'_>> = issues.iter().map(JsonIssue::from).collect();

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };

        json.map_err(|e| {
            crate::err!(ReportGeneration {
                message: format!("Failed to serialize JSON report: {e}"),
            })
        })
    }
}

/// One issue as it appears in a JSON report.
#[derive(Debug, Serialize)]
pub struct JsonIssue<'a> {
    /// Severity, lowercase
    pub severity: Severity,
    /// Issue kind wire name
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// Human-readable message
    pub message: &'a str,
    /// File the dependency is declared in
    pub file: String,
    /// Package name
    pub package: &'a str,
    /// Suggested fix, `null` when absent
    pub suggestion: Option<&'a str>,
}

impl<'a> From<&'a Issue> for JsonIssue<'a> {
    fn from(issue: &'a Issue) -> Self {
        Self {
            severity: issue.severity,
            kind: issue.kind,
            message: &issue.message,
            file: issue.change.file_path.display().to_string(),
            package: &issue.change.package_name,
            suggestion: issue.suggestion.as_deref(),
        }
    }
}
