//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{Issue, Severity};
use colored::Colorize;

/// Text report generator for CLI output.
///
/// Each issue renders as:
///
/// ```text
/// 🚨 CRITICAL: Major Version Bump detected: hashicorp/aws changed from 4.0.0 to 5.0.0
///    File: versions.tf
///    Package: hashicorp/aws
///    Suggestion: Review breaking changes in hashicorp/aws changelog between versions 4.0.0 and 5.0.0
/// ```
///
/// followed by a blank line.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub const fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
        }
    }

    /// One-line summary of the issues, or `None` when there are none.
    #[must_use]
    pub fn summary(issues: &[Issue]) -> Option<String> {
        if issues.is_empty() {
            return None;
        }

        let failures = issues.iter().filter(|i| i.severity.is_failure()).count();
        if failures > 0 {
            Some(format!("❌ Found {failures} critical/error issues"))
        } else {
            Some(format!("⚠️  Found {} warnings", issues.len()))
        }
    }

    fn severity_label(&self, severity: Severity) -> String {
        let label = severity.to_string();
        if !self.use_colors {
            return label;
        }

        match severity {
            Severity::Critical => label.red().bold().to_string(),
            Severity::Error => label.red().to_string(),
            Severity::Warning => label.yellow().to_string(),
            Severity::Info => label.blue().to_string(),
        }
    }

    fn format_issue(&self, issue: &Issue) -> String {
        let mut output = format!(
            "{} {}: {}\n",
            issue.severity.emoji(),
            self.severity_label(issue.severity),
            issue.message
        );
        output.push_str(&format!("   File: {}\n", issue.change.file_path.display()));
        output.push_str(&format!("   Package: {}\n", issue.change.package_name));
        if let Some(suggestion) = &issue.suggestion {
            output.push_str(&format!("   Suggestion: {suggestion}\n"));
        }
        output.push('\n');
        output
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, issues: &[Issue]) -> Result<String> {
        let mut output = String::new();

        for issue in issues {
            output.push_str(&self.format_issue(issue));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IssueKind, VersionChange};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn issue(severity: Severity, suggestion: Option<&str>) -> Issue {
        Issue {
            severity,
            kind: IssueKind::UnboundVersion,
            message: "Unbound version constraint '*' for hashicorp/helm".to_string(),
            change: VersionChange {
                package_name: "hashicorp/helm".to_string(),
                old_version: None,
                new_version: "*".to_string(),
                old_constraint: None,
                new_constraint: "*".to_string(),
                file_path: PathBuf::from("main.tf"),
            },
            suggestion: suggestion.map(String::from),
        }
    }

    fn plain() -> TextReporter {
        let mut config = Config::default();
        config.output.colored = false;
        TextReporter::new(&config)
    }

    #[test]
    fn test_text_layout() {
        let output = plain()
            .generate(&[issue(Severity::Error, Some("Pin it"))])
            .unwrap();

        assert_eq!(
            output,
            "❌ ERROR: Unbound version constraint '*' for hashicorp/helm\n   \
             File: main.tf\n   Package: hashicorp/helm\n   Suggestion: Pin it\n\n"
        );
    }

    #[test]
    fn test_suggestion_line_omitted_when_absent() {
        let output = plain().generate(&[issue(Severity::Info, None)]).unwrap();
        assert!(output.starts_with("ℹ️ INFO: "));
        assert!(!output.contains("Suggestion:"));
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(plain().generate(&[]).unwrap(), "");
    }

    #[test]
    fn test_summary() {
        assert_eq!(TextReporter::summary(&[]), None);
        assert_eq!(
            TextReporter::summary(&[issue(Severity::Warning, None)]).as_deref(),
            Some("⚠️  Found 1 warnings")
        );
        let mixed = [issue(Severity::Warning, None), issue(Severity::Critical, None)];
        assert_eq!(
            TextReporter::summary(&mixed).as_deref(),
            Some("❌ Found 1 critical/error issues")
        );
    }
}
