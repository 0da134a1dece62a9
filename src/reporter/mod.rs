//! Report generation module.
//!
//! This module renders a list of issues in one of two formats:
//! - JSON: Machine-readable structured output
//! - Text: Human-readable CLI output
//!
//! Reports carry no timestamps, so identical issues always render to
//! identical output.
//!
//! # Example
//!
//! ```rust
//! use bumpwatch::reporter::Reporter;
//! use bumpwatch::{Config, ReportFormat};
//!
//! let config = Config::default();
//! let reporter = Reporter::new(&config);
//!
//! let json = reporter.generate(&[], ReportFormat::Json).unwrap();
//! assert_eq!(json, "[]");
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{Issue, ReportFormat};

pub use json::{JsonIssue, JsonReporter};
pub use text::TextReporter;

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(&self, issues: &[Issue], format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => JsonReporter::new(&self.config).generate(issues),
            ReportFormat::Text => TextReporter::new(&self.config).generate(issues),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Generate a report from a list of issues.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(&self, issues: &[Issue]) -> Result<String>;
}
