//! # Bumpwatch
//!
//! Detects risky Terraform/OpenTofu provider version changes between two
//! points in git history.
//!
//! Bumpwatch compares the `required_providers` declarations of each changed
//! file against the same file at a base revision and reports:
//!
//! - **Unbound constraints**: `>= 1.0`, `> 2`, `*` and anything that does not
//!   pin the major version
//! - **Version bumps**: major, minor and patch upgrades
//! - **Version downgrades**: moves to a lower version
//!
//! Severities are configurable per issue kind and per package, and selected
//! packages can be ignored entirely.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bumpwatch::{Config, Detector, ReportFormat};
//! use bumpwatch::reporter::Reporter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let detector = Detector::new(config.clone());
//!
//!     // Check every file changed since the previous commit
//!     let result = detector.detect(None, "HEAD~1").await?;
//!
//!     let report = Reporter::new(&config).generate(&result.issues, ReportFormat::Text)?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod reporter;
pub mod types;
pub mod vcs;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{BumpwatchError, Result};
pub use types::{
    DeclaredDependency, DetectionResult, Issue, IssueKind, ReportFormat, Severity, VersionChange,
};

use analyzer::ChangeAnalyzer;
use error::ErrorCollector;
use parser::{ParserRegistry, TerraformParser};
use std::path::{Path, PathBuf};
use vcs::{Detached, GitRepository, VersionControl};

/// Main detector that coordinates version control, parsing and analysis.
///
/// The `Detector` is the primary entry point for using Bumpwatch as a
/// library. For each file it:
/// - Parses the current content
/// - Parses the content at the base revision, if any
/// - Pairs the two and runs the analyzer
///
/// Per-file failures (unreadable file, invalid HCL, git errors) are logged
/// and the file is skipped.
///
/// # Example
///
/// ```rust,no_run
/// use bumpwatch::{Config, Detector};
/// use bumpwatch::vcs::GitRepository;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let repo = GitRepository::discover("./infra")?;
///     let detector = Detector::with_vcs(Config::default(), Box::new(repo));
///
///     let issues = detector.check_file("./infra/versions.tf", "main").await?;
///     println!("Found {} issues", issues.len());
///     Ok(())
/// }
/// ```
pub struct Detector {
    config: Config,
    parsers: ParserRegistry,
    vcs: Box<dyn VersionControl>,
}

impl Detector {
    /// Create a detector for the repository containing the current
    /// directory.
    ///
    /// Outside of a git repository every dependency is treated as new.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let vcs: Box<dyn VersionControl> = match GitRepository::discover(".") {
            Ok(repo) => Box::new(repo),
            Err(e) => {
                tracing::warn!(error = %e, "Not inside a git repository, history is unavailable");
                Box::new(Detached)
            }
        };
        Self::with_vcs(config, vcs)
    }

    /// Create a detector with an explicit version control collaborator.
    #[must_use]
    pub fn with_vcs(config: Config, vcs: Box<dyn VersionControl>) -> Self {
        let mut parsers = ParserRegistry::new();
        parsers.register(Box::new(TerraformParser::new()));
        Self {
            config,
            parsers,
            vcs,
        }
    }

    /// Files changed since `base_ref`, sorted.
    ///
    /// Version control failures are logged and yield an empty list.
    #[must_use]
    pub fn changed_files(&self, base_ref: &str) -> Vec<PathBuf> {
        match self.vcs.changed_files(base_ref) {
            Ok(mut files) => {
                files.sort();
                files
            }
            Err(e) => {
                tracing::warn!(base_ref, error = %e, "Failed to list changed files");
                Vec::new()
            }
        }
    }

    /// Pair the current declarations of `path` with those at `base_ref`.
    ///
    /// Returns an empty list for files no parser handles.
    ///
    /// # Errors
    ///
    /// Returns an error if the current file cannot be read or parsed.
    /// Missing or unparseable history is not an error: every declaration is
    /// then treated as new.
    pub async fn dependency_changes(
        &self,
        path: impl AsRef<Path>,
        base_ref: &str,
    ) -> Result<Vec<VersionChange>> {
        let path = path.as_ref();
        let Some(parser) = self.parsers.find_for(path) else {
            tracing::debug!(path = %path.display(), "No parser for file, skipping");
            return Ok(Vec::new());
        };

        let shown = display_path(path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                crate::err!(FileNotFound {
                    path: path.to_path_buf(),
                })
            } else {
                BumpwatchError::io(path, e, file!(), line!())
            }
        })?;
        let new_deps = parser.parse_content(&shown, &content)?;

        let old_deps = match self.vcs.file_at_revision(path, base_ref) {
            Ok(Some(old_content)) => parser
                .parse_content(&shown, &old_content)
                .unwrap_or_else(|e| {
                    tracing::warn!(
                        path = %shown.display(),
                        base_ref,
                        error = %e,
                        "Failed to parse previous revision, treating all dependencies as new"
                    );
                    Vec::new()
                }),
            Ok(None) => {
                tracing::debug!(
                    path = %shown.display(),
                    base_ref,
                    "File did not exist at base revision"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %shown.display(),
                    base_ref,
                    error = %e,
                    "Failed to read previous revision, treating all dependencies as new"
                );
                Vec::new()
            }
        };

        tracing::debug!(
            path = %shown.display(),
            parser = parser.name(),
            old = old_deps.len(),
            new = new_deps.len(),
            "Parsed dependency declarations"
        );

        Ok(ChangeAnalyzer::analyze(&old_deps, &new_deps))
    }

    /// Detect issues in a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn check_file(&self, path: impl AsRef<Path>, base_ref: &str) -> Result<Vec<Issue>> {
        let changes = self.dependency_changes(path, base_ref).await?;
        Ok(ChangeAnalyzer::new(&self.config).detect(&changes))
    }

    /// Detect issues across `files`, or across every file changed since
    /// `base_ref` when `files` is `None`.
    ///
    /// Files are processed in the given order. Recoverable per-file errors
    /// are logged and counted in [`DetectionResult::failed_files`].
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that are not specific to a file.
    pub async fn detect(
        &self,
        files: Option<Vec<PathBuf>>,
        base_ref: &str,
    ) -> Result<DetectionResult> {
        let files = files.unwrap_or_else(|| self.changed_files(base_ref));
        tracing::info!(files = files.len(), base_ref, "Starting detection");

        let analyzer = ChangeAnalyzer::new(&self.config);
        let mut result = DetectionResult::default();
        let mut errors = ErrorCollector::new();

        for file in files {
            if self.parsers.find_for(&file).is_none() {
                continue;
            }

            match self.dependency_changes(&file, base_ref).await {
                Ok(changes) => {
                    result.issues.extend(analyzer.detect(&changes));
                    result.files_checked.push(file);
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(path = %file.display(), error = %e, "Skipping file");
                    errors.add(e);
                }
                Err(e) => return Err(e),
            }
        }

        result.failed_files = errors.count();

        tracing::info!(
            files_checked = result.files_checked.len(),
            failed_files = result.failed_files,
            issues = result.issues.len(),
            "Detection complete"
        );

        Ok(result)
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("config", &self.config)
            .field("parsers", &self.parsers)
            .finish_non_exhaustive()
    }
}

/// Path as shown in reports: relative to the current directory when
/// possible.
fn display_path(path: &Path) -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
}
