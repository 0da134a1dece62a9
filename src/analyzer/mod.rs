//! Version change analysis module.
//!
//! This module turns the dependency declarations of a file at two
//! revisions into a list of issues.
//!
//! # Analysis Types
//!
//! 1. **Unbound Constraints**: Flags constraints that admit future major
//!    versions, like `>= 1.0` or `*`.
//!
//! 2. **Version Bumps**: Detects major, minor and patch upgrades.
//!
//! 3. **Version Downgrades**: Detects moves to a lower version.
//!
//! Every check is a pure function of its inputs. Unparseable versions are
//! skipped silently rather than reported.
//!
//! # Example
//!
//! ```rust
//! use bumpwatch::analyzer::ChangeAnalyzer;
//! use bumpwatch::types::DeclaredDependency;
//! use bumpwatch::Config;
//!
//! let dep = |c: &str| DeclaredDependency {
//!     package_name: "hashicorp/aws".to_string(),
//!     version_constraint: c.to_string(),
//!     extracted_version: c.trim_start_matches("~> ").to_string(),
//!     file_path: "versions.tf".into(),
//! };
//!
//! let config = Config::default();
//! let changes = ChangeAnalyzer::analyze(&[dep("~> 4.0")], &[dep("~> 5.0")]);
//! let issues = ChangeAnalyzer::new(&config).detect(&changes);
//! assert_eq!(issues.len(), 1);
//! ```

mod change;
mod constraint;
mod version;

pub use change::ChangeAnalyzer;
pub use constraint::{extract_version, is_bounded, is_wildcard, WILDCARD};
pub use version::{compare_versions, parse_version, VersionDelta};
