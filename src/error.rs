//! Error types for Bumpwatch.
//!
//! This module defines the error hierarchy using `thiserror`. Errors carry
//! the source location where they were raised so that a failing CI run can
//! be traced back without a backtrace.
//!
//! # Error Categories
//!
//! - **IO errors**: reading working-tree files
//! - **Parse errors**: HCL parsing failures
//! - **Git errors**: revision lookup, blob access
//! - **Config errors**: invalid configuration files
//! - **Report errors**: serialization of reports
//!
//! The classification core never produces errors: unparseable versions and
//! malformed constraints are reported as `None`. Errors only flow through the
//! collaborators (filesystem, git, parser) and are swallowed per file by the
//! [`Detector`](crate::Detector).
//!
//! # Example
//!
//! ```rust
//! use bumpwatch::error::{BumpwatchError, Result};
//!
//! fn read_file(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .map_err(|e| BumpwatchError::io(path, e, file!(), line!()))
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(Git { message: "bad revision".to_string() }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::BumpwatchError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for Bumpwatch operations.
pub type Result<T> = std::result::Result<T, BumpwatchError>;

/// The main error type for Bumpwatch.
#[derive(Error, Debug)]
pub enum BumpwatchError {
    // =========================================================================
    // I/O and File System Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// File not found.
    #[error("File not found: {path} ({src_path}:{src_line})")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // HCL Parsing Errors
    // =========================================================================
    /// HCL parsing error.
    #[error("Failed to parse HCL in '{file}' ({src_path}:{src_line}): {message}")]
    HclParse {
        /// The file being parsed
        file: PathBuf,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Git Errors
    // =========================================================================
    /// Git operation error.
    #[error("Git error ({src_path}:{src_line}): {message}")]
    Git {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Revision could not be resolved.
    #[error("Unknown revision '{revision}' ({src_path}:{src_line}): {message}")]
    UnknownRevision {
        /// The revision that failed to resolve
        revision: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}' ({src_path}:{src_line}): {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Report Errors
    // =========================================================================
    /// Report generation error.
    #[error("Failed to generate report ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },
}

impl BumpwatchError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
            src_path,
            src_line,
        }
    }

    /// Creates a `Git` error.
    #[must_use]
    pub fn git(message: String, src_path: &'static str, src_line: u32) -> Self {
        Self::Git {
            message,
            src_path,
            src_line,
        }
    }

    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::ConfigParse {
            message,
            source,
            src_path,
            src_line,
        }
    }

    /// Determines if the error only affects a single file, so a multi-file
    /// run can skip that file and continue.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::FileNotFound { .. }
                | Self::HclParse { .. }
                | Self::Git { .. }
                | Self::UnknownRevision { .. }
        )
    }

    /// Returns the process exit code for a fatal error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => 13,
            Self::FileNotFound { .. } => 14,
            Self::ConfigParse { .. } => 18,
            Self::ConfigValue { .. } => 19,
            _ => 1,
        }
    }
}

/// A utility for collecting per-file errors during a detection run.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<BumpwatchError>,
}

impl ErrorCollector {
    /// Create a new error collector.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn add(&mut self, error: BumpwatchError) {
        self.errors.push(error);
    }

    /// Get the number of collected errors.
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_err_macro_records_location() {
        let error = crate::err!(Git {
            message: "boom".to_string(),
        });
        match error {
            BumpwatchError::Git { src_path, src_line, .. } => {
                assert!(src_path.ends_with("error.rs"));
                assert!(src_line > 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_recoverable_classification() {
        let parse = crate::err!(HclParse {
            file: PathBuf::from("main.tf"),
            message: "unexpected token".to_string(),
        });
        assert!(parse.is_recoverable());

        let config = BumpwatchError::config_parse("bad yaml".to_string(), None, file!(), line!());
        assert!(!config.is_recoverable());
        assert_eq!(config.exit_code(), 18);
    }

    #[test]
    fn test_collector() {
        let mut collector = ErrorCollector::new();
        collector.add(BumpwatchError::git("one".to_string(), file!(), line!()));
        collector.add(BumpwatchError::git("two".to_string(), file!(), line!()));
        assert_eq!(collector.count(), 2);
    }

    #[test]
    fn test_exit_codes() {
        let missing = crate::err!(FileNotFound {
            path: PathBuf::from("versions.tf"),
        });
        assert_eq!(missing.exit_code(), 14);

        let value = crate::err!(ConfigValue {
            key: "ignore_packages".to_string(),
            message: "empty".to_string(),
        });
        assert_eq!(value.exit_code(), 19);
        assert_eq!(BumpwatchError::git("x".to_string(), file!(), line!()).exit_code(), 1);
    }
}
