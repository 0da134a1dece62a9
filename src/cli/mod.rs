//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `check`: Check changed (or given) files against a base revision
//! - `check-file`: Check a single file
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Check files changed since the previous commit
//! bumpwatch check
//!
//! # Compare against main and emit JSON
//! bumpwatch check --base-ref main --format json --output report.json
//!
//! # Check specific files
//! bumpwatch check --files versions.tf --files modules/net/providers.tf
//!
//! # Check a single file
//! bumpwatch check-file versions.tf
//!
//! # Initialize configuration
//! bumpwatch init
//!
//! # Validate configuration
//! bumpwatch validate bumpwatch.yaml
//! ```

use crate::types::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default revision to compare against.
pub const DEFAULT_BASE_REF: &str = "HEAD~1";

/// Bumpwatch - find dangerous Terraform provider version changes.
#[derive(Parser, Debug)]
#[command(
    name = "bumpwatch",
    author,
    version,
    about = "Find dangerous Terraform provider version changes",
    long_about = "Bumpwatch compares Terraform provider requirements against a git revision \
                  and flags unbound constraints, version bumps and downgrades."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "BUMPWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check changed files (or the given files) for risky version changes
    #[command(visible_alias = "c")]
    Check(CheckArgs),

    /// Check a single file for risky version changes
    CheckFile(CheckFileArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Specific files to check (default: files changed since the base ref)
    #[arg(long = "files", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Git revision to compare against
    #[arg(long, default_value = DEFAULT_BASE_REF, value_name = "REF")]
    pub base_ref: String,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Packages to ignore, in addition to the configured ones
    #[arg(long = "ignore", value_name = "PACKAGE")]
    pub ignore: Vec<String>,
}

/// Arguments for the check-file command.
#[derive(Args, Debug)]
pub struct CheckFileArgs {
    /// File to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Git revision to compare against
    #[arg(long, default_value = DEFAULT_BASE_REF, value_name = "REF")]
    pub base_ref: String,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration file to validate
    #[arg(value_name = "FILE", default_value = "bumpwatch.yaml")]
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_defaults() {
        let cli = Cli::parse_from(["bumpwatch", "check"]);
        match cli.command {
            Commands::Check(args) => {
                assert!(args.files.is_empty());
                assert_eq!(args.base_ref, "HEAD~1");
                assert_eq!(args.format, ReportFormat::Text);
                assert!(args.output.is_none());
                assert!(args.ignore.is_empty());
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_check_with_options() {
        let cli = Cli::parse_from([
            "bumpwatch",
            "check",
            "--files",
            "versions.tf",
            "--files",
            "main.tf",
            "--base-ref",
            "main",
            "-f",
            "json",
            "--ignore",
            "hashicorp/random",
        ]);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.base_ref, "main");
                assert_eq!(args.format, ReportFormat::Json);
                assert_eq!(args.ignore, vec!["hashicorp/random".to_string()]);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_check_file() {
        let cli = Cli::parse_from(["bumpwatch", "check-file", "versions.tf", "--base-ref", "v1.0"]);
        match cli.command {
            Commands::CheckFile(args) => {
                assert_eq!(args.file, PathBuf::from("versions.tf"));
                assert_eq!(args.base_ref, "v1.0");
            }
            _ => panic!("Expected CheckFile command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["bumpwatch", "-vv", "--config", "custom.yaml", "init"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert!(matches!(cli.command, Commands::Init));
    }

    #[test]
    fn test_validate_default_path() {
        let cli = Cli::parse_from(["bumpwatch", "validate"]);
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.file, PathBuf::from("bumpwatch.yaml")),
            _ => panic!("Expected Validate command"),
        }
    }
}
