//! Dependency declaration parsing.
//!
//! Parsers turn the text of a file into a list of
//! [`DeclaredDependency`] records. Each parser advertises the file-name
//! patterns it understands, and the [`ParserRegistry`] picks one per file.
//!
//! # Supported Constructs
//!
//! - `terraform.required_providers` blocks, both the object form
//!   (`{ source, version }`) and the legacy string form
//!
//! # Example
//!
//! ```rust
//! use bumpwatch::parser::{ParserRegistry, TerraformParser};
//! use std::path::Path;
//!
//! let mut registry = ParserRegistry::new();
//! registry.register(Box::new(TerraformParser::new()));
//!
//! let parser = registry.find_for(Path::new("infra/versions.tf")).unwrap();
//! assert_eq!(parser.name(), "Terraform");
//! ```

mod hcl;

pub use hcl::TerraformParser;

use crate::types::DeclaredDependency;
use std::path::Path;

/// Trait for extracting dependency declarations from file content.
pub trait DependencyParser: Send + Sync {
    /// Human-readable parser name. Registry key.
    fn name(&self) -> &str;

    /// Glob patterns matched against a file name.
    fn supported_files(&self) -> &[&str];

    /// Parse a single file's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be parsed.
    fn parse_content(&self, path: &Path, content: &str) -> crate::Result<Vec<DeclaredDependency>>;

    /// Returns true if any supported pattern matches the file name.
    fn supports(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.supported_files().iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(file_name))
                .unwrap_or(false)
        })
    }
}

/// Dispatch table of parsers keyed by name.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DependencyParser>>,
}

impl ParserRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parser. A parser with the same name is replaced.
    pub fn register(&mut self, parser: Box<dyn DependencyParser>) {
        if let Some(existing) = self.parsers.iter_mut().find(|p| p.name() == parser.name()) {
            tracing::debug!(parser = parser.name(), "Replacing registered parser");
            *existing = parser;
        } else {
            tracing::debug!(parser = parser.name(), "Registering parser");
            self.parsers.push(parser);
        }
    }

    /// First registered parser whose patterns match the file name.
    #[must_use]
    pub fn find_for(&self, path: &Path) -> Option<&dyn DependencyParser> {
        self.parsers
            .iter()
            .find(|p| p.supports(path))
            .map(|p| &**p)
    }

    /// Names of all registered parsers, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parsers", &self.names())
            .finish()
    }
}
