//! Terraform provider requirement parser built on `hcl-rs`.

use super::DependencyParser;
use crate::analyzer::extract_version;
use crate::error::Result;
use crate::types::DeclaredDependency;
use hcl::{Block, Body, Expression};
use std::path::Path;

const SUPPORTED_FILES: &[&str] = &["*.tf", "versions.tf", "main.tf", "providers.tf"];

/// Parser for `terraform { required_providers { ... } }` blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerraformParser;

impl TerraformParser {
    /// Create a new Terraform parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DependencyParser for TerraformParser {
    fn name(&self) -> &str {
        "Terraform"
    }

    fn supported_files(&self) -> &[&str] {
        SUPPORTED_FILES
    }

    fn parse_content(&self, path: &Path, content: &str) -> Result<Vec<DeclaredDependency>> {
        let body: Body = hcl::from_str(content).map_err(|e| {
            crate::err!(HclParse {
                file: path.to_path_buf(),
                message: e.to_string(),
            })
        })?;

        let mut dependencies = Vec::new();
        for structure in body.into_inner() {
            if let hcl::Structure::Block(block) = structure {
                if block.identifier.as_str() == "terraform" {
                    dependencies.extend(parse_terraform_block(&block, path));
                }
            }
        }

        tracing::debug!(
            file = %path.display(),
            dependencies = dependencies.len(),
            "Parsed provider requirements"
        );

        Ok(dependencies)
    }
}

/// Collect provider requirements from a `terraform` block.
fn parse_terraform_block(block: &Block, file_path: &Path) -> Vec<DeclaredDependency> {
    let mut dependencies = Vec::new();

    for nested_block in block.body.blocks() {
        if nested_block.identifier.as_str() != "required_providers" {
            continue;
        }

        for attr in nested_block.body.attributes() {
            let local_name = attr.key.as_str();
            let Some((source, constraint)) = parse_provider_requirement(&attr.expr) else {
                tracing::debug!(
                    file = %file_path.display(),
                    provider = local_name,
                    "Provider has no version constraint, skipping"
                );
                continue;
            };

            let extracted_version =
                extract_version(&constraint).unwrap_or_else(|| constraint.clone());

            dependencies.push(DeclaredDependency {
                package_name: source.unwrap_or_else(|| local_name.to_string()),
                version_constraint: constraint,
                extracted_version,
                file_path: file_path.to_path_buf(),
            });
        }
    }

    dependencies
}

/// Parse a provider requirement expression into `(source, version)`.
///
/// Returns `None` when no version constraint is present.
fn parse_provider_requirement(expr: &Expression) -> Option<(Option<String>, String)> {
    match expr {
        // Legacy form, before Terraform 0.13:
        //   aws = ">= 4.0"
        Expression::String(version) => Some((None, version.clone())),

        Expression::Object(obj) => {
            let mut source = None;
            let mut version = None;

            for (key, value) in obj {
                match object_key_to_string(key).as_str() {
                    "source" => source = expression_to_string(value),
                    "version" => version = expression_to_string(value),
                    _ => {}
                }
            }

            version.map(|v| (source, v))
        }

        _ => None,
    }
}

/// Convert an expression to a string if possible.
fn expression_to_string(expr: &Expression) -> Option<String> {
    match expr {
        Expression::String(s) => Some(s.clone()),
        Expression::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Convert an object key to a string.
fn object_key_to_string(key: &hcl::ObjectKey) -> String {
    match key {
        hcl::ObjectKey::Identifier(id) => id.as_str().to_string(),
        hcl::ObjectKey::Expression(expr) => expression_to_string(expr).unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BumpwatchError;
    use pretty_assertions::assert_eq;

    fn parse(content: &str) -> Vec<DeclaredDependency> {
        TerraformParser::new()
            .parse_content(Path::new("versions.tf"), content)
            .unwrap()
    }

    #[test]
    fn test_parse_required_providers() {
        let deps = parse(
            r#"
terraform {
  required_providers {
    aws = {
      source  = "hashicorp/aws"
      version = ">= 4.0, < 6.0"
    }
    random = {
      source  = "hashicorp/random"
      version = "~> 3.0"
    }
  }
}
"#,
        );

        assert_eq!(deps.len(), 2);
        assert_eq!(
            deps[0],
            DeclaredDependency {
                package_name: "hashicorp/aws".to_string(),
                version_constraint: ">= 4.0, < 6.0".to_string(),
                extracted_version: "4.0".to_string(),
                file_path: Path::new("versions.tf").to_path_buf(),
            }
        );
        assert_eq!(deps[1].package_name, "hashicorp/random");
        assert_eq!(deps[1].extracted_version, "3.0");
    }

    #[test]
    fn test_source_falls_back_to_local_name() {
        let deps = parse(
            r#"
terraform {
  required_providers {
    helm = {
      version = "*"
    }
  }
}
"#,
        );

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].package_name, "helm");
        assert_eq!(deps[0].version_constraint, "*");
        assert_eq!(deps[0].extracted_version, "*");
    }

    #[test]
    fn test_legacy_string_form() {
        let deps = parse(
            r#"
terraform {
  required_providers {
    aws = ">= 4.0"
  }
}
"#,
        );

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].package_name, "aws");
        assert_eq!(deps[0].version_constraint, ">= 4.0");
    }

    #[test]
    fn test_provider_without_version_skipped() {
        let deps = parse(
            r#"
terraform {
  required_version = ">= 1.5"
  required_providers {
    archive = {
      source = "hashicorp/archive"
    }
    tls = {
      source  = "hashicorp/tls"
      version = "= 4.0.4"
    }
  }
}
"#,
        );

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].package_name, "hashicorp/tls");
    }

    #[test]
    fn test_other_blocks_ignored() {
        let deps = parse(
            r#"
provider "aws" {
  region = "eu-west-1"
}

resource "aws_s3_bucket" "logs" {
  bucket = "logs"
}

module "vpc" {
  source  = "terraform-aws-modules/vpc/aws"
  version = "5.0.0"
}
"#,
        );
        assert!(deps.is_empty());
    }

    #[test]
    fn test_multiple_terraform_blocks_keep_order() {
        let deps = parse(
            r#"
terraform {
  required_providers {
    google = {
      source  = "hashicorp/google"
      version = "~> 5.0"
    }
  }
}

terraform {
  required_providers {
    azurerm = {
      source  = "hashicorp/azurerm"
      version = "~> 3.0"
    }
  }
}
"#,
        );

        let names: Vec<_> = deps.iter().map(|d| d.package_name.as_str()).collect();
        assert_eq!(names, vec!["hashicorp/google", "hashicorp/azurerm"]);
    }

    #[test]
    fn test_parse_invalid_hcl() {
        let result = TerraformParser::new().parse_content(
            Path::new("broken.tf"),
            "terraform { required_providers { aws = {",
        );
        assert!(matches!(result, Err(BumpwatchError::HclParse { .. })));
    }
}
