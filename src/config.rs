//! Configuration module for Bumpwatch.
//!
//! This module handles loading configuration from:
//! - YAML configuration files (`bumpwatch.yaml`)
//! - Environment variables (expanded inside the YAML)
//! - CLI arguments
//!
//! A user file is a *partial* configuration. It is merged over the built-in
//! defaults by [`Config::merge`]:
//! - `rules` entries overlay the default rules key by key
//! - `ignore_packages` and `critical_packages` replace the defaults wholesale
//!   whenever the key is present, even when the value is empty or null
//!
//! # Configuration File Format
//!
//! ```yaml
//! # bumpwatch.yaml
//!
//! # Severity per issue kind
//! rules:
//!   major_version_bump: critical
//!   patch_version_downgrade: info
//!
//! # Packages that never produce issues
//! ignore_packages:
//!   - hashicorp/random
//!
//! # Severity overrides for any issue on these packages
//! critical_packages:
//!   hashicorp/aws: critical
//!
//! # Output options
//! output:
//!   colored: true
//!   pretty: true
//! ```

use crate::error::{BumpwatchError, Result};
use crate::types::{IssueKind, Severity};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

static BRACED_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex"));

static BARE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex"));

/// Output options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output in text reports.
    #[serde(default = "default_true")]
    pub colored: bool,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            pretty: true,
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Severity per issue kind. Covers every kind.
    pub rules: BTreeMap<IssueKind, Severity>,

    /// Packages that never produce issues.
    pub ignore_packages: BTreeSet<String>,

    /// Per-package severity that wins over `rules`.
    pub critical_packages: BTreeMap<String, Severity>,

    /// Output options.
    pub output: OutputOptions,
}

/// A partial configuration as written by a user.
///
/// `None` means the key was absent from the file. A key that is present
/// with a null value deserializes to `Some` of an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    /// Rule overrides, merged key by key.
    #[serde(deserialize_with = "null_as_default")]
    pub rules: BTreeMap<IssueKind, Severity>,

    /// Replacement ignore list.
    #[serde(deserialize_with = "present_or_null")]
    pub ignore_packages: Option<BTreeSet<String>>,

    /// Replacement critical-package map.
    #[serde(deserialize_with = "present_or_null")]
    pub critical_packages: Option<BTreeMap<String, Severity>>,

    /// Replacement output options.
    #[serde(deserialize_with = "present_or_null")]
    pub output: Option<OutputOptions>,
}

fn present_or_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?.unwrap_or_default()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_true() -> bool {
    true
}

/// Built-in severity for an issue kind.
#[must_use]
pub const fn default_severity(kind: IssueKind) -> Severity {
    match kind {
        IssueKind::MajorBump | IssueKind::MajorDowngrade => Severity::Critical,
        IssueKind::MinorBump
        | IssueKind::MinorDowngrade
        | IssueKind::PatchDowngrade
        | IssueKind::LooseConstraint => Severity::Warning,
        IssueKind::PatchBump => Severity::Info,
        IssueKind::UnboundVersion => Severity::Error,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: IssueKind::ALL
                .into_iter()
                .map(|kind| (kind, default_severity(kind)))
                .collect(),
            ignore_packages: BTreeSet::new(),
            critical_packages: BTreeMap::from([
                ("hashicorp/aws".to_string(), Severity::Critical),
                ("hashicorp/kubernetes".to_string(), Severity::Critical),
            ]),
            output: OutputOptions::default(),
        }
    }
}

impl Config {
    /// Merge a partial user configuration over a base configuration.
    ///
    /// Rules overlay key by key. Every other supplied key replaces the base
    /// value.
    #[must_use]
    pub fn merge(defaults: Self, overrides: ConfigOverrides) -> Self {
        let mut rules = defaults.rules;
        rules.extend(overrides.rules);

        Self {
            rules,
            ignore_packages: overrides.ignore_packages.unwrap_or(defaults.ignore_packages),
            critical_packages: overrides
                .critical_packages
                .unwrap_or(defaults.critical_packages),
            output: overrides.output.unwrap_or(defaults.output),
        }
    }

    /// Load configuration from a YAML string, merged over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or names an unknown issue
    /// kind or severity.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        let overrides = if expanded.trim().is_empty() {
            ConfigOverrides::default()
        } else {
            serde_yaml::from_str::<Option<ConfigOverrides>>(&expanded)
                .map_err(|e| {
                    BumpwatchError::config_parse(e.to_string(), Some(Box::new(e)), file!(), line!())
                })?
                .unwrap_or_default()
        };

        let config = Self::merge(Self::default(), overrides);
        config.validate()?;

        tracing::debug!(
            rules = config.rules.len(),
            ignore_packages = config.ignore_packages.len(),
            critical_packages = config.critical_packages.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Check values that YAML typing alone cannot catch.
    ///
    /// # Errors
    ///
    /// Returns [`BumpwatchError::ConfigValue`] for blank package names.
    pub fn validate(&self) -> Result<()> {
        if self.ignore_packages.iter().any(|p| p.trim().is_empty()) {
            return Err(crate::err!(ConfigValue {
                key: "ignore_packages".to_string(),
                message: "package names must not be empty".to_string(),
            }));
        }
        if self.critical_packages.keys().any(|p| p.trim().is_empty()) {
            return Err(crate::err!(ConfigValue {
                key: "critical_packages".to_string(),
                message: "package names must not be empty".to_string(),
            }));
        }
        Ok(())
    }

    /// Effective severity for an issue of `kind` on `package`.
    ///
    /// A critical-package entry wins over the rule for any kind.
    #[must_use]
    pub fn resolve_severity(&self, kind: IssueKind, package: &str) -> Severity {
        if let Some(severity) = self.critical_packages.get(package) {
            return *severity;
        }
        self.rules
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_severity(kind))
    }

    /// Returns true if `package` is on the ignore list.
    #[must_use]
    pub fn should_ignore(&self, package: &str) -> bool {
        self.ignore_packages.contains(package)
    }

    /// Merge CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, args: &crate::cli::CheckArgs) {
        if !args.ignore.is_empty() {
            self.ignore_packages.extend(args.ignore.iter().cloned());
        }
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r"# Bumpwatch Configuration File

# Severity per issue kind: info, warning, error or critical.
# Kinds left out keep their built-in severity.
rules:
  major_version_bump: critical
  minor_version_bump: warning
  patch_version_bump: info
  major_version_downgrade: critical
  minor_version_downgrade: warning
  patch_version_downgrade: warning
  unbound_version: error
  loose_constraint: warning

# Packages that never produce issues.
# Supplying this key replaces the built-in list.
ignore_packages: []

# Severity used for every issue on these packages.
# Supplying this key replaces the built-in map.
critical_packages:
  hashicorp/aws: critical
  hashicorp/kubernetes: critical

# Output options
output:
  colored: true
  pretty: true
"
        .to_string()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. Unset variables are left as written.
fn expand_env_vars(content: &str) -> String {
    let mut result = content.to_string();

    for re in [&*BRACED_VAR, &*BARE_VAR] {
        for cap in re.captures_iter(content) {
            if let Ok(value) = std::env::var(&cap[1]) {
                result = result.replace(&cap[0], &value);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rules.len(), IssueKind::ALL.len());
        assert_eq!(config.rules[&IssueKind::MajorBump], Severity::Critical);
        assert_eq!(config.rules[&IssueKind::UnboundVersion], Severity::Error);
        assert_eq!(config.rules[&IssueKind::PatchBump], Severity::Info);
        assert!(config.ignore_packages.is_empty());
        assert!(config.critical_packages.contains_key("hashicorp/aws"));
        assert!(config.critical_packages.contains_key("hashicorp/kubernetes"));
    }

    #[test]
    fn test_merge_rules_overlay() {
        let overrides = ConfigOverrides {
            rules: BTreeMap::from([(IssueKind::PatchDowngrade, Severity::Info)]),
            ..ConfigOverrides::default()
        };
        let config = Config::merge(Config::default(), overrides);

        assert_eq!(config.rules[&IssueKind::PatchDowngrade], Severity::Info);
        assert_eq!(config.rules[&IssueKind::MajorBump], Severity::Critical);
        assert_eq!(config.critical_packages, Config::default().critical_packages);
    }

    #[test]
    fn test_merge_replaces_ignore_list() {
        let defaults = Config {
            ignore_packages: BTreeSet::from(["a/one".to_string(), "b/two".to_string()]),
            ..Config::default()
        };
        let overrides = ConfigOverrides {
            ignore_packages: Some(BTreeSet::new()),
            ..ConfigOverrides::default()
        };

        let config = Config::merge(defaults, overrides);
        assert!(config.ignore_packages.is_empty());
    }

    #[test]
    fn test_merge_empty_overrides_keeps_defaults() {
        let config = Config::merge(Config::default(), ConfigOverrides::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_yaml_empty_critical_packages_replaces() {
        let config = Config::from_yaml("critical_packages: {}\n").unwrap();
        assert!(config.critical_packages.is_empty());

        let config = Config::from_yaml("critical_packages:\n").unwrap();
        assert!(config.critical_packages.is_empty());
    }

    #[test]
    fn test_from_yaml_partial_rules() {
        let yaml = r"
rules:
  minor_version_bump: error
ignore_packages:
  - hashicorp/random
";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.rules[&IssueKind::MinorBump], Severity::Error);
        assert_eq!(config.rules[&IssueKind::MajorBump], Severity::Critical);
        assert!(config.should_ignore("hashicorp/random"));
        assert!(!config.should_ignore("hashicorp/aws"));
        assert_eq!(config.critical_packages.len(), 2);
    }

    #[test]
    fn test_from_yaml_empty_document() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_from_yaml_unknown_kind_rejected() {
        let result = Config::from_yaml("rules:\n  giant_leap: critical\n");
        assert!(matches!(result, Err(BumpwatchError::ConfigParse { .. })));
    }

    #[test]
    fn test_from_yaml_blank_package_rejected() {
        let result = Config::from_yaml("ignore_packages:\n  - \"\"\n");
        assert!(matches!(result, Err(BumpwatchError::ConfigValue { .. })));
    }

    #[test]
    fn test_resolve_severity_critical_package_wins() {
        let config = Config::default();
        assert_eq!(
            config.resolve_severity(IssueKind::UnboundVersion, "hashicorp/aws"),
            Severity::Critical
        );
        assert_eq!(
            config.resolve_severity(IssueKind::UnboundVersion, "hashicorp/helm"),
            Severity::Error
        );
        assert_eq!(
            config.resolve_severity(IssueKind::PatchBump, "hashicorp/kubernetes"),
            Severity::Critical
        );
    }

    #[test]
    fn test_resolve_severity_falls_back_to_builtin() {
        let config = Config {
            rules: BTreeMap::new(),
            critical_packages: BTreeMap::new(),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_severity(IssueKind::MinorBump, "x/y"),
            Severity::Warning
        );
    }

    #[test]
    fn test_env_var_expansion() {
        let path = std::env::var("PATH").unwrap_or_default();
        assert_eq!(expand_env_vars("value: ${PATH}"), format!("value: {path}"));
        assert_eq!(
            expand_env_vars("value: ${BUMPWATCH_SURELY_UNSET_VAR}"),
            "value: ${BUMPWATCH_SURELY_UNSET_VAR}"
        );
        assert_eq!(expand_env_vars("no vars here"), "no vars here");
    }

    #[test]
    fn test_example_yaml_is_valid() {
        let config = Config::from_yaml(&Config::example_yaml()).unwrap();
        assert_eq!(config, Config::default());
    }
}
