//! Optional TOML configuration for custom rename tables.
//!
//! ```toml
//! [meta]
//! name = "my-mapping"
//! label_keyword = "accessible_name"
//! import_module = "tkaria11y.widgets"
//!
//! [[rename]]
//! source = "tk.Button"
//! target = "AccessibleButton"
//! ```

use crate::table::{RenameEntry, RenameTable, DEFAULT_IMPORT_MODULE, DEFAULT_LABEL_KEYWORD};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TableConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default, rename = "rename")]
    pub renames: Vec<RenameRule>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_label_keyword")]
    pub label_keyword: String,
    #[serde(default = "default_import_module")]
    pub import_module: String,
}

fn default_label_keyword() -> String {
    DEFAULT_LABEL_KEYWORD.to_string()
}

fn default_import_module() -> String {
    DEFAULT_IMPORT_MODULE.to_string()
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            label_keyword: default_label_keyword(),
            import_module: default_import_module(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenameRule {
    pub source: String,
    pub target: String,
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.renames.is_empty() {
            issues.push(ValidationIssue::EmptyRenameList);
        }

        if self.meta.label_keyword.trim().is_empty() {
            issues.push(ValidationIssue::MissingField {
                rule: None,
                field: "meta.label_keyword",
            });
        }
        if self.meta.import_module.trim().is_empty() {
            issues.push(ValidationIssue::MissingField {
                rule: None,
                field: "meta.import_module",
            });
        }

        for rule in &self.renames {
            if rule.source.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule: Some(rule.target.clone()),
                    field: "source",
                });
            }
            if rule.target.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule: Some(rule.source.clone()),
                    field: "target",
                });
            }
        }

        // Targets must stay disjoint from source keys: a target that is
        // also a source would be rewritten again on the next pass,
        // breaking idempotence.
        for rule in &self.renames {
            if self.renames.iter().any(|other| other.source == rule.target) {
                issues.push(ValidationIssue::TargetCollidesWithSource {
                    target: rule.target.clone(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Build the immutable rename table this config describes.
    pub fn into_table(self) -> RenameTable {
        let entries = self
            .renames
            .into_iter()
            .map(|rule| RenameEntry {
                source: rule.source,
                target: rule.target,
            })
            .collect();
        RenameTable::from_entries(entries, self.meta.label_keyword, self.meta.import_module)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(
                    f,
                    "failed to read rename config from {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse rename config TOML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse rename config TOML: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid rename config ({}): {}", path.display(), source),
                None => write!(f, "invalid rename config: {}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<TableConfig, ConfigError> {
    let config: TableConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<TableConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyRenameList,
    MissingField {
        rule: Option<String>,
        field: &'static str,
    },
    TargetCollidesWithSource {
        target: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyRenameList => write!(f, "config contains no rename rules"),
            ValidationIssue::MissingField { rule, field } => match rule {
                Some(rule) => write!(f, "rename rule '{rule}' missing required field '{field}'"),
                None => write!(f, "config missing required field '{field}'"),
            },
            ValidationIssue::TargetCollidesWithSource { target } => write!(
                f,
                "target '{target}' is also a source key; targets must be disjoint from sources"
            ),
        }
    }
}
