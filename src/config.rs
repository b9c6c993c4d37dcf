//! Migration configuration
//!
//! Which fields move, where they move to, and how missing ones are filled in
//! is all configuration. Nothing in the migration core hardcodes a field
//! name, so new fields can be added from a TOML file alone:
//!
//! ```toml
//! nesting_key = "metadata"
//! sequence_style = "auto"
//! conflict_policy = "reject"
//!
//! [[fields]]
//! name = "author"
//! infer = { strategy = "namespace", fallback = "unknown" }
//!
//! [[fields]]
//! name = "license"
//! ```

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn default_nesting_key() -> String {
    "metadata".to_string()
}

fn default_fallback() -> String {
    "unknown".to_string()
}

fn default_max_segments() -> usize {
    3
}

fn default_sentinel() -> String {
    "curated".to_string()
}

/// How a missing field gets its default value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Inference {
    /// Never inferred; migrated only when present
    #[default]
    None,
    /// The namespace path segment, or `fallback` when the path has none
    Namespace {
        #[serde(default = "default_fallback")]
        fallback: String,
    },
    /// The per-document source, else `default`, else nothing
    Source {
        #[serde(default)]
        default: Option<String>,
    },
    /// Tags derived from the hyphen-separated item name plus a sentinel tag
    Tags {
        #[serde(default = "default_max_segments")]
        max_segments: usize,
        #[serde(default = "default_sentinel")]
        sentinel: String,
    },
}

/// A field subject to migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it appears in the frontmatter
    pub name: String,
    /// Inference strategy used when the field is absent everywhere
    #[serde(default)]
    pub infer: Inference,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, infer: Inference) -> Self {
        Self {
            name: name.into(),
            infer,
        }
    }
}

/// Rendering style for inferred list values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStyle {
    /// Follow the nested sub-block: block style if it already has `- item`
    /// lines, flow style otherwise
    #[default]
    Auto,
    /// `tags: [a, b]`
    Flow,
    /// `tags:` followed by one `- item` line per value
    Block,
}

impl SequenceStyle {
    /// Settle `Auto` against what the nested sub-block already uses
    pub fn resolve(self, sub_block_uses_block_sequences: bool) -> Self {
        match self {
            Self::Auto if sub_block_uses_block_sequences => Self::Block,
            Self::Auto => Self::Flow,
            other => other,
        }
    }
}

/// Precedence when a field exists both at top level and under the nesting key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Reject the document
    #[default]
    Reject,
    /// The top-level value replaces the nested one
    PreferTopLevel,
    /// The nested value stays; the top-level lines are dropped
    PreferNested,
}

/// Complete migration configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Reserved key under which fields are nested
    #[serde(default = "default_nesting_key")]
    pub nesting_key: String,
    /// Target fields, in the order they are written under the nesting key
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub sequence_style: SequenceStyle,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(
            "author",
            Inference::Namespace {
                fallback: default_fallback(),
            },
        ),
        FieldSpec::new("repo", Inference::Source { default: None }),
        FieldSpec::new(
            "tags",
            Inference::Tags {
                max_segments: default_max_segments(),
                sentinel: default_sentinel(),
            },
        ),
        FieldSpec::new("displayName", Inference::None),
        FieldSpec::new("version", Inference::None),
    ]
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            nesting_key: default_nesting_key(),
            fields: default_fields(),
            sequence_style: SequenceStyle::default(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

impl MigrationConfig {
    /// Load and validate a configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for names the line classifier cannot handle
    pub fn validate(&self) -> Result<()> {
        check_name("nesting_key", &self.nesting_key)?;
        ensure!(!self.fields.is_empty(), "at least one field must be configured");

        let mut seen = HashSet::new();
        for field in &self.fields {
            check_name("field name", &field.name)?;
            if field.name == self.nesting_key {
                bail!(
                    "field '{}' cannot be migrated into itself (it is the nesting key)",
                    field.name
                );
            }
            if !seen.insert(field.name.as_str()) {
                bail!("field '{}' is configured more than once", field.name);
            }
            if let Inference::Tags { max_segments, .. } = field.infer {
                ensure!(
                    max_segments > 0,
                    "field '{}': max_segments must be at least 1",
                    field.name
                );
            }
        }
        Ok(())
    }

    /// Target field names in injection order
    pub fn target_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Whether `name` is a target field
    pub fn is_target(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

fn check_name(what: &str, name: &str) -> Result<()> {
    ensure!(!name.is_empty(), "{what} must not be empty");
    ensure!(
        !name.contains(':') && !name.chars().any(char::is_whitespace),
        "{what} '{name}' must not contain ':' or whitespace"
    );
    Ok(())
}
