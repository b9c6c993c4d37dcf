//! Migration driver
//!
//! Runs classify → extract → infer → reassemble for one document, then
//! verifies the rewritten block before handing the new text back.

use super::classify::{classify_block, line_text};
use super::extract::{Extraction, extract_fields};
use super::infer::{InferenceContext, InferredField, infer_missing};
use super::reassemble::{
    Reassembler, SubBlockLayout, clear_null_header, reindent, splice_inline,
};
use crate::config::{ConflictPolicy, MigrationConfig};
use crate::document::Document;
use crate::error::{MigrateError, MigrateResult};
use crate::formatting::RenderLayout;
use crate::validation::{RewritePlan, nested_keys, parse_mapping, verify_rewrite};
use std::collections::HashSet;
use tracing::debug;

const DEFAULT_INDENT: &str = "  ";

/// Result of migrating one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Document text after migration (the input itself when unchanged)
    pub text: String,
    /// Whether `text` differs from the input
    pub changed: bool,
    /// Top-level fields relocated under the nesting key, in field order
    pub moved: Vec<String>,
    /// Fields filled in by inference, in field order
    pub inferred: Vec<String>,
}

impl Migration {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changed: false,
            moved: Vec::new(),
            inferred: Vec::new(),
        }
    }
}

/// Moves configured top-level fields under the nesting key
///
/// A `Migrator` holds only configuration, so one instance can be shared
/// across any number of documents.
#[derive(Debug, Clone, Default)]
pub struct Migrator {
    config: MigrationConfig,
}

impl Migrator {
    /// Create a migrator from a configuration
    ///
    /// # Returns
    /// The migrator, or the first problem `MigrationConfig::validate` finds
    pub fn new(config: MigrationConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Migrate one document
    ///
    /// # Arguments
    /// * `text` - Full document text
    /// * `context` - Inference context for missing fields
    ///
    /// # Returns
    /// The migration result. Running it again on its own output yields
    /// `changed = false` and identical text. On error nothing is produced
    /// and the caller's text stays as it was.
    pub fn migrate(&self, text: &str, context: &InferenceContext) -> MigrateResult<Migration> {
        let config = &self.config;
        let nesting_key = config.nesting_key.as_str();

        let document = Document::parse(text)?;
        let before = parse_mapping(document.block())?;
        let nested = nested_keys(&before, nesting_key)?;

        let lines = classify_block(document.block());
        let mut extraction = extract_fields(&lines, |key| config.is_target(key))?;

        // Keys YAML reads as a target but no key line spells out plainly
        // (`? author`, `!!str author: x`, escaped quotes) cannot be cut out
        for name in config.target_names() {
            if before.contains_key(name) && !extraction.contains(name) {
                return Err(MigrateError::ambiguous(
                    name,
                    "not recognisable as a top-level key line",
                ));
            }
        }

        let mut replaced = Vec::new();
        let mut discarded = Vec::new();
        for name in config.target_names() {
            if !(extraction.contains(name) && nested.iter().any(|n| n == name)) {
                continue;
            }
            match config.conflict_policy {
                ConflictPolicy::Reject => {
                    return Err(MigrateError::ambiguous(
                        name,
                        format!("present both at top level and under '{nesting_key}'"),
                    ));
                }
                ConflictPolicy::PreferTopLevel => replaced.push(name.to_string()),
                ConflictPolicy::PreferNested => {
                    extraction.discard(name);
                    discarded.push(name.to_string());
                }
            }
        }

        let present: HashSet<String> = nested
            .iter()
            .cloned()
            .chain(extraction.fields.keys().cloned())
            .chain(discarded.iter().cloned())
            .collect();
        let inferred = infer_missing(&config.fields, &present, context);

        if extraction.is_empty() && inferred.is_empty() && discarded.is_empty() {
            debug!("frontmatter already migrated");
            return Ok(Migration::unchanged(text));
        }

        let layout = SubBlockLayout::scan(&extraction.remaining, nesting_key);
        let (block, moved) = match &layout {
            Some(layout) if layout.inline_value => {
                if let Some(name) = replaced.first() {
                    return Err(MigrateError::ambiguous(
                        name,
                        format!("cannot replace an entry of inline '{nesting_key}'"),
                    ));
                }
                let (entries, moved) = self.inline_entries(&extraction, &inferred)?;
                let block = splice_inline(&extraction.remaining, nesting_key, &entries)
                    .ok_or_else(|| {
                        MigrateError::ambiguous(
                            nesting_key,
                            "inline value is not a one-line flow mapping",
                        )
                    })?;
                (block, moved)
            }
            _ => {
                let cleared = layout
                    .as_ref()
                    .filter(|l| l.null_value)
                    .map(|l| (l.header, clear_null_header(extraction.remaining[l.header])));
                let mut remaining: Vec<&str> = extraction.remaining.clone();
                if let Some((header, line)) = &cleared {
                    remaining[*header] = line.as_str();
                }
                self.reassemble(
                    &document,
                    layout.as_ref(),
                    &remaining,
                    &extraction,
                    &inferred,
                    &replaced,
                )
            }
        };
        let null_header_cleared = layout.as_ref().is_some_and(|l| l.null_value);
        let inferred: Vec<String> = inferred.into_iter().map(|f| f.name).collect();

        verify_rewrite(
            &before,
            &block,
            nesting_key,
            &RewritePlan {
                moved: &moved,
                discarded: &discarded,
                replaced: &replaced,
                inferred: &inferred,
                targets: &config.target_names(),
                null_header_cleared,
            },
        )?;

        debug!(?moved, ?inferred, ?discarded, "frontmatter migrated");
        Ok(Migration {
            text: document.with_block(block).to_text(),
            changed: true,
            moved,
            inferred,
        })
    }

    /// Splice moved and inferred lines into a block-style sub-block
    fn reassemble(
        &self,
        document: &Document,
        layout: Option<&SubBlockLayout>,
        remaining: &[&str],
        extraction: &Extraction<'_>,
        inferred: &[InferredField],
        replaced: &[String],
    ) -> (String, Vec<String>) {
        let indent = layout.map_or(DEFAULT_INDENT, |l| l.indent.as_str());
        let sequence_indent = layout.and_then(|l| l.sequence_indent.as_deref());
        let render = RenderLayout {
            indent,
            sequence_indent: sequence_indent.unwrap_or(indent),
            style: self.config.sequence_style.resolve(sequence_indent.is_some()),
            line_ending: document.line_ending(),
        };

        let mut moved = Vec::new();
        let mut injected = Vec::new();
        for spec in &self.config.fields {
            if let Some(lines) = extraction.lines(&spec.name) {
                injected.extend(reindent(lines, indent));
                moved.push(spec.name.clone());
            } else if let Some(field) = inferred.iter().find(|f| f.name == spec.name) {
                injected.extend(field.render(&render));
            }
        }

        let block = Reassembler::new(
            &self.config.nesting_key,
            indent,
            &injected,
            document.line_ending(),
        )
        .replacing(replaced)
        .run(remaining);
        (block, moved)
    }

    /// Flow-mapping entries for a sub-block written inline
    ///
    /// Moved fields must fit on their key line; anything longer cannot be
    /// folded into a flow mapping without rewriting it.
    fn inline_entries(
        &self,
        extraction: &Extraction<'_>,
        inferred: &[InferredField],
    ) -> MigrateResult<(Vec<String>, Vec<String>)> {
        let nesting_key = &self.config.nesting_key;
        let mut entries = Vec::new();
        let mut moved = Vec::new();
        for spec in &self.config.fields {
            if let Some(lines) = extraction.lines(&spec.name) {
                let entry = match lines {
                    [line] => inline_entry(line),
                    _ => None,
                }
                .ok_or_else(|| {
                    MigrateError::ambiguous(
                        &spec.name,
                        format!("does not fit on one line inside inline '{nesting_key}'"),
                    )
                })?;
                entries.push(entry);
                moved.push(spec.name.clone());
            } else if let Some(field) = inferred.iter().find(|f| f.name == spec.name) {
                entries.push(field.render_inline());
            }
        }
        Ok((entries, moved))
    }
}

/// A one-line `key: value` field as a flow-mapping entry
fn inline_entry(raw: &str) -> Option<String> {
    let text = line_text(raw).trim_end();
    let value = text.split_once(':')?.1.trim();
    let foldable = !value.is_empty()
        && !value.starts_with(['|', '>', '#'])
        && !value.contains(" #");
    foldable.then(|| text.to_string())
}

/// Migrate one document with an ad-hoc configuration
///
/// Shorthand for `Migrator::new(config.clone())?.migrate(text, context)`.
pub fn migrate(
    text: &str,
    config: &MigrationConfig,
    context: &InferenceContext,
) -> anyhow::Result<Migration> {
    let migration = Migrator::new(config.clone())?.migrate(text, context)?;
    Ok(migration)
}
