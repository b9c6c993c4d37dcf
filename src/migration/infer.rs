//! Default values for target fields that are absent everywhere
//!
//! Pure functions of the configuration and a caller-supplied context; the
//! context is usually derived from where the document lives.

use crate::config::{FieldSpec, Inference};
use crate::formatting::{
    RenderLayout, render_flow_item, render_list, render_scalar, render_scalar_field,
};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path};

/// A value to write for a missing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferredValue {
    Scalar(String),
    List(Vec<String>),
}

/// A missing field together with its inferred value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredField {
    pub name: String,
    pub value: InferredValue,
}

impl InferredField {
    /// Render as lines for the nested sub-block
    pub fn render(&self, layout: &RenderLayout<'_>) -> Vec<String> {
        match &self.value {
            InferredValue::Scalar(value) => vec![render_scalar_field(&self.name, value, layout)],
            InferredValue::List(items) => render_list(&self.name, items, layout),
        }
    }

    /// Render as a `name: value` entry of a flow mapping
    pub fn render_inline(&self) -> String {
        match &self.value {
            InferredValue::Scalar(value) => format!("{}: {}", self.name, render_scalar(value)),
            InferredValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(|i| render_flow_item(i)).collect();
                format!("{}: [{}]", self.name, rendered.join(", "))
            }
        }
    }
}

/// Caller-supplied information used to infer missing fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceContext {
    /// Namespace the document lives under (e.g., the curator directory)
    pub namespace: Option<String>,
    /// Name of the item the document describes (e.g., the skill directory)
    pub item_name: String,
    /// Source coordinate for this document, e.g. an upstream repository
    pub source: Option<String>,
    /// Explicit values, used verbatim instead of any inference strategy
    pub overrides: HashMap<String, InferredValue>,
}

impl InferenceContext {
    pub fn new(item_name: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            ..Self::default()
        }
    }

    /// Build a context from a path relative to the document root
    ///
    /// `<namespace>/<item>` gives both parts. With fewer than two segments
    /// there is no namespace and the last segment (if any) is the item name.
    ///
    /// # Arguments
    /// * `relative` - Directory of the document, relative to the root
    pub fn from_relative_path(relative: &Path) -> Self {
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        match parts.as_slice() {
            [namespace, item, ..] => Self {
                namespace: Some(namespace.clone()),
                item_name: item.clone(),
                ..Self::default()
            },
            [item] => Self::new(item.clone()),
            [] => Self::default(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_override(mut self, field: impl Into<String>, value: InferredValue) -> Self {
        self.overrides.insert(field.into(), value);
        self
    }
}

/// Infer values for target fields missing from both locations
///
/// # Arguments
/// * `fields` - Target fields in injection order
/// * `present` - Fields found at top level or under the nesting key
/// * `context` - Inference context for this document
///
/// # Returns
/// Inferred fields in configuration order. Fields whose strategy yields
/// nothing (e.g., `source` without a source) are left out.
pub fn infer_missing(
    fields: &[FieldSpec],
    present: &HashSet<String>,
    context: &InferenceContext,
) -> Vec<InferredField> {
    fields
        .iter()
        .filter(|spec| !present.contains(&spec.name))
        .filter_map(|spec| {
            infer_field(spec, context).map(|value| InferredField {
                name: spec.name.clone(),
                value,
            })
        })
        .collect()
}

fn infer_field(spec: &FieldSpec, context: &InferenceContext) -> Option<InferredValue> {
    if let Some(value) = context.overrides.get(&spec.name) {
        return Some(value.clone());
    }

    match &spec.infer {
        Inference::None => None,
        Inference::Namespace { fallback } => Some(InferredValue::Scalar(
            context.namespace.clone().unwrap_or_else(|| fallback.clone()),
        )),
        Inference::Source { default } => context
            .source
            .clone()
            .or_else(|| default.clone())
            .map(InferredValue::Scalar),
        Inference::Tags {
            max_segments,
            sentinel,
        } => Some(InferredValue::List(derive_tags(
            &context.item_name,
            *max_segments,
            sentinel,
        ))),
    }
}

/// Derive tags from a hyphenated item name
///
/// Takes at most `max_segments` leading segments (empty segments from
/// doubled hyphens are skipped), appends `sentinel`, then drops duplicates
/// keeping the first occurrence.
///
/// # Examples
/// ```
/// # use frontmatter_migrate::migration::derive_tags;
/// assert_eq!(
///     derive_tags("pdf-merge-tool-extra", 3, "curated"),
///     vec!["pdf", "merge", "tool", "curated"]
/// );
/// ```
pub fn derive_tags(item_name: &str, max_segments: usize, sentinel: &str) -> Vec<String> {
    let segments = item_name
        .split('-')
        .filter(|s| !s.is_empty())
        .take(max_segments);
    let sentinel = Some(sentinel).filter(|s| !s.is_empty());

    let mut tags: Vec<String> = Vec::new();
    for tag in segments.chain(sentinel) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
