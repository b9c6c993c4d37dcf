//! Structural checks for frontmatter blocks
//!
//! The migrator edits text line by line and never re-serializes a block.
//! These checks bracket that surgery: the block must parse as a YAML mapping
//! before anything is touched, and the rewritten block must parse back to
//! the same values (with the migrated fields now nested) afterwards.

use crate::error::{MigrateError, MigrateResult};
use serde_yaml::{Mapping, Value};

/// Parse a metadata block as a YAML mapping
///
/// An empty or comment-only block counts as an empty mapping.
///
/// # Arguments
/// * `block` - Raw metadata block text (without delimiter lines)
///
/// # Returns
/// The parsed mapping, or a structural-parse failure
pub fn parse_mapping(block: &str) -> MigrateResult<Mapping> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(mapping)) => Ok(mapping),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(other) => Err(MigrateError::structural(format!(
            "expected a mapping at the top level, found {}",
            value_kind(&other)
        ))),
        Err(e) => Err(MigrateError::structural(e.to_string())),
    }
}

/// The mapping stored under the nesting key, if any
///
/// A nesting key with an empty value (`metadata:`) is treated as present
/// but empty. Any non-mapping value collides with the nesting semantics and
/// is rejected.
///
/// # Returns
/// `Ok(None)` if the key is absent or empty, `Ok(Some(mapping))` otherwise
pub fn nested_mapping<'a>(
    mapping: &'a Mapping,
    nesting_key: &str,
) -> MigrateResult<Option<&'a Mapping>> {
    match mapping.get(nesting_key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Mapping(nested)) => Ok(Some(nested)),
        Some(other) => Err(MigrateError::ambiguous(
            nesting_key,
            format!("expected a mapping, found {}", value_kind(other)),
        )),
    }
}

/// Names of the entries already present under the nesting key
pub fn nested_keys(mapping: &Mapping, nesting_key: &str) -> MigrateResult<Vec<String>> {
    let keys = nested_mapping(mapping, nesting_key)?
        .map(string_keys)
        .unwrap_or_default();
    Ok(keys)
}

/// String keys of a mapping, in document order
pub fn string_keys(mapping: &Mapping) -> Vec<String> {
    mapping
        .iter()
        .filter_map(|(key, _)| key.as_str().map(str::to_string))
        .collect()
}

/// What a rewrite claims to have done, checked by [`verify_rewrite`]
#[derive(Debug, Default, Clone)]
pub struct RewritePlan<'a> {
    /// Top-level fields relocated under the nesting key
    pub moved: &'a [String],
    /// Top-level fields dropped because the nested entry takes precedence
    pub discarded: &'a [String],
    /// Nested entries replaced by a relocated top-level field
    pub replaced: &'a [String],
    /// Fields newly inferred under the nesting key
    pub inferred: &'a [String],
    /// Every configured target field; none may remain at the top level
    pub targets: &'a [&'a str],
    /// Whether a `key: null` header of the nesting key was rewritten as `key:`
    pub null_header_cleared: bool,
}

/// Check that a rewritten block means what the plan says it means
///
/// # Arguments
/// * `before` - Mapping parsed from the original block
/// * `after_block` - Rewritten block text
/// * `nesting_key` - Name of the nested sub-block
/// * `plan` - Fields moved, discarded, replaced and inferred by the rewrite
///
/// # Returns
/// `Ok(())` if every untouched entry kept its value and every migrated
/// field landed under the nesting key with its original value
pub fn verify_rewrite(
    before: &Mapping,
    after_block: &str,
    nesting_key: &str,
    plan: &RewritePlan<'_>,
) -> MigrateResult<()> {
    let after = parse_mapping(after_block).map_err(|e| {
        MigrateError::ambiguous(nesting_key, format!("rewritten block does not parse: {e}"))
    })?;

    if plan.null_header_cleared && before.get(nesting_key) != Some(&Value::Null) {
        return Err(MigrateError::ambiguous(
            nesting_key,
            "header rewritten but its value was not null",
        ));
    }

    let nested_after = match after.get(nesting_key) {
        Some(Value::Mapping(nested)) => nested,
        _ => {
            return Err(MigrateError::ambiguous(
                nesting_key,
                "rewritten block has no nested mapping",
            ));
        }
    };

    for (key, value) in before {
        let Some(name) = key.as_str() else {
            continue;
        };
        if name == nesting_key {
            continue;
        }
        let relocated = plan.moved.iter().chain(plan.discarded).any(|f| f == name);
        match (relocated, after.get(name)) {
            (true, Some(_)) => {
                return Err(MigrateError::ambiguous(name, "still present at top level"));
            }
            (false, found) if found != Some(value) => {
                return Err(MigrateError::ambiguous(
                    name,
                    "value of an untouched field changed",
                ));
            }
            _ => {}
        }
    }

    for &name in plan.targets {
        if after.contains_key(name) {
            return Err(MigrateError::ambiguous(name, "target field left at top level"));
        }
    }

    if let Some(nested_before) = nested_mapping(before, nesting_key)? {
        for (key, value) in nested_before {
            let Some(name) = key.as_str() else {
                continue;
            };
            if plan.replaced.iter().any(|f| f == name) {
                continue;
            }
            if nested_after.get(name) != Some(value) {
                return Err(MigrateError::ambiguous(
                    name,
                    format!("nested value under '{nesting_key}' changed"),
                ));
            }
        }
    }

    for name in plan.moved {
        if nested_after.get(name.as_str()) != before.get(name.as_str()) {
            return Err(MigrateError::ambiguous(
                name.as_str(),
                "value changed while relocating",
            ));
        }
    }

    for name in plan.inferred {
        if !nested_after.contains_key(name.as_str()) {
            return Err(MigrateError::ambiguous(
                name.as_str(),
                "inferred value missing after rewrite",
            ));
        }
    }

    Ok(())
}

/// Human-readable kind of a YAML value, for error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
