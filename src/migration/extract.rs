//! Field extraction
//!
//! Splits classified lines into the target fields to migrate and everything
//! else. The split is a stable partition: each line lands in exactly one
//! place and keeps its relative order and exact text.

use super::classify::{Line, group_fields};
use crate::error::{MigrateError, MigrateResult};
use std::collections::HashMap;

/// Result of pulling target fields out of a metadata block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction<'a> {
    /// Lines of each extracted target field, key line first
    pub fields: HashMap<String, Vec<&'a str>>,
    /// Every other line, in original order
    pub remaining: Vec<&'a str>,
}

impl<'a> Extraction<'a> {
    /// Whether `name` occurred at the top level of the block
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Extracted lines of `name`, if it occurred
    pub fn lines(&self, name: &str) -> Option<&[&'a str]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Whether no target field occurred
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drop an extracted field so it is neither kept nor relocated
    pub fn discard(&mut self, name: &str) -> Option<Vec<&'a str>> {
        self.fields.remove(name)
    }
}

/// Extract target fields from classified lines
///
/// # Arguments
/// * `lines` - Classified lines of the metadata block
/// * `is_target` - Predicate selecting the fields to extract
///
/// # Returns
/// The extraction, or an ambiguous-field failure when a target field has
/// more than one key line (its extent could not be determined)
pub fn extract_fields<'a>(
    lines: &[Line<'a>],
    is_target: impl Fn(&str) -> bool,
) -> MigrateResult<Extraction<'a>> {
    let mut extraction = Extraction::default();

    for group in group_fields(lines) {
        match group.key {
            Some(key) if is_target(key) => {
                if extraction.fields.contains_key(key) {
                    return Err(MigrateError::ambiguous(
                        key,
                        "appears more than once at the top level",
                    ));
                }
                extraction.fields.insert(key.to_string(), group.lines);
            }
            _ => extraction.remaining.extend(group.lines),
        }
    }

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::classify::classify_block;

    fn targets(name: &str) -> bool {
        matches!(name, "author" | "repo" | "tags")
    }

    #[test]
    fn test_extract_simple_fields() {
        let block = "name: demo\nauthor: bob\ndescription: A demo\nrepo: foo/bar\n";
        let lines = classify_block(block);
        let extraction = extract_fields(&lines, targets).unwrap();

        assert_eq!(extraction.lines("author"), Some(&["author: bob\n"][..]));
        assert_eq!(extraction.lines("repo"), Some(&["repo: foo/bar\n"][..]));
        assert!(!extraction.contains("tags"));
        assert_eq!(
            extraction.remaining,
            vec!["name: demo\n", "description: A demo\n"]
        );
    }

    #[test]
    fn test_extract_keeps_continuations_together() {
        let block = "author: |\n  Line one\n\n  Line three\nname: demo\ntags:\n- a\n- b\n";
        let lines = classify_block(block);
        let extraction = extract_fields(&lines, targets).unwrap();

        assert_eq!(
            extraction.lines("author").unwrap(),
            &["author: |\n", "  Line one\n", "\n", "  Line three\n"]
        );
        assert_eq!(
            extraction.lines("tags").unwrap(),
            &["tags:\n", "- a\n", "- b\n"]
        );
        assert_eq!(extraction.remaining, vec!["name: demo\n"]);
    }

    #[test]
    fn test_extract_leaves_nesting_block_in_remaining() {
        let block = "author: bob\nmetadata:\n  author: carol\nname: demo\n";
        let lines = classify_block(block);
        let extraction = extract_fields(&lines, targets).unwrap();

        assert_eq!(extraction.lines("author").unwrap(), &["author: bob\n"]);
        assert_eq!(
            extraction.remaining,
            vec!["metadata:\n", "  author: carol\n", "name: demo\n"]
        );
    }

    #[test]
    fn test_extract_is_a_stable_partition() {
        let block = "# head\nname: x\nauthor: a\n  more\ndescription: d\ntags: [t]\nlicense: MIT\n";
        let lines = classify_block(block);
        let extraction = extract_fields(&lines, targets).unwrap();

        let extracted: usize = extraction.fields.values().map(Vec::len).sum();
        assert_eq!(extracted + extraction.remaining.len(), lines.len());
        assert_eq!(
            extraction.remaining,
            vec!["# head\n", "name: x\n", "description: d\n", "license: MIT\n"]
        );
    }

    #[test]
    fn test_extract_rejects_repeated_target() {
        let block = "author: a\nname: x\nauthor: b\n";
        let lines = classify_block(block);
        let err = extract_fields(&lines, targets).unwrap_err();
        assert_eq!(err.field(), Some("author"));
    }

    #[test]
    fn test_extract_nothing_to_do() {
        let block = "name: x\ndescription: y\n";
        let lines = classify_block(block);
        let extraction = extract_fields(&lines, targets).unwrap();
        assert!(extraction.is_empty());
        assert_eq!(extraction.remaining.len(), 2);
    }

    #[test]
    fn test_discard_removes_field() {
        let lines = classify_block("author: a\n");
        let mut extraction = extract_fields(&lines, targets).unwrap();
        assert_eq!(extraction.discard("author"), Some(vec!["author: a\n"]));
        assert!(extraction.is_empty());
    }
}
