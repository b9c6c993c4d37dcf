//! Frontmatter document splitting
//!
//! A document is an opening `---` line, a metadata block, a closing `---`
//! line and a free-form body. Splitting keeps every byte, so joining the
//! parts back together reproduces the input exactly.

use crate::error::{MigrateError, MigrateResult};
use crate::validation::{nested_mapping, parse_mapping};
use serde_yaml::{Mapping, Value};

/// Delimiter line opening and closing the metadata block
pub const DELIMITER: &str = "---";

/// A document split into its delimiters, metadata block and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    opening: String,
    block: String,
    closing: String,
    body: String,
}

impl Document {
    /// Split document text into its parts
    ///
    /// # Arguments
    /// * `text` - Full document text, starting with a `---` line
    ///
    /// # Returns
    /// The split document, or a structural-parse failure when either
    /// delimiter line is missing
    pub fn parse(text: &str) -> MigrateResult<Self> {
        let mut lines = text.split_inclusive('\n');
        let opening = match lines.next() {
            Some(line) if is_delimiter(line) => line,
            _ => {
                return Err(MigrateError::structural(
                    "document must start with a '---' line",
                ));
            }
        };

        let block_start = opening.len();
        let mut offset = block_start;
        for line in lines {
            if is_delimiter(line) {
                let body_start = offset + line.len();
                return Ok(Self {
                    opening: opening.to_string(),
                    block: text[block_start..offset].to_string(),
                    closing: line.to_string(),
                    body: text[body_start..].to_string(),
                });
            }
            offset += line.len();
        }

        Err(MigrateError::structural(
            "frontmatter is not closed by a '---' line",
        ))
    }

    /// Raw metadata block text, one line per field line, endings included
    pub fn block(&self) -> &str {
        &self.block
    }

    /// Body text following the closing delimiter
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Line ending used by the document, taken from the opening delimiter
    pub fn line_ending(&self) -> &'static str {
        if self.opening.ends_with("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Replace the metadata block, keeping delimiters and body untouched
    pub fn with_block(&self, block: String) -> Self {
        Self {
            opening: self.opening.clone(),
            block,
            closing: self.closing.clone(),
            body: self.body.clone(),
        }
    }

    /// Reassemble the full document text
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(
            self.opening.len() + self.block.len() + self.closing.len() + self.body.len(),
        );
        text.push_str(&self.opening);
        text.push_str(&self.block);
        text.push_str(&self.closing);
        text.push_str(&self.body);
        text
    }

    /// Flattened view of the frontmatter
    ///
    /// Top-level entries are returned as-is, except that the entries found
    /// under `nesting_key` are lifted to the top level (replacing any
    /// top-level entry with the same name) and the nesting key itself is
    /// dropped. Readers can then look up `author` or `tags` without caring
    /// whether a document has been migrated yet.
    ///
    /// # Arguments
    /// * `nesting_key` - Name of the nested sub-block (e.g., "metadata")
    pub fn flattened(&self, nesting_key: &str) -> MigrateResult<Mapping> {
        let mapping = parse_mapping(&self.block)?;
        let nested = nested_mapping(&mapping, nesting_key)?;

        let mut flat = Mapping::new();
        for (key, value) in &mapping {
            if key.as_str() == Some(nesting_key) {
                continue;
            }
            flat.insert(key.clone(), value.clone());
        }
        if let Some(nested) = nested {
            for (key, value) in nested {
                flat.insert(key.clone(), value.clone());
            }
        }
        Ok(flat)
    }
}

/// Whether a raw line (ending included) is a `---` delimiter line
fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == DELIMITER
}

/// Look up a string value in a flattened mapping
pub fn get_str<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a str> {
    mapping.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_parts() {
        let text = "---\nname: demo\ndescription: A demo\n---\n# Body\n";
        let doc = Document::parse(text).unwrap();

        assert_eq!(doc.block(), "name: demo\ndescription: A demo\n");
        assert_eq!(doc.body(), "# Body\n");
        assert_eq!(doc.line_ending(), "\n");
        assert_eq!(doc.to_text(), text);
    }

    #[test]
    fn test_parse_closing_delimiter_at_eof() {
        let text = "---\nname: demo\n---";
        let doc = Document::parse(text).unwrap();

        assert_eq!(doc.block(), "name: demo\n");
        assert_eq!(doc.body(), "");
        assert_eq!(doc.to_text(), text);
    }

    #[test]
    fn test_parse_empty_block() {
        let doc = Document::parse("---\n---\nBody").unwrap();
        assert_eq!(doc.block(), "");
        assert_eq!(doc.body(), "Body");
    }

    #[test]
    fn test_parse_crlf_preserved() {
        let text = "---\r\nname: demo\r\n---\r\nBody\r\n";
        let doc = Document::parse(text).unwrap();

        assert_eq!(doc.line_ending(), "\r\n");
        assert_eq!(doc.block(), "name: demo\r\n");
        assert_eq!(doc.to_text(), text);
    }

    #[test]
    fn test_parse_ignores_longer_rules() {
        // "----" is not a delimiter, so the block runs to the real closing line
        let text = "---\nname: demo\n----\n---\nBody";
        let doc = Document::parse(text).unwrap();
        assert_eq!(doc.block(), "name: demo\n----\n");
    }

    #[test]
    fn test_parse_rejects_missing_frontmatter() {
        let err = Document::parse("# Just a body\n").unwrap_err();
        assert!(matches!(err, MigrateError::StructuralParse { .. }));
        assert!(err.to_string().contains("must start with"));
    }

    #[test]
    fn test_parse_rejects_unclosed_frontmatter() {
        let err = Document::parse("---\nname: demo\n\nBody text").unwrap_err();
        assert!(matches!(err, MigrateError::StructuralParse { .. }));
        assert!(err.to_string().contains("not closed"));
    }

    #[test]
    fn test_with_block_keeps_delimiters_and_body() {
        let doc = Document::parse("---\nname: a\n---\nBody\n").unwrap();
        let updated = doc.with_block("name: b\n".to_string());
        assert_eq!(updated.to_text(), "---\nname: b\n---\nBody\n");
    }

    #[test]
    fn test_flattened_lifts_nested_entries() {
        let text = "---\nname: demo\nauthor: old\nmetadata:\n  author: alice\n  tags: [a, b]\n---\n";
        let doc = Document::parse(text).unwrap();
        let flat = doc.flattened("metadata").unwrap();

        assert_eq!(get_str(&flat, "name"), Some("demo"));
        assert_eq!(get_str(&flat, "author"), Some("alice"));
        assert!(flat.get("tags").unwrap().is_sequence());
        assert!(flat.get("metadata").is_none());
    }

    #[test]
    fn test_flattened_without_nested_block() {
        let doc = Document::parse("---\nname: demo\nauthor: bob\n---\n").unwrap();
        let flat = doc.flattened("metadata").unwrap();
        assert_eq!(flat.len(), 2);
        assert_eq!(get_str(&flat, "author"), Some("bob"));
    }
}
