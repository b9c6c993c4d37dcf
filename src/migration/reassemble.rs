//! Block reassembly
//!
//! Splices migrated and inferred lines into the nested sub-block with a
//! single forward scan over the remaining lines. Lines outside the splice
//! point are copied through byte for byte.

use super::classify::{indent_of, is_blank, key_of, line_text};

const DEFAULT_INDENT: &str = "  ";

/// Shape of an existing nested sub-block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubBlockLayout {
    /// Indent of the sub-block's direct entries
    pub indent: String,
    /// Indent of its first `- item` line, if it has block sequences
    pub sequence_indent: Option<String>,
    /// Whether the header line carries a value (`metadata: {a: b}`)
    pub inline_value: bool,
    /// Whether the header line carries an explicit null (`metadata: ~`)
    pub null_value: bool,
    /// Position of the header line in the scanned lines
    pub header: usize,
}

impl SubBlockLayout {
    /// Find the nested sub-block among `lines` and measure it
    ///
    /// # Returns
    /// `None` if no top-level line opens the nesting key
    pub fn scan(lines: &[&str], nesting_key: &str) -> Option<Self> {
        let header = lines
            .iter()
            .position(|raw| key_of(raw) == Some(nesting_key))?;

        let members = lines[header + 1..]
            .iter()
            .take_while(|raw| is_blank(raw) || !indent_of(raw).is_empty())
            .filter(|raw| !is_blank(raw));

        let mut indent = None;
        let mut sequence_indent = None;
        for raw in members {
            let text = line_text(raw).trim_start();
            if indent.is_none() && !text.starts_with('#') {
                indent = Some(indent_of(raw).to_string());
            }
            if sequence_indent.is_none() && (text == "-" || text.starts_with("- ")) {
                sequence_indent = Some(indent_of(raw).to_string());
            }
        }

        let value = header_value(lines[header]);
        let null_value = is_null(value);
        Some(Self {
            indent: indent.unwrap_or_else(|| DEFAULT_INDENT.to_string()),
            sequence_indent,
            inline_value: !value.is_empty() && !null_value,
            null_value,
            header,
        })
    }
}

/// Value written after the colon of a `key:` line, comment excluded
fn header_value(raw: &str) -> &str {
    let text = line_text(raw);
    let Some(colon) = text.find(':') else {
        return "";
    };
    let value = &text[colon + 1..];
    let value = value.find(" #").map_or(value, |i| &value[..i]).trim();
    if value.starts_with('#') { "" } else { value }
}

fn is_null(value: &str) -> bool {
    matches!(value, "~" | "null" | "Null" | "NULL")
}

/// Turn a `key: null` header into a bare `key:` header
///
/// A trailing comment and the line ending are kept.
pub fn clear_null_header(raw: &str) -> String {
    let text = line_text(raw);
    let eol = &raw[text.len()..];
    let Some(colon) = text.find(':') else {
        return raw.to_string();
    };
    let comment = text[colon + 1..]
        .find(" #")
        .map_or("", |i| &text[colon + 1 + i..]);
    format!("{}{}{}", &text[..=colon], comment, eol)
}

/// Prefix every non-blank line with `indent`
pub fn reindent(lines: &[&str], indent: &str) -> Vec<String> {
    lines
        .iter()
        .map(|raw| {
            if is_blank(raw) {
                raw.to_string()
            } else {
                format!("{indent}{raw}")
            }
        })
        .collect()
}

/// Append entries to a nested sub-block written as a one-line flow mapping
///
/// `metadata: { author: carol }` becomes
/// `metadata: { author: carol, repo: foo/bar }`. Only the header line is
/// touched; every other line is copied through.
///
/// # Returns
/// The new block, or `None` when the header value is not a flow mapping
/// closed on the same line (a trailing comment counts as not closed)
pub fn splice_inline(remaining: &[&str], nesting_key: &str, entries: &[String]) -> Option<String> {
    if entries.is_empty() {
        return Some(remaining.concat());
    }

    let mut out = String::new();
    let mut spliced = false;
    for &raw in remaining {
        if !spliced && key_of(raw) == Some(nesting_key) {
            out.push_str(&splice_flow_mapping(raw, entries)?);
            spliced = true;
        } else {
            out.push_str(raw);
        }
    }
    spliced.then_some(out)
}

fn splice_flow_mapping(raw: &str, entries: &[String]) -> Option<String> {
    let text = line_text(raw);
    let eol = &raw[text.len()..];
    let colon = text.find(':')?;
    let value = text[colon + 1..].trim_end();
    let trimmed = value.trim_start();
    if !trimmed.starts_with('{') || !trimmed.ends_with('}') {
        return None;
    }

    let open = colon + 1 + (value.len() - trimmed.len());
    let close = colon + value.len();
    let inner = text[open + 1..close].trim_end();
    let insert_at = open + 1 + inner.len();
    let separator = if inner.trim_start().is_empty() || inner.ends_with(',') {
        if inner.is_empty() { "" } else { " " }
    } else {
        ", "
    };

    Some(format!(
        "{}{}{}{}{}",
        &text[..insert_at],
        separator,
        entries.join(", "),
        &text[insert_at..],
        eol
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    BeforeSubBlock,
    InsideSubBlock,
    AfterSubBlock,
}

/// Forward scan that writes the reassembled block
pub struct Reassembler<'a> {
    nesting_key: &'a str,
    /// Entry indent of the sub-block
    indent: &'a str,
    /// Rendered lines to inject at the end of the sub-block
    injected: &'a [String],
    /// Existing nested entries to drop (replaced by injected lines)
    replaced: &'a [String],
    line_ending: &'a str,
}

impl<'a> Reassembler<'a> {
    pub fn new(
        nesting_key: &'a str,
        indent: &'a str,
        injected: &'a [String],
        line_ending: &'a str,
    ) -> Self {
        Self {
            nesting_key,
            indent,
            injected,
            replaced: &[],
            line_ending,
        }
    }

    /// Drop these nested entries while copying the sub-block
    pub fn replacing(mut self, replaced: &'a [String]) -> Self {
        self.replaced = replaced;
        self
    }

    /// Reassemble the metadata block from the remaining lines
    ///
    /// The injected lines go right after the last member of the existing
    /// sub-block (before any trailing blank lines), or into a new sub-block
    /// appended at the end when there is none.
    pub fn run(&self, remaining: &[&str]) -> String {
        let mut out = String::new();
        let mut state = ScanState::BeforeSubBlock;
        let mut pending_blanks: Vec<&str> = Vec::new();
        let mut dropping = false;

        for &raw in remaining {
            match state {
                ScanState::BeforeSubBlock => {
                    out.push_str(raw);
                    if key_of(raw) == Some(self.nesting_key) {
                        state = ScanState::InsideSubBlock;
                    }
                }
                ScanState::InsideSubBlock => {
                    if is_blank(raw) {
                        pending_blanks.push(raw);
                        continue;
                    }
                    if indent_of(raw).is_empty() {
                        self.inject(&mut out);
                        pending_blanks.drain(..).for_each(|b| out.push_str(b));
                        out.push_str(raw);
                        state = ScanState::AfterSubBlock;
                        continue;
                    }

                    // Blank lines between entries belong to the entry above
                    if !dropping {
                        pending_blanks.iter().for_each(|b| out.push_str(b));
                    }
                    pending_blanks.clear();

                    if let Some(key) = self.member_key(raw) {
                        dropping = self.replaced.iter().any(|r| r == key);
                    }
                    if !dropping {
                        out.push_str(raw);
                    }
                }
                ScanState::AfterSubBlock => out.push_str(raw),
            }
        }

        match state {
            ScanState::BeforeSubBlock if !self.injected.is_empty() => {
                out.push_str(self.nesting_key);
                out.push(':');
                out.push_str(self.line_ending);
                self.inject(&mut out);
            }
            ScanState::InsideSubBlock => {
                self.inject(&mut out);
                pending_blanks.drain(..).for_each(|b| out.push_str(b));
            }
            _ => {}
        }

        out
    }

    /// Key of a direct entry of the sub-block
    fn member_key<'l>(&self, raw: &'l str) -> Option<&'l str> {
        if indent_of(raw) != self.indent {
            return None;
        }
        key_of(&raw[self.indent.len()..])
    }

    fn inject(&self, out: &mut String) {
        for line in self.injected {
            out.push_str(line);
        }
    }
}
