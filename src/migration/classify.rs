//! Line classification for metadata blocks
//!
//! Every physical line of a metadata block is either a key line, which opens
//! a new top-level field, or a neutral line (indented value lines, sequence
//! entries, comments, blank lines) that belongs to whichever field is open.

/// One physical line of a metadata block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Top-level key, set only for unindented `key: ...` lines
    pub key: Option<&'a str>,
    /// Original line text, line ending included
    pub raw: &'a str,
}

/// A key line followed by its contiguous continuation lines
///
/// Lines that precede the first key line form a group with no key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup<'a> {
    pub key: Option<&'a str>,
    pub lines: Vec<&'a str>,
}

/// Strip the trailing line ending
pub fn line_text(raw: &str) -> &str {
    raw.trim_end_matches(['\r', '\n'])
}

/// Whether a line holds nothing but whitespace
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Leading whitespace of a line
pub fn indent_of(raw: &str) -> &str {
    let text = line_text(raw);
    let content_start = text
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(text.len());
    &text[..content_start]
}

/// Key of an unindented `key: value` line
///
/// Returns `None` for indented lines, comments, sequence entries, complex
/// key markers and lines without a colon. Quotes around the key are
/// stripped.
pub fn key_of(raw: &str) -> Option<&str> {
    let text = line_text(raw);
    let first = text.chars().next()?;
    if first.is_whitespace() || first == '#' {
        return None;
    }
    if text == "-" || text.starts_with("- ") || text == "?" || text.starts_with("? ") {
        return None;
    }

    let colon = text.find(':')?;
    let key = unquote(text[..colon].trim());
    if key.is_empty() { None } else { Some(key) }
}

fn unquote(key: &str) -> &str {
    for quote in ['"', '\''] {
        if key.len() >= 2 && key.starts_with(quote) && key.ends_with(quote) {
            return &key[1..key.len() - 1];
        }
    }
    key
}

/// Classify a single raw line
pub fn classify_line(raw: &str) -> Line<'_> {
    Line {
        key: key_of(raw),
        raw,
    }
}

/// Classify every line of a metadata block, line endings preserved
pub fn classify_block(block: &str) -> Vec<Line<'_>> {
    block.split_inclusive('\n').map(classify_line).collect()
}

/// Group classified lines into field groups
///
/// Neutral lines, blank ones included, attach to the group that is open when
/// they appear; groups never span an intervening key line.
pub fn group_fields<'a>(lines: &[Line<'a>]) -> Vec<FieldGroup<'a>> {
    let mut groups: Vec<FieldGroup<'a>> = Vec::new();
    for line in lines {
        if line.key.is_none()
            && let Some(open) = groups.last_mut()
        {
            open.lines.push(line.raw);
            continue;
        }
        groups.push(FieldGroup {
            key: line.key,
            lines: vec![line.raw],
        });
    }
    groups
}
