//! Formatting helpers
//!
//! YAML line rendering for values written into the nested sub-block.

use crate::config::SequenceStyle;

/// Indentation and style of the nested sub-block being written into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLayout<'a> {
    /// Indent of entries directly under the nesting key
    pub indent: &'a str,
    /// Indent of `- item` lines in block-style sequences
    pub sequence_indent: &'a str,
    pub style: SequenceStyle,
    pub line_ending: &'a str,
}

impl Default for RenderLayout<'_> {
    fn default() -> Self {
        Self {
            indent: "  ",
            sequence_indent: "  ",
            style: SequenceStyle::Flow,
            line_ending: "\n",
        }
    }
}

/// Render a string as a single-line YAML scalar
///
/// Plain when YAML allows it, quoted otherwise (`'true'`, `'1.0'`, `''`).
///
/// # Arguments
/// * `value` - String to render
///
/// # Returns
/// The scalar text, never containing a line break
pub fn render_scalar(value: &str) -> String {
    if let Ok(rendered) = serde_yaml::to_string(value) {
        let rendered = rendered.trim_end_matches('\n');
        if !rendered.contains('\n') {
            return rendered.to_string();
        }
    }
    double_quote(value)
}

/// Render a string as an item inside a flow sequence (`[a, b]`)
pub fn render_flow_item(value: &str) -> String {
    let rendered = render_scalar(value);
    let quoted = rendered.starts_with('\'') || rendered.starts_with('"');
    if !quoted && rendered.contains([',', '[', ']', '{', '}']) {
        double_quote(value)
    } else {
        rendered
    }
}

fn double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render `name: value` as one nested line
pub fn render_scalar_field(name: &str, value: &str, layout: &RenderLayout<'_>) -> String {
    format!(
        "{}{}: {}{}",
        layout.indent,
        name,
        render_scalar(value),
        layout.line_ending
    )
}

/// Render a list field in the layout's sequence style
///
/// An empty list is always written as `name: []`.
pub fn render_list(name: &str, items: &[String], layout: &RenderLayout<'_>) -> Vec<String> {
    let eol = layout.line_ending;
    if items.is_empty() {
        return vec![format!("{}{}: []{}", layout.indent, name, eol)];
    }

    match layout.style {
        SequenceStyle::Block => {
            let mut lines = vec![format!("{}{}:{}", layout.indent, name, eol)];
            lines.extend(items.iter().map(|item| {
                format!("{}- {}{}", layout.sequence_indent, render_scalar(item), eol)
            }));
            lines
        }
        SequenceStyle::Flow | SequenceStyle::Auto => {
            let rendered: Vec<String> = items.iter().map(|item| render_flow_item(item)).collect();
            vec![format!(
                "{}{}: [{}]{}",
                layout.indent,
                name,
                rendered.join(", "),
                eol
            )]
        }
    }
}
