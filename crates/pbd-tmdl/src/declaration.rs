//! Line scanner for declarations and description comments.
//!
//! The text is split into lines once, keeping each line's terminator so that
//! untouched lines can be written back byte for byte. A declaration is a
//! keyword followed by a name; a description is a run of `///` lines
//! directly above it.

use crate::quoting::{closing_quote, unquote};
use pbd_core::ElementKind;
use std::ops::Range;

/// Marker introducing a description comment
pub const DESCRIPTION_MARKER: &str = "///";

/// One line of model text split from its terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    /// Content without `\n` or `\r\n`
    pub(crate) body: &'a str,
    /// `"\n"`, `"\r\n"`, or `""` for an unterminated last line
    pub(crate) ending: &'a str,
}

/// Split text into lines, keeping terminators
pub(crate) fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.split_inclusive('\n')
        .map(|raw| {
            let without_lf = raw.strip_suffix('\n').unwrap_or(raw);
            let body = without_lf.strip_suffix('\r').unwrap_or(without_lf);
            Line {
                body,
                ending: &raw[body.len()..],
            }
        })
        .collect()
}

/// A declaration found in model text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Kind of element declared
    pub kind: ElementKind,

    /// Raw inner name: surrounding quotes removed, doubled quotes kept
    pub name: String,

    /// Zero-based line index of the declaration
    pub line: usize,

    /// Leading whitespace of the declaration line
    pub indent: String,

    /// Whether the line matches the strict keyword + terminator rule.
    ///
    /// Loose declarations carry an unquoted name with spaces
    /// (`column Video ID`). They are never extracted, but the annotator still
    /// documents them when a mapping names them exactly.
    pub strict: bool,
}

/// Every strict declaration of `kind` in file order
pub fn scan_declarations(text: &str, kind: ElementKind) -> Vec<Declaration> {
    scan_lines(&split_lines(text), kind)
        .into_iter()
        .filter(|d| d.strict)
        .collect()
}

/// Every declaration of `kind`, strict or loose, in file order
pub(crate) fn scan_lines(lines: &[Line<'_>], kind: ElementKind) -> Vec<Declaration> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| parse_declaration(line.body, kind, idx))
        .collect()
}

/// Parse a single line as a declaration of `kind`
pub(crate) fn parse_declaration(
    body: &str,
    kind: ElementKind,
    line: usize,
) -> Option<Declaration> {
    let trimmed = body.trim_start_matches([' ', '\t']);
    let indent = &body[..body.len() - trimmed.len()];
    if !kind.is_nested() && !indent.is_empty() {
        return None;
    }

    let rest = trimmed.strip_prefix(kind.keyword())?.strip_prefix(' ')?;

    if rest.starts_with('\'') {
        let end = closing_quote(rest)?;
        let tail = &rest[end + 1..];
        if !is_terminated(kind, tail) {
            return None;
        }
        return Some(Declaration {
            kind,
            name: unquote(&rest[..=end]).to_string(),
            line,
            indent: indent.to_string(),
            strict: true,
        });
    }

    let token_end = rest
        .find(|c: char| c.is_whitespace() || c == '\'' || c == '=')
        .unwrap_or(rest.len());
    let token = &rest[..token_end];
    if !token.is_empty() && is_terminated(kind, &rest[token_end..]) {
        return Some(Declaration {
            kind,
            name: token.to_string(),
            line,
            indent: indent.to_string(),
            strict: true,
        });
    }

    let name = loose_name(kind, rest)?;
    Some(Declaration {
        kind,
        name: name.to_string(),
        line,
        indent: indent.to_string(),
        strict: false,
    })
}

/// Terminator rule per kind: measures need ` =`, columns accept ` =` or end
/// of line, tables need end of line. Trailing whitespace counts as end of line.
fn is_terminated(kind: ElementKind, tail: &str) -> bool {
    let at_eol = tail.trim_end().is_empty();
    let assigns = tail.starts_with(" =");
    match kind {
        ElementKind::Measure => assigns,
        ElementKind::Column => at_eol || assigns,
        ElementKind::Table => at_eol,
    }
}

/// Unquoted name with embedded spaces, cut at the terminator
fn loose_name(kind: ElementKind, rest: &str) -> Option<&str> {
    let name = match (kind, rest.find(" =")) {
        (ElementKind::Table, _) => rest,
        (_, Some(pos)) => &rest[..pos],
        (ElementKind::Measure, None) => return None,
        (ElementKind::Column, None) => rest,
    }
    .trim_end();

    if name.is_empty() || name.contains(['\'', '=']) {
        None
    } else {
        Some(name)
    }
}

/// Whether a line is a `///` description comment
pub(crate) fn is_description_line(body: &str) -> bool {
    body.trim_start().starts_with(DESCRIPTION_MARKER)
}

/// Range of contiguous `///` lines directly above `line`; empty when the
/// declaration is undocumented
pub(crate) fn description_block_above(lines: &[Line<'_>], line: usize) -> Range<usize> {
    let mut start = line;
    while start > 0 && is_description_line(lines[start - 1].body) {
        start -= 1;
    }
    start..line
}

#[cfg(test)]
#[path = "declaration_test.rs"]
mod tests;
