//! Description annotation for model text.
//!
//! Descriptions are written as `///` lines directly above the declaration
//! they document. Each mapping entry only touches the description block of
//! the declarations it names, so the order of entries never changes the
//! result, and re-applying the same mapping is a no-op.

use crate::declaration::{
    description_block_above, parse_declaration, scan_lines, split_lines, Declaration, Line,
    DESCRIPTION_MARKER,
};
use crate::error::{TmdlError, TmdlResult};
use crate::quoting::names_match;
use pbd_core::ElementKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;

/// What an annotation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationReport {
    /// Existing description blocks rewritten
    pub replaced: usize,

    /// New description blocks inserted
    pub inserted: usize,

    /// Names declared more than once without a description; left untouched
    pub skipped_ambiguous: Vec<String>,

    /// Names with no declaration in the text
    pub missing: Vec<String>,
}

impl AnnotationReport {
    /// Number of declarations whose description was written
    pub fn applied(&self) -> usize {
        self.replaced + self.inserted
    }
}

/// Annotated text plus the report of what changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    pub text: String,
    pub report: AnnotationReport,
}

/// A description block to write above one declaration
#[derive(Debug)]
struct Edit<'a> {
    /// Existing `///` lines to replace; empty for an insertion
    block: Range<usize>,
    indent: String,
    description: &'a str,
    ending: &'a str,
    /// Key equals the raw declared name (beats an unescaped match)
    exact: bool,
}

/// Write column or measure descriptions into `text`.
///
/// For each `(name, description)` entry:
/// - every declaration of `name` that already has a description gets it replaced;
/// - an undocumented declaration gets one inserted, provided it is the only
///   undocumented declaration of that name (otherwise the name is reported in
///   [`AnnotationReport::skipped_ambiguous`]);
/// - a name not declared in the text is reported in [`AnnotationReport::missing`].
///
/// Lines consisting solely of tabs are emptied afterwards.
pub fn apply_element_descriptions<I, K, D>(
    text: &str,
    mapping: I,
    kind: ElementKind,
) -> TmdlResult<Annotated>
where
    I: IntoIterator<Item = (K, D)>,
    K: AsRef<str>,
    D: AsRef<str>,
{
    if !kind.is_nested() {
        return Err(TmdlError::InvalidElementKind {
            kind: kind.to_string(),
            expected: "measure or column".to_string(),
        });
    }

    let lines = split_lines(text);
    let declarations = scan_lines(&lines, kind);
    let mut edits: BTreeMap<usize, Edit<'_>> = BTreeMap::new();
    let mut report = AnnotationReport::default();

    // Descriptions are borrowed from `mapping`, so collect them first.
    let entries: Vec<(K, D)> = mapping.into_iter().collect();

    for (key, description) in &entries {
        let key = key.as_ref();
        let description = description.as_ref();
        if description.trim().is_empty() {
            log::debug!("Skipping {} '{}': empty description", kind, key);
            continue;
        }

        let matches: Vec<&Declaration> = declarations
            .iter()
            .filter(|d| names_match(key, &d.name))
            .collect();
        if matches.is_empty() {
            log::debug!("No {} named '{}' in this file", kind, key);
            report.missing.push(key.to_string());
            continue;
        }

        let mut undocumented = Vec::new();
        for decl in matches {
            let block = description_block_above(&lines, decl.line);
            if block.is_empty() {
                undocumented.push(decl);
            } else {
                stage(&mut edits, &lines, decl, block, key, description);
            }
        }

        match undocumented.as_slice() {
            [] => {}
            [decl] => {
                let at = decl.line..decl.line;
                stage(&mut edits, &lines, decl, at, key, description);
            }
            _ => {
                log::warn!(
                    "Skipping {} '{}': declared {} times without a description",
                    kind,
                    key,
                    undocumented.len()
                );
                report.skipped_ambiguous.push(key.to_string());
            }
        }
    }

    for edit in edits.values() {
        if edit.block.is_empty() {
            report.inserted += 1;
        } else {
            report.replaced += 1;
        }
    }
    report.skipped_ambiguous.sort();
    report.missing.sort();

    Ok(Annotated {
        text: render(&lines, &edits, true),
        report,
    })
}

/// Write the table-level description.
///
/// An existing `///` block above the top-level `table` declaration is
/// replaced in place. Otherwise `/// description` and a `\n` are prepended
/// to the very start of the text, whatever precedes the declaration.
pub fn apply_table_description(text: &str, description: &str) -> String {
    if description.trim().is_empty() {
        return text.to_string();
    }

    let lines = split_lines(text);
    let documented = lines
        .iter()
        .enumerate()
        .find_map(|(idx, line)| parse_declaration(line.body, ElementKind::Table, idx))
        .map(|table| (description_block_above(&lines, table.line), table))
        .filter(|(block, _)| !block.is_empty());

    match documented {
        Some((block, table)) => {
            let mut edits = BTreeMap::new();
            stage(&mut edits, &lines, &table, block, &table.name, description);
            render(&lines, &edits, false)
        }
        None => {
            let mut out = String::with_capacity(text.len() + description.len() + 8);
            push_description(&mut out, "", description, "\n");
            out.push_str(text);
            out
        }
    }
}

/// Record an edit for `decl`, keeping an exact-name edit over an unescaped one
fn stage<'a>(
    edits: &mut BTreeMap<usize, Edit<'a>>,
    lines: &[Line<'a>],
    decl: &Declaration,
    block: Range<usize>,
    key: &str,
    description: &'a str,
) {
    let exact = key == decl.name;
    if edits
        .get(&decl.line)
        .is_some_and(|existing| existing.exact && !exact)
    {
        return;
    }
    let ending = match lines[decl.line].ending {
        "" => "\n",
        ending => ending,
    };
    edits.insert(
        decl.line,
        Edit {
            block,
            indent: decl.indent.clone(),
            description,
            ending,
            exact,
        },
    );
}

/// Rebuild the text, writing each edit's description in place of its block
fn render(lines: &[Line<'_>], edits: &BTreeMap<usize, Edit<'_>>, clean_tabs: bool) -> String {
    let by_start: BTreeMap<usize, &Edit<'_>> =
        edits.values().map(|e| (e.block.start, e)).collect();

    let mut out = String::new();
    let mut idx = 0;
    while idx < lines.len() {
        if let Some(edit) = by_start.get(&idx) {
            push_description(&mut out, &edit.indent, edit.description, edit.ending);
            if edit.block.end > idx {
                idx = edit.block.end;
                continue;
            }
        }

        let line = lines[idx];
        if clean_tabs && is_tab_only(line) {
            out.push_str(line.ending);
        } else {
            out.push_str(line.body);
            out.push_str(line.ending);
        }
        idx += 1;
    }
    out
}

/// A terminated line holding nothing but tabs
fn is_tab_only(line: Line<'_>) -> bool {
    !line.ending.is_empty() && !line.body.is_empty() && line.body.bytes().all(|b| b == b'\t')
}

/// Append one `///` line per description line
fn push_description(out: &mut String, indent: &str, description: &str, ending: &str) {
    for text in description.trim().lines() {
        out.push_str(indent);
        out.push_str(DESCRIPTION_MARKER);
        let text = text.trim();
        if !text.is_empty() {
            out.push(' ');
            out.push_str(text);
        }
        out.push_str(ending);
    }
}

#[cfg(test)]
#[path = "annotator_test.rs"]
mod tests;
