//! Documentation coverage of declarations

use crate::declaration::{description_block_above, scan_lines, split_lines};
use pbd_core::ElementKind;
use serde::Serialize;

/// Whether one declaration carries a description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageEntry {
    pub kind: ElementKind,
    pub name: String,
    pub documented: bool,
}

/// Every declaration of `kind`, flagged by whether a `///` block sits above it
pub fn coverage(text: &str, kind: ElementKind) -> Vec<CoverageEntry> {
    let lines = split_lines(text);
    scan_lines(&lines, kind)
        .into_iter()
        .map(|decl| CoverageEntry {
            kind,
            documented: !description_block_above(&lines, decl.line).is_empty(),
            name: decl.name,
        })
        .collect()
}
