//! Element kinds documented in a semantic model.
//!
//! A model file declares one top-level table and any number of nested
//! columns and measures. [`ElementKind`] is the discriminator used by the
//! extractor, the annotator, and the documentation set.
//!
//! | kind      | keyword   | plural     | indentation |
//! |-----------|-----------|------------|-------------|
//! | `table`   | `table`   | `tables`   | top-level   |
//! | `column`  | `column`  | `columns`  | nested      |
//! | `measure` | `measure` | `measures` | nested      |

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Granularity at which documentation is generated and applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Top-level table declaration
    Table,
    /// Column nested inside a table
    Column,
    /// DAX measure nested inside a table
    Measure,
}

impl ElementKind {
    /// All kinds, in the order a file is usually annotated.
    pub const ALL: [ElementKind; 3] = [
        ElementKind::Measure,
        ElementKind::Table,
        ElementKind::Column,
    ];

    /// Keyword that introduces a declaration of this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            ElementKind::Table => "table",
            ElementKind::Column => "column",
            ElementKind::Measure => "measure",
        }
    }

    /// Plural spelling used when requesting names ("tables", "columns", "measures").
    pub fn plural(&self) -> &'static str {
        match self {
            ElementKind::Table => "tables",
            ElementKind::Column => "columns",
            ElementKind::Measure => "measures",
        }
    }

    /// Whether declarations of this kind are indented under a table.
    pub fn is_nested(&self) -> bool {
        !matches!(self, ElementKind::Table)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ElementKind {
    type Err = CoreError;

    /// Accepts singular and plural spellings, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "tables" => Ok(ElementKind::Table),
            "column" | "columns" => Ok(ElementKind::Column),
            "measure" | "measures" => Ok(ElementKind::Measure),
            _ => Err(CoreError::InvalidElementKind {
                kind: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "element_test.rs"]
mod tests;
