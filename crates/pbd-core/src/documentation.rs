//! Documentation returned by the description generator.
//!
//! The generator (an external LLM agent) answers each request with a list of
//! [`ObjectDetails`]. [`DocumentationSet`] regroups those answers into the
//! per-kind maps the annotator consumes:
//!
//! - measures: one flat map keyed by measure name, applied to every file
//! - tables: keyed by table name
//! - columns: keyed by source table, then by column name

use crate::element::ElementKind;
use crate::error::{CoreError, CoreResult};
use crate::table_name::TableName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One documented element as reported by the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDetails {
    /// Element kind as free text ("measure", "table", "column")
    #[serde(rename = "type")]
    pub kind: String,

    /// Element name
    pub name: String,

    /// Table the element belongs to
    #[serde(default, alias = "source")]
    pub source_table: String,

    /// Generated description
    pub description: String,

    /// Confidence, either a ratio (0–1) or a percentage (0–100)
    #[serde(default)]
    pub confidence: f64,
}

/// Accepted shapes of a documentation file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DocumentationPayload {
    /// `{"objects_documentation": [...]}`
    Wrapped {
        objects_documentation: Vec<ObjectDetails>,
    },
    /// A bare array of objects
    List(Vec<ObjectDetails>),
}

impl DocumentationPayload {
    /// Read and parse a documentation file
    pub fn load(path: &Path) -> CoreResult<Vec<ObjectDetails>> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let payload: DocumentationPayload =
            serde_json::from_str(&content).map_err(|e| CoreError::DocumentationParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(payload.into_objects())
    }

    /// Flatten into the list of objects
    pub fn into_objects(self) -> Vec<ObjectDetails> {
        match self {
            DocumentationPayload::Wrapped {
                objects_documentation,
            } => objects_documentation,
            DocumentationPayload::List(objects) => objects,
        }
    }
}

/// Description text plus the generator's confidence in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub description: String,
    pub confidence: f64,
}

impl Description {
    pub fn new(description: impl Into<String>, confidence: f64) -> Self {
        Self {
            description: description.into(),
            confidence,
        }
    }

    /// Confidence as a ratio in `[0, 1]`. Values above 1 are read as percentages.
    pub fn confidence_ratio(&self) -> f64 {
        let ratio = if self.confidence > 1.0 {
            self.confidence / 100.0
        } else {
            self.confidence
        };
        ratio.clamp(0.0, 1.0)
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.description
    }
}

/// Documentation grouped by element kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentationSet {
    measures: BTreeMap<String, Description>,
    tables: BTreeMap<TableName, Description>,
    columns: BTreeMap<TableName, BTreeMap<String, Description>>,
}

impl DocumentationSet {
    /// Group generator output by kind. Unknown kinds are skipped; on duplicate
    /// keys the later object wins.
    pub fn from_objects(objects: impl IntoIterator<Item = ObjectDetails>) -> Self {
        let mut set = Self::default();
        for object in objects {
            set.insert(object);
        }
        set
    }

    /// Add a single object to the set
    pub fn insert(&mut self, object: ObjectDetails) {
        let kind = match object.kind.parse::<ElementKind>() {
            Ok(kind) => kind,
            Err(_) => {
                log::warn!(
                    "Skipping documentation for '{}': unknown element type '{}'",
                    object.name,
                    object.kind
                );
                return;
            }
        };
        let description = Description::new(object.description, object.confidence);

        match kind {
            ElementKind::Measure => {
                self.measures.insert(object.name, description);
            }
            ElementKind::Table => match TableName::from_reference(&object.name) {
                Some(table) => {
                    self.tables.insert(table, description);
                }
                None => log::warn!("Skipping table documentation with an empty name"),
            },
            ElementKind::Column => match TableName::from_reference(&object.source_table) {
                Some(table) => {
                    self.columns
                        .entry(table)
                        .or_default()
                        .insert(object.name, description);
                }
                None => log::warn!(
                    "Skipping column documentation for '{}': no source table",
                    object.name
                ),
            },
        }
    }

    /// Measure descriptions, shared by every file
    pub fn measures(&self) -> &BTreeMap<String, Description> {
        &self.measures
    }

    /// Description of a table, if one was generated
    pub fn table(&self, table: &str) -> Option<&Description> {
        self.tables.get(table)
    }

    /// Column descriptions for a table
    pub fn columns_for(&self, table: &str) -> Option<&BTreeMap<String, Description>> {
        self.columns.get(table)
    }

    /// Number of documented elements of a kind
    pub fn count(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Measure => self.measures.len(),
            ElementKind::Table => self.tables.len(),
            ElementKind::Column => self.columns.values().map(BTreeMap::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty() && self.tables.is_empty() && self.columns.is_empty()
    }

    /// Drop column and measure descriptions whose confidence ratio is below
    /// `threshold`. Returns the number of descriptions dropped.
    pub fn retain_confident_elements(&mut self, threshold: f64) -> usize {
        let before = self.count(ElementKind::Measure) + self.count(ElementKind::Column);
        self.measures.retain(|_, d| d.confidence_ratio() >= threshold);
        for columns in self.columns.values_mut() {
            columns.retain(|_, d| d.confidence_ratio() >= threshold);
        }
        self.columns.retain(|_, columns| !columns.is_empty());
        before - (self.count(ElementKind::Measure) + self.count(ElementKind::Column))
    }
}

#[cfg(test)]
#[path = "documentation_test.rs"]
mod tests;
