//! pbd-tmdl - Model-text layer for pbidoc
//!
//! This crate scans the textual tabular-model definition format line by line:
//! it extracts declared table, column, and measure names, and it writes
//! `///` description comments directly above declarations without touching
//! the rest of the file.

pub mod annotator;
pub mod coverage;
pub mod declaration;
pub mod error;
pub mod extractor;
pub mod quoting;

pub use annotator::{
    apply_element_descriptions, apply_table_description, Annotated, AnnotationReport,
};
pub use coverage::{coverage, CoverageEntry};
pub use declaration::{scan_declarations, Declaration};
pub use error::TmdlError;
pub use extractor::{extract_names, extract_names_str, ExtractedNames};
