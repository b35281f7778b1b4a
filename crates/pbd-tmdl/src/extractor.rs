//! Declared-name extraction from model files

use crate::declaration::scan_declarations;
use crate::error::{TmdlError, TmdlResult};
use pbd_core::{ElementKind, ModelFile};
use std::collections::{BTreeMap, BTreeSet};

/// Names per file name, in declaration order
pub type ExtractedNames = BTreeMap<String, Vec<String>>;

/// Extract every declared name of `kind` from each file.
///
/// Names are reported in raw inner form (`'new''s measure'` yields
/// `new''s measure`). Files without a match are left out of the result.
/// Every file must be model text; otherwise nothing is returned. Files
/// sharing a name (from different directories) share one entry, in input
/// order, and a warning is logged.
pub fn extract_names(files: &[ModelFile], kind: ElementKind) -> TmdlResult<ExtractedNames> {
    if let Some(file) = files.iter().find(|f| !f.is_model_text()) {
        return Err(TmdlError::UnsupportedFileType {
            file: file.name.clone(),
        });
    }

    let mut extracted = ExtractedNames::new();
    let mut seen = BTreeSet::new();
    for file in files {
        if !seen.insert(file.name.as_str()) {
            log::warn!(
                "Several model files are named '{}'; their {} are listed together",
                file.name,
                kind.plural()
            );
        }
        let names: Vec<String> = scan_declarations(&file.content, kind)
            .into_iter()
            .map(|d| d.name)
            .collect();
        log::debug!("{}: {} {}", file.name, names.len(), kind.plural());
        if !names.is_empty() {
            extracted.entry(file.name.clone()).or_default().extend(names);
        }
    }
    Ok(extracted)
}

/// [`extract_names`] with the kind given as text ("tables", "columns", "measures")
pub fn extract_names_str(files: &[ModelFile], kind: &str) -> TmdlResult<ExtractedNames> {
    let kind = kind
        .parse::<ElementKind>()
        .map_err(|_| TmdlError::InvalidElementKind {
            kind: kind.to_string(),
            expected: "tables, columns, or measures".to_string(),
        })?;
    extract_names(files, kind)
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
