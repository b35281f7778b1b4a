//! Model files and model-directory discovery

use crate::error::{CoreError, CoreResult};
use crate::table_name::TableName;
use std::path::{Path, PathBuf};

/// Extension of the textual tabular-model definition format.
pub const MODEL_FILE_EXTENSION: &str = "tmdl";

/// A single model file: its file name, where it came from, and its full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFile {
    /// File name including extension (e.g. `KPI.tmdl`)
    pub name: String,

    /// Path on disk, `None` for in-memory content
    pub path: Option<PathBuf>,

    /// Full text content
    pub content: String,
}

impl ModelFile {
    /// Create an in-memory model file
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            content: content.into(),
        }
    }

    /// Read a model file from disk
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            content,
        })
    }

    /// Whether the file carries the model-text extension
    pub fn is_model_text(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(MODEL_FILE_EXTENSION))
    }

    /// Table this file describes, taken from the file name before the first `.`
    pub fn table_name(&self) -> Option<TableName> {
        TableName::from_reference(&self.name)
    }
}

/// List every model file under `dir`, sorted by path.
///
/// Directories whose name appears in `ignore_dirs` are not entered. With
/// `recursive == false` only the top level is listed.
pub fn discover_model_files(
    dir: &Path,
    recursive: bool,
    ignore_dirs: &[String],
) -> CoreResult<Vec<ModelFile>> {
    if !dir.is_dir() {
        return Err(CoreError::ModelDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut paths = Vec::new();
    collect_model_paths(dir, recursive, ignore_dirs, &mut paths)?;
    paths.sort();

    log::debug!("Discovered {} model files in {}", paths.len(), dir.display());

    paths.iter().map(|p| ModelFile::load(p)).collect()
}

fn collect_model_paths(
    dir: &Path,
    recursive: bool,
    ignore_dirs: &[String],
    paths: &mut Vec<PathBuf>,
) -> CoreResult<()> {
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            if recursive && !is_ignored_dir(&path, ignore_dirs) {
                collect_model_paths(&path, recursive, ignore_dirs, paths)?;
            }
            continue;
        }
        if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(MODEL_FILE_EXTENSION))
        {
            paths.push(path);
        }
    }
    Ok(())
}

fn is_ignored_dir(path: &Path, ignore_dirs: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    ignore_dirs.iter().any(|d| d == name)
}

#[cfg(test)]
#[path = "model_file_test.rs"]
mod tests;
