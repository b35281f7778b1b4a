//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use pbd_core::{discover_model_files, Config, ModelFile};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors (progress bars, temp files) run before exiting.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Empty: the command already reported the failure.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Absolute path of the model directory named on the command line
pub(crate) fn resolve_model_dir(global: &GlobalArgs) -> Result<PathBuf> {
    std::fs::canonicalize(&global.model_dir).with_context(|| {
        format!(
            "Model directory not found: {}",
            global.model_dir.display()
        )
    })
}

/// Load the config named by `--config`, or the one found in the model directory
pub(crate) fn load_config(global: &GlobalArgs, model_dir: &Path) -> Result<Config> {
    let config = match &global.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_from_dir(model_dir).context("Failed to load config")?,
    };
    Ok(config)
}

/// Discover every model file under `model_dir` honoring the config's discovery settings
pub(crate) fn load_model_files(model_dir: &Path, config: &Config) -> Result<Vec<ModelFile>> {
    let files = discover_model_files(model_dir, config.recursive, &config.ignore_dirs)
        .context("Failed to discover model files")?;
    if files.is_empty() {
        log::warn!("No model files found in {}", model_dir.display());
    } else {
        log::debug!(
            "Found {} model files in {}",
            files.len(),
            model_dir.display()
        );
    }
    Ok(files)
}

/// Path of `file` relative to `root`, falling back to its file name
pub(crate) fn relative_path(root: &Path, file: &ModelFile) -> PathBuf {
    file.path
        .as_deref()
        .and_then(|p| p.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&file.name))
}

/// Percentage of `part` in `total`; an empty total counts as fully covered
pub(crate) fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
