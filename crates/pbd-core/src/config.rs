//! Configuration types and parsing for pbidoc.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in a model directory, in priority order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["pbidoc.yml", "pbidoc.yaml"];

/// Environment variable overriding the table confidence threshold
pub const TABLE_THRESHOLD_ENV: &str = "PBD_TABLE_THRESHOLD";

/// Run configuration from pbidoc.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Table descriptions are applied only when their confidence ratio is
    /// strictly greater than this
    #[serde(default = "default_table_confidence_threshold")]
    pub table_confidence_threshold: f64,

    /// Column and measure descriptions below this confidence ratio are dropped
    #[serde(default)]
    pub element_confidence_threshold: f64,

    /// Suffix appended to the model directory name for the annotated copy
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Search sub-directories for model files
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Directory names skipped during discovery
    #[serde(default)]
    pub ignore_dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_confidence_threshold: default_table_confidence_threshold(),
            element_confidence_threshold: 0.0,
            output_suffix: default_output_suffix(),
            recursive: default_recursive(),
            ignore_dirs: Vec::new(),
        }
    }
}

fn default_table_confidence_threshold() -> f64 {
    0.8
}

fn default_output_suffix() -> String {
    "_updated".to_string()
}

fn default_recursive() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        // An empty file is a valid "all defaults" config
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a model directory, falling back to defaults
    /// when no config file is present
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        log::debug!("No config file in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        for (field, value) in [
            ("table_confidence_threshold", self.table_confidence_threshold),
            (
                "element_confidence_threshold",
                self.element_confidence_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{} must be between 0 and 1, got {}", field, value),
                });
            }
        }

        if self.output_suffix.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "output_suffix cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve the table threshold from CLI flag or PBD_TABLE_THRESHOLD
    ///
    /// Priority: CLI flag > PBD_TABLE_THRESHOLD env var > config value.
    /// An unparsable env value is ignored with a warning.
    pub fn resolve_table_threshold(&self, cli_threshold: Option<f64>) -> f64 {
        if let Some(threshold) = cli_threshold {
            return threshold;
        }
        match std::env::var(TABLE_THRESHOLD_ENV) {
            Ok(raw) => match raw.trim().parse::<f64>() {
                Ok(threshold) => threshold,
                Err(_) => {
                    log::warn!(
                        "Ignoring {}={:?}: not a number",
                        TABLE_THRESHOLD_ENV,
                        raw
                    );
                    self.table_confidence_threshold
                }
            },
            Err(_) => self.table_confidence_threshold,
        }
    }

    /// Sibling directory receiving the annotated copy of `model_dir`
    pub fn output_dir_for(&self, model_dir: &Path) -> PathBuf {
        let name = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        let updated = format!("{}{}", name, self.output_suffix);
        match model_dir.parent() {
            Some(parent) => parent.join(updated),
            None => PathBuf::from(updated),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
