//! Error types for pbd-core

use thiserror::Error;

/// Core error type for pbidoc
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Element kind is not one of tables, columns, measures
    #[error("[E003] Invalid element kind '{kind}': expected one of tables, columns, measures")]
    InvalidElementKind { kind: String },

    /// E004: Model directory not found
    #[error("[E004] Model directory not found: {path}")]
    ModelDirNotFound { path: String },

    /// E005: Documentation payload could not be parsed
    #[error("[E005] Failed to parse documentation in {path}: {message}")]
    DocumentationParseError { path: String, message: String },

    /// E006: IO error with file path context
    #[error("[E006] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E007: Config YAML parse error
    #[error("[E007] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
