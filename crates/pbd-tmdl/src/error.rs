//! Error types for pbd-tmdl

use thiserror::Error;

/// Model-text extraction and annotation errors
#[derive(Error, Debug)]
pub enum TmdlError {
    /// Element kind not supported by the operation (T001)
    #[error("[T001] Invalid element kind '{kind}': expected {expected}")]
    InvalidElementKind { kind: String, expected: String },

    /// File is not model text (T002)
    #[error("[T002] Unsupported file type: '{file}' is not a .tmdl model file")]
    UnsupportedFileType { file: String },
}

/// Result type alias for TmdlError
pub type TmdlResult<T> = Result<T, TmdlError>;
