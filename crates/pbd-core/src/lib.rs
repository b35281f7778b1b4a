//! pbd-core - Core library for pbidoc
//!
//! This crate provides the shared types used across pbidoc: element kinds,
//! model files and their discovery, the documentation set returned by the
//! description generator, and run configuration.

pub mod config;
pub mod documentation;
pub mod element;
pub mod error;
pub mod model_file;
pub mod table_name;

pub use config::Config;
pub use documentation::{Description, DocumentationPayload, DocumentationSet, ObjectDetails};
pub use element::ElementKind;
pub use error::CoreError;
pub use model_file::{discover_model_files, ModelFile, MODEL_FILE_EXTENSION};
pub use table_name::TableName;
