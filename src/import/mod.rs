//! Import functionality
//!
//! Reads the metadata produced by the external report extractor:
//! - Extracted model tables (JSON or YAML)
//! - Report layout tree (pages → visual containers → selected fields)

pub mod layout;
pub mod model;

/// Error during import
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

// Re-export for convenience
pub use layout::{LayoutImportResult, LayoutImporter};
pub use model::{ModelFormat, ModelImporter};
