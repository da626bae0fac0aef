//! Extracted model import
//!
//! Loads an [`ExtractedModel`] from the JSON or YAML document written by the
//! report metadata extractor.

use super::ImportError;
use crate::models::ExtractedModel;
use std::path::Path;
use tracing::info;

/// Serialization format of an extracted model document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Yaml,
}

impl ModelFormat {
    /// Pick the format from a file extension; anything that is not YAML is read as JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ModelFormat::Yaml,
            _ => ModelFormat::Json,
        }
    }
}

/// Extracted model importer
#[derive(Default)]
pub struct ModelImporter;

impl ModelImporter {
    pub fn new() -> Self {
        Self
    }

    /// Parse an extracted model document
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::import::{ModelFormat, ModelImporter};
    ///
    /// let yaml = r#"
    /// relationships:
    ///   - FromTableName: Orders
    ///     FromColumnName: CustomerID
    ///     ToTableName: Customers
    ///     ToColumnName: ID
    ///     Cardinality: "M:1"
    ///     IsActive: true
    /// "#;
    /// let model = ModelImporter::new().parse(yaml, ModelFormat::Yaml).unwrap();
    /// assert_eq!(model.relationships.len(), 1);
    /// ```
    pub fn parse(&self, content: &str, format: ModelFormat) -> Result<ExtractedModel, ImportError> {
        let model: ExtractedModel = match format {
            ModelFormat::Json => serde_json::from_str(content)
                .map_err(|e| ImportError::ParseError(format!("Invalid model JSON: {}", e)))?,
            ModelFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ImportError::ParseError(format!("Invalid model YAML: {}", e)))?,
        };

        info!(
            "Imported model: {} schema columns, {} relationships, {} measures, {} transform scripts",
            model.schema.len(),
            model.relationships.len(),
            model.measures.len(),
            model.transforms.len()
        );
        Ok(model)
    }

    /// Read and parse a model file, choosing the format by extension
    pub fn import_file(&self, path: &Path) -> Result<ExtractedModel, ImportError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ImportError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.parse(&content, ModelFormat::from_path(path))
    }
}
