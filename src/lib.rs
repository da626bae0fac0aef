//! BI Migration SDK - metadata transformations for moving BI reports between platforms
//!
//! Provides:
//! - Import of extracted report metadata (model tables, report layout)
//! - Join-script synthesis from relationship records
//! - Field-lineage reconciliation of visual aliases with source columns
//! - Calculated-measure translation requests for an external translator
//! - Relationship validation
//! - CSV export of every derived table

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod export;
pub mod import;
pub mod models;
pub mod pipeline;
pub mod validation;

pub use config::{ConfigError, MigrationConfig};
pub use convert::{
    FieldLineageReconciler, JoinScriptSynthesizer, LineageError, MeasureTranslator,
};
pub use export::{CsvExporter, ExportError, ExportResult};
pub use import::{ImportError, LayoutImporter, ModelImporter};
pub use pipeline::PipelineContext;
pub use validation::{RelationshipValidationResult, RelationshipValidator};

// Re-export models
pub use models::enums::*;
pub use models::{
    AnnotatedRelationship, CalculatedMeasure, ColumnRenameMapping, ExtractedModel,
    FieldLineageRow, JoinScript, RelationshipRecord, SchemaColumn, TableTransformScript,
    VisualFieldSelection,
};
