//! Models module for the SDK
//!
//! Defines the tabular records exchanged between the extractor, the transformation
//! utilities and the exporters.

pub mod enums;
pub mod lineage;
pub mod metadata;
pub mod relationship;

pub use enums::*;
pub use lineage::{ColumnRenameMapping, FieldLineageRow, VisualFieldSelection};
pub use metadata::{CalculatedMeasure, ExtractedModel, SchemaColumn, TableTransformScript};
pub use relationship::{AnnotatedRelationship, JoinScript, RelationshipRecord};
