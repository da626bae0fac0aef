//! Model transformation utilities
//!
//! - Join-script synthesis from relationship records
//! - Field-lineage reconciliation of visual aliases with source columns
//! - Calculated-measure translation requests for an external translator

pub mod field_lineage;
pub mod join_script;
pub mod measures;

/// Error raised while turning extracted metadata into derived tables
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub enum LineageError {
    /// No rows were available for the requested table
    #[error("No {0} found")]
    ExtractionEmpty(String),
    /// A single entry could not be read
    #[error("Malformed entry: {0}")]
    ExtractionMalformed(String),
    /// The extractor or translator collaborator failed
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

pub use field_lineage::FieldLineageReconciler;
pub use join_script::{JoinScriptSynthesizer, MANY_TO_ONE_STRATEGY, NO_STRATEGY};
pub use measures::{
    MeasureTranslator, TranslationOptions, TranslationRecord, TranslationRequest,
    prepare_translations, translate_measures,
};
