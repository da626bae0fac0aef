//! Extraction pipeline context
//!
//! Holds one report's extracted metadata and the configuration, and runs the
//! transformation steps on it. Each step reads from the context and returns its
//! own rows; nothing is cached between calls.

use crate::config::MigrationConfig;
use crate::convert::{
    FieldLineageReconciler, JoinScriptSynthesizer, LineageError, MeasureTranslator,
    TranslationRecord, TranslationRequest, prepare_translations, translate_measures,
};
use crate::import::{LayoutImportResult, LayoutImporter, ModelImporter};
use crate::models::{
    AnnotatedRelationship, ColumnRenameMapping, ExtractedModel, FieldLineageRow,
};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// One report's metadata plus the settings the steps run with
#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    pub model: ExtractedModel,
    pub config: MigrationConfig,
}

impl PipelineContext {
    pub fn new(model: ExtractedModel, config: MigrationConfig) -> Self {
        Self { model, config }
    }

    /// Load the workspace configuration and a model file in one step
    pub fn load(model_path: &Path, workspace: &Path) -> Result<Self> {
        let config = MigrationConfig::load(workspace)
            .with_context(|| format!("loading configuration from {}", workspace.display()))?;
        let model = ModelImporter::new()
            .import_file(model_path)
            .with_context(|| format!("importing model {}", model_path.display()))?;
        Ok(Self::new(model, config))
    }

    /// Attach a report layout given as JSON text
    pub fn with_layout_text(mut self, content: &str) -> Result<Self, LineageError> {
        let layout = serde_json::from_str(content)
            .map_err(|e| LineageError::ExtractionMalformed(format!("report layout: {}", e)))?;
        self.model.layout = Some(layout);
        Ok(self)
    }

    /// Annotated relationship table
    ///
    /// Inactive relationships are dropped first unless
    /// `pipeline.only_active_relationships` is off.
    pub fn join_scripts(&self) -> Vec<AnnotatedRelationship> {
        let synthesizer = JoinScriptSynthesizer::new();
        if self.config.pipeline.only_active_relationships {
            synthesizer.synthesize_active(&self.model.relationships)
        } else {
            synthesizer.synthesize_all(&self.model.relationships)
        }
    }

    /// Rename mappings from every table's transformation script
    pub fn rename_mappings(&self) -> Vec<ColumnRenameMapping> {
        FieldLineageReconciler::new().extract_renames(&self.model.transform_scripts())
    }

    /// Visual field selections from the attached layout (empty when there is none)
    pub fn visual_selections(&self) -> LayoutImportResult {
        match &self.model.layout {
            Some(layout) => LayoutImporter::new().extract(layout),
            None => LayoutImportResult::default(),
        }
    }

    /// Alias → source column table for every field the report's visuals select
    pub fn field_lineage(&self) -> Vec<FieldLineageRow> {
        let layout = self.visual_selections();
        let mappings = self.rename_mappings();
        info!(
            "Reconciling {} visual fields against {} column renames",
            layout.selections.len(),
            mappings.len()
        );
        FieldLineageReconciler::new().reconcile(&layout.selections, &mappings)
    }

    /// Translation requests for the configured number of measures
    pub fn translation_requests(&self) -> Vec<TranslationRequest> {
        prepare_translations(&self.model.measures, self.config.translation_options())
    }

    /// Translate the prepared requests with an external translator
    pub fn translate(&self, translator: &dyn MeasureTranslator) -> Vec<TranslationRecord> {
        translate_measures(&self.translation_requests(), translator)
    }

    /// Fail with `ExtractionEmpty` when the model has no relationships
    pub fn require_relationships(&self) -> Result<(), LineageError> {
        if self.model.relationships.is_empty() {
            return Err(LineageError::ExtractionEmpty("relationships".to_string()));
        }
        Ok(())
    }

    /// Fail with `ExtractionEmpty` when the model has no layout to read visual fields from
    ///
    /// A layout embedded as JSON text must parse to an object, otherwise
    /// `ExtractionMalformed` is returned.
    pub fn require_layout(&self) -> Result<(), LineageError> {
        match &self.model.layout {
            None => Err(LineageError::ExtractionEmpty("report layout".to_string())),
            Some(serde_json::Value::String(text)) => {
                match serde_json::from_str::<serde_json::Value>(text) {
                    Ok(serde_json::Value::Object(_)) => Ok(()),
                    Ok(_) => Err(LineageError::ExtractionMalformed(
                        "report layout text is not a JSON object".to_string(),
                    )),
                    Err(e) => Err(LineageError::ExtractionMalformed(format!(
                        "report layout: {}",
                        e
                    ))),
                }
            }
            Some(_) => Ok(()),
        }
    }

    /// Fail with `ExtractionEmpty` when the model has no calculated measures
    pub fn require_measures(&self) -> Result<(), LineageError> {
        if self.model.measures.is_empty() {
            return Err(LineageError::ExtractionEmpty("calculated measures".to_string()));
        }
        Ok(())
    }

    /// Fail with `ExtractionEmpty` when the model has no schema rows
    pub fn require_schema(&self) -> Result<(), LineageError> {
        if self.model.schema.is_empty() {
            return Err(LineageError::ExtractionEmpty("schema".to_string()));
        }
        Ok(())
    }
}
