//! CSV export
//!
//! Writes derived tables as delimited text with fixed column headers.

use super::{ExportError, ExportResult};
use crate::convert::TranslationRecord;
use crate::models::{AnnotatedRelationship, CalculatedMeasure, FieldLineageRow, SchemaColumn};
use tracing::info;

/// Headers of the annotated relationship table
pub const JOIN_SCRIPT_HEADERS: [&str; 9] = [
    "From Table",
    "From Column",
    "To Table",
    "To Column",
    "Cardinality",
    "Is Active",
    "Cross Filter Behavior",
    "Suggested Joins",
    "SQL Script",
];

/// Headers of the field lineage table
pub const FIELD_LINEAGE_HEADERS: [&str; 5] =
    ["Page", "Visual ID", "Table", "Alias", "Original Column"];

pub const SCHEMA_HEADERS: [&str; 3] = ["Table", "Column", "Data Type"];

pub const MEASURE_HEADERS: [&str; 4] = ["Table", "Name", "Display Folder", "Expression"];

pub const TRANSLATION_HEADERS: [&str; 3] =
    ["Measure", "Source Expression", "Translated Expression"];

/// CSV exporter
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different single-byte field delimiter
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Export relationships with their suggested join and SQL script
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::convert::JoinScriptSynthesizer;
    /// use bi_migration_sdk::export::CsvExporter;
    /// use bi_migration_sdk::models::{Cardinality, RelationshipRecord};
    ///
    /// let rels = vec![RelationshipRecord::new("Orders", "CustomerID", "Customers", "ID", Cardinality::ManyToOne)];
    /// let annotated = JoinScriptSynthesizer::new().synthesize_active(&rels);
    /// let result = CsvExporter::new().export_join_scripts(&annotated).unwrap();
    /// assert!(result.content.starts_with("From Table,From Column,To Table"));
    /// assert_eq!(result.rows, 1);
    /// ```
    pub fn export_join_scripts(
        &self,
        rows: &[AnnotatedRelationship],
    ) -> Result<ExportResult, ExportError> {
        self.write_table(
            &JOIN_SCRIPT_HEADERS,
            rows.iter().map(|row| {
                let rel = &row.relationship;
                vec![
                    rel.from_table.clone(),
                    rel.from_column.clone(),
                    rel.to_table.clone(),
                    rel.to_column.clone(),
                    rel.cardinality.to_string(),
                    rel.is_active.to_string(),
                    rel.cross_filter_behavior.clone(),
                    row.join.suggested_strategy.clone(),
                    row.join.script_text.clone(),
                ]
            }),
        )
    }

    /// Export field lineage rows; a missing original column is written as an empty field
    pub fn export_field_lineage(
        &self,
        rows: &[FieldLineageRow],
    ) -> Result<ExportResult, ExportError> {
        self.write_table(
            &FIELD_LINEAGE_HEADERS,
            rows.iter().map(|row| {
                vec![
                    row.page_name.clone(),
                    row.visual_id.clone(),
                    row.table_name.clone(),
                    row.alias.clone(),
                    row.original_column.clone().unwrap_or_default(),
                ]
            }),
        )
    }

    pub fn export_schema(&self, columns: &[SchemaColumn]) -> Result<ExportResult, ExportError> {
        self.write_table(
            &SCHEMA_HEADERS,
            columns.iter().map(|c| {
                vec![
                    c.table_name.clone(),
                    c.column_name.clone(),
                    c.data_type.clone(),
                ]
            }),
        )
    }

    pub fn export_measures(
        &self,
        measures: &[CalculatedMeasure],
    ) -> Result<ExportResult, ExportError> {
        self.write_table(
            &MEASURE_HEADERS,
            measures.iter().map(|m| {
                vec![
                    m.table_name.clone().unwrap_or_default(),
                    m.name.clone(),
                    m.display_folder.clone().unwrap_or_default(),
                    m.expression.clone(),
                ]
            }),
        )
    }

    /// Export translation outcomes; failed calls carry the error text in place of a translation
    pub fn export_translations(
        &self,
        records: &[TranslationRecord],
    ) -> Result<ExportResult, ExportError> {
        self.write_table(
            &TRANSLATION_HEADERS,
            records.iter().map(|r| {
                let translated = match (&r.translated, &r.error) {
                    (Some(text), _) => text.clone(),
                    (None, Some(err)) => format!("error: {}", err),
                    (None, None) => String::new(),
                };
                vec![r.measure.clone(), r.source_expression.clone(), translated]
            }),
        )
    }

    fn write_table<I>(&self, headers: &[&str], rows: I) -> Result<ExportResult, ExportError>
    where
        I: Iterator<Item = Vec<String>>,
    {
        let mut writer = ::csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());
        writer.write_record(headers)?;

        let mut count = 0;
        for row in rows {
            writer.write_record(&row)?;
            count += 1;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::IoError(e.to_string()))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;

        info!("Exported {} rows as CSV", count);
        Ok(ExportResult {
            content,
            format: "csv".to_string(),
            rows: count,
        })
    }
}
