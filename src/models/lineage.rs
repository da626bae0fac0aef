//! Field lineage models
//!
//! A report visual selects fields by their report-facing alias. The table's
//! transformation script may have renamed the source column to that alias;
//! these types carry both sides and the reconciled result.

use serde::{Deserialize, Serialize};

/// One field selected by one visual on one report page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VisualFieldSelection {
    pub page_name: String,
    pub visual_id: String,
    pub table_name: String,
    /// Report-facing column name
    pub alias: String,
}

impl VisualFieldSelection {
    pub fn new(
        page_name: impl Into<String>,
        visual_id: impl Into<String>,
        table_name: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            page_name: page_name.into(),
            visual_id: visual_id.into(),
            table_name: table_name.into(),
            alias: alias.into(),
        }
    }
}

/// One `"original","alias"` pair from a table's rename step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ColumnRenameMapping {
    pub table_name: String,
    pub original_column: String,
    pub alias: String,
}

impl ColumnRenameMapping {
    pub fn new(
        table_name: impl Into<String>,
        original_column: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            original_column: original_column.into(),
            alias: alias.into(),
        }
    }
}

/// Result row of reconciling a visual selection with the rename mappings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldLineageRow {
    pub page_name: String,
    pub visual_id: String,
    pub table_name: String,
    pub alias: String,
    /// `None` when no rename produced the alias (alias is the source name, or metadata is missing)
    pub original_column: Option<String>,
}

impl FieldLineageRow {
    /// Build a row from a selection and the matched source column, if any
    pub fn from_selection(selection: &VisualFieldSelection, original_column: Option<String>) -> Self {
        Self {
            page_name: selection.page_name.clone(),
            visual_id: selection.visual_id.clone(),
            table_name: selection.table_name.clone(),
            alias: selection.alias.clone(),
            original_column,
        }
    }

    /// Source column name, falling back to the alias when no rename applied
    pub fn resolved_column(&self) -> &str {
        self.original_column.as_deref().unwrap_or(&self.alias)
    }
}
