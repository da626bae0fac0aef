//! Report layout import
//!
//! Walks a report layout tree and lists the fields each visual selects.
//!
//! Expected shape (only the keys read here are shown):
//!
//! ```text
//! { "sections": [ { "displayName": "Overview",
//!                   "visualContainers": [ { "config": "<JSON string or object>" } ] } ] }
//! ```
//!
//! A container's `config` holds `name` (the visual id) and
//! `singleVisual.prototypeQuery` with `From` (source aliases → entities) and
//! `Select` (the selected columns and measures). Containers or select items that
//! do not have this shape are skipped and counted, never fatal to the batch.

use super::ImportError;
use crate::models::VisualFieldSelection;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Fields extracted from a layout, with the number of entries that were skipped
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[must_use = "layout results should be checked for skipped entries"]
pub struct LayoutImportResult {
    pub selections: Vec<VisualFieldSelection>,
    /// Visual containers or select items that could not be read
    pub skipped: usize,
}

/// Report layout importer
#[derive(Default)]
pub struct LayoutImporter;

impl LayoutImporter {
    pub fn new() -> Self {
        Self
    }

    /// Parse layout JSON text
    ///
    /// Only a document that is not JSON at all is an error; structural problems inside
    /// it are skipped.
    pub fn parse(&self, content: &str) -> Result<LayoutImportResult, ImportError> {
        let layout: Value = serde_json::from_str(content)
            .map_err(|e| ImportError::ParseError(format!("Invalid layout JSON: {}", e)))?;
        Ok(self.extract(&layout))
    }

    /// Extract visual field selections from an already parsed layout tree
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::import::LayoutImporter;
    /// use serde_json::json;
    ///
    /// let layout = json!({"sections": [{"displayName": "Overview", "visualContainers": [
    ///     {"config": "{\"name\":\"v1\",\"singleVisual\":{\"prototypeQuery\":{\"Select\":[{\"Name\":\"Sales.Amount\"}]}}}"}
    /// ]}]});
    /// let result = LayoutImporter::new().extract(&layout);
    /// assert_eq!(result.selections[0].table_name, "Sales");
    /// assert_eq!(result.selections[0].alias, "Amount");
    /// ```
    pub fn extract(&self, layout: &Value) -> LayoutImportResult {
        let mut result = LayoutImportResult::default();

        // Some extractors embed the whole layout as JSON text
        if let Value::String(text) = layout {
            return match serde_json::from_str::<Value>(text) {
                Ok(parsed @ Value::Object(_)) => self.extract(&parsed),
                _ => {
                    warn!("Layout text is not a JSON object; no visual fields extracted");
                    result.skipped = 1;
                    result
                }
            };
        }

        let Some(sections) = layout.get("sections").and_then(Value::as_array) else {
            warn!("Layout has no sections; no visual fields extracted");
            return result;
        };

        for section in sections {
            let page_name = section
                .get("displayName")
                .or_else(|| section.get("name"))
                .and_then(Value::as_str)
                .unwrap_or_default();

            let Some(containers) = section.get("visualContainers").and_then(Value::as_array)
            else {
                continue;
            };

            for container in containers {
                match container_selections(page_name, container) {
                    Some((selections, skipped_items)) => {
                        result.selections.extend(selections);
                        result.skipped += skipped_items;
                    }
                    None => {
                        debug!("Skipping unreadable visual container on page '{}'", page_name);
                        result.skipped += 1;
                    }
                }
            }
        }

        if result.skipped > 0 {
            warn!(
                "Skipped {} malformed layout entries ({} fields extracted)",
                result.skipped,
                result.selections.len()
            );
        }
        result
    }
}

/// Selections of one visual container and the count of unreadable select items
fn container_selections(
    page_name: &str,
    container: &Value,
) -> Option<(Vec<VisualFieldSelection>, usize)> {
    let config = match container.get("config")? {
        Value::String(text) => serde_json::from_str::<Value>(text).ok()?,
        obj @ Value::Object(_) => obj.clone(),
        _ => return None,
    };

    let visual_id = config.get("name").and_then(Value::as_str).unwrap_or_default();
    let query = config.get("singleVisual")?.get("prototypeQuery")?;
    let select = query.get("Select")?.as_array()?;

    let sources: HashMap<&str, &str> = query
        .get("From")
        .and_then(Value::as_array)
        .map(|from| {
            from.iter()
                .filter_map(|f| {
                    Some((
                        f.get("Name")?.as_str()?,
                        f.get("Entity")?.as_str()?,
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    let mut selections = Vec::new();
    let mut skipped = 0;
    for item in select {
        match select_item_field(item, &sources) {
            Some((table, alias)) => selections.push(VisualFieldSelection::new(
                page_name, visual_id, table, alias,
            )),
            None => skipped += 1,
        }
    }
    Some((selections, skipped))
}

/// (table, alias) of one select item
///
/// The structured column reference wins; the `Name` property (`Table.Alias`) is the
/// fallback for items without one.
fn select_item_field(item: &Value, sources: &HashMap<&str, &str>) -> Option<(String, String)> {
    structured_field(item, sources).or_else(|| named_field(item))
}

fn structured_field(item: &Value, sources: &HashMap<&str, &str>) -> Option<(String, String)> {
    let field = item
        .get("Column")
        .or_else(|| item.get("Measure"))
        .or_else(|| {
            let inner = item.get("Aggregation")?.get("Expression")?;
            inner.get("Column").or_else(|| inner.get("Measure"))
        })?;

    let property = field.get("Property")?.as_str()?;
    let source_ref = field.get("Expression")?.get("SourceRef")?;
    let table = match source_ref.get("Entity").and_then(Value::as_str) {
        Some(entity) => entity,
        None => {
            let alias = source_ref.get("Source")?.as_str()?;
            sources.get(alias).copied()?
        }
    };
    Some((table.to_string(), property.to_string()))
}

fn named_field(item: &Value) -> Option<(String, String)> {
    let name = item.get("Name")?.as_str()?;
    if name.contains('(') {
        return None;
    }
    let (table, alias) = name.split_once('.')?;
    if table.is_empty() || alias.is_empty() {
        return None;
    }
    Some((table.to_string(), alias.to_string()))
}
