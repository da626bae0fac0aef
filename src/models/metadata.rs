//! Extracted report metadata
//!
//! The tables produced by the external metadata extractor. Field names accept the
//! extractor's PascalCase column names as aliases.

use super::relationship::RelationshipRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One column of the model schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaColumn {
    #[serde(alias = "TableName")]
    pub table_name: String,
    #[serde(alias = "ColumnName")]
    pub column_name: String,
    #[serde(alias = "PandasDataType", alias = "DataType", default)]
    pub data_type: String,
}

/// A named calculated measure and its expression text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalculatedMeasure {
    #[serde(alias = "TableName", default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "DisplayFolder", default, skip_serializing_if = "Option::is_none")]
    pub display_folder: Option<String>,
    #[serde(alias = "Expression")]
    pub expression: String,
    #[serde(alias = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The query-transformation script of one table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableTransformScript {
    #[serde(alias = "TableName")]
    pub table_name: String,
    #[serde(alias = "Expression")]
    pub expression: String,
}

/// Everything the extractor produced for one report file
///
/// # Example
///
/// ```rust
/// use bi_migration_sdk::models::ExtractedModel;
///
/// let model: ExtractedModel = serde_json::from_str(r#"{"relationships": []}"#).unwrap();
/// assert!(model.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedModel {
    #[serde(default)]
    pub schema: Vec<SchemaColumn>,
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
    #[serde(default, alias = "dax_measures")]
    pub measures: Vec<CalculatedMeasure>,
    #[serde(default, alias = "power_query")]
    pub transforms: Vec<TableTransformScript>,
    /// Raw report-layout tree (pages, visual containers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<serde_json::Value>,
}

impl ExtractedModel {
    /// True when no table carries any row and no layout is attached
    pub fn is_empty(&self) -> bool {
        self.schema.is_empty()
            && self.relationships.is_empty()
            && self.measures.is_empty()
            && self.transforms.is_empty()
            && self.layout.is_none()
    }

    /// Transformation scripts keyed by table name
    ///
    /// A table listed more than once keeps its scripts concatenated in input order,
    /// so rename steps from every entry are still found.
    pub fn transform_scripts(&self) -> BTreeMap<String, String> {
        let mut scripts: BTreeMap<String, String> = BTreeMap::new();
        for t in &self.transforms {
            scripts
                .entry(t.table_name.clone())
                .and_modify(|s| {
                    s.push('\n');
                    s.push_str(&t.expression);
                })
                .or_insert_with(|| t.expression.clone());
        }
        scripts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_extractor_table_names() {
        let json = r#"{
            "schema": [{"TableName": "Sales", "ColumnName": "Amount", "PandasDataType": "float64"}],
            "dax_measures": [{"TableName": "Sales", "Name": "Total", "Expression": "SUM(Sales[Amount])"}],
            "power_query": [{"TableName": "Sales", "Expression": "let Source = 1 in Source"}]
        }"#;
        let model: ExtractedModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.schema[0].data_type, "float64");
        assert_eq!(model.measures[0].name, "Total");
        assert!(model.measures[0].display_folder.is_none());
        assert_eq!(model.transforms.len(), 1);
        assert!(!model.is_empty());
    }

    #[test]
    fn duplicate_transform_entries_are_concatenated() {
        let model = ExtractedModel {
            transforms: vec![
                TableTransformScript {
                    table_name: "T".to_string(),
                    expression: "a".to_string(),
                },
                TableTransformScript {
                    table_name: "T".to_string(),
                    expression: "b".to_string(),
                },
            ],
            ..Default::default()
        };
        assert_eq!(model.transform_scripts().get("T").unwrap(), "a\nb");
    }
}
