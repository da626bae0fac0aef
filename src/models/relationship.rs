//! Relationship model for the SDK

use super::enums::Cardinality;
use serde::{Deserialize, Serialize};

/// One directed relationship edge of the source semantic model
///
/// Field names accept both snake_case and the PascalCase column names produced by
/// metadata extractors (`FromTableName`, `IsActive`, ...).
///
/// # Example
///
/// ```rust
/// use bi_migration_sdk::models::{Cardinality, RelationshipRecord};
///
/// let rel = RelationshipRecord::new("Orders", "CustomerID", "Customers", "ID", Cardinality::ManyToOne);
/// assert!(rel.is_active);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipRecord {
    /// Table on the "from" (usually many) side
    #[serde(alias = "FromTableName", alias = "FromTable")]
    pub from_table: String,
    /// Column on the "from" side
    #[serde(alias = "FromColumnName", alias = "FromColumn")]
    pub from_column: String,
    /// Table on the "to" (usually one) side
    #[serde(alias = "ToTableName", alias = "ToTable")]
    pub to_table: String,
    /// Column on the "to" side
    #[serde(alias = "ToColumnName", alias = "ToColumn")]
    pub to_column: String,
    /// Relationship multiplicity
    #[serde(alias = "Cardinality")]
    pub cardinality: Cardinality,
    /// Inactive relationships are kept in the model but not used for joins
    #[serde(alias = "IsActive", default = "default_true")]
    pub is_active: bool,
    /// Cross-filter direction as reported by the extractor (e.g. "Single", "Both")
    #[serde(alias = "CrossFilteringBehavior", default)]
    pub cross_filter_behavior: String,
}

fn default_true() -> bool {
    true
}

impl RelationshipRecord {
    /// Create an active relationship with no cross-filter behavior recorded
    pub fn new(
        from_table: impl Into<String>,
        from_column: impl Into<String>,
        to_table: impl Into<String>,
        to_column: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_column: from_column.into(),
            to_table: to_table.into(),
            to_column: to_column.into(),
            cardinality,
            is_active: true,
            cross_filter_behavior: String::new(),
        }
    }

    /// Mark the relationship inactive
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Set the cross-filter behavior
    pub fn with_cross_filter(mut self, behavior: impl Into<String>) -> Self {
        self.cross_filter_behavior = behavior.into();
        self
    }
}

/// SQL join fragment derived from one relationship record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinScript {
    /// Table named in the `FROM` clause
    pub source_table: String,
    /// Cumulative `FROM ... LEFT JOIN ...` text
    pub script_text: String,
    /// Join-strategy hint for the target platform
    pub suggested_strategy: String,
}

/// A relationship record paired with its synthesized join script
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotatedRelationship {
    pub relationship: RelationshipRecord,
    pub join: JoinScript,
}
