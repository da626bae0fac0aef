//! Relationship validation functionality
//!
//! Reports relationship records that will produce odd join scripts: empty
//! names, self references and cycles among active relationships. Findings are
//! warnings; join synthesis runs regardless.

use crate::models::RelationshipRecord;
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::warn;

/// Result of relationship validation.
#[derive(Debug, Default, Serialize, Deserialize)]
#[must_use = "validation results should be checked for circular dependencies and self-references"]
pub struct RelationshipValidationResult {
    /// Records with an empty table or column name
    pub incomplete: Vec<IncompleteRelationship>,
    /// Records whose from and to table are the same
    pub self_references: Vec<SelfReference>,
    /// Active records that close a cycle between tables
    pub circular_dependencies: Vec<CircularDependency>,
}

impl RelationshipValidationResult {
    pub fn is_clean(&self) -> bool {
        self.incomplete.is_empty()
            && self.self_references.is_empty()
            && self.circular_dependencies.is_empty()
    }
}

/// Record with missing names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncompleteRelationship {
    /// Position of the record in the input
    pub index: usize,
    /// Names of the empty fields
    pub missing: Vec<String>,
}

/// Self-reference detected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfReference {
    pub index: usize,
    pub table: String,
}

/// Circular dependency detected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularDependency {
    /// Position of the record that closes the cycle
    pub index: usize,
    /// Tables along the cycle, starting and ending at the record's from table
    pub cycle_path: Vec<String>,
}

/// Relationship validator
#[derive(Default)]
pub struct RelationshipValidator;

impl RelationshipValidator {
    /// Create a new relationship validator
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::validation::relationships::RelationshipValidator;
    ///
    /// let validator = RelationshipValidator::new();
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Validate a relationship table
    ///
    /// Inactive records are checked for empty names and self references but are
    /// left out of cycle detection, since they never take part in a join.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::validation::relationships::RelationshipValidator;
    /// use bi_migration_sdk::models::{Cardinality, RelationshipRecord};
    ///
    /// let rels = vec![
    ///     RelationshipRecord::new("A", "b_id", "B", "id", Cardinality::ManyToOne),
    ///     RelationshipRecord::new("B", "a_id", "A", "id", Cardinality::ManyToOne),
    /// ];
    /// let result = RelationshipValidator::new().validate(&rels);
    /// assert_eq!(result.circular_dependencies.len(), 1);
    /// ```
    pub fn validate(&self, relationships: &[RelationshipRecord]) -> RelationshipValidationResult {
        let mut result = RelationshipValidationResult::default();
        let mut graph = Graph::<String, usize, Directed>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        for (index, rel) in relationships.iter().enumerate() {
            let missing = Self::missing_fields(rel);
            if !missing.is_empty() {
                warn!("Relationship {} has empty fields: {}", index, missing.join(", "));
                result.incomplete.push(IncompleteRelationship { index, missing });
            }

            if let Err(self_ref) = self.validate_no_self_reference(index, rel) {
                warn!("Relationship {} references its own table '{}'", index, self_ref.table);
                result.self_references.push(self_ref);
                continue;
            }

            if !rel.is_active {
                continue;
            }

            let source = *node_map
                .entry(rel.from_table.clone())
                .or_insert_with(|| graph.add_node(rel.from_table.clone()));
            let target = *node_map
                .entry(rel.to_table.clone())
                .or_insert_with(|| graph.add_node(rel.to_table.clone()));

            // Adding from -> to closes a cycle if `to` already reaches `from`
            if let Some(mut path) = Self::find_path(&graph, target, source) {
                path.insert(0, rel.from_table.clone());
                warn!(
                    "Relationship {} closes a cycle: {}",
                    index,
                    path.join(" -> ")
                );
                result.circular_dependencies.push(CircularDependency {
                    index,
                    cycle_path: path,
                });
            }
            graph.add_edge(source, target, index);
        }

        result
    }

    /// Validate that source and target tables are different
    pub fn validate_no_self_reference(
        &self,
        index: usize,
        rel: &RelationshipRecord,
    ) -> Result<(), SelfReference> {
        if !rel.from_table.is_empty() && rel.from_table == rel.to_table {
            return Err(SelfReference {
                index,
                table: rel.from_table.clone(),
            });
        }
        Ok(())
    }

    fn missing_fields(rel: &RelationshipRecord) -> Vec<String> {
        [
            ("from_table", &rel.from_table),
            ("from_column", &rel.from_column),
            ("to_table", &rel.to_table),
            ("to_column", &rel.to_column),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect()
    }

    /// Table names along a path from `from` to `to`, using BFS
    fn find_path(
        graph: &Graph<String, usize, Directed>,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut parent = HashMap::new();

        queue.push_back(from);
        visited.insert(from);

        while let Some(node) = queue.pop_front() {
            if node == to {
                let mut path = Vec::new();
                let mut current = Some(to);
                while let Some(node_idx) = current {
                    path.push(graph[node_idx].clone());
                    current = parent.get(&node_idx).copied();
                }
                path.reverse();
                return Some(path);
            }

            for neighbor in graph.neighbors(node) {
                if visited.insert(neighbor) {
                    parent.insert(neighbor, node);
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }
}
