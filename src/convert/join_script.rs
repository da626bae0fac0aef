//! Join-script synthesis
//!
//! Turns relationship records into SQL `FROM ... LEFT JOIN ...` fragments. Joins
//! accumulate while consecutive records share a `from_table` and restart as soon
//! as it changes, even if that table shows up again later in the input.

use crate::models::{AnnotatedRelationship, Cardinality, JoinScript, RelationshipRecord};
use tracing::debug;

/// Strategy hint emitted for many-to-one relationships
pub const MANY_TO_ONE_STRATEGY: &str =
    "left join at physical layer or many-to-one at logical layer";

/// Strategy hint emitted for every other cardinality
pub const NO_STRATEGY: &str = "not applicable";

/// Join-script synthesizer
#[derive(Default)]
pub struct JoinScriptSynthesizer;

impl JoinScriptSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Synthesize one join script per relationship, in input order
    ///
    /// Does not look at `is_active`; use [`synthesize_active`](Self::synthesize_active)
    /// to drop inactive edges first. Names are copied into the script unvalidated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::convert::JoinScriptSynthesizer;
    /// use bi_migration_sdk::models::{Cardinality, RelationshipRecord};
    ///
    /// let rels = vec![
    ///     RelationshipRecord::new("Orders", "CustomerID", "Customers", "ID", Cardinality::ManyToOne),
    ///     RelationshipRecord::new("Orders", "ProductID", "Products", "ID", Cardinality::ManyToOne),
    /// ];
    /// let scripts = JoinScriptSynthesizer::new().synthesize(&rels);
    /// assert_eq!(
    ///     scripts[1].script_text,
    ///     "FROM Orders a LEFT JOIN Customers b ON a.CustomerID = b.ID LEFT JOIN Products b ON a.ProductID = b.ID"
    /// );
    /// ```
    pub fn synthesize(&self, relationships: &[RelationshipRecord]) -> Vec<JoinScript> {
        let mut scripts = Vec::with_capacity(relationships.len());
        let mut accumulator = String::new();
        let mut current_table: Option<&str> = None;

        for rel in relationships {
            if current_table != Some(rel.from_table.as_str()) {
                accumulator = format!("FROM {} a", rel.from_table);
                current_table = Some(rel.from_table.as_str());
            }
            accumulator.push_str(&format!(
                " LEFT JOIN {} b ON a.{} = b.{}",
                rel.to_table, rel.from_column, rel.to_column
            ));

            scripts.push(JoinScript {
                source_table: rel.from_table.clone(),
                script_text: accumulator.clone(),
                suggested_strategy: Self::suggested_strategy(rel.cardinality).to_string(),
            });
        }

        debug!("Synthesized {} join scripts", scripts.len());
        scripts
    }

    /// Drop inactive relationships, then synthesize and pair each record with its script
    pub fn synthesize_active(
        &self,
        relationships: &[RelationshipRecord],
    ) -> Vec<AnnotatedRelationship> {
        let active: Vec<RelationshipRecord> = relationships
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect();
        let skipped = relationships.len() - active.len();
        if skipped > 0 {
            debug!("Skipping {} inactive relationships", skipped);
        }
        self.annotate(active)
    }

    /// Synthesize for every record (active or not) and pair each with its script
    pub fn synthesize_all(&self, relationships: &[RelationshipRecord]) -> Vec<AnnotatedRelationship> {
        self.annotate(relationships.to_vec())
    }

    fn annotate(&self, relationships: Vec<RelationshipRecord>) -> Vec<AnnotatedRelationship> {
        let scripts = self.synthesize(&relationships);
        relationships
            .into_iter()
            .zip(scripts)
            .map(|(relationship, join)| AnnotatedRelationship { relationship, join })
            .collect()
    }

    /// Join-strategy hint for a cardinality
    pub fn suggested_strategy(cardinality: Cardinality) -> &'static str {
        match cardinality {
            Cardinality::ManyToOne => MANY_TO_ONE_STRATEGY,
            Cardinality::OneToMany | Cardinality::OneToOne | Cardinality::ManyToMany => {
                NO_STRATEGY
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(from: &str, to: &str) -> RelationshipRecord {
        RelationshipRecord::new(from, "k", to, "k", Cardinality::ManyToOne)
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(JoinScriptSynthesizer::new().synthesize(&[]).is_empty());
    }

    #[test]
    fn same_table_runs_accumulate() {
        let rels = vec![rel("A", "B"), rel("A", "C"), rel("A", "D")];
        let scripts = JoinScriptSynthesizer::new().synthesize(&rels);
        for (i, s) in scripts.iter().enumerate() {
            assert_eq!(s.script_text.matches("LEFT JOIN").count(), i + 1);
            assert!(s.script_text.starts_with("FROM A a"));
            if i > 0 {
                assert!(s.script_text.starts_with(&scripts[i - 1].script_text));
                assert_ne!(s.script_text, scripts[i - 1].script_text);
            }
        }
    }

    #[test]
    fn non_contiguous_repeat_restarts_accumulation() {
        let rels = vec![rel("A", "B"), rel("C", "D"), rel("A", "E")];
        let scripts = JoinScriptSynthesizer::new().synthesize(&rels);
        assert_eq!(scripts[2].script_text, "FROM A a LEFT JOIN E b ON a.k = b.k");
    }

    #[test]
    fn strategy_depends_only_on_cardinality() {
        assert_eq!(
            JoinScriptSynthesizer::suggested_strategy(Cardinality::ManyToOne),
            MANY_TO_ONE_STRATEGY
        );
        for c in [
            Cardinality::OneToMany,
            Cardinality::OneToOne,
            Cardinality::ManyToMany,
        ] {
            assert_eq!(JoinScriptSynthesizer::suggested_strategy(c), NO_STRATEGY);
        }
    }

    #[test]
    fn empty_names_pass_through() {
        let rels = vec![RelationshipRecord::new("", "", "", "", Cardinality::OneToOne)];
        let scripts = JoinScriptSynthesizer::new().synthesize(&rels);
        assert_eq!(scripts[0].script_text, "FROM  a LEFT JOIN  b ON a. = b.");
    }

    #[test]
    fn active_filter_drops_inactive_rows_before_accumulating() {
        let rels = vec![rel("A", "B"), rel("A", "C").inactive(), rel("A", "D")];
        let annotated = JoinScriptSynthesizer::new().synthesize_active(&rels);
        assert_eq!(annotated.len(), 2);
        assert_eq!(
            annotated[1].join.script_text,
            "FROM A a LEFT JOIN B b ON a.k = b.k LEFT JOIN D b ON a.k = b.k"
        );
    }
}
