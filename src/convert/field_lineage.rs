//! Field-lineage reconciliation
//!
//! Recovers the source column behind every alias a report visual selects, by
//! reading the `Table.RenameColumns` steps of each table's transformation script
//! and left-joining the visual selections against them on (table, alias).

use crate::models::{ColumnRenameMapping, FieldLineageRow, VisualFieldSelection};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info};

static RE_RENAME_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Table\.RenameColumns\s*\(").expect("Invalid regex"));
static RE_RENAME_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""((?:[^"]|"")*)"\s*,\s*"((?:[^"]|"")*)""#).expect("Invalid regex")
});

/// Field-lineage reconciler
#[derive(Default)]
pub struct FieldLineageReconciler;

impl FieldLineageReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Extract every rename pair from every table's transformation script
    ///
    /// Pairs are returned per table in order of appearance across all rename calls.
    /// Duplicate (table, alias) pairs are kept.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::convert::FieldLineageReconciler;
    /// use std::collections::BTreeMap;
    ///
    /// let mut scripts = BTreeMap::new();
    /// scripts.insert(
    ///     "Sales".to_string(),
    ///     r#"#"Renamed" = Table.RenameColumns(#"Changed Type",{{"A", "X"}, {"B", "Y"}})"#.to_string(),
    /// );
    /// let mappings = FieldLineageReconciler::new().extract_renames(&scripts);
    /// assert_eq!(mappings.len(), 2);
    /// assert_eq!(mappings[1].original_column, "B");
    /// assert_eq!(mappings[1].alias, "Y");
    /// ```
    pub fn extract_renames<'a, I>(&self, table_scripts: I) -> Vec<ColumnRenameMapping>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut mappings = Vec::new();
        for (table, script) in table_scripts {
            let before = mappings.len();
            mappings.extend(
                rename_pairs(script)
                    .into_iter()
                    .map(|(original, alias)| ColumnRenameMapping::new(table, original, alias)),
            );
            if mappings.len() > before {
                debug!(
                    "Found {} column renames in table '{}'",
                    mappings.len() - before,
                    table
                );
            }
        }
        mappings
    }

    /// Left-outer-join selections against rename mappings on (table, alias)
    ///
    /// A selection with no match yields one row with `original_column = None`;
    /// a selection with N matches yields N rows, one per match.
    pub fn reconcile(
        &self,
        selections: &[VisualFieldSelection],
        mappings: &[ColumnRenameMapping],
    ) -> Vec<FieldLineageRow> {
        let mut index: HashMap<(&str, &str), Vec<&ColumnRenameMapping>> = HashMap::new();
        for m in mappings {
            index
                .entry((m.table_name.as_str(), m.alias.as_str()))
                .or_default()
                .push(m);
        }

        let mut rows = Vec::with_capacity(selections.len());
        let mut unmatched = 0usize;
        for selection in selections {
            match index.get(&(selection.table_name.as_str(), selection.alias.as_str())) {
                Some(matches) => rows.extend(matches.iter().map(|m| {
                    FieldLineageRow::from_selection(selection, Some(m.original_column.clone()))
                })),
                None => {
                    unmatched += 1;
                    rows.push(FieldLineageRow::from_selection(selection, None));
                }
            }
        }

        info!(
            "Reconciled {} visual fields into {} lineage rows ({} without a rename)",
            selections.len(),
            rows.len(),
            unmatched
        );
        rows
    }
}

/// All `("original", "alias")` pairs of all rename calls in one script
fn rename_pairs(script: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for call in RE_RENAME_CALL.find_iter(script) {
        let Some(list) = rename_list(script, call.end()) else {
            debug!("Skipping rename call at offset {} without a literal list", call.start());
            continue;
        };
        for cap in RE_RENAME_PAIR.captures_iter(list) {
            pairs.push((unescape(&cap[1]), unescape(&cap[2])));
        }
    }
    pairs
}

/// Brace-delimited second argument of a call whose argument list starts at `args_start`
fn rename_list(script: &str, args_start: usize) -> Option<&str> {
    let bytes = script.as_bytes();
    let comma = top_level_comma(bytes, args_start)?;

    let mut open = comma + 1;
    while open < bytes.len() && bytes[open].is_ascii_whitespace() {
        open += 1;
    }
    if bytes.get(open) != Some(&b'{') {
        return None;
    }
    let close = matching_brace(bytes, open)?;
    Some(&script[open + 1..close])
}

/// Position of the first comma outside nesting and string literals
fn top_level_comma(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            b',' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Position of the `}` closing the `{` at `open`
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn unescape(literal: &str) -> String {
    literal.replace("\"\"", "\"")
}
