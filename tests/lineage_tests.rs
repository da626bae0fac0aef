//! Field-lineage reconciliation tests

use bi_migration_sdk::convert::FieldLineageReconciler;
use bi_migration_sdk::import::LayoutImporter;
use bi_migration_sdk::models::{ColumnRenameMapping, VisualFieldSelection};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};

#[test]
fn test_extract_renames_empty_and_two_pairs() {
    let reconciler = FieldLineageReconciler::new();

    let mut none = HashMap::new();
    none.insert(
        "Dates".to_string(),
        "let Source = List.Dates(#date(2020,1,1), 365, #duration(1,0,0,0)) in Source".to_string(),
    );
    assert!(reconciler.extract_renames(&none).is_empty());

    let mut one = HashMap::new();
    one.insert(
        "Sales".to_string(),
        r#"Table.RenameColumns(Source,{{"A","X"},{"B","Y"}})"#.to_string(),
    );
    let mappings = reconciler.extract_renames(&one);
    assert_eq!(
        mappings,
        vec![
            ColumnRenameMapping::new("Sales", "A", "X"),
            ColumnRenameMapping::new("Sales", "B", "Y"),
        ]
    );
}

#[test]
fn test_reconcile_fan_out() {
    let selections = vec![VisualFieldSelection::new("Page", "v1", "Sales", "Revenue")];
    let mappings = vec![
        ColumnRenameMapping::new("Sales", "rev_gross", "Revenue"),
        ColumnRenameMapping::new("Sales", "rev_net", "Revenue"),
    ];
    let rows = FieldLineageReconciler::new().reconcile(&selections, &mappings);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].page_name, rows[1].page_name);
    assert_eq!(rows[0].visual_id, rows[1].visual_id);
    assert_eq!(rows[0].table_name, rows[1].table_name);
    assert_eq!(rows[0].alias, rows[1].alias);
    assert_eq!(rows[0].original_column.as_deref(), Some("rev_gross"));
    assert_eq!(rows[1].original_column.as_deref(), Some("rev_net"));
}

#[test]
fn test_reconcile_null_case() {
    let selections = vec![VisualFieldSelection::new("Page", "v1", "Sales", "Quantity")];
    let mappings = vec![ColumnRenameMapping::new("Returns", "qty", "Quantity")];
    let rows = FieldLineageReconciler::new().reconcile(&selections, &mappings);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].original_column, None);
    assert_eq!(rows[0].table_name, "Sales");
}

#[test]
fn test_layout_to_lineage_end_to_end() {
    let config = json!({
        "name": "chart01",
        "singleVisual": {
            "visualType": "clusteredColumnChart",
            "prototypeQuery": {
                "Version": 2,
                "From": [
                    {"Name": "c", "Entity": "Customers", "Type": 0},
                    {"Name": "o", "Entity": "Orders", "Type": 0}
                ],
                "Select": [
                    {"Column": {"Expression": {"SourceRef": {"Source": "c"}}, "Property": "Customer Name"},
                     "Name": "Customers.Customer Name"},
                    {"Aggregation": {"Expression": {"Column": {"Expression": {"SourceRef": {"Source": "o"}},
                        "Property": "Order Total"}}, "Function": 0},
                     "Name": "Sum(Orders.Order Total)"},
                    {"Measure": {"Expression": {"SourceRef": {"Entity": "Orders"}}, "Property": "Margin"},
                     "Name": "Orders.Margin"}
                ]
            }
        }
    });
    let layout = json!({"sections": [
        {"displayName": "Customers", "visualContainers": [{"config": config.to_string()}]},
        {"displayName": "Empty page", "visualContainers": []}
    ]});

    let extracted = LayoutImporter::new().extract(&layout);
    assert_eq!(extracted.skipped, 0);
    assert_eq!(extracted.selections.len(), 3);

    let mut scripts = BTreeMap::new();
    scripts.insert(
        "Customers".to_string(),
        r#"let
    Source = Sql.Database("srv", "crm"),
    #"Renamed Columns" = Table.RenameColumns(Source,{{"cust_name", "Customer Name"}})
in
    #"Renamed Columns""#
            .to_string(),
    );
    scripts.insert(
        "Orders".to_string(),
        r#"Table.RenameColumns(#"Changed Type", {{"total_amt", "Order Total"}})"#.to_string(),
    );

    let reconciler = FieldLineageReconciler::new();
    let mappings = reconciler.extract_renames(&scripts);
    let rows = reconciler.reconcile(&extracted.selections, &mappings);

    let resolved: Vec<(&str, &str, Option<&str>)> = rows
        .iter()
        .map(|r| (r.table_name.as_str(), r.alias.as_str(), r.original_column.as_deref()))
        .collect();
    assert_eq!(
        resolved,
        vec![
            ("Customers", "Customer Name", Some("cust_name")),
            ("Orders", "Order Total", Some("total_amt")),
            ("Orders", "Margin", None),
        ]
    );
    assert!(rows.iter().all(|r| r.page_name == "Customers" && r.visual_id == "chart01"));
}
