//! CLI command tests

#[cfg(feature = "cli")]
mod cli {
    use bi_migration_sdk::cli::commands::config::handle_config_init;
    use bi_migration_sdk::cli::commands::export::{ExportArgs, ExportTable, handle_export};
    use bi_migration_sdk::cli::commands::prompts::{PromptsArgs, handle_prompts};
    use bi_migration_sdk::cli::commands::validate::handle_validate;
    use bi_migration_sdk::cli::error::CliError;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const MODEL_YAML: &str = r#"
relationships:
  - FromTableName: Orders
    FromColumnName: CustomerID
    ToTableName: Customers
    ToColumnName: ID
    Cardinality: "M:1"
    IsActive: true
    CrossFilteringBehavior: OneDirection
  - FromTableName: Customers
    FromColumnName: OrderID
    ToTableName: Orders
    ToColumnName: ID
    Cardinality: "1:M"
    IsActive: true
    CrossFilteringBehavior: OneDirection
dax_measures:
  - Name: Total
    Expression: SUM(Orders[Amount])
power_query:
  - TableName: Orders
    Expression: 'Table.RenameColumns(Source,{{"amt", "Amount"}})'
"#;

    const LAYOUT_JSON: &str = r#"{"sections": [{"displayName": "Main", "visualContainers": [
        {"config": "{\"name\":\"v9\",\"singleVisual\":{\"prototypeQuery\":{\"Select\":[{\"Name\":\"Orders.Amount\"}]}}}"}
    ]}]}"#;

    fn workspace() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let model = dir.path().join("model.yaml");
        std::fs::write(&model, MODEL_YAML).unwrap();
        (dir, model)
    }

    fn args(table: ExportTable, model: &Path, ws: &Path, output: &str) -> ExportArgs {
        ExportArgs {
            table,
            model: model.to_path_buf(),
            layout: None,
            output: Some(PathBuf::from(output)),
            force: false,
            workspace: ws.to_path_buf(),
            all_relationships: false,
        }
    }

    #[test]
    fn test_cli_export_joins() {
        let (dir, model) = workspace();
        let args = args(ExportTable::Joins, &model, dir.path(), "joins.csv");
        handle_export(&args).unwrap();

        let content = std::fs::read_to_string(dir.path().join("joins.csv")).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.contains("FROM Customers a LEFT JOIN Orders b ON a.OrderID = b.ID"));
    }

    #[test]
    fn test_cli_refuses_overwrite_without_force() {
        let (dir, model) = workspace();
        let mut args = args(ExportTable::Joins, &model, dir.path(), "joins.csv");
        handle_export(&args).unwrap();
        assert!(matches!(
            handle_export(&args),
            Err(CliError::InvalidArgument(_))
        ));
        args.force = true;
        assert!(handle_export(&args).is_ok());
    }

    #[test]
    fn test_cli_export_lineage_with_layout_file() {
        let (dir, model) = workspace();
        let layout = dir.path().join("layout.json");
        std::fs::write(&layout, LAYOUT_JSON).unwrap();

        let mut args = args(ExportTable::Lineage, &model, dir.path(), "out/lineage.csv");
        args.layout = Some(layout);
        handle_export(&args).unwrap();

        let content = std::fs::read_to_string(dir.path().join("out/lineage.csv")).unwrap();
        assert_eq!(
            content,
            "Page,Visual ID,Table,Alias,Original Column\nMain,v9,Orders,Amount,amt\n"
        );
    }

    #[test]
    fn test_cli_output_dir_from_config() {
        let (dir, model) = workspace();
        std::fs::write(
            dir.path().join(".bi-migration.toml"),
            "[export]\ndelimiter = \";\"\noutput_dir = \"exports\"\n",
        )
        .unwrap();
        let args = args(ExportTable::Measures, &model, dir.path(), "measures.csv");
        handle_export(&args).unwrap();

        let content = std::fs::read_to_string(dir.path().join("exports/measures.csv")).unwrap();
        assert!(content.starts_with("Table;Name;Display Folder;Expression"));
    }

    #[test]
    fn test_cli_prompts() {
        let (dir, model) = workspace();
        let args = PromptsArgs {
            model,
            output: Some(PathBuf::from("prompts.json")),
            force: false,
            workspace: dir.path().to_path_buf(),
            limit: Some(1),
        };
        handle_prompts(&args).unwrap();

        let content = std::fs::read_to_string(dir.path().join("prompts.json")).unwrap();
        let requests: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(requests.as_array().unwrap().len(), 1);
        assert_eq!(requests[0]["measure"], "Total");
    }

    #[test]
    fn test_cli_validate_strict_fails_on_cycle() {
        let (dir, model) = workspace();
        assert!(handle_validate(&model, dir.path(), false).is_ok());
        assert!(matches!(
            handle_validate(&model, dir.path(), true),
            Err(CliError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_cli_joins_with_only_inactive_relationships_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let model = dir.path().join("inactive.yaml");
        std::fs::write(
            &model,
            r#"
relationships:
  - FromTableName: Orders
    FromColumnName: ShipDate
    ToTableName: Dates
    ToColumnName: Date
    Cardinality: "M:1"
    IsActive: false
"#,
        )
        .unwrap();

        let args = args(ExportTable::Joins, &model, dir.path(), "j.csv");
        handle_export(&args).unwrap();
        assert!(!dir.path().join("j.csv").exists());
    }

    #[test]
    fn test_cli_lineage_with_embedded_layout_text() {
        let dir = TempDir::new().unwrap();
        let model = dir.path().join("model.json");
        let document = serde_json::json!({
            "power_query": [{"TableName": "Orders",
                "Expression": "Table.RenameColumns(Source,{{\"amt\", \"Amount\"}})"}],
            "layout": LAYOUT_JSON,
        });
        std::fs::write(&model, document.to_string()).unwrap();

        let args = args(ExportTable::Lineage, &model, dir.path(), "lineage.csv");
        handle_export(&args).unwrap();
        let content = std::fs::read_to_string(dir.path().join("lineage.csv")).unwrap();
        assert!(content.ends_with("Main,v9,Orders,Amount,amt\n"));
    }

    #[test]
    fn test_cli_lineage_with_unreadable_layout_text_fails() {
        let dir = TempDir::new().unwrap();
        let model = dir.path().join("model.json");
        std::fs::write(&model, r#"{"layout": "{sections: ["}"#).unwrap();

        let args = args(ExportTable::Lineage, &model, dir.path(), "lineage.csv");
        assert!(matches!(handle_export(&args), Err(CliError::LineageError(_))));
    }

    #[test]
    fn test_cli_missing_model() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        let args = args(ExportTable::Schema, &missing, dir.path(), "schema.csv");
        assert!(matches!(handle_export(&args), Err(CliError::FileNotFound(_))));
    }

    #[test]
    fn test_cli_config_init_twice() {
        let dir = TempDir::new().unwrap();
        handle_config_init(dir.path(), false).unwrap();
        assert!(handle_config_init(dir.path(), false).is_err());
        assert!(handle_config_init(dir.path(), true).is_ok());
    }
}
