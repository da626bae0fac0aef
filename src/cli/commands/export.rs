//! Export command handlers

use crate::cli::error::CliError;
use crate::config::MigrationConfig;
use crate::convert::LineageError;
use crate::export::{CsvExporter, ExportResult};
use crate::import::ModelImporter;
use crate::pipeline::PipelineContext;
use std::path::{Path, PathBuf};
use tracing::info;

/// Table to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Joins,
    Lineage,
    Schema,
    Measures,
}

/// Arguments for export operations
#[derive(Debug, Clone)]
pub struct ExportArgs {
    pub table: ExportTable,
    /// Extracted model file (.json, .yaml)
    pub model: PathBuf,
    /// Report layout JSON file, overriding any layout embedded in the model
    pub layout: Option<PathBuf>,
    /// Output file; CSV goes to stdout when absent
    pub output: Option<PathBuf>,
    pub force: bool,
    /// Workspace holding `.bi-migration.toml`
    pub workspace: PathBuf,
    /// Keep inactive relationships in the join table
    pub all_relationships: bool,
}

/// Load the configuration and model into a pipeline context
pub fn load_context(
    model: &Path,
    layout: Option<&Path>,
    workspace: &Path,
) -> Result<PipelineContext, CliError> {
    let config = MigrationConfig::load(workspace)?;

    if !model.exists() {
        return Err(CliError::FileNotFound(model.to_path_buf()));
    }
    let extracted = ModelImporter::new().import_file(model)?;
    let ctx = PipelineContext::new(extracted, config);

    match layout {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
            Ok(ctx.with_layout_text(&content)?)
        }
        None => Ok(ctx),
    }
}

/// Check if file exists and handle overwrite
pub fn check_file_overwrite(output_path: &Path, force: bool) -> Result<(), CliError> {
    if output_path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "Output file exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }
    Ok(())
}

/// Write export output to file
pub fn write_export_output(output_path: &Path, content: &str) -> Result<(), CliError> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::FileWriteError(
                output_path.to_path_buf(),
                format!("Failed to create directory: {}", e),
            )
        })?;
    }

    std::fs::write(output_path, content)
        .map_err(|e| CliError::FileWriteError(output_path.to_path_buf(), e.to_string()))
}

/// Output path under the configured output directory, unless already absolute
pub fn resolve_output(config: &MigrationConfig, workspace: &Path, output: &Path) -> PathBuf {
    if output.is_absolute() {
        output.to_path_buf()
    } else {
        config.output_dir(workspace).join(output)
    }
}

/// Write to the output file or stdout
pub fn emit(
    ctx: &PipelineContext,
    args: &ExportArgs,
    content: &str,
    rows: usize,
) -> Result<(), CliError> {
    match &args.output {
        Some(output) => {
            let path = resolve_output(&ctx.config, &args.workspace, output);
            check_file_overwrite(&path, args.force)?;
            write_export_output(&path, content)?;
            info!("Wrote {} rows to {}", rows, path.display());
            println!("✅ Exported {} rows to {}", rows, path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Handle any table export
pub fn handle_export(args: &ExportArgs) -> Result<(), CliError> {
    let mut ctx = load_context(&args.model, args.layout.as_deref(), &args.workspace)?;
    if args.all_relationships {
        ctx.config.pipeline.only_active_relationships = false;
    }
    let exporter = CsvExporter::with_delimiter(ctx.config.delimiter_byte()?);

    let result: ExportResult = match args.table {
        ExportTable::Joins => {
            if ctx.require_relationships().is_err() {
                println!("No relationships found.");
                return Ok(());
            }
            let rows = ctx.join_scripts();
            if rows.is_empty() {
                println!("No active relationships found.");
                return Ok(());
            }
            exporter.export_join_scripts(&rows)?
        }
        ExportTable::Lineage => {
            match ctx.require_layout() {
                Ok(()) => {}
                Err(LineageError::ExtractionEmpty(_)) => {
                    println!("No report layout found.");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
            let rows = ctx.field_lineage();
            if rows.is_empty() {
                println!("No visual fields found.");
                return Ok(());
            }
            exporter.export_field_lineage(&rows)?
        }
        ExportTable::Schema => {
            if ctx.require_schema().is_err() {
                println!("No schema found.");
                return Ok(());
            }
            exporter.export_schema(&ctx.model.schema)?
        }
        ExportTable::Measures => {
            if ctx.require_measures().is_err() {
                println!("No calculated measures found.");
                return Ok(());
            }
            exporter.export_measures(&ctx.model.measures)?
        }
    };

    emit(&ctx, args, &result.content, result.rows)
}
