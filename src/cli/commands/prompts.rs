//! Prompts command implementation
//!
//! Writes the measure translation requests as JSON, for whatever client talks to
//! the language model.

use crate::cli::commands::export::{
    check_file_overwrite, load_context, resolve_output, write_export_output,
};
use crate::cli::error::CliError;
use std::path::PathBuf;

/// Arguments for the prompts command
#[derive(Debug, Clone)]
pub struct PromptsArgs {
    pub model: PathBuf,
    pub output: Option<PathBuf>,
    pub force: bool,
    pub workspace: PathBuf,
    /// Overrides `measures.max_translations`
    pub limit: Option<usize>,
}

/// Handle the prompts command
pub fn handle_prompts(args: &PromptsArgs) -> Result<(), CliError> {
    let mut ctx = load_context(&args.model, None, &args.workspace)?;
    if let Some(limit) = args.limit {
        ctx.config.measures.max_translations = limit;
    }

    if ctx.require_measures().is_err() {
        println!("No calculated measures found.");
        return Ok(());
    }

    let requests = ctx.translation_requests();
    let json = serde_json::to_string_pretty(&requests)
        .map_err(|e| CliError::InvalidArgument(format!("Failed to serialize requests: {}", e)))?;

    match &args.output {
        Some(output) => {
            let path = resolve_output(&ctx.config, &args.workspace, output);
            check_file_overwrite(&path, args.force)?;
            write_export_output(&path, &json)?;
            println!(
                "✅ Prepared {} translation requests in {}",
                requests.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
