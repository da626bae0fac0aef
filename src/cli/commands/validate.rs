//! Validate command implementation

use crate::cli::commands::export::load_context;
use crate::cli::error::CliError;
use crate::validation::RelationshipValidator;
use std::path::Path;

/// Handle the validate command
///
/// Prints every finding; with `strict`, any finding fails the command.
pub fn handle_validate(model: &Path, workspace: &Path, strict: bool) -> Result<(), CliError> {
    let ctx = load_context(model, None, workspace)?;
    let result = RelationshipValidator::new().validate(&ctx.model.relationships);

    for item in &result.incomplete {
        println!(
            "⚠️  Relationship {} has empty fields: {}",
            item.index,
            item.missing.join(", ")
        );
    }
    for item in &result.self_references {
        println!(
            "⚠️  Relationship {} references its own table '{}'",
            item.index, item.table
        );
    }
    for item in &result.circular_dependencies {
        println!(
            "⚠️  Relationship {} closes a cycle: {}",
            item.index,
            item.cycle_path.join(" -> ")
        );
    }

    if result.is_clean() {
        println!(
            "Validation successful ({} relationships)",
            ctx.model.relationships.len()
        );
        return Ok(());
    }

    let findings = result.incomplete.len()
        + result.self_references.len()
        + result.circular_dependencies.len();
    if strict {
        return Err(CliError::ValidationFailed(format!("{} findings", findings)));
    }
    println!("Validation finished with {} warnings", findings);
    Ok(())
}
