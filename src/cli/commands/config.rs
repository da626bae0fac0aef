//! Config command implementation

use crate::cli::error::CliError;
use crate::config::{CONFIG_FILENAME, MigrationConfig, sample_config};
use std::path::Path;

/// Write the sample configuration into a workspace
pub fn handle_config_init(workspace: &Path, force: bool) -> Result<(), CliError> {
    if MigrationConfig::exists(workspace) && !force {
        return Err(CliError::InvalidArgument(format!(
            "{} already exists in {}. Use --force to overwrite.",
            CONFIG_FILENAME,
            workspace.display()
        )));
    }

    let path = workspace.join(CONFIG_FILENAME);
    std::fs::write(&path, sample_config())
        .map_err(|e| CliError::FileWriteError(path.clone(), e.to_string()))?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}

/// Print the effective configuration (file plus environment overrides)
pub fn handle_config_show(workspace: &Path) -> Result<(), CliError> {
    let config = MigrationConfig::load(workspace)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
