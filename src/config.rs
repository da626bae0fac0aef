//! Migration configuration file support
//!
//! Handles parsing of `.bi-migration.toml` configuration files and
//! environment variable overrides.

use crate::convert::TranslationOptions;
use crate::convert::measures::DEFAULT_MAX_TRANSLATIONS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".bi-migration.toml";

/// Environment variable for the number of measures translated per batch
pub const ENV_MAX_TRANSLATIONS: &str = "BI_MIGRATION_MAX_TRANSLATIONS";

/// Environment variable for the export output directory
pub const ENV_OUTPUT_DIR: &str = "BI_MIGRATION_OUTPUT_DIR";

/// Environment variable toggling the active-relationship filter
pub const ENV_ACTIVE_ONLY: &str = "BI_MIGRATION_ACTIVE_ONLY";

/// Error while loading or saving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Config error: {0}")]
    ParseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Pipeline configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Drop inactive relationships before synthesizing join scripts
    #[serde(default = "default_true")]
    pub only_active_relationships: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            only_active_relationships: true,
        }
    }
}

/// Measure translation section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasuresSection {
    #[serde(default = "default_max_translations")]
    pub max_translations: usize,
    /// Drop `\n` and `\r` from measure expressions before translation
    #[serde(default = "default_true")]
    pub strip_newlines: bool,
}

fn default_max_translations() -> usize {
    DEFAULT_MAX_TRANSLATIONS
}

impl Default for MeasuresSection {
    fn default() -> Self {
        Self {
            max_translations: default_max_translations(),
            strip_newlines: true,
        }
    }
}

/// Export section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    /// Field delimiter (a single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Directory for exported files, relative to the workspace unless absolute
    #[serde(default)]
    pub output_dir: Option<String>,
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            output_dir: None,
        }
    }
}

/// Main configuration structure
///
/// Represents the `.bi-migration.toml` configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MigrationConfig {
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub measures: MeasuresSection,
    #[serde(default)]
    pub export: ExportSection,
}

impl MigrationConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a workspace directory
    ///
    /// Looks for `.bi-migration.toml` in the workspace directory.
    /// Falls back to defaults if not found.
    pub fn load(workspace_path: &Path) -> Result<Self, ConfigError> {
        let config_path = workspace_path.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(format!("Failed to read config: {}", e)))?;
            Self::parse(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// Save configuration to a workspace directory
    pub fn save(&self, workspace_path: &Path) -> Result<(), ConfigError> {
        let config_path = workspace_path.join(CONFIG_FILENAME);
        let content = self.to_toml()?;

        std::fs::write(&config_path, content)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(max) = std::env::var(ENV_MAX_TRANSLATIONS)
            && let Ok(max) = max.parse()
        {
            self.measures.max_translations = max;
        }

        if let Ok(dir) = std::env::var(ENV_OUTPUT_DIR) {
            self.export.output_dir = Some(dir);
        }

        if let Ok(flag) = std::env::var(ENV_ACTIVE_ONLY)
            && let Ok(flag) = flag.parse()
        {
            self.pipeline.only_active_relationships = flag;
        }
    }

    /// The configured delimiter as a byte
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.export.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ConfigError::ParseError(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.export.delimiter
            ))),
        }
    }

    /// Translation options derived from the `[measures]` section
    pub fn translation_options(&self) -> TranslationOptions {
        TranslationOptions {
            max_translations: self.measures.max_translations,
            strip_newlines: self.measures.strip_newlines,
        }
    }

    /// Resolve the output directory for a workspace
    pub fn output_dir(&self, workspace_path: &Path) -> PathBuf {
        match self.export.output_dir.as_deref() {
            None | Some("") => workspace_path.to_path_buf(),
            Some(dir) if Path::new(dir).is_absolute() => PathBuf::from(dir),
            Some(dir) => workspace_path.join(dir),
        }
    }

    /// Check if configuration exists in a workspace
    pub fn exists(workspace_path: &Path) -> bool {
        workspace_path.join(CONFIG_FILENAME).exists()
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# BI Migration SDK Configuration

[pipeline]
# Drop inactive relationships before synthesizing join scripts
only_active_relationships = true

[measures]
# Number of measures prepared for translation per batch
max_translations = 5
# Remove line breaks (LF and CR) from measure expressions before translation
strip_newlines = true

[export]
# CSV field delimiter
delimiter = ","
# Output directory (relative to workspace, or absolute)
# output_dir = "exports"
"#
}
