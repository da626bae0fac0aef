//! CLI binary entry point for bi-migration-cli

#[cfg(feature = "cli")]
use bi_migration_sdk::cli::commands::config::{handle_config_init, handle_config_show};
#[cfg(feature = "cli")]
use bi_migration_sdk::cli::commands::export::{ExportArgs, ExportTable, handle_export};
#[cfg(feature = "cli")]
use bi_migration_sdk::cli::commands::prompts::{PromptsArgs, handle_prompts};
#[cfg(feature = "cli")]
use bi_migration_sdk::cli::commands::validate::handle_validate;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "bi-migration-cli")]
#[command(about = "Join scripts, field lineage and measure prompts from extracted BI report metadata")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Workspace directory holding .bi-migration.toml
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Synthesize SQL join scripts from the model's relationships
    Joins {
        /// Extracted model file (.json, .yaml)
        model: PathBuf,
        /// Output CSV file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep inactive relationships
        #[arg(long)]
        all: bool,
        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
    },
    /// Map every alias selected by a report visual to its source column
    Lineage {
        /// Extracted model file (.json, .yaml)
        model: PathBuf,
        /// Report layout JSON file (overrides a layout embedded in the model)
        #[arg(short, long)]
        layout: Option<PathBuf>,
        /// Output CSV file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
    },
    /// Export the model schema
    Schema {
        model: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        force: bool,
    },
    /// Export the calculated measures
    Measures {
        model: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        force: bool,
    },
    /// Prepare measure translation requests as JSON
    Prompts {
        model: PathBuf,
        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of measures to prepare (overrides configuration)
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(short, long)]
        force: bool,
    },
    /// Check relationships for empty names, self references and cycles
    Validate {
        model: PathBuf,
        /// Fail when any finding is reported
        #[arg(long)]
        strict: bool,
    },
    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a sample .bi-migration.toml into the workspace
    Init {
        #[arg(short, long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so CSV on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
/// Arguments for the table-export subcommands, `None` for any other command
fn into_export_args(command: Commands, workspace: &Path) -> Option<ExportArgs> {
    let workspace = workspace.to_path_buf();
    match command {
        Commands::Joins {
            model,
            output,
            all,
            force,
        } => Some(ExportArgs {
            table: ExportTable::Joins,
            model,
            layout: None,
            output,
            force,
            workspace,
            all_relationships: all,
        }),
        Commands::Lineage {
            model,
            layout,
            output,
            force,
        } => Some(ExportArgs {
            table: ExportTable::Lineage,
            model,
            layout,
            output,
            force,
            workspace,
            all_relationships: false,
        }),
        Commands::Schema {
            model,
            output,
            force,
        } => Some(ExportArgs {
            table: ExportTable::Schema,
            model,
            layout: None,
            output,
            force,
            workspace,
            all_relationships: false,
        }),
        Commands::Measures {
            model,
            output,
            force,
        } => Some(ExportArgs {
            table: ExportTable::Measures,
            model,
            layout: None,
            output,
            force,
            workspace,
            all_relationships: false,
        }),
        _ => None,
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let workspace = cli.workspace;

    let result = match cli.command {
        Commands::Prompts {
            model,
            output,
            limit,
            force,
        } => handle_prompts(&PromptsArgs {
            model,
            output,
            force,
            workspace,
            limit,
        }),
        Commands::Validate { model, strict } => handle_validate(&model, &workspace, strict),
        Commands::Config { command } => match command {
            ConfigCommands::Init { force } => handle_config_init(&workspace, force),
            ConfigCommands::Show => handle_config_show(&workspace),
        },
        export => into_export_args(export, &workspace)
            .map_or(Ok(()), |args| handle_export(&args)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn lineage_flags_land_in_their_own_fields() {
        let cli = Cli::parse_from([
            "bi-migration-cli",
            "-w",
            "ws",
            "lineage",
            "model.json",
            "--layout",
            "layout.json",
            "-o",
            "out.csv",
        ]);
        let args = into_export_args(cli.command, &cli.workspace).unwrap();
        assert_eq!(args.table, ExportTable::Lineage);
        assert_eq!(args.model, PathBuf::from("model.json"));
        assert_eq!(args.layout, Some(PathBuf::from("layout.json")));
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));
        assert_eq!(args.workspace, PathBuf::from("ws"));
        assert!(!args.force);
        assert!(!args.all_relationships);
    }

    #[test]
    fn joins_all_sets_all_relationships_not_force() {
        let cli = Cli::parse_from(["bi-migration-cli", "joins", "m.yaml", "--all"]);
        let args = into_export_args(cli.command, &cli.workspace).unwrap();
        assert_eq!(args.table, ExportTable::Joins);
        assert!(args.all_relationships);
        assert!(!args.force);
        assert_eq!(args.layout, None);
    }

    #[test]
    fn other_commands_have_no_export_args() {
        let cli = Cli::parse_from(["bi-migration-cli", "validate", "m.yaml"]);
        assert!(into_export_args(cli.command, &cli.workspace).is_none());
    }
}
