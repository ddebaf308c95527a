use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

mod commands;
mod logging;

use commands::{backup, init_config, migrate, scaffold, seed, Context};
use polyglot_tools::settings::load_settings;

#[derive(Parser)]
#[command(name = "polyglot-tools")]
#[command(version)]
#[command(about = "Development utilities for the Polyglot Connect web app")]
struct Cli {
    /// Settings file (default: ./polyglot-tools.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a directory to a sibling `<name>_old` backup
    Backup(backup::BackupArgs),
    /// Generate the project skeleton
    Scaffold(scaffold::ScaffoldArgs),
    /// Move static asset folders into public/ and fix index.html paths
    MigrateAssets(migrate::MigrateArgs),
    /// Upsert group definitions into Firestore
    SeedGroups(seed::SeedArgs),
    /// Write a settings file with the current values
    InitConfig(init_config::InitConfigArgs),
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let loaded = load_settings(cli.config.as_deref(), &cwd)?;
    if let Some(source) = &loaded.source {
        tracing::debug!("using settings from {}", source.display());
    }
    let ctx = Context {
        settings: loaded.settings,
        cwd,
    };

    match cli.command {
        Commands::Backup(args) => backup::run(args, &ctx),
        Commands::Scaffold(args) => scaffold::run(args, &ctx),
        Commands::MigrateAssets(args) => migrate::run(args, &ctx),
        Commands::SeedGroups(args) => seed::run(args, &ctx),
        Commands::InitConfig(args) => init_config::run(args, &ctx),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = match logging::init(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
