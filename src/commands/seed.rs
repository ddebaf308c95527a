use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use polyglot_tools::seed::{
    load_group_definitions, seed_groups, DocumentStore, DryRunStore, FirestoreStore, SeedReport,
};

use super::{print_banner, Context};

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// JSON array of group definitions
    #[arg(long)]
    groups_file: Option<PathBuf>,

    /// Service-account key file
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Firestore project (default: the key's project)
    #[arg(long)]
    project_id: Option<String>,

    /// Use a Firestore emulator at host:port
    #[arg(long)]
    emulator_host: Option<String>,

    /// Log the documents instead of writing them
    #[arg(long)]
    dry_run: bool,
}

fn print_report(report: &SeedReport) {
    for skipped in &report.skipped {
        println!(
            "{} entry #{} '{}': {}",
            style("skipped").yellow(),
            skipped.index,
            skipped.label,
            skipped.reason
        );
    }
    for failed in &report.failed {
        println!("{} {}: {}", style("failed").red(), failed.id, failed.error);
        println!("  data attempted: {}", failed.payload);
    }
    println!(
        "{} written, {} skipped, {} failed",
        report.written.len(),
        report.skipped.len(),
        report.failed.len()
    );
}

pub fn run(args: SeedArgs, ctx: &Context) -> Result<()> {
    let mut settings = ctx.settings.seed.clone();
    if let Some(path) = args.groups_file {
        settings.groups_file = path;
    }
    if let Some(path) = args.credentials {
        settings.credentials = path;
    }
    if args.project_id.is_some() {
        settings.project_id = args.project_id;
    }
    if args.emulator_host.is_some() {
        settings.emulator_host = args.emulator_host;
    }
    settings.groups_file = ctx.resolve(&settings.groups_file);
    settings.credentials = ctx.resolve(&settings.credentials);

    let records = match load_group_definitions(&settings.groups_file) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("{}", e);
            return Ok(());
        }
    };
    println!("Found {} group definitions.", records.len());

    let store: Box<dyn DocumentStore> = if args.dry_run {
        Box::new(DryRunStore)
    } else {
        match FirestoreStore::connect(&settings) {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::error!("could not initialise Firestore client: {}", e);
                println!("Aborting, nothing was written.");
                return Ok(());
            }
        }
    };

    let report = seed_groups(store.as_ref(), &records);
    print_report(&report);
    print_banner("Group population finished.");
    Ok(())
}
