use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use console::style;
use polyglot_tools::relocate::{
    migrate_to_public, ConflictPolicy, MigrationReport, MoveResult, RelocateConfig, RewriteResult,
};

use super::{print_banner, print_steps, Context};

const NEXT_STEPS: [&str; 4] = [
    "Review the changes, especially index.html and the public/ directory, then commit:",
    "  git add .",
    "  git commit -m \"Move static assets into public/\"",
    "  git push",
];

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OnConflict {
    Replace,
    Keep,
}

impl From<OnConflict> for ConflictPolicy {
    fn from(value: OnConflict) -> Self {
        match value {
            OnConflict::Replace => ConflictPolicy::Replace,
            OnConflict::Keep => ConflictPolicy::Keep,
        }
    }
}

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Project root (default: working directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// What to do when a subdirectory already exists in the target
    #[arg(long, value_enum)]
    on_conflict: Option<OnConflict>,
}

fn print_report(report: &MigrationReport) {
    for dir in &report.dirs {
        let (src, dst) = (dir.source.display(), dir.target.display());
        match &dir.result {
            MoveResult::Moved => println!("Moved {} to {}", src, dst),
            MoveResult::Merged {
                moved,
                kept,
                replaced,
                source_removed,
            } => {
                println!("Merged {} entries from {} into {}", moved, src, dst);
                for path in replaced {
                    println!("  replaced {}", path.display());
                }
                for path in kept {
                    println!("  {} kept {} (target exists)", style("note:").yellow(), path.display());
                }
                if !source_removed {
                    println!("  {} left in place, it is not empty", src);
                }
            }
            MoveResult::Missing => println!("Source directory not found, skipped: {}", src),
            MoveResult::Failed(e) => println!("{} {}: {}. Check it manually.", style("failed:").red(), src, e),
        }
    }

    match &report.rewrite {
        RewriteResult::Updated(changes) => println!("Updated {} paths in index file", changes.len()),
        RewriteResult::Unchanged => println!("No path changes needed in index file"),
        RewriteResult::MissingIndex => println!("Index file not found, skipped path update"),
        RewriteResult::Failed(e) => println!("{} index file: {}", style("failed:").red(), e),
    }
}

pub fn run(args: MigrateArgs, ctx: &Context) -> Result<()> {
    let configured = &ctx.settings.relocate;
    let root = args
        .root
        .or_else(|| configured.project_root.clone())
        .map(|p| ctx.resolve(&p))
        .unwrap_or_else(|| ctx.cwd.clone());
    let mut config = RelocateConfig::from_settings(configured, root);
    if let Some(policy) = args.on_conflict {
        config.on_conflict = policy.into();
    }

    match migrate_to_public(&config) {
        Ok(report) => {
            print_report(&report);
            print_banner("Migration process complete.");
            if report.failures() > 0 {
                println!("{} item(s) failed, see above.", report.failures());
            }
            print_steps("Next steps:", &NEXT_STEPS);
        }
        Err(e) => tracing::error!("migration aborted: {}", e),
    }
    Ok(())
}
