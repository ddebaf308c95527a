use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Local;
use clap::Args;
use console::{style, Term};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use polyglot_tools::snapshot::{is_confirmed, BackupJob};

use super::Context;

#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Directory to back up (default: working directory)
    #[arg(long)]
    source: Option<PathBuf>,

    /// Where the `<name>_old` folder goes (default: the source's parent)
    #[arg(long)]
    backup_parent: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

const PROMPT: &str = "Do you want to proceed? (yes/no)";

// dialoguer needs a terminal; piped answers are read as a plain line.
fn read_answer() -> io::Result<String> {
    if Term::stdout().is_term() && io::stdin().is_terminal() {
        return Input::<String>::new()
            .with_prompt(PROMPT)
            .allow_empty(true)
            .interact_text()
            .map_err(io::Error::from);
    }
    print!("{}: ", PROMPT);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

fn ask_to_proceed() -> bool {
    match read_answer() {
        Ok(answer) => is_confirmed(&answer),
        Err(e) => {
            tracing::warn!("could not read an answer: {}", e);
            false
        }
    }
}

pub fn run(args: BackupArgs, ctx: &Context) -> Result<()> {
    let configured = &ctx.settings.backup;
    let source = args
        .source
        .or_else(|| configured.source.clone())
        .map(|p| ctx.resolve(&p))
        .unwrap_or_else(|| ctx.cwd.clone());
    let source = source.canonicalize().unwrap_or(source);
    let parent = args
        .backup_parent
        .or_else(|| configured.backup_parent.clone())
        .map(|p| ctx.resolve(&p))
        .or_else(|| source.parent().map(Path::to_path_buf))
        .ok_or_else(|| {
            anyhow!(
                "{} has no parent directory; pass --backup-parent",
                source.display()
            )
        })?;

    let job = BackupJob::new(&source, parent);
    let backup_name = match job.backup_name() {
        Ok(name) => name,
        Err(e) => {
            tracing::error!("{}", e);
            return Ok(());
        }
    };

    println!("This will back up: {}", style(source.display()).bold());
    println!("To a new folder named: {}", style(&backup_name).bold());
    println!("Inside this location: {}", job.backup_parent().display());

    if !args.yes && !ask_to_proceed() {
        println!("Backup operation cancelled.");
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {pos} entries  {wide_msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = job.run_with_progress(Local::now().naive_local(), |path| {
        spinner.inc(1);
        spinner.set_message(path.display().to_string());
    });
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            if let Some(archived) = &outcome.archived {
                println!("Previous backup moved to {}", archived.display());
            }
            println!(
                "{} {} ({} directories, {} files, {} symlinks)",
                style("Backup completed:").green(),
                outcome.backup_path.display(),
                outcome.stats.dirs,
                outcome.stats.files,
                outcome.stats.symlinks
            );
        }
        Err(e) => tracing::error!("backup failed: {}", e),
    }
    Ok(())
}
