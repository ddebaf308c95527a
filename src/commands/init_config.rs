use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use polyglot_tools::settings::{save_settings, LOCAL_SETTINGS_FILE};

use super::Context;

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Destination (default: ./polyglot-tools.toml)
    #[arg(long)]
    path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

/// Write the effective settings (defaults when no file was found) so they
/// can be edited.
pub fn run(args: InitConfigArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve(&args.path.unwrap_or_else(|| PathBuf::from(LOCAL_SETTINGS_FILE)));
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    save_settings(&ctx.settings, &path)?;
    println!("Wrote settings to {}", path.display());
    Ok(())
}
