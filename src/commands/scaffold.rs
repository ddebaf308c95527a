use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use polyglot_tools::scaffold::{self, layout, CleanSpec, ScaffoldOptions};

use super::{print_banner, print_steps, Context};

const NEXT_STEPS: [&str; 5] = [
    "1. Review the created folders and placeholder files.",
    "2. Put the real images (e.g. Emile_Modern.png) into the matching 'images'",
    "   subfolders, e.g. images/characters/polyglot_connect_modern/.",
    "3. Put your API keys into 'js/config/api_keys.js'.",
    "4. Fill the placeholder JS and CSS files with the actual code.",
];

#[derive(Args, Debug)]
pub struct ScaffoldArgs {
    /// Project root to generate into
    #[arg(long)]
    root: Option<PathBuf>,

    /// Remove the existing skeleton folders and index.html first
    #[arg(long)]
    clean: bool,

    /// JSON template to use instead of the built-in layout
    #[arg(long)]
    template: Option<PathBuf>,
}

pub fn run(args: ScaffoldArgs, ctx: &Context) -> Result<()> {
    let configured = &ctx.settings.scaffold;
    let root = ctx.resolve(args.root.as_ref().unwrap_or(&configured.root));
    let template = match args.template.or_else(|| configured.template.clone()) {
        Some(path) => match scaffold::load_template(&ctx.resolve(&path)) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!("{}", e);
                return Ok(());
            }
        },
        None => layout::polyglot_connect(),
    };
    let options = ScaffoldOptions {
        clean: args.clean || configured.clean,
        clean_spec: CleanSpec {
            dirs: configured.clean_dirs.clone(),
            files: configured.clean_files.clone(),
        },
    };
    if !options.clean {
        tracing::info!("no clean reset; existing files with matching names will be overwritten");
    }

    let report = match scaffold::scaffold(&root, &template, &options) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("template rejected: {}", e);
            return Ok(());
        }
    };

    for path in &report.removed {
        println!("Removed: {}", path.display());
    }
    for path in &report.needs_manual_check {
        println!(
            "{} '{}' has the wrong type, manual check needed",
            style("warning:").yellow(),
            path.display()
        );
    }
    for failure in &report.failures {
        println!("{} {}", style("failed:").red(), failure);
    }

    print_banner("Project structure creation complete!");
    println!(
        "{} directories and {} files under {}",
        report.dirs_created,
        report.files_written,
        root.display()
    );
    print_steps("Next steps:", &NEXT_STEPS);
    Ok(())
}
