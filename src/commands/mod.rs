pub mod backup;
pub mod init_config;
pub mod migrate;
pub mod scaffold;
pub mod seed;

use std::path::{Path, PathBuf};

use console::style;
use polyglot_tools::Settings;

const RULE: &str = "-------------------------------------------";

/// Settings and working directory shared by every subcommand.
pub struct Context {
    pub settings: Settings,
    pub cwd: PathBuf,
}

impl Context {
    /// Relative paths are taken from the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

pub fn print_banner(title: &str) {
    println!("\n{}", RULE);
    println!("{}", style(title).bold());
    println!("{}", RULE);
}

pub fn print_steps(heading: &str, steps: &[&str]) {
    println!("\n{}", style(heading).bold());
    for step in steps {
        println!("{}", step);
    }
    println!("{}\n", RULE);
}
