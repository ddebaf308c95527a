//! Materialize a project skeleton from a [`Template`].

pub mod layout;
pub mod template;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::fs_op::create::{create_dir_all, write_text_file};
use crate::fs_op::remove::remove_path;
use crate::fs_op::stat::EntryKind;
use crate::report::Failure;

pub use template::{Entry, Node, Template, TemplateError};

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("could not read template `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template `{path}` is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level paths removed by a clean reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSpec {
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

impl Default for CleanSpec {
    fn default() -> Self {
        Self {
            dirs: ["css", "data", "images", "js"].map(String::from).to_vec(),
            files: vec!["index.html".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    /// Destructive: remove `clean_spec` paths before generating.
    pub clean: bool,
    pub clean_spec: CleanSpec,
}

#[derive(Debug, Default)]
pub struct ScaffoldReport {
    pub removed: Vec<PathBuf>,
    /// Paths a clean reset left alone because they had the wrong kind.
    pub needs_manual_check: Vec<PathBuf>,
    pub dirs_created: usize,
    pub files_written: usize,
    pub failures: Vec<Failure>,
}

impl ScaffoldReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.needs_manual_check.is_empty()
    }
}

/// Load a JSON template from disk.
pub fn load_template(path: &Path) -> Result<Template, ScaffoldError> {
    let text = fs::read_to_string(path).map_err(|source| ScaffoldError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str(&text).map_err(|source| ScaffoldError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Template::from_json(&value)?)
}

/// Remove the configured directories and files under `root`.
///
/// A path that exists with the wrong kind is reported and kept. Removal
/// failures are recorded and the remaining paths are still processed.
pub fn clean_existing(root: &Path, spec: &CleanSpec, report: &mut ScaffoldReport) {
    let wanted = spec
        .dirs
        .iter()
        .map(|d| (d, EntryKind::Dir))
        .chain(spec.files.iter().map(|f| (f, EntryKind::File)));

    for (name, kind) in wanted {
        let path = root.join(name);
        match EntryKind::at(&path) {
            EntryKind::Missing => continue,
            found if found == kind => match remove_path(&path) {
                Ok(()) => {
                    info!("removed existing {}: {}", kind, path.display());
                    report.removed.push(path);
                }
                Err(e) => {
                    error!("error removing {}: {}", path.display(), e);
                    report.failures.push(Failure::new(path, e));
                }
            },
            found => {
                warn!(
                    "{} exists but is a {}, not a {}; manual check needed",
                    path.display(),
                    found,
                    kind
                );
                report.needs_manual_check.push(path);
            }
        }
    }
}

impl Template {
    /// Create every directory and file of the template under `root`.
    ///
    /// Existing directories are reused and existing files overwritten. A
    /// file that cannot be written is recorded and its siblings still get
    /// created; a directory that cannot be created skips its subtree.
    pub fn realize(&self, root: &Path, report: &mut ScaffoldReport) {
        realize_level(&self.entries, root, report);
    }
}

fn realize_level(entries: &[Entry], parent: &Path, report: &mut ScaffoldReport) {
    for entry in entries {
        let path = parent.join(&entry.name);
        match &entry.node {
            Node::Dir(children) => {
                if let Err(e) = create_dir_all(&path) {
                    error!("error creating directory {}: {}", path.display(), e);
                    report.failures.push(Failure::new(path, e));
                    continue;
                }
                debug!("created directory {}", path.display());
                report.dirs_created += 1;
                realize_level(children, &path, report);
            }
            Node::File(contents) => match write_text_file(&path, contents) {
                Ok(()) => {
                    debug!("created file {}", path.display());
                    report.files_written += 1;
                }
                Err(e) => {
                    error!("error creating file {}: {}", path.display(), e);
                    report.failures.push(Failure::new(path, e));
                }
            },
        }
    }
}

/// Validate the template, optionally clean, then generate under `root`.
pub fn scaffold(
    root: &Path,
    template: &Template,
    options: &ScaffoldOptions,
) -> Result<ScaffoldReport, ScaffoldError> {
    template.validate()?;
    let mut report = ScaffoldReport::default();

    if options.clean {
        info!("clean reset requested, removing existing structure");
        clean_existing(root, &options.clean_spec, &mut report);
    }

    template.realize(root, &mut report);
    info!(
        "project structure created in {} ({} directories, {} files, {} failures)",
        root.display(),
        report.dirs_created,
        report.files_written,
        report.failures.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small() -> Template {
        Template::new(vec![
            Entry::dir("css", vec![Entry::dir("base", vec![Entry::file("a.css", "a{}")])]),
            Entry::file("index.html", "<p>ñ</p>"),
        ])
    }

    #[test]
    fn realize_into_empty_root() {
        let td = tempdir().unwrap();
        let report = scaffold(td.path(), &small(), &ScaffoldOptions::default()).unwrap();
        assert_eq!(report.dirs_created, 2);
        assert_eq!(report.files_written, 2);
        assert!(report.is_clean());
        assert_eq!(fs::read_to_string(td.path().join("css/base/a.css")).unwrap(), "a{}");
        assert_eq!(fs::read_to_string(td.path().join("index.html")).unwrap(), "<p>ñ</p>");
    }

    #[test]
    fn invalid_template_creates_nothing() {
        let td = tempdir().unwrap();
        let t = Template::new(vec![Entry::file("x", ""), Entry::file("x", "")]);
        assert!(scaffold(td.path(), &t, &ScaffoldOptions::default()).is_err());
        assert_eq!(fs::read_dir(td.path()).unwrap().count(), 0);
    }

    #[test]
    fn file_failure_does_not_stop_siblings() {
        let td = tempdir().unwrap();
        // A directory where the template wants a file.
        fs::create_dir_all(td.path().join("css/base/a.css")).unwrap();
        let t = Template::new(vec![
            Entry::dir(
                "css",
                vec![Entry::dir(
                    "base",
                    vec![Entry::file("a.css", "a{}"), Entry::file("b.css", "b{}")],
                )],
            ),
            Entry::file("index.html", ""),
        ]);
        let report = scaffold(td.path(), &t, &ScaffoldOptions::default()).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, td.path().join("css/base/a.css"));
        assert!(td.path().join("css/base/b.css").is_file());
        assert!(td.path().join("index.html").is_file());
    }

    #[test]
    fn clean_reports_wrong_kind() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("js"), "not a dir").unwrap();
        fs::create_dir_all(td.path().join("css/old")).unwrap();
        let mut report = ScaffoldReport::default();
        clean_existing(td.path(), &CleanSpec::default(), &mut report);

        assert_eq!(report.removed, vec![td.path().join("css")]);
        assert_eq!(report.needs_manual_check, vec![td.path().join("js")]);
        assert!(td.path().join("js").is_file());
    }

    #[test]
    fn clean_leaves_unrelated_paths() {
        let td = tempdir().unwrap();
        for dir in ["css/base", "data", "images", "js/ui", "public", "docs"] {
            fs::create_dir_all(td.path().join(dir)).unwrap();
        }
        fs::write(td.path().join("index.html"), "<html>").unwrap();
        fs::write(td.path().join("README.md"), "# readme").unwrap();
        fs::write(td.path().join("public/keep.txt"), "keep").unwrap();
        fs::write(td.path().join("docs/index.html"), "docs").unwrap();

        let mut report = ScaffoldReport::default();
        clean_existing(td.path(), &CleanSpec::default(), &mut report);

        assert_eq!(report.removed.len(), 5);
        assert!(report.needs_manual_check.is_empty());
        for gone in ["css", "data", "images", "js", "index.html"] {
            assert!(!td.path().join(gone).exists(), "{gone} should be removed");
        }
        assert_eq!(fs::read_to_string(td.path().join("README.md")).unwrap(), "# readme");
        assert_eq!(fs::read_to_string(td.path().join("public/keep.txt")).unwrap(), "keep");
        assert_eq!(fs::read_to_string(td.path().join("docs/index.html")).unwrap(), "docs");
    }
}
