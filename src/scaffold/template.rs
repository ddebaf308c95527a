use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("duplicate entry `{name}` in `{parent}`")]
    Duplicate { parent: PathBuf, name: String },

    #[error("invalid entry name {name:?} in `{parent}`")]
    InvalidName { parent: PathBuf, name: String },

    #[error("template value for `{0}` must be a string (file) or an object (directory)")]
    UnsupportedValue(PathBuf),

    #[error("template root must be a JSON object")]
    RootNotObject,
}

/// One node of a scaffold tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Dir(Vec<Entry>),
    File(String),
}

/// A named node; names are single path components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub node: Node,
}

impl Entry {
    pub fn dir(name: &str, children: Vec<Entry>) -> Self {
        Self {
            name: name.to_string(),
            node: Node::Dir(children),
        }
    }

    pub fn file(name: &str, contents: &str) -> Self {
        Self {
            name: name.to_string(),
            node: Node::File(contents.to_string()),
        }
    }
}

/// The top level of a scaffold: entries created directly under the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    pub entries: Vec<Entry>,
}

impl Template {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Build a template from JSON: strings are files, objects directories.
    pub fn from_json(value: &Value) -> Result<Self, TemplateError> {
        let map = value.as_object().ok_or(TemplateError::RootNotObject)?;
        let entries = entries_from_json(map, Path::new(""))?;
        let template = Self { entries };
        template.validate()?;
        Ok(template)
    }

    /// Reject duplicate names per level and names that are not a single
    /// normal path component.
    pub fn validate(&self) -> Result<(), TemplateError> {
        validate_level(&self.entries, Path::new(""))
    }

    /// Every file path (relative to the root) with its contents, in tree order.
    pub fn files(&self) -> Vec<(PathBuf, &str)> {
        let mut out = Vec::new();
        collect_files(&self.entries, Path::new(""), &mut out);
        out
    }

    /// Every directory path relative to the root, parents before children.
    pub fn dirs(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        collect_dirs(&self.entries, Path::new(""), &mut out);
        out
    }
}

fn entries_from_json(
    map: &serde_json::Map<String, Value>,
    parent: &Path,
) -> Result<Vec<Entry>, TemplateError> {
    map.iter()
        .map(|(name, value)| {
            let here = parent.join(name);
            let node = match value {
                Value::String(s) => Node::File(s.clone()),
                Value::Null => Node::File(String::new()),
                Value::Object(children) => Node::Dir(entries_from_json(children, &here)?),
                _ => return Err(TemplateError::UnsupportedValue(here)),
            };
            Ok(Entry {
                name: name.clone(),
                node,
            })
        })
        .collect()
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

fn validate_level(entries: &[Entry], parent: &Path) -> Result<(), TemplateError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !is_valid_name(&entry.name) {
            return Err(TemplateError::InvalidName {
                parent: parent.to_path_buf(),
                name: entry.name.clone(),
            });
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(TemplateError::Duplicate {
                parent: parent.to_path_buf(),
                name: entry.name.clone(),
            });
        }
        if let Node::Dir(children) = &entry.node {
            validate_level(children, &parent.join(&entry.name))?;
        }
    }
    Ok(())
}

fn collect_files<'a>(entries: &'a [Entry], parent: &Path, out: &mut Vec<(PathBuf, &'a str)>) {
    for entry in entries {
        let here = parent.join(&entry.name);
        match &entry.node {
            Node::File(contents) => out.push((here, contents.as_str())),
            Node::Dir(children) => collect_files(children, &here, out),
        }
    }
}

fn collect_dirs(entries: &[Entry], parent: &Path, out: &mut Vec<PathBuf>) {
    for entry in entries {
        if let Node::Dir(children) = &entry.node {
            let here = parent.join(&entry.name);
            out.push(here.clone());
            collect_dirs(children, &here, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_strings_are_files_objects_are_dirs() {
        let t = Template::from_json(&json!({
            "css": { "base": { "_reset.css": "body {}" } },
            "index.html": "<html></html>"
        }))
        .unwrap();
        assert_eq!(t.dirs(), vec![PathBuf::from("css"), PathBuf::from("css/base")]);
        let files = t.files();
        assert!(files.contains(&(PathBuf::from("css/base/_reset.css"), "body {}")));
        assert!(files.contains(&(PathBuf::from("index.html"), "<html></html>")));
    }

    #[test]
    fn numbers_are_rejected() {
        let err = Template::from_json(&json!({ "data": { "n": 3 } })).unwrap_err();
        assert_eq!(err, TemplateError::UnsupportedValue(PathBuf::from("data/n")));
    }

    #[test]
    fn duplicates_are_rejected() {
        let t = Template::new(vec![
            Entry::dir("js", vec![Entry::file("app.js", ""), Entry::file("app.js", "")]),
        ]);
        assert_eq!(
            t.validate(),
            Err(TemplateError::Duplicate {
                parent: PathBuf::from("js"),
                name: "app.js".into()
            })
        );
    }

    #[test]
    fn traversal_names_are_rejected() {
        for bad in ["", ".", "..", "a/b", "a\\b"] {
            let t = Template::new(vec![Entry::file(bad, "")]);
            assert!(
                matches!(t.validate(), Err(TemplateError::InvalidName { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
