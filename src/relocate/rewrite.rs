//! Make relative asset references in an HTML document root-absolute.
//!
//! The document is scanned for `src=` / `href=` attribute tokens. A token's
//! value is rewritten to `/<value>` only when it starts with one of the
//! asset prefixes, is not already root-absolute and is not a full URL.
//! Everything outside rewritten values is left byte-for-byte intact, and
//! running the rewrite again changes nothing.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::RelocateError;
use crate::fs_op::helpers::atomic_write;

// The attribute name must start the token, so `data-src=` never matches.
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?P<lead>^|\s)(?P<attr>src|href)(?P<eq>\s*=\s*)(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#,
    )
    .expect("attribute pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChange {
    pub attr: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub changes: Vec<PathChange>,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// `js` and `js/` both become `js/`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    format!("{}/", trimmed)
}

/// True when `path` should gain a leading `/`. A bare prefix such as
/// `css/` names no file and is left alone.
pub fn needs_root_prefix(path: &str, prefixes: &[String]) -> bool {
    if path.starts_with('/') || path.starts_with("http://") || path.starts_with("https://") {
        return false;
    }
    prefixes
        .iter()
        .any(|p| path.len() > p.len() && path.starts_with(p.as_str()))
}

/// Rewrite qualifying attribute values in `html`.
///
/// `prefixes` are expected in normalized form (see [`normalize_prefix`]).
pub fn rewrite_asset_paths(html: &str, prefixes: &[String]) -> Rewrite {
    let mut changes = Vec::new();
    let text = ATTR_RE.replace_all(html, |caps: &Captures| {
        let (quote, value) = match (caps.name("dq"), caps.name("sq")) {
            (Some(v), _) => ('"', v.as_str()),
            (None, Some(v)) => ('\'', v.as_str()),
            (None, None) => return caps[0].to_string(),
        };
        if !needs_root_prefix(value, prefixes) {
            return caps[0].to_string();
        }

        let new_value = format!("/{}", value);
        changes.push(PathChange {
            attr: caps["attr"].to_string(),
            from: value.to_string(),
            to: new_value.clone(),
        });
        format!(
            "{}{}{}{q}{}{q}",
            &caps["lead"],
            &caps["attr"],
            &caps["eq"],
            new_value,
            q = quote
        )
    });

    Rewrite {
        text: text.into_owned(),
        changes,
    }
}

/// Rewrite the file at `path` in place. The file is only written when at
/// least one attribute changed, so an up-to-date file keeps its mtime.
pub fn rewrite_index_file(path: &Path, prefixes: &[String]) -> Result<Rewrite, RelocateError> {
    let original = std::fs::read_to_string(path).map_err(|source| RelocateError::ReadIndex {
        path: path.to_path_buf(),
        source,
    })?;
    let rewrite = rewrite_asset_paths(&original, prefixes);
    for change in &rewrite.changes {
        tracing::info!("updating {} path '{}' to '{}'", change.attr, change.from, change.to);
    }
    if rewrite.changed() {
        atomic_write(path, rewrite.text.as_bytes()).map_err(|source| {
            RelocateError::WriteIndex {
                path: path.to_path_buf(),
                source,
            }
        })?;
    }
    Ok(rewrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relocate::DEFAULT_REWRITE_PREFIXES;

    fn prefixes() -> Vec<String> {
        DEFAULT_REWRITE_PREFIXES.map(String::from).to_vec()
    }

    fn rewrite(html: &str) -> String {
        rewrite_asset_paths(html, &prefixes()).text
    }

    #[test]
    fn relative_asset_becomes_absolute() {
        assert_eq!(
            rewrite(r#"<script src="data/x.js"></script>"#),
            r#"<script src="/data/x.js"></script>"#
        );
    }

    #[test]
    fn absolute_url_and_foreign_prefix_untouched() {
        for html in [
            r#"<script src="/data/x.js"></script>"#,
            r#"<script src="https://cdn.example/x.js"></script>"#,
            r#"<link href="other/x.css">"#,
            r#"<link href="//fonts.example/css">"#,
        ] {
            assert_eq!(rewrite(html), html);
        }
    }

    #[test]
    fn single_quotes_and_spacing_are_kept() {
        assert_eq!(
            rewrite("<img\n  src = 'images/flags/unknown.png'>"),
            "<img\n  src = '/images/flags/unknown.png'>"
        );
    }

    #[test]
    fn lookalike_attributes_are_left_alone() {
        let html = r#"<img data-src="images/a.png" alt="css/not-a-path"><a xhref="js/a.js">"#;
        assert_eq!(rewrite(html), html);
    }

    #[test]
    fn prefix_must_be_a_whole_directory() {
        let html = r#"<script src="jsx/a.js"></script><link href="css2/a.css">"#;
        assert_eq!(rewrite(html), html);
    }

    #[test]
    fn entry_script_is_untouched() {
        let html = r#"<script type="module" src="js/app.js"></script><script src="js/config/api_keys.js"></script>"#;
        assert_eq!(rewrite(html), html);
    }

    #[test]
    fn bare_prefix_is_untouched() {
        let html = r#"<link href="css/"><a href='images/'>"#;
        assert_eq!(rewrite(html), html);
    }

    #[test]
    fn rewrite_is_idempotent() {
        let html = r#"<link rel="stylesheet" href="css/base/_reset.css"><script src="js/app.js"></script>"#;
        let once = rewrite_asset_paths(html, &prefixes());
        assert_eq!(once.changes.len(), 1);
        assert!(once.text.contains(r#"src="js/app.js""#));
        let twice = rewrite_asset_paths(&once.text, &prefixes());
        assert!(!twice.changed());
        assert_eq!(twice.text, once.text);
    }

    #[test]
    fn changes_are_reported_in_order() {
        let r = rewrite_asset_paths(
            r#"<link href="css/a.css"><script src="js/core/b.js"></script>"#,
            &prefixes(),
        );
        assert_eq!(
            r.changes,
            vec![
                PathChange {
                    attr: "href".into(),
                    from: "css/a.css".into(),
                    to: "/css/a.css".into()
                },
                PathChange {
                    attr: "src".into(),
                    from: "js/core/b.js".into(),
                    to: "/js/core/b.js".into()
                },
            ]
        );
    }

    #[test]
    fn normalize_adds_single_trailing_slash() {
        assert_eq!(normalize_prefix("js"), "js/");
        assert_eq!(normalize_prefix("js/"), "js/");
        assert_eq!(normalize_prefix("/js/utils/"), "js/utils/");
    }

    #[test]
    fn unchanged_file_is_not_rewritten() {
        let td = tempfile::tempdir().unwrap();
        let p = td.path().join("index.html");
        std::fs::write(&p, r#"<script src="/js/ui/app_shell.js"></script>"#).unwrap();
        let old = filetime::FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&p, old).unwrap();

        let r = rewrite_index_file(&p, &prefixes()).unwrap();

        assert!(!r.changed());
        let meta = std::fs::metadata(&p).unwrap();
        assert_eq!(filetime::FileTime::from_last_modification_time(&meta), old);
    }
}
