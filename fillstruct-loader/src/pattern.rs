//! Package patterns: `./...`, `dir`, `dir/...`, or a single `.go` file.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use tracing::debug;

use crate::error::LoadError;

const SKIPPED_DIRS: [&str; 2] = ["vendor", "testdata"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A directory and everything below it.
    Tree(Utf8PathBuf),
    Dir(Utf8PathBuf),
    File(Utf8PathBuf),
}

impl Pattern {
    pub fn parse(text: &str, cwd: &Utf8Path) -> Result<Self, LoadError> {
        let invalid = |message: &str| LoadError::Pattern {
            pattern: text.to_string(),
            message: message.to_string(),
        };
        if text.is_empty() {
            return Err(invalid("empty pattern"));
        }
        let (base, tree) = match text.strip_suffix("...") {
            Some(rest) if rest.is_empty() || rest.ends_with('/') => {
                (rest.trim_end_matches('/'), true)
            }
            Some(_) => return Err(invalid("'...' must follow a path separator")),
            None => (text, false),
        };
        if base.contains("...") {
            return Err(invalid("'...' is only supported at the end"));
        }
        let base = if base.is_empty() { "." } else { base };
        let path = normalize(&cwd.join(base));
        Ok(if tree {
            Pattern::Tree(path)
        } else if path.extension() == Some("go") {
            Pattern::File(path)
        } else {
            Pattern::Dir(path)
        })
    }

    /// Directory the pattern is anchored at.
    pub fn dir(&self) -> &Utf8Path {
        match self {
            Pattern::Tree(dir) | Pattern::Dir(dir) => dir,
            Pattern::File(file) => file.parent().unwrap_or(file),
        }
    }

    /// Matching Go files, sorted.
    pub fn files(&self) -> Result<Vec<Utf8PathBuf>, LoadError> {
        let mut files = match self {
            Pattern::File(file) => {
                fs::metadata(file)?;
                vec![file.clone()]
            }
            Pattern::Dir(dir) => {
                fs::metadata(dir)?;
                glob_go_files(dir, "*.go")?
            }
            Pattern::Tree(dir) => {
                fs::metadata(dir)?;
                glob_go_files(dir, "**/*.go")?
                    .into_iter()
                    .filter(|file| !in_skipped_dir(dir, file))
                    .collect()
            }
        };
        files.sort();
        debug!(pattern = ?self, files = files.len(), "discovered Go files");
        Ok(files)
    }
}

/// Go files directly in `dir`, honoring the `.`/`_` ignore rule.
pub(crate) fn package_files(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, LoadError> {
    let mut files = glob_go_files(dir, "*.go")?;
    files.sort();
    Ok(files)
}

fn glob_go_files(dir: &Utf8Path, suffix: &str) -> Result<Vec<Utf8PathBuf>, LoadError> {
    let pattern = format!("{}/{suffix}", glob::Pattern::escape(dir.as_str()));
    let entries = glob(&pattern).map_err(|e| LoadError::Pattern {
        pattern: pattern.clone(),
        message: e.to_string(),
    })?;
    let mut out = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| LoadError::Io(e.into()))?;
        let path = Utf8PathBuf::from_path_buf(path).map_err(|p| LoadError::NonUtf8Path {
            path: p.display().to_string(),
        })?;
        let ignored = path
            .file_name()
            .is_none_or(|name| name.starts_with('.') || name.starts_with('_'));
        if !ignored && path.is_file() {
            out.push(path);
        }
    }
    Ok(out)
}

fn in_skipped_dir(root: &Utf8Path, file: &Utf8Path) -> bool {
    let Ok(rel) = file.strip_prefix(root) else {
        return false;
    };
    let Some(parent) = rel.parent() else {
        return false;
    };
    parent.components().any(|c| {
        let name = c.as_str();
        SKIPPED_DIRS.contains(&name) || name.starts_with('.') || name.starts_with('_')
    })
}

fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}
