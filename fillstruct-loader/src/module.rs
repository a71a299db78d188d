//! `go.mod` discovery and the parts of it that locate dependencies.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::debug;

use crate::error::LoadError;

/// The Go module a pattern lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub root: Utf8PathBuf,
    /// Module path from the `module` directive.
    pub path: String,
    /// `require` directives: module path to version.
    pub requires: BTreeMap<String, String>,
    /// `replace` directives keyed by the replaced module path.
    pub replaces: BTreeMap<String, Replacement>,
}

/// Right-hand side of a `replace` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// A directory, relative paths resolved against the module root.
    Dir(Utf8PathBuf),
    Module { path: String, version: String },
}

impl GoModule {
    /// Find the `go.mod` governing `start`, searching parent directories.
    pub fn discover(start: &Utf8Path) -> Result<Self, LoadError> {
        let mut dir = if start.is_file() {
            start.parent().unwrap_or(start)
        } else {
            start
        };
        loop {
            let candidate = dir.join("go.mod");
            if candidate.is_file() {
                let text = fs::read_to_string(&candidate)?;
                let path = parse_module_path(&text).ok_or_else(|| LoadError::ModFile {
                    path: candidate.clone(),
                    message: "missing module directive".to_string(),
                })?;
                let directives = parse_directives(&text);
                debug!(
                    root = %dir,
                    module = %path,
                    requires = directives.requires.len(),
                    "found go.mod"
                );
                let replaces = directives
                    .replaces
                    .into_iter()
                    .map(|(old, new)| (old, new.anchored(dir)))
                    .collect();
                return Ok(GoModule {
                    root: dir.to_owned(),
                    path,
                    requires: directives.requires,
                    replaces,
                });
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => {
                    return Err(LoadError::NoModule {
                        start: start.to_owned(),
                    });
                }
            }
        }
    }

    /// Import path of the package in `dir`, if `dir` is inside the module.
    pub fn import_path(&self, dir: &Utf8Path) -> Option<String> {
        let rel = dir.strip_prefix(&self.root).ok()?;
        if rel.as_str().is_empty() {
            return Some(self.path.clone());
        }
        let rel: Vec<&str> = rel.components().map(|c| c.as_str()).collect();
        Some(format!("{}/{}", self.path, rel.join("/")))
    }

    /// Directory of a module-local import path.
    pub fn dir_of(&self, import_path: &str) -> Option<Utf8PathBuf> {
        if import_path == self.path {
            return Some(self.root.clone());
        }
        let rel = import_path.strip_prefix(&self.path)?.strip_prefix('/')?;
        Some(self.root.join(rel))
    }

    /// The required module providing `import_path`: the longest module path
    /// that is the import path or a prefix of it, with the rest of the path.
    pub fn requirement_for<'a>(&self, import_path: &'a str) -> Option<(&str, &str, &'a str)> {
        self.requires
            .iter()
            .filter_map(|(module, version)| {
                let rest = import_path.strip_prefix(module.as_str())?;
                match rest.strip_prefix('/') {
                    Some(rest) => Some((module.as_str(), version.as_str(), rest)),
                    None if rest.is_empty() => Some((module.as_str(), version.as_str(), rest)),
                    None => None,
                }
            })
            .max_by_key(|(module, _, _)| module.len())
    }
}

impl Replacement {
    fn anchored(self, root: &Utf8Path) -> Self {
        match self {
            Replacement::Dir(dir) if dir.is_relative() => Replacement::Dir(root.join(dir)),
            other => other,
        }
    }
}

/// Directory of `module@version` inside a module cache.
pub fn module_cache_dir(cache: &Utf8Path, module: &str, version: &str) -> Utf8PathBuf {
    cache.join(format!("{}@{}", escape_path(module), escape_path(version)))
}

/// Module cache case escaping: an upper-case letter becomes `!` and its
/// lower-case form, so paths stay distinct on case-insensitive filesystems.
pub fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            out.push('!');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Default)]
struct Directives {
    requires: BTreeMap<String, String>,
    replaces: BTreeMap<String, Replacement>,
}

/// A `replace` target naming a directory rather than a module.
fn is_local_path(target: &str) -> bool {
    target.starts_with("./") || target.starts_with("../") || target.starts_with('/')
}

/// Read `require` and `replace` directives, single-line or in blocks.
fn parse_directives(go_mod: &str) -> Directives {
    let mut out = Directives::default();
    let mut block: Option<&str> = None;
    for line in go_mod.lines() {
        let line = line.split("//").next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        if let Some(verb) = block {
            if line == ")" {
                block = None;
            } else {
                out.directive(verb, line);
            }
            continue;
        }
        let (verb, rest) = line.split_once([' ', '\t']).unwrap_or((line, ""));
        let rest = rest.trim();
        if !matches!(verb, "require" | "replace") {
            continue;
        }
        if rest == "(" {
            block = Some(verb);
        } else {
            out.directive(verb, rest);
        }
    }
    out
}

impl Directives {
    fn directive(&mut self, verb: &str, line: &str) {
        let unquote = |s: &str| s.trim_matches(|c| c == '"' || c == '`').to_string();
        match verb {
            "require" => {
                let mut fields = line.split_whitespace();
                if let (Some(path), Some(version)) = (fields.next(), fields.next()) {
                    self.requires.insert(unquote(path), unquote(version));
                }
            }
            "replace" => {
                let Some((old, new)) = line.split_once("=>") else {
                    return;
                };
                let Some(old) = old.split_whitespace().next() else {
                    return;
                };
                let mut new = new.split_whitespace().map(unquote);
                let replacement = match (new.next(), new.next()) {
                    (Some(path), Some(version)) => Replacement::Module { path, version },
                    (Some(dir), None) if is_local_path(&dir) => {
                        Replacement::Dir(Utf8PathBuf::from(dir))
                    }
                    _ => return,
                };
                self.replaces.insert(unquote(old), replacement);
            }
            _ => {}
        }
    }
}

fn parse_module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with([' ', '\t']) {
            return None;
        }
        let path = rest.trim().trim_matches(|c| c == '"' || c == '`');
        (!path.is_empty()).then(|| path.to_string())
    })
}
