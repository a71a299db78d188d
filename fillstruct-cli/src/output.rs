//! Rendering of per-file results for the diff and JSON modes.

use anyhow::Context;
use camino::Utf8Path;
use diffy::PatchFormatter;
use fillstruct_types::{FormatError, FormatResult};
use serde::Serialize;

/// `path` relative to `cwd` when it lies below it.
pub fn display_path<'a>(path: &'a Utf8Path, cwd: &Utf8Path) -> &'a Utf8Path {
    path.strip_prefix(cwd).unwrap_or(path)
}

/// Unified diff of one file, empty when nothing changed.
pub fn render_diff(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }
    let mut out = format!("--- a/{0}\n+++ b/{0}\n", path);
    let patch = diffy::create_patch(before, after);
    let formatted = PatchFormatter::new().fmt_patch(&patch).to_string();
    // diffy writes its own file header; only the hunks are kept.
    if let Some(start) = formatted.find("@@") {
        out.push_str(&formatted[start..]);
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// One line of `--json` output.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub path: &'a Utf8Path,
    pub changed: bool,
    pub errors: &'a [FormatError],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl<'a> JsonReport<'a> {
    pub fn from_result(path: &'a Utf8Path, result: &'a FormatResult) -> Self {
        Self {
            path,
            changed: result.changed,
            errors: &result.errors,
            failure: None,
        }
    }

    pub fn failed(path: &'a Utf8Path, failure: impl ToString) -> Self {
        Self {
            path,
            changed: false,
            errors: Default::default(),
            failure: Some(failure.to_string()),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("serialize json report")
    }
}
