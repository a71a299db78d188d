use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A non-fatal problem at one literal site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatError {
    pub message: String,
    /// `path:line:col` of the site.
    pub position_text: String,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\n{}", self.position_text, self.message)
    }
}

/// Outcome of completing one file.
///
/// `output` is set exactly when `changed` is true; callers must not write
/// anything otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatResult {
    pub path: Utf8PathBuf,
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
    pub changed: bool,
    pub errors: Vec<FormatError>,
}

impl FormatResult {
    pub fn unchanged(path: Utf8PathBuf, errors: Vec<FormatError>) -> Self {
        Self {
            path,
            output: None,
            changed: false,
            errors,
        }
    }

    pub fn changed(path: Utf8PathBuf, output: Vec<u8>, errors: Vec<FormatError>) -> Self {
        Self {
            path,
            output: Some(output),
            changed: true,
            errors,
        }
    }
}
