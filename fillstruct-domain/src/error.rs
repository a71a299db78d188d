//! Error types for fillstruct-domain.
//!
//! Site-level problems never surface here: they are collected as
//! [`FormatError`](fillstruct_types::FormatError) values on the result. The
//! errors below abort the current file.

use camino::Utf8PathBuf;
use fillstruct_syntax::{ParseError, SyntaxKind};
use fillstruct_types::TypeIdentity;
use thiserror::Error;

use crate::ports::PrintError;

/// Fatal error for one file.
#[derive(Debug, Error)]
pub enum FillError {
    /// The file could not be turned into a mutable tree.
    #[error("{path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: ParseError,
    },

    /// The tree handed to the driver is not a source file.
    #[error("{path}: expected a source file tree, found {kind:?}")]
    NotAFile { path: Utf8PathBuf, kind: SyntaxKind },

    /// The modified tree could not be serialized.
    #[error("{path}: {source}")]
    Print {
        path: Utf8PathBuf,
        #[source]
        source: PrintError,
    },
}

impl FillError {
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            FillError::Parse { path, .. }
            | FillError::NotAFile { path, .. }
            | FillError::Print { path, .. } => path,
        }
    }

    /// Returns true when nothing was written because the output was invalid.
    pub fn is_print_failure(&self) -> bool {
        matches!(self, FillError::Print { .. })
    }

    /// Returns the recommended process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            FillError::Parse { .. } | FillError::NotAFile { .. } | FillError::Print { .. } => 1,
        }
    }
}

/// Failure to synthesize a default for one field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("cannot resolve type {text}")]
    Unresolved { text: String },

    #[error("no declaration found for {id}")]
    UnknownNamed { id: TypeIdentity },

    #[error("cannot render type {text} as an expression: {message}")]
    Render { text: String, message: String },
}

/// Failure to complete one literal; the literal is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot synthesize default for field {field}: {source}")]
pub struct SiteError {
    pub field: String,
    #[source]
    pub source: PolicyError,
}
