use camino::Utf8PathBuf;
use fillstruct_syntax::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no go.mod found in {start} or any parent directory")]
    NoModule { start: Utf8PathBuf },

    #[error("invalid go.mod at {path}: {message}")]
    ModFile { path: Utf8PathBuf, message: String },

    #[error("invalid pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    #[error("pattern {pattern:?} matched no Go files")]
    NoFiles { pattern: String },

    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },

    #[error("builtin package {path} does not parse: {source}")]
    Stub {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure to turn a human-written type specifier into a struct identity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid type specifier {spec:?} (expected importpath.TypeName)")]
    InvalidSpec { spec: String },

    #[error("package {path} not found")]
    PackageNotFound { path: String },

    #[error("type {spec} not found")]
    TypeNotFound { spec: String },

    #[error("type {spec} is not a struct")]
    NotAStruct { spec: String },

    #[error("type {spec} is ambiguous: {}", candidates.join(", "))]
    Ambiguous {
        spec: String,
        candidates: Vec<String>,
    },

    #[error("loading package for {spec}: {message}")]
    Load { spec: String, message: String },
}
