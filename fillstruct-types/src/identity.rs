use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Canonical identity of a declared Go type.
///
/// Universe types (`error`, `comparable`) have an empty module path. Types
/// declared inside a function body carry the site of their declaration, so
/// two local types with the same name in different functions stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeIdentity {
    pub module_path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalSite>,
}

/// Where a function-local type is declared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocalSite {
    pub file: Utf8PathBuf,
    /// Byte offset of the type spec.
    pub offset: u32,
}

impl TypeIdentity {
    pub fn new(module_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            name: name.into(),
            local: None,
        }
    }

    /// A type declared in a function body of package `module_path`.
    pub fn local(
        module_path: impl Into<String>,
        name: impl Into<String>,
        file: impl Into<Utf8PathBuf>,
        offset: u32,
    ) -> Self {
        Self {
            local: Some(LocalSite {
                file: file.into(),
                offset,
            }),
            ..Self::new(module_path, name)
        }
    }

    pub fn is_local(&self) -> bool {
        self.local.is_some()
    }

    pub fn universe(name: impl Into<String>) -> Self {
        Self::new("", name)
    }

    pub fn is_universe(&self) -> bool {
        self.module_path.is_empty()
    }

    /// Split `path/to/pkg.Name` at the last dot after the last slash.
    pub fn parse(spec: &str) -> Option<Self> {
        let tail_start = spec.rfind('/').map_or(0, |i| i + 1);
        let dot = tail_start + spec[tail_start..].rfind('.')?;
        let (path, name) = (&spec[..dot], &spec[dot + 1..]);
        if path.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(path, name))
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module_path.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.module_path, self.name)
        }
    }
}
