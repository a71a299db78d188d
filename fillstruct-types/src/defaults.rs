//! Custom default overrides (`TypeSpec=ReplacementName`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::TypeIdentity;
use crate::ty::BasicKind;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefaultSpecError {
    #[error("invalid format: {spec:?} (expected TypeSpec=ConstantName)")]
    MissingSeparator { spec: String },

    #[error("type and constant cannot be empty in {spec:?}")]
    EmptySide { spec: String },
}

/// Override table keyed by type specifier: a basic kind name such as `int`,
/// or a canonical `modulePath.TypeName`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomDefaults {
    rules: BTreeMap<String, String>,
}

impl CustomDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split one `TypeSpec=ReplacementName`, trimming both sides.
    pub fn parse_spec(spec: &str) -> Result<(String, String), DefaultSpecError> {
        let Some((ty, replacement)) = spec.split_once('=') else {
            return Err(DefaultSpecError::MissingSeparator {
                spec: spec.to_string(),
            });
        };
        let (ty, replacement) = (ty.trim(), replacement.trim());
        if ty.is_empty() || replacement.is_empty() {
            return Err(DefaultSpecError::EmptySide {
                spec: spec.to_string(),
            });
        }
        Ok((ty.to_string(), replacement.to_string()))
    }

    /// Parse every spec; the first malformed one fails the whole set. Later
    /// specs for the same type win.
    pub fn parse_specs<I, S>(specs: I) -> Result<Self, DefaultSpecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut defaults = Self::new();
        for spec in specs {
            let (ty, replacement) = Self::parse_spec(spec.as_ref())?;
            defaults.insert(ty, replacement);
        }
        Ok(defaults)
    }

    pub fn insert(&mut self, ty: impl Into<String>, replacement: impl Into<String>) {
        self.rules.insert(ty.into(), replacement.into());
    }

    pub fn get(&self, ty: &str) -> Option<&str> {
        self.rules.get(ty).map(String::as_str)
    }

    /// Override for a basic kind: spelled name first, then canonical name.
    pub fn for_basic(&self, kind: BasicKind) -> Option<&str> {
        self.get(kind.name())
            .or_else(|| self.get(kind.canonical().name()))
    }

    pub fn for_named(&self, id: &TypeIdentity) -> Option<&str> {
        self.get(&id.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

impl FromIterator<(String, String)> for CustomDefaults {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_specs() {
        let (ty, name) = CustomDefaults::parse_spec(" example.com/d.Status = StatusUnknown ")
            .expect("valid");
        assert_eq!(ty, "example.com/d.Status");
        assert_eq!(name, "StatusUnknown");
    }

    #[test]
    fn replacement_may_contain_equals() {
        let (_, name) = CustomDefaults::parse_spec("string=a=b").expect("valid");
        assert_eq!(name, "a=b");
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(matches!(
            CustomDefaults::parse_spec("int"),
            Err(DefaultSpecError::MissingSeparator { .. })
        ));
        assert!(matches!(
            CustomDefaults::parse_spec("=Zero"),
            Err(DefaultSpecError::EmptySide { .. })
        ));
        assert!(matches!(
            CustomDefaults::parse_spec("int= "),
            Err(DefaultSpecError::EmptySide { .. })
        ));
    }

    #[test]
    fn basic_lookup_prefers_spelled_name() {
        let defaults =
            CustomDefaults::parse_specs(["uint8=Zero8", "byte=ZeroByte"]).expect("valid");
        assert_eq!(defaults.for_basic(BasicKind::Byte), Some("ZeroByte"));
        assert_eq!(defaults.for_basic(BasicKind::Uint8), Some("Zero8"));

        let only_canonical = CustomDefaults::parse_specs(["int32=NoRune"]).expect("valid");
        assert_eq!(only_canonical.for_basic(BasicKind::Rune), Some("NoRune"));
    }
}
