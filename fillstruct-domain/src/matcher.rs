//! Literal matcher: decides which composite literals get completed.

use std::collections::BTreeSet;

use fillstruct_syntax::ast::{AstNode, CompositeLit};
use fillstruct_types::{StructType, Type, TypeIdentity};
use tracing::debug;

use crate::ports::TypeInfo;

/// Struct identities eligible for completion. Empty means every struct,
/// including anonymous ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    ids: BTreeSet<TypeIdentity>,
}

impl TargetSet {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: &TypeIdentity) -> bool {
        self.ids.contains(id)
    }

    /// Whether a literal of the given identity (`None` for an anonymous
    /// struct) is eligible.
    pub fn admits(&self, id: Option<&TypeIdentity>) -> bool {
        match id {
            _ if self.is_empty() => true,
            Some(id) => self.contains(id),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeIdentity> {
        self.ids.iter()
    }
}

impl FromIterator<TypeIdentity> for TargetSet {
    fn from_iter<T: IntoIterator<Item = TypeIdentity>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// A literal accepted for completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeLiteralSite {
    /// Byte offset of the literal in the parsed source.
    pub position: u32,
    /// `None` for an anonymous struct literal.
    pub identity: Option<TypeIdentity>,
    pub layout: StructType,
    pub present: BTreeSet<String>,
    pub all_keyed: bool,
}

/// Classify `lit`, whose type resolved to `resolved`.
///
/// Returns a site only for a struct literal (through at most one pointer)
/// admitted by `targets` whose elements are all keyed.
pub fn classify(
    lit: &CompositeLit,
    resolved: &Type,
    info: &dyn TypeInfo,
    targets: &TargetSet,
) -> Option<CompositeLiteralSite> {
    let (identity, layout) = match resolved.deref() {
        Type::Named { id, args } => match info.underlying(id, args) {
            Some(Type::Struct(st)) => (Some(id.clone()), st),
            _ => return None,
        },
        Type::Struct(st) => (None, st.clone()),
        _ => return None,
    };
    if !targets.admits(identity.as_ref()) {
        return None;
    }

    let all_keyed = lit.elements().all(|e| e.is_keyed());
    if !all_keyed {
        debug!(
            ty = %resolved,
            "skipping literal with positional elements"
        );
        return None;
    }
    let present = lit.elements().filter_map(|e| e.key_name()).collect();

    Some(CompositeLiteralSite {
        position: lit.syntax().text_range().start().into(),
        identity,
        layout,
        present,
        all_keyed,
    })
}
