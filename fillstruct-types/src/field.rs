use serde::{Deserialize, Serialize};

use crate::ty::Type;

/// A field declared directly on a struct, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub index: usize,
    pub name: String,
    pub ty: Type,
    /// Visible to completion under the active visibility predicate.
    pub exported: bool,
    /// Embedded field, named after its type.
    pub embedded: bool,
}
