//! Field model: which declared fields of a struct take part in completion.

use fillstruct_types::{FieldDescriptor, StructType};
use serde::{Deserialize, Serialize};

/// Decides whether a field name is visible to completion.
pub trait Visibility: Send + Sync {
    fn is_visible(&self, name: &str) -> bool;
}

/// Go export rule: the first character is an upper-case letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoExported;

impl Visibility for GoExported {
    fn is_visible(&self, name: &str) -> bool {
        name.chars().next().is_some_and(char::is_uppercase)
    }
}

/// Every named field, for literals inside the declaring package.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllFields;

impl Visibility for AllFields {
    fn is_visible(&self, name: &str) -> bool {
        name != "_" && !name.is_empty()
    }
}

/// Selectable visibility predicate, as configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityMode {
    #[default]
    Exported,
    All,
}

impl VisibilityMode {
    pub fn predicate(self) -> &'static dyn Visibility {
        match self {
            VisibilityMode::Exported => &GoExported,
            VisibilityMode::All => &AllFields,
        }
    }
}

/// Declared fields of `st` in declaration order.
///
/// Embedded fields appear under their type name; fields promoted through
/// them are never listed.
pub fn fields_of(st: &StructType, visibility: &dyn Visibility) -> Vec<FieldDescriptor> {
    st.fields
        .iter()
        .enumerate()
        .map(|(index, field)| FieldDescriptor {
            index,
            name: field.name.clone(),
            ty: field.ty.clone(),
            exported: field.name != "_" && visibility.is_visible(&field.name),
            embedded: field.embedded,
        })
        .collect()
}
