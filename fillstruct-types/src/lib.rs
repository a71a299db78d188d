//! Shared value types for the fillstruct workspace.
//!
//! # Design constraints
//! - Everything here is plain data, created per file and dropped afterwards.
//! - Type identities compare by value, never by reference.
//! - `FormatResult` is the only type serialized to users (`--json`).

pub mod defaults;
pub mod field;
pub mod identity;
pub mod result;
pub mod ty;

pub use defaults::{CustomDefaults, DefaultSpecError};
pub use field::FieldDescriptor;
pub use identity::{LocalSite, TypeIdentity};
pub use result::{FormatError, FormatResult};
pub use ty::{ArrayLen, BasicKind, ChanDir, StructField, StructType, Type};
