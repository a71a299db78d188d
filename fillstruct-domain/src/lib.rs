//! Type-directed completion of Go struct literals.
//!
//! The driver walks a parsed file, the matcher picks the literals of target
//! struct types, and the rewriter fills in the missing fields with values
//! from the default policy. Type information and printing come in through
//! the [`TypeInfo`] and [`Printer`] ports.

pub mod driver;
pub mod error;
pub mod matcher;
pub mod model;
pub mod policy;
pub mod ports;
pub mod rewriter;

#[cfg(test)]
mod testing;

pub use driver::{fill, fill_source, FillOptions};
pub use error::{FillError, PolicyError, SiteError};
pub use matcher::{classify, CompositeLiteralSite, TargetSet};
pub use model::{fields_of, AllFields, GoExported, Visibility, VisibilityMode};
pub use policy::DefaultPolicy;
pub use ports::{CanonicalPrinter, PrintError, Printer, TypeInfo};
