//! Package loading for fillstruct.
//!
//! Finds the enclosing Go module, parses the files a pattern selects plus
//! the packages their types depend on, and resolves type expressions
//! against the loaded declarations. Imports are looked up like the `go`
//! command does: module-local directories, `vendor/`, the module cache for
//! modules named in `go.mod`, then `$GOROOT/src`. Small builtin stubs stand
//! in for common standard-library packages when no toolchain is found.
//! Anything still missing stays unresolved, and literals that depend on it
//! are left alone.

mod constraint;
mod env;
mod error;
mod module;
mod package;
mod pattern;
mod program;
mod resolve;
mod scope;
mod stubs;
mod targets;

pub use env::GoEnv;
pub use error::{LoadError, ResolveError};
pub use module::{escape_path, module_cache_dir, GoModule, Replacement};
pub use package::{Import, Package, PackageSource, SourceFile};
pub use pattern::Pattern;
pub use program::{BrokenFile, FileRef, Program};
pub use scope::FileScope;
pub use targets::{normalize_defaults, resolve_target_types, resolve_type_spec};
