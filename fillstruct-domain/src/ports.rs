use fillstruct_syntax::{printer, ParseError, SyntaxNode};
use fillstruct_types::{Type, TypeIdentity};
use thiserror::Error;

/// Type information for one source file.
///
/// fillstruct-domain only sees resolved types through this port, so the
/// engine can be driven by the package loader or by an in-memory table.
pub trait TypeInfo {
    /// Import path of the package the file belongs to.
    fn package_path(&self) -> &str;

    /// Resolve a type expression as written in this file. `ty` is a node of
    /// the file's own tree, so scopes enclosing it can be consulted.
    fn resolve_type(&self, ty: &SyntaxNode) -> Type;

    /// Underlying shape of a named type instantiated with `args`, with named
    /// chains already followed. `args` is empty for non-generic types.
    fn underlying(&self, id: &TypeIdentity, args: &[Type]) -> Option<Type>;

    /// Qualifier for types declared in `module_path`; `None` when they are
    /// referenced unqualified from this file.
    fn qualifier(&self, module_path: &str) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("failed to format source: {0}")]
    Reparse(#[from] ParseError),
}

/// Serializes a modified tree to its final bytes.
pub trait Printer {
    fn print(&self, file: &SyntaxNode) -> Result<Vec<u8>, PrintError>;
}

/// Prints the tree, re-parses the output and aligns literal entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalPrinter;

impl Printer for CanonicalPrinter {
    fn print(&self, file: &SyntaxNode) -> Result<Vec<u8>, PrintError> {
        Ok(printer::print_canonical(file)?.into_bytes())
    }
}
