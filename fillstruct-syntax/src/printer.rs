//! Serialization back to text.

use crate::cst::SyntaxNode;
use crate::error::ParseError;
use crate::format::canonicalize;

/// Print a tree exactly as it stands.
pub fn print(node: &SyntaxNode) -> String {
    node.to_string()
}

/// Print, re-parse the output, align literal entries and print again.
///
/// The re-parse rejects trees whose synthesized parts do not form valid Go,
/// such as an override replacement that is not an identifier.
pub fn print_canonical(file: &SyntaxNode) -> Result<String, ParseError> {
    let printed = print(file);
    let reparsed = crate::parse_file(&printed)?.clone_for_update();
    canonicalize(&reparsed);
    Ok(print(&reparsed))
}
