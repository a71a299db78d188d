//! Lossless Go syntax for source-to-source rewriting.
//!
//! The lexer keeps whitespace and comments as trivia tokens, the parser
//! builds a [rowan] green tree holding every byte of the input, and printing
//! is the tree's text. Edits go through `clone_for_update()` and
//! `splice_children`, so every untouched byte of the input stays in place.

mod cursor;
mod error;
pub mod ast;
mod cst;
pub mod format;
pub mod lexer;
mod line_index;
pub mod make;
mod parser;
pub mod printer;
mod syntax_kind;

pub use cst::{GoLanguage, SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use line_index::LineIndex;
pub use rowan::{GreenNode, TextRange, TextSize};
pub use syntax_kind::SyntaxKind;

use parser::{expressions, items, types, MarkClosed, PResult, Parser};

/// Result of a tolerant parse: a tree that always covers the whole input,
/// plus the errors met on the way.
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The tree, or the first error.
    pub fn ok(self) -> Result<SyntaxNode, ParseError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(SyntaxNode::new_root(self.green)),
        }
    }
}

/// Parse a Go source file, recovering at declaration boundaries.
///
/// Declarations that fail to parse become `ERROR_NODE`s.
pub fn parse(source: &str) -> Parse {
    let mut p = Parser::new(source);
    items::source_file(&mut p);
    let (green, errors) = p.build_tree();
    tracing::trace!(bytes = source.len(), errors = errors.len(), "parsed source file");
    Parse { green, errors }
}

/// Parse a complete Go source file, failing on the first syntax error.
pub fn parse_file(source: &str) -> Result<SyntaxNode, ParseError> {
    parse(source).ok()
}

/// Parse a single expression. Surrounding whitespace is dropped.
pub fn parse_expr(source: &str) -> Result<SyntaxNode, ParseError> {
    fragment(source, expressions::expr)
}

/// Parse a single type expression. Surrounding whitespace is dropped.
pub fn parse_type(source: &str) -> Result<SyntaxNode, ParseError> {
    fragment(source, types::ty)
}

fn fragment(
    source: &str,
    f: impl FnOnce(&mut Parser) -> PResult<MarkClosed>,
) -> Result<SyntaxNode, ParseError> {
    let text = source.trim();
    let mut p = Parser::new(text);
    f(&mut p)?;
    if !p.at(SyntaxKind::EOF) {
        return p.unexpected("end of input");
    }
    let (green, _) = p.build_tree();
    Ok(SyntaxNode::new_root(green))
}
