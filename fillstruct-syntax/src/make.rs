//! Builders for synthesized nodes and tokens.
//!
//! Nodes are assembled from green parts directly, so their text is not
//! validated here; `printer::print_canonical` re-parses the result. Builders
//! meant for splicing return mutable, parentless elements.

use rowan::{GreenNode, GreenToken, NodeOrToken};

use crate::cst::{SyntaxElement, SyntaxNode};
use crate::error::ParseError;
use crate::lexer::tokenize;
use crate::syntax_kind::SyntaxKind;

type GreenElement = NodeOrToken<GreenNode, GreenToken>;

fn green_token(kind: SyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

fn green_node(kind: SyntaxKind, children: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(kind.into(), children)
}

fn ident_node(kind: SyntaxKind, text: &str) -> GreenNode {
    green_node(kind, vec![green_token(SyntaxKind::IDENT, text)])
}

/// A bare identifier expression.
pub fn name(text: &str) -> SyntaxNode {
    SyntaxNode::new_root(ident_node(SyntaxKind::NAME, text))
}

pub fn basic_lit(kind: SyntaxKind, text: &str) -> SyntaxNode {
    SyntaxNode::new_root(green_node(
        SyntaxKind::BASIC_LIT,
        vec![green_token(kind, text)],
    ))
}

/// `pkg.Name`
pub fn selector(pkg: &str, sel: &str) -> SyntaxNode {
    SyntaxNode::new_root(green_node(
        SyntaxKind::SELECTOR_EXPR,
        vec![
            NodeOrToken::Node(ident_node(SyntaxKind::NAME, pkg)),
            green_token(SyntaxKind::DOT, "."),
            green_token(SyntaxKind::IDENT, sel),
        ],
    ))
}

/// `T{}` for the given type expression.
pub fn empty_composite(ty: &SyntaxNode) -> SyntaxNode {
    SyntaxNode::new_root(green_node(
        SyntaxKind::COMPOSITE_LIT,
        vec![
            NodeOrToken::Node(ty.green().into_owned()),
            green_token(SyntaxKind::L_BRACE, "{"),
            green_token(SyntaxKind::R_BRACE, "}"),
        ],
    ))
}

/// `key: value` with one space after the colon and no comma, as a mutable
/// root ready to be spliced into a literal.
pub fn keyed_element(key: &str, value: &SyntaxNode) -> SyntaxNode {
    SyntaxNode::new_root_mut(green_node(
        SyntaxKind::KEYED_ELEMENT,
        vec![
            NodeOrToken::Node(ident_node(SyntaxKind::NAME, key)),
            green_token(SyntaxKind::COLON, ":"),
            green_token(SyntaxKind::WHITESPACE, " "),
            NodeOrToken::Node(value.green().into_owned()),
        ],
    ))
}

/// Parse a type expression from text.
pub fn type_from_text(text: &str) -> Result<SyntaxNode, ParseError> {
    crate::parse_type(text)
}

/// Detached mutable tokens with the given kinds and texts.
pub fn tokens(parts: &[(SyntaxKind, &str)]) -> Vec<SyntaxElement> {
    let children = parts
        .iter()
        .map(|(kind, text)| green_token(*kind, text))
        .collect();
    let holder = SyntaxNode::new_root_mut(green_node(SyntaxKind::ERROR_NODE, children));
    let elements: Vec<SyntaxElement> = holder.children_with_tokens().collect();
    for element in &elements {
        match element {
            NodeOrToken::Node(node) => node.detach(),
            NodeOrToken::Token(token) => token.detach(),
        }
    }
    elements
}

/// Whitespace and comments lexed from `text`, as detached mutable tokens.
pub fn trivia(text: &str) -> Vec<SyntaxElement> {
    let parts: Vec<(SyntaxKind, &str)> = tokenize(text)
        .into_iter()
        .map(|t| {
            let kind = if t.kind.is_trivia() {
                t.kind
            } else {
                SyntaxKind::WHITESPACE
            };
            (kind, t.text(text))
        })
        .collect();
    tokens(&parts)
}

pub fn comma() -> Vec<SyntaxElement> {
    tokens(&[(SyntaxKind::COMMA, ",")])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, LitElement};
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_keyed_element() {
        let value = empty_composite(&selector("time", "Time"));
        let elem = keyed_element("CreatedAt", &value);
        assert_eq!(elem.to_string(), "CreatedAt: time.Time{}");
        let elem = LitElement::cast(elem).expect("element");
        assert_eq!(elem.key_name().as_deref(), Some("CreatedAt"));
        assert_eq!(elem.value().map(|v| v.kind()), Some(SyntaxKind::COMPOSITE_LIT));
    }

    #[test]
    fn type_text_keeps_spacing() {
        let ty = type_from_text("[4]map[string]struct{ A int }").expect("parse");
        assert_eq!(ty.to_string(), "[4]map[string]struct{ A int }");
        assert!(type_from_text("[4]").is_err());
    }

    #[test]
    fn trivia_is_detached_and_lossless() {
        let elements = trivia("\n\t// note\n\t");
        let text: String = elements.iter().map(|e| e.to_string()).collect();
        assert_eq!(text, "\n\t// note\n\t");
        assert!(elements.iter().all(|e| e.parent().is_none()));
        assert!(elements.iter().all(|e| e.kind().is_trivia()));
    }
}
