//! Rowan glue: the language marker and tree type aliases.

use crate::syntax_kind::SyntaxKind;

/// Marker type for Go in rowan's generic tree system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoLanguage {}

impl rowan::Language for GoLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < SyntaxKind::__LAST as u16, "unknown syntax kind {}", raw.0);
        // Safety: SyntaxKind is #[repr(u16)] with contiguous discriminants
        // below __LAST, checked above.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// An interior node.
pub type SyntaxNode = rowan::SyntaxNode<GoLanguage>;

/// A leaf holding source text.
pub type SyntaxToken = rowan::SyntaxToken<GoLanguage>;

/// Either a node or a token.
pub type SyntaxElement = rowan::SyntaxElement<GoLanguage>;
