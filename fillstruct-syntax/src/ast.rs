//! Typed views over the syntax tree.
//!
//! Each wrapper is a `SyntaxNode` whose kind has been checked by `cast()`.
//! Accessors walk the rowan children directly.

use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

pub trait AstNode: Sized {
    fn cast(node: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($name:ident, $($kind:ident)|+) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                matches!(node.kind(), $(SyntaxKind::$kind)|+).then_some(Self { syntax: node })
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(SourceFile, SOURCE_FILE);
ast_node!(ImportSpec, IMPORT_SPEC);
ast_node!(TypeSpec, TYPE_SPEC);
ast_node!(ValueSpec, VALUE_SPEC);
ast_node!(FieldDecl, FIELD_DECL);
ast_node!(CompositeLit, COMPOSITE_LIT);
ast_node!(LitElement, ELEMENT | KEYED_ELEMENT);

pub fn child_node<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

pub fn child_nodes<N: AstNode>(parent: &SyntaxNode) -> impl Iterator<Item = N> + use<N> {
    parent.children().filter_map(N::cast)
}

pub fn child_token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|it| it.kind() == kind)
}

pub fn child_tokens(parent: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = SyntaxToken> + use<> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(move |it| it.kind() == kind)
}

/// Text of a `NAME` or an unqualified, uninstantiated `TYPE_NAME`.
pub fn ident_text(node: &SyntaxNode) -> Option<String> {
    match node.kind() {
        SyntaxKind::NAME | SyntaxKind::TYPE_NAME if node.children().next().is_none() => {
            let mut idents = child_tokens(node, SyntaxKind::IDENT);
            let ident = idents.next()?;
            idents.next().is_none().then(|| ident.text().to_string())
        }
        _ => None,
    }
}

impl SourceFile {
    pub fn package_name(&self) -> Option<String> {
        let clause = self
            .syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::PACKAGE_CLAUSE)?;
        child_token(&clause, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportSpec> + use<> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::IMPORT_DECL)
            .flat_map(|decl| child_nodes::<ImportSpec>(&decl))
    }

    /// Top-level type specs, grouped or not.
    pub fn type_specs(&self) -> impl Iterator<Item = TypeSpec> + use<> {
        self.specs(SyntaxKind::TYPE_DECL)
    }

    /// Top-level constant specs.
    pub fn const_specs(&self) -> impl Iterator<Item = ValueSpec> + use<> {
        self.specs(SyntaxKind::CONST_DECL)
    }

    fn specs<N: AstNode>(&self, decl: SyntaxKind) -> impl Iterator<Item = N> + use<N> {
        self.syntax
            .children()
            .filter(move |n| n.kind() == decl)
            .flat_map(|decl| child_nodes::<N>(&decl))
    }
}

impl ImportSpec {
    /// Explicit local name: an identifier, `_` or `.`.
    pub fn alias(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::DOT))
            .map(|t| t.text().to_string())
    }

    /// Import path without quotes.
    pub fn path(&self) -> Option<String> {
        let lit = child_token(&self.syntax, SyntaxKind::STRING)?;
        let text = lit.text();
        Some(text.trim_matches(|c| c == '"' || c == '`').to_string())
    }
}

impl TypeSpec {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    /// `type A = B`
    pub fn is_alias(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::EQ).is_some()
    }

    /// Declared type parameter names, in order. `[K, V any]` gives both.
    pub fn type_params(&self) -> Vec<String> {
        let Some(params) = self
            .syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::TYPE_PARAMS)
        else {
            return Vec::new();
        };
        let mut names = Vec::new();
        let mut depth = 0usize;
        let mut group_start = true;
        for token in params
            .descendants_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
        {
            match token.kind() {
                SyntaxKind::L_BRACKET | SyntaxKind::L_PAREN | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_BRACKET | SyntaxKind::R_PAREN | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1)
                }
                SyntaxKind::COMMA if depth == 1 => group_start = true,
                SyntaxKind::IDENT if depth == 1 && group_start => {
                    names.push(token.text().to_string());
                    group_start = false;
                }
                _ => group_start = false,
            }
        }
        names
    }

    /// The declared type.
    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() != SyntaxKind::TYPE_PARAMS)
    }
}

impl ValueSpec {
    pub fn names(&self) -> Vec<String> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::IDENT_LIST)
            .map(|list| {
                child_tokens(&list, SyntaxKind::IDENT)
                    .map(|t| t.text().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Explicit type, if any.
    pub fn ty(&self) -> Option<SyntaxNode> {
        let eq = child_token(&self.syntax, SyntaxKind::EQ).map(|t| t.text_range().start());
        self.syntax.children().find(|n| {
            n.kind() != SyntaxKind::IDENT_LIST
                && eq.is_none_or(|eq| n.text_range().start() < eq)
        })
    }

    /// Initializer expressions; empty when the spec has no `=`.
    pub fn values(&self) -> Vec<SyntaxNode> {
        let Some(eq) = child_token(&self.syntax, SyntaxKind::EQ) else {
            return Vec::new();
        };
        let Some(values) = self
            .syntax
            .children()
            .filter(|n| n.text_range().start() > eq.text_range().start())
            .last()
        else {
            return Vec::new();
        };
        if values.kind() == SyntaxKind::EXPR_LIST {
            values.children().collect()
        } else {
            vec![values]
        }
    }
}

impl FieldDecl {
    /// Declared names; empty for an embedded field.
    pub fn names(&self) -> Vec<SyntaxToken> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::IDENT_LIST)
            .map(|list| child_tokens(&list, SyntaxKind::IDENT).collect())
            .unwrap_or_default()
    }

    pub fn is_embedded(&self) -> bool {
        self.names().is_empty()
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() != SyntaxKind::IDENT_LIST)
    }
}

impl CompositeLit {
    /// The explicit literal type, `None` when elided.
    pub fn ty(&self) -> Option<SyntaxNode> {
        let first = self.syntax.first_child()?;
        let brace = self.l_brace()?;
        (first.text_range().start() < brace.text_range().start()).then_some(first)
    }

    pub fn l_brace(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::L_BRACE)
    }

    pub fn r_brace(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::R_BRACE)
    }

    pub fn elements(&self) -> impl Iterator<Item = LitElement> + use<> {
        child_nodes::<LitElement>(&self.syntax)
    }
}

impl LitElement {
    pub fn is_keyed(&self) -> bool {
        self.syntax.kind() == SyntaxKind::KEYED_ELEMENT
    }

    pub fn key(&self) -> Option<SyntaxNode> {
        if self.is_keyed() {
            self.syntax.first_child()
        } else {
            None
        }
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        if self.is_keyed() {
            self.syntax.children().nth(1)
        } else {
            self.syntax.first_child()
        }
    }

    /// Name of the key when it is a plain identifier.
    pub fn key_name(&self) -> Option<String> {
        self.key().filter(|k| k.kind() == SyntaxKind::NAME).as_ref().and_then(ident_text)
    }

    pub fn comma(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::COMMA)
    }
}
