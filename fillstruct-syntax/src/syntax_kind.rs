//! Every kind of token and node in the Go syntax tree.
//!
//! Token kinds come first, node kinds after them. The first two values are
//! sentinels used by the event-based parser.

/// Kinds of syntax elements.
///
/// A semicolon the lexer derives from a line break is a `SEMICOLON` whose
/// text is the `"\n"` it replaces, so the tree stays lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for parser events that were absorbed elsewhere.
    TOMBSTONE = 0,
    /// Tokens skipped while recovering from a syntax error.
    ERROR_NODE = 1,

    // ── Literals and names ─────────────────────────────────────────────
    IDENT,
    INT,
    FLOAT,
    IMAG,
    CHAR,
    STRING,

    // ── Keywords ───────────────────────────────────────────────────────
    BREAK_KW,
    CASE_KW,
    CHAN_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DEFER_KW,
    ELSE_KW,
    FALLTHROUGH_KW,
    FOR_KW,
    FUNC_KW,
    GO_KW,
    GOTO_KW,
    IF_KW,
    IMPORT_KW,
    INTERFACE_KW,
    MAP_KW,
    PACKAGE_KW,
    RANGE_KW,
    RETURN_KW,
    SELECT_KW,
    STRUCT_KW,
    SWITCH_KW,
    TYPE_KW,
    VAR_KW,

    // ── Binary operators ───────────────────────────────────────────────
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    AMP,
    PIPE,
    CARET,
    SHL,
    SHR,
    AMP_CARET,
    AMP_AMP,
    PIPE_PIPE,
    EQ_EQ,
    NOT_EQ,
    LT,
    LT_EQ,
    GT,
    GT_EQ,

    // ── Other operators ────────────────────────────────────────────────
    /// Any compound assignment (`+=`, `<<=`, `&^=`, ...).
    ASSIGN_OP,
    EQ,
    COLON_EQ,
    ARROW,
    PLUS_PLUS,
    MINUS_MINUS,
    BANG,
    TILDE,
    ELLIPSIS,

    // ── Delimiters ─────────────────────────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,
    COMMA,
    SEMICOLON,
    DOT,
    COLON,

    // ── Trivia ─────────────────────────────────────────────────────────
    /// Spaces, tabs and carriage returns.
    WHITESPACE,
    /// A line break that does not end a statement.
    NEWLINE,
    /// `// line` or `/* block */` comment.
    COMMENT,

    /// Unrecognised input; the parser rejects it.
    ERROR,
    /// Returned by lookahead past the last token. Never in a tree.
    EOF,

    // ── Top level ──────────────────────────────────────────────────────
    SOURCE_FILE,
    PACKAGE_CLAUSE,
    IMPORT_DECL,
    IMPORT_SPEC,
    CONST_DECL,
    VAR_DECL,
    TYPE_DECL,
    VALUE_SPEC,
    TYPE_SPEC,
    FUNC_DECL,
    IDENT_LIST,
    /// Bracketed type parameter declarations, kept as balanced raw tokens.
    TYPE_PARAMS,
    /// `[T1, T2]` after a type name.
    TYPE_ARGS,
    PARAM_LIST,
    PARAM,

    // ── Types ──────────────────────────────────────────────────────────
    TYPE_NAME,
    POINTER_TYPE,
    SLICE_TYPE,
    ARRAY_TYPE,
    MAP_TYPE,
    CHAN_TYPE,
    FUNC_TYPE,
    /// Interface bodies are kept as balanced raw tokens.
    INTERFACE_TYPE,
    STRUCT_TYPE,
    FIELD_DECL,
    PAREN_TYPE,

    // ── Expressions ────────────────────────────────────────────────────
    NAME,
    BASIC_LIT,
    COMPOSITE_LIT,
    /// Positional element of a composite literal, owning its trailing comma.
    ELEMENT,
    /// `key: value` element of a composite literal, owning its trailing comma.
    KEYED_ELEMENT,
    FUNC_LIT,
    PAREN_EXPR,
    SELECTOR_EXPR,
    INDEX_EXPR,
    SLICE_EXPR,
    TYPE_ASSERT_EXPR,
    CALL_EXPR,
    ARGS,
    UNARY_EXPR,
    BINARY_EXPR,
    EXPR_LIST,

    // ── Statements ─────────────────────────────────────────────────────
    BLOCK,
    EXPR_STMT,
    ASSIGN_STMT,
    INC_DEC_STMT,
    SEND_STMT,
    DECL_STMT,
    RETURN_STMT,
    BRANCH_STMT,
    GO_STMT,
    DEFER_STMT,
    LABELED_STMT,
    IF_STMT,
    FOR_STMT,
    RANGE_CLAUSE,
    SWITCH_STMT,
    CASE_CLAUSE,
    SELECT_STMT,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE | Self::COMMENT)
    }

    pub fn is_element(self) -> bool {
        matches!(self, Self::ELEMENT | Self::KEYED_ELEMENT)
    }

    /// Binary operator precedence, or `None` for non-binary tokens.
    pub fn binary_precedence(self) -> Option<u8> {
        use SyntaxKind::*;
        match self {
            PIPE_PIPE => Some(1),
            AMP_AMP => Some(2),
            EQ_EQ | NOT_EQ | LT | LT_EQ | GT | GT_EQ => Some(3),
            PLUS | MINUS | PIPE | CARET => Some(4),
            STAR | SLASH | PERCENT | SHL | SHR | AMP | AMP_CARET => Some(5),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        self >= Self::BREAK_KW && self <= Self::VAR_KW
    }

    /// Whether a newline directly after this token terminates the statement.
    pub(crate) fn ends_statement(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            IDENT
                | INT
                | FLOAT
                | IMAG
                | CHAR
                | STRING
                | BREAK_KW
                | CONTINUE_KW
                | FALLTHROUGH_KW
                | RETURN_KW
                | PLUS_PLUS
                | MINUS_MINUS
                | R_PAREN
                | R_BRACKET
                | R_BRACE
        )
    }

    pub(crate) fn from_keyword(s: &str) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        let kind = match s {
            "break" => BREAK_KW,
            "case" => CASE_KW,
            "chan" => CHAN_KW,
            "const" => CONST_KW,
            "continue" => CONTINUE_KW,
            "default" => DEFAULT_KW,
            "defer" => DEFER_KW,
            "else" => ELSE_KW,
            "fallthrough" => FALLTHROUGH_KW,
            "for" => FOR_KW,
            "func" => FUNC_KW,
            "go" => GO_KW,
            "goto" => GOTO_KW,
            "if" => IF_KW,
            "import" => IMPORT_KW,
            "interface" => INTERFACE_KW,
            "map" => MAP_KW,
            "package" => PACKAGE_KW,
            "range" => RANGE_KW,
            "return" => RETURN_KW,
            "select" => SELECT_KW,
            "struct" => STRUCT_KW,
            "switch" => SWITCH_KW,
            "type" => TYPE_KW,
            "var" => VAR_KW,
            _ => return None,
        };
        Some(kind)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}
