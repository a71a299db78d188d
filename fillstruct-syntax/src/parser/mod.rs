//! Event-based recursive-descent parser for Go.
//!
//! Parse functions call `open()` to start a node, `advance()` to consume
//! significant tokens and `close()` to finish a node with its kind. The
//! resulting flat event list is turned into a rowan green tree by
//! `build_tree()`, which interleaves the trivia tokens the parser never
//! looked at. `open_before()` wraps an already completed node, which is how
//! postfix and binary expressions are built.
//!
//! Trivia between two tokens of a node stays inside the node. Trivia before
//! a node's first token or after its last one belongs to the parent, except
//! at the root, which holds everything.
//!
//! # Composite literals in control clauses
//!
//! `if x == T{} {` is ambiguous in Go: the `{` may open the literal or the
//! block. Like the Go parser, an expression level is tracked: it is `-1`
//! inside `if`/`for`/`switch` headers and raised inside parentheses and
//! brackets. A plain type name followed by `{` only starts a composite
//! literal when the level is non-negative.

pub(crate) mod expressions;
pub(crate) mod items;
pub(crate) mod statements;
pub(crate) mod types;

use rowan::{GreenNode, GreenNodeBuilder};

use crate::error::ParseError;
use crate::lexer::{tokenize, Token};
use crate::syntax_kind::SyntaxKind;

pub(crate) type PResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, Copy)]
enum Event {
    /// Start a node. The kind stays `TOMBSTONE` until `close()` patches it.
    /// `forward_parent` points at a wrapper opened later by `open_before()`.
    Open {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    Close,
    /// Consume the next significant token.
    Advance,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// A completed node, usable with `open_before()`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
    pub(crate) kind: SyntaxKind,
}

/// Parser state to roll back to when a declaration fails.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    events: usize,
    pos: usize,
}

pub(crate) struct Parser<'src> {
    source: &'src str,
    /// Every token, trivia included.
    tokens: Vec<Token>,
    /// Significant tokens only; lookahead and `pos` work on these.
    significant: Vec<Token>,
    pos: usize,
    events: Vec<Event>,
    errors: Vec<ParseError>,
    pub(crate) expr_lev: i32,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        let tokens = tokenize(source);
        let significant = tokens
            .iter()
            .copied()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        Self {
            source,
            tokens,
            significant,
            pos: 0,
            events: Vec::new(),
            errors: Vec::new(),
            expr_lev: 0,
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.significant
            .get(self.pos + n)
            .map_or(SyntaxKind::EOF, |t| t.kind)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    // ── Nodes ──────────────────────────────────────────────────────────

    pub(crate) fn open(&mut self) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        mark
    }

    /// Start a node that will wrap the already completed `completed`.
    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = self.open();
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open { kind: slot, .. } = &mut self.events[m.index] {
            *slot = kind;
        }
        self.events.push(Event::Close);
        MarkClosed {
            index: m.index,
            kind,
        }
    }

    // ── Tokens ─────────────────────────────────────────────────────────

    pub(crate) fn advance(&mut self) {
        if self.pos < self.significant.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> PResult<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            self.error(format!("expected {kind:?}, found {}", self.describe_current()))
        }
    }

    /// Run `f` with the given expression level, restoring the previous one.
    pub(crate) fn with_expr_lev<T>(
        &mut self,
        lev: i32,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let saved = self.expr_lev;
        self.expr_lev = lev;
        let result = f(self);
        self.expr_lev = saved;
        result
    }

    // ── Errors ─────────────────────────────────────────────────────────

    pub(crate) fn error<T>(&self, message: impl Into<String>) -> PResult<T> {
        let offset = self
            .significant
            .get(self.pos)
            .map_or(self.source.len() as u32, |t| u32::from(t.range.start()));
        Err(ParseError::new(message, offset))
    }

    pub(crate) fn unexpected<T>(&self, what: &str) -> PResult<T> {
        self.error(format!("expected {what}, found {}", self.describe_current()))
    }

    fn describe_current(&self) -> String {
        match self.significant.get(self.pos) {
            None => "end of file".to_string(),
            Some(t) if t.text(self.source) == "\n" => "newline".to_string(),
            Some(t) => format!("'{}'", t.text(self.source)),
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            events: self.events.len(),
            pos: self.pos,
        }
    }

    /// Record `err`, roll back to `cp`, and skip ahead to the next line that
    /// starts a top-level declaration. The skipped tokens form an
    /// `ERROR_NODE`.
    pub(crate) fn recover(&mut self, cp: Checkpoint, err: ParseError) {
        self.events.truncate(cp.events);
        self.pos = cp.pos;
        self.errors.push(err);

        let m = self.open();
        let mut depth = 0i32;
        loop {
            match self.current() {
                SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_BRACE => depth -= 1,
                _ => {}
            }
            let line_end = self.at(SyntaxKind::SEMICOLON);
            self.advance();
            if self.at(SyntaxKind::EOF) {
                break;
            }
            if line_end && depth <= 0 && items::starts_decl(self.current()) {
                break;
            }
        }
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    // ── Tree building ──────────────────────────────────────────────────

    /// Turn the events into a green tree.
    ///
    /// Trivia is attached lazily: it is flushed just before the next token
    /// or nested node, and whatever is left when the outermost node closes
    /// goes into that node.
    pub(crate) fn build_tree(self) -> (GreenNode, Vec<ParseError>) {
        let Parser {
            source,
            tokens,
            mut events,
            errors,
            ..
        } = self;
        let mut builder = GreenNodeBuilder::new();
        let mut next = 0usize;
        let mut depth = 0usize;
        let mut kinds: Vec<SyntaxKind> = Vec::new();

        for i in 0..events.len() {
            match events[i] {
                Event::Open {
                    kind,
                    forward_parent,
                } => {
                    kinds.clear();
                    kinds.push(kind);
                    let mut parent = forward_parent;
                    while let Some(j) = parent {
                        parent = match events[j] {
                            Event::Open {
                                kind,
                                forward_parent,
                            } => {
                                kinds.push(kind);
                                forward_parent
                            }
                            _ => None,
                        };
                        events[j] = Event::Open {
                            kind: SyntaxKind::TOMBSTONE,
                            forward_parent: None,
                        };
                    }
                    for &kind in kinds.iter().rev() {
                        if kind == SyntaxKind::TOMBSTONE {
                            continue;
                        }
                        if depth > 0 {
                            next = flush_trivia(&mut builder, source, &tokens, next);
                        }
                        builder.start_node(kind.into());
                        depth += 1;
                    }
                }
                Event::Close => {
                    if depth == 1 {
                        for token in &tokens[next..] {
                            emit(&mut builder, source, token);
                        }
                        next = tokens.len();
                    }
                    builder.finish_node();
                    depth = depth.saturating_sub(1);
                }
                Event::Advance => {
                    next = flush_trivia(&mut builder, source, &tokens, next);
                    if let Some(token) = tokens.get(next) {
                        emit(&mut builder, source, token);
                        next += 1;
                    }
                }
            }
        }

        (builder.finish(), errors)
    }
}

fn emit(builder: &mut GreenNodeBuilder<'_>, source: &str, token: &Token) {
    builder.token(token.kind.into(), token.text(source));
}

/// Emit the trivia tokens starting at `next`; returns the first index past them.
fn flush_trivia(
    builder: &mut GreenNodeBuilder<'_>,
    source: &str,
    tokens: &[Token],
    mut next: usize,
) -> usize {
    while let Some(token) = tokens.get(next).filter(|t| t.kind.is_trivia()) {
        emit(builder, source, token);
        next += 1;
    }
    next
}
