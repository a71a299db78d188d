//! Go tokenizer.
//!
//! Whitespace, line breaks and comments come out as trivia tokens next to the
//! significant ones, so the token texts concatenate back to the input. A line
//! break that ends a statement becomes a `SEMICOLON` token covering the `"\n"`
//! itself, which is how Go's automatic semicolons stay lossless.

use rowan::{TextRange, TextSize};

use crate::cursor::Cursor;
use crate::syntax_kind::SyntaxKind;

/// A lexed token: its kind and where its text sits in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    fn new(kind: SyntaxKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(TextSize::from(start), TextSize::from(end)),
        }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range]
    }
}

/// Tokenize `source`, trivia included. There is no end-of-file token.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut out = Vec::new();
    let mut ends_statement = false;
    while let Some(mut token) = lexer.next_token() {
        match token.kind {
            SyntaxKind::NEWLINE if ends_statement => {
                token.kind = SyntaxKind::SEMICOLON;
                ends_statement = false;
            }
            SyntaxKind::NEWLINE => {}
            // Comments and spaces keep a pending semicolon pending.
            kind if kind.is_trivia() => {}
            kind => ends_statement = kind.ends_statement(),
        }
        out.push(token);
    }
    out
}

struct Lexer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        let c = self.cursor.peek()?;
        let start = self.cursor.pos();
        let token = match c {
            ' ' | '\t' | '\r' => {
                self.cursor.eat_while(|c| c == ' ' || c == '\t' || c == '\r');
                self.make(SyntaxKind::WHITESPACE, start)
            }
            '\n' => self.single(SyntaxKind::NEWLINE, start),
            '/' if self.cursor.peek_next() == Some('/') => {
                self.cursor.eat_while(|c| c != '\n');
                self.make(SyntaxKind::COMMENT, start)
            }
            '/' if self.cursor.peek_next() == Some('*') => self.block_comment(start),
            _ => self.token(start),
        };
        Some(token)
    }

    fn block_comment(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                Some('*') if self.cursor.peek() == Some('/') => {
                    self.cursor.advance();
                    return self.make(SyntaxKind::COMMENT, start);
                }
                Some(_) => {}
                None => return self.make(SyntaxKind::ERROR, start),
            }
        }
    }

    fn make(&self, kind: SyntaxKind, start: u32) -> Token {
        Token::new(kind, start, self.cursor.pos())
    }

    fn single(&mut self, kind: SyntaxKind, start: u32) -> Token {
        self.cursor.advance();
        self.make(kind, start)
    }

    /// Consume the current character, then `=` if present.
    fn with_assign(&mut self, plain: SyntaxKind, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            self.make(SyntaxKind::ASSIGN_OP, start)
        } else {
            self.make(plain, start)
        }
    }

    fn token(&mut self, start: u32) -> Token {
        use SyntaxKind::*;
        let Some(c) = self.cursor.peek() else {
            return self.make(ERROR, start);
        };

        match c {
            '(' => self.single(L_PAREN, start),
            ')' => self.single(R_PAREN, start),
            '[' => self.single(L_BRACKET, start),
            ']' => self.single(R_BRACKET, start),
            '{' => self.single(L_BRACE, start),
            '}' => self.single(R_BRACE, start),
            ',' => self.single(COMMA, start),
            ';' => self.single(SEMICOLON, start),
            '~' => self.single(TILDE, start),
            '*' => self.with_assign(STAR, start),
            '/' => self.with_assign(SLASH, start),
            '%' => self.with_assign(PERCENT, start),
            '^' => self.with_assign(CARET, start),
            '+' => {
                self.cursor.advance();
                if self.cursor.eat('+') {
                    self.make(PLUS_PLUS, start)
                } else if self.cursor.eat('=') {
                    self.make(ASSIGN_OP, start)
                } else {
                    self.make(PLUS, start)
                }
            }
            '-' => {
                self.cursor.advance();
                if self.cursor.eat('-') {
                    self.make(MINUS_MINUS, start)
                } else if self.cursor.eat('=') {
                    self.make(ASSIGN_OP, start)
                } else {
                    self.make(MINUS, start)
                }
            }
            '&' => {
                self.cursor.advance();
                if self.cursor.eat('&') {
                    self.make(AMP_AMP, start)
                } else if self.cursor.eat('^') {
                    if self.cursor.eat('=') {
                        self.make(ASSIGN_OP, start)
                    } else {
                        self.make(AMP_CARET, start)
                    }
                } else if self.cursor.eat('=') {
                    self.make(ASSIGN_OP, start)
                } else {
                    self.make(AMP, start)
                }
            }
            '|' => {
                self.cursor.advance();
                if self.cursor.eat('|') {
                    self.make(PIPE_PIPE, start)
                } else if self.cursor.eat('=') {
                    self.make(ASSIGN_OP, start)
                } else {
                    self.make(PIPE, start)
                }
            }
            '<' => {
                self.cursor.advance();
                if self.cursor.eat('-') {
                    self.make(ARROW, start)
                } else if self.cursor.eat('<') {
                    if self.cursor.eat('=') {
                        self.make(ASSIGN_OP, start)
                    } else {
                        self.make(SHL, start)
                    }
                } else if self.cursor.eat('=') {
                    self.make(LT_EQ, start)
                } else {
                    self.make(LT, start)
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.eat('>') {
                    if self.cursor.eat('=') {
                        self.make(ASSIGN_OP, start)
                    } else {
                        self.make(SHR, start)
                    }
                } else if self.cursor.eat('=') {
                    self.make(GT_EQ, start)
                } else {
                    self.make(GT, start)
                }
            }
            '=' => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    self.make(EQ_EQ, start)
                } else {
                    self.make(EQ, start)
                }
            }
            '!' => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    self.make(NOT_EQ, start)
                } else {
                    self.make(BANG, start)
                }
            }
            ':' => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    self.make(COLON_EQ, start)
                } else {
                    self.make(COLON, start)
                }
            }
            '.' => {
                if self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                    return self.number(start);
                }
                self.cursor.advance();
                if self.cursor.peek() == Some('.') && self.cursor.peek_next() == Some('.') {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.make(ELLIPSIS, start)
                } else {
                    self.make(DOT, start)
                }
            }
            '"' => self.quoted(start, '"', STRING),
            '`' => self.raw_string(start),
            '\'' => self.quoted(start, '\'', CHAR),
            '0'..='9' => self.number(start),
            c if is_ident_start(c) => {
                self.cursor.eat_while(is_ident_continue);
                let text = self.cursor.slice(start, self.cursor.pos());
                let kind = SyntaxKind::from_keyword(text).unwrap_or(IDENT);
                self.make(kind, start)
            }
            _ => self.single(ERROR, start),
        }
    }

    fn number(&mut self, start: u32) -> Token {
        let mut kind = SyntaxKind::INT;
        let radix_prefix = self.cursor.peek() == Some('0')
            && matches!(
                self.cursor.peek_next(),
                Some('x' | 'X' | 'b' | 'B' | 'o' | 'O')
            );

        if radix_prefix {
            self.cursor.advance();
            let hex = self.cursor.advance().map(|c| c.to_ascii_lowercase()) == Some('x');
            self.cursor
                .eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            if hex {
                if self.cursor.eat('.') {
                    kind = SyntaxKind::FLOAT;
                    self.cursor
                        .eat_while(|c| c.is_ascii_hexdigit() || c == '_');
                }
                if matches!(self.cursor.peek(), Some('p' | 'P')) {
                    kind = SyntaxKind::FLOAT;
                    self.exponent();
                }
            }
        } else {
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            if self.cursor.peek() == Some('.') {
                kind = SyntaxKind::FLOAT;
                self.cursor.advance();
                self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.cursor.peek(), Some('e' | 'E')) {
                kind = SyntaxKind::FLOAT;
                self.exponent();
            }
        }

        if self.cursor.eat('i') {
            kind = SyntaxKind::IMAG;
        }
        self.make(kind, start)
    }

    fn exponent(&mut self) {
        self.cursor.advance();
        if matches!(self.cursor.peek(), Some('+' | '-')) {
            self.cursor.advance();
        }
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
    }

    fn quoted(&mut self, start: u32, quote: char, kind: SyntaxKind) -> Token {
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => return self.make(SyntaxKind::ERROR, start),
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.peek() != Some('\n') {
                        self.cursor.advance();
                    }
                }
                Some(c) if c == quote => {
                    self.cursor.advance();
                    return self.make(kind, start);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn raw_string(&mut self, start: u32) -> Token {
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                Some('`') => return self.make(SyntaxKind::STRING, start),
                Some(_) => {}
                None => return self.make(SyntaxKind::ERROR, start),
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn significant(source: &str) -> Vec<SyntaxKind> {
        tokenize(source)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn line_breaks_after_statement_ends_become_semicolons() {
        use SyntaxKind::*;
        assert_eq!(
            significant("x := 1\ny++\n"),
            vec![IDENT, COLON_EQ, INT, SEMICOLON, IDENT, PLUS_PLUS, SEMICOLON]
        );
        // No semicolon after an operator that continues the expression.
        assert_eq!(significant("a +\nb"), vec![IDENT, PLUS, IDENT]);

        let source = "x := 1\n";
        let semi = tokenize(source)
            .into_iter()
            .find(|t| t.kind == SEMICOLON)
            .expect("semicolon");
        assert_eq!(semi.text(source), "\n");
    }

    #[test]
    fn same_line_comment_keeps_semicolon_pending() {
        use SyntaxKind::*;
        let source = "x := 1 // one\ny := 2";
        let tokens = tokenize(source);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IDENT, WHITESPACE, COLON_EQ, WHITESPACE, INT, WHITESPACE, COMMENT, SEMICOLON,
                IDENT, WHITESPACE, COLON_EQ, WHITESPACE, INT
            ]
        );
        assert_eq!(tokens[6].text(source), "// one");
    }

    #[test]
    fn newline_after_comma_is_trivia() {
        let source = "Name: \"x\", // the name\n\tAge: 1,\n";
        let kinds: Vec<_> = tokenize(source).into_iter().map(|t| t.kind).collect();
        assert!(!kinds.contains(&SyntaxKind::SEMICOLON));
        assert_eq!(kinds.iter().filter(|k| **k == SyntaxKind::NEWLINE).count(), 2);
    }

    #[test]
    fn block_comment_spanning_lines_is_one_token() {
        use SyntaxKind::*;
        assert_eq!(significant("x /* a\nb */\ny"), vec![IDENT, SEMICOLON, IDENT]);
        let tokens = tokenize("/* a\nb */");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, COMMENT);
    }

    #[test]
    fn lexes_operators_and_literals() {
        use SyntaxKind::*;
        assert_eq!(
            significant("a &^= b<<2 ... <-ch 0x1p-2 1e3i '\\'' `raw\n`"),
            vec![
                IDENT, ASSIGN_OP, IDENT, SHL, INT, ELLIPSIS, ARROW, IDENT, FLOAT, IMAG, CHAR,
                STRING
            ]
        );
    }

    #[test]
    fn token_texts_are_lossless() {
        let source = "package p\n\n// doc\nfunc f() {\n\t_ = T{A: 1, /* c */ B: \"s\"} // tail\n}\n";
        let text: String = tokenize(source).iter().map(|t| t.text(source)).collect();
        assert_eq!(text, source);
    }

    #[test]
    fn unterminated_string_is_error() {
        let tokens = tokenize("\"abc\nx");
        assert_eq!(tokens[0].kind, SyntaxKind::ERROR);
    }
}
