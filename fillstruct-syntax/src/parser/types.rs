//! Type expressions.

use crate::syntax_kind::SyntaxKind;

use super::{expressions, MarkClosed, PResult, Parser};

/// Whether `kind` can start a type.
pub(crate) fn starts_type(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        IDENT | STAR | L_BRACKET | MAP_KW | CHAN_KW | FUNC_KW | INTERFACE_KW | STRUCT_KW | L_PAREN
            | ARROW
    )
}

pub(crate) fn ty(p: &mut Parser) -> PResult<MarkClosed> {
    use SyntaxKind::*;
    let kind = match p.current() {
        IDENT => return type_name(p),
        L_BRACKET => return array_or_slice(p),
        FUNC_KW => return func_type(p),
        INTERFACE_KW => return interface_type(p),
        STRUCT_KW => return struct_type(p),
        STAR => POINTER_TYPE,
        MAP_KW => MAP_TYPE,
        CHAN_KW | ARROW => CHAN_TYPE,
        L_PAREN => PAREN_TYPE,
        _ => return p.unexpected("type"),
    };

    let m = p.open();
    match p.current() {
        STAR => {
            p.advance();
            ty(p)?;
        }
        MAP_KW => {
            p.advance();
            p.expect(L_BRACKET)?;
            ty(p)?;
            p.expect(R_BRACKET)?;
            ty(p)?;
        }
        CHAN_KW => {
            p.advance();
            p.eat(ARROW);
            ty(p)?;
        }
        ARROW => {
            p.advance();
            p.expect(CHAN_KW)?;
            ty(p)?;
        }
        _ => {
            p.advance();
            ty(p)?;
            p.expect(R_PAREN)?;
        }
    }
    Ok(p.close(m, kind))
}

/// `Name` or `pkg.Name`, optionally followed by type arguments.
fn type_name(p: &mut Parser) -> PResult<MarkClosed> {
    let m = p.open();
    p.expect(SyntaxKind::IDENT)?;
    if p.eat(SyntaxKind::DOT) {
        p.expect(SyntaxKind::IDENT)?;
    }
    if p.at(SyntaxKind::L_BRACKET) {
        type_args(p)?;
    }
    Ok(p.close(m, SyntaxKind::TYPE_NAME))
}

fn type_args(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACKET)?;
    while !p.at(SyntaxKind::R_BRACKET) {
        ty(p)?;
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACKET)?;
    p.close(m, SyntaxKind::TYPE_ARGS);
    Ok(())
}

fn array_or_slice(p: &mut Parser) -> PResult<MarkClosed> {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACKET)?;
    let kind = if p.at(SyntaxKind::R_BRACKET) {
        SyntaxKind::SLICE_TYPE
    } else {
        if !p.eat(SyntaxKind::ELLIPSIS) {
            p.with_expr_lev(p.expr_lev.max(0) + 1, expressions::expr)?;
        }
        SyntaxKind::ARRAY_TYPE
    };
    p.expect(SyntaxKind::R_BRACKET)?;
    ty(p)?;
    Ok(p.close(m, kind))
}

pub(crate) fn func_type(p: &mut Parser) -> PResult<MarkClosed> {
    let m = p.open();
    p.expect(SyntaxKind::FUNC_KW)?;
    param_list(p)?;
    result(p)?;
    Ok(p.close(m, SyntaxKind::FUNC_TYPE))
}

/// Optional function result: a parameter list or a single type.
pub(crate) fn result(p: &mut Parser) -> PResult<()> {
    if p.at(SyntaxKind::L_PAREN) {
        param_list(p)?;
    } else if starts_type(p.current()) {
        ty(p)?;
    }
    Ok(())
}

pub(crate) fn param_list(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    p.expect(SyntaxKind::L_PAREN)?;
    while !p.at(SyntaxKind::R_PAREN) {
        param(p)?;
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN)?;
    p.close(m, SyntaxKind::PARAM_LIST);
    Ok(())
}

fn param(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    let named = p.at(SyntaxKind::IDENT)
        && (starts_type(p.nth(1)) || p.nth(1) == SyntaxKind::ELLIPSIS);
    if named {
        p.advance();
    }
    p.eat(SyntaxKind::ELLIPSIS);
    ty(p)?;
    p.close(m, SyntaxKind::PARAM);
    Ok(())
}

/// Bracketed type parameter declarations, kept as balanced raw tokens.
pub(crate) fn type_params(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACKET)?;
    balanced(p, SyntaxKind::L_BRACKET, SyntaxKind::R_BRACKET)?;
    p.close(m, SyntaxKind::TYPE_PARAMS);
    Ok(())
}

/// Consume tokens up to and including the `close` matching an already
/// consumed `open`.
fn balanced(p: &mut Parser, open: SyntaxKind, close: SyntaxKind) -> PResult<()> {
    let mut depth = 0usize;
    loop {
        match p.current() {
            k if k == open => depth += 1,
            k if k == close && depth == 0 => break,
            k if k == close => depth -= 1,
            SyntaxKind::EOF => return p.unexpected(&format!("{close:?}")),
            _ => {}
        }
        p.advance();
    }
    p.expect(close)
}

fn interface_type(p: &mut Parser) -> PResult<MarkClosed> {
    let m = p.open();
    p.expect(SyntaxKind::INTERFACE_KW)?;
    p.expect(SyntaxKind::L_BRACE)?;
    balanced(p, SyntaxKind::L_BRACE, SyntaxKind::R_BRACE)?;
    Ok(p.close(m, SyntaxKind::INTERFACE_TYPE))
}

pub(crate) fn struct_type(p: &mut Parser) -> PResult<MarkClosed> {
    let m = p.open();
    p.expect(SyntaxKind::STRUCT_KW)?;
    p.expect(SyntaxKind::L_BRACE)?;
    while !p.at(SyntaxKind::R_BRACE) {
        if p.eat(SyntaxKind::SEMICOLON) {
            continue;
        }
        field_decl(p)?;
        if !p.eat(SyntaxKind::SEMICOLON) && !p.at(SyntaxKind::R_BRACE) {
            return p.unexpected("';' or '}' after field");
        }
    }
    p.expect(SyntaxKind::R_BRACE)?;
    Ok(p.close(m, SyntaxKind::STRUCT_TYPE))
}

fn field_decl(p: &mut Parser) -> PResult<()> {
    use SyntaxKind::*;
    let embedded = match p.current() {
        STAR => true,
        IDENT => matches!(p.nth(1), DOT | SEMICOLON | R_BRACE | STRING),
        _ => return p.unexpected("field name or embedded type"),
    };
    let m = p.open();
    if !embedded {
        let names = p.open();
        p.expect(IDENT)?;
        while p.eat(COMMA) {
            p.expect(IDENT)?;
        }
        p.close(names, IDENT_LIST);
    }
    ty(p)?;
    p.eat(STRING);
    p.close(m, FIELD_DECL);
    Ok(())
}
