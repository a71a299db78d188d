//! Statements and blocks.

use crate::syntax_kind::SyntaxKind;

use super::expressions::{expr, expr_list};
use super::{items, MarkClosed, PResult, Parser};

pub(crate) fn block(p: &mut Parser) -> PResult<MarkClosed> {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACE)?;
    p.with_expr_lev(0, |p| stmt_list(p, |k| k == SyntaxKind::R_BRACE))?;
    p.expect(SyntaxKind::R_BRACE)?;
    Ok(p.close(m, SyntaxKind::BLOCK))
}

fn stmt_list(p: &mut Parser, stop: impl Fn(SyntaxKind) -> bool) -> PResult<()> {
    while !stop(p.current()) && !p.at(SyntaxKind::EOF) {
        if p.eat(SyntaxKind::SEMICOLON) {
            continue;
        }
        stmt(p)?;
        if !p.eat(SyntaxKind::SEMICOLON) && !stop(p.current()) {
            return p.unexpected("';' or newline after statement");
        }
    }
    Ok(())
}

fn stmt(p: &mut Parser) -> PResult<()> {
    use SyntaxKind::*;
    let kind = match p.current() {
        L_BRACE => return block(p).map(drop),
        IF_KW => return if_stmt(p).map(drop),
        FOR_KW => return for_stmt(p),
        SWITCH_KW => return switch_stmt(p),
        SELECT_KW => return select_stmt(p),
        VAR_KW | CONST_KW | TYPE_KW => DECL_STMT,
        RETURN_KW => RETURN_STMT,
        BREAK_KW | CONTINUE_KW | GOTO_KW | FALLTHROUGH_KW => BRANCH_STMT,
        GO_KW => GO_STMT,
        DEFER_KW => DEFER_STMT,
        IDENT if p.nth(1) == COLON => LABELED_STMT,
        _ => return simple_stmt(p).map(drop),
    };

    let m = p.open();
    match kind {
        DECL_STMT => items::gen_decl(p)?,
        RETURN_STMT => {
            p.advance();
            if !p.at(SEMICOLON) && !p.at(R_BRACE) && !p.at(EOF) {
                expr_list(p)?;
            }
        }
        BRANCH_STMT => {
            let labelled = !p.at(FALLTHROUGH_KW);
            p.advance();
            if labelled {
                p.eat(IDENT);
            }
        }
        GO_STMT | DEFER_STMT => {
            p.advance();
            expr(p)?;
        }
        _ => {
            // label and colon
            p.advance();
            p.advance();
            if !p.at(R_BRACE) && !p.at(SEMICOLON) {
                stmt(p)?;
            }
        }
    }
    p.close(m, kind);
    Ok(())
}

fn simple_stmt(p: &mut Parser) -> PResult<MarkClosed> {
    use SyntaxKind::*;
    if p.at(RANGE_KW) {
        return range_clause(p);
    }
    let lhs = expr_list(p)?;
    let m = p.open_before(lhs);
    let kind = match p.current() {
        COLON_EQ | EQ | ASSIGN_OP => {
            p.advance();
            if p.at(RANGE_KW) {
                range_clause(p)?;
            } else {
                expr_list(p)?;
            }
            ASSIGN_STMT
        }
        PLUS_PLUS | MINUS_MINUS => {
            p.advance();
            INC_DEC_STMT
        }
        ARROW => {
            p.advance();
            expr(p)?;
            SEND_STMT
        }
        _ => EXPR_STMT,
    };
    Ok(p.close(m, kind))
}

fn range_clause(p: &mut Parser) -> PResult<MarkClosed> {
    let m = p.open();
    p.expect(SyntaxKind::RANGE_KW)?;
    expr(p)?;
    Ok(p.close(m, SyntaxKind::RANGE_CLAUSE))
}

fn if_stmt(p: &mut Parser) -> PResult<MarkClosed> {
    let m = p.open();
    p.expect(SyntaxKind::IF_KW)?;
    p.with_expr_lev(-1, |p| {
        if !p.at(SyntaxKind::SEMICOLON) {
            simple_stmt(p)?;
        }
        if p.eat(SyntaxKind::SEMICOLON) {
            expr(p)?;
        }
        Ok(())
    })?;
    block(p)?;
    if p.eat(SyntaxKind::ELSE_KW) {
        if p.at(SyntaxKind::IF_KW) {
            if_stmt(p)?;
        } else {
            block(p)?;
        }
    }
    Ok(p.close(m, SyntaxKind::IF_STMT))
}

fn for_stmt(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    p.expect(SyntaxKind::FOR_KW)?;
    p.with_expr_lev(-1, |p| {
        if p.at(SyntaxKind::L_BRACE) {
            return Ok(());
        }
        if !p.at(SyntaxKind::SEMICOLON) {
            simple_stmt(p)?;
        }
        if p.eat(SyntaxKind::SEMICOLON) {
            if !p.at(SyntaxKind::SEMICOLON) {
                simple_stmt(p)?;
            }
            p.expect(SyntaxKind::SEMICOLON)?;
            if !p.at(SyntaxKind::L_BRACE) {
                simple_stmt(p)?;
            }
        }
        Ok(())
    })?;
    block(p)?;
    p.close(m, SyntaxKind::FOR_STMT);
    Ok(())
}

fn switch_stmt(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    p.expect(SyntaxKind::SWITCH_KW)?;
    p.with_expr_lev(-1, |p| {
        if p.at(SyntaxKind::L_BRACE) {
            return Ok(());
        }
        if !p.at(SyntaxKind::SEMICOLON) {
            simple_stmt(p)?;
        }
        if p.eat(SyntaxKind::SEMICOLON) && !p.at(SyntaxKind::L_BRACE) {
            simple_stmt(p)?;
        }
        Ok(())
    })?;
    clause_body(p, |p| expr_list(p).map(drop))?;
    p.close(m, SyntaxKind::SWITCH_STMT);
    Ok(())
}

fn select_stmt(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    p.expect(SyntaxKind::SELECT_KW)?;
    clause_body(p, |p| simple_stmt(p).map(drop))?;
    p.close(m, SyntaxKind::SELECT_STMT);
    Ok(())
}

/// `{ case ...: stmts  default: stmts }`, with `guard` parsing what follows
/// `case`.
fn clause_body(p: &mut Parser, guard: fn(&mut Parser) -> PResult<()>) -> PResult<()> {
    p.expect(SyntaxKind::L_BRACE)?;
    p.with_expr_lev(0, |p| {
        while p.at(SyntaxKind::CASE_KW) || p.at(SyntaxKind::DEFAULT_KW) {
            let m = p.open();
            let is_case = p.at(SyntaxKind::CASE_KW);
            p.advance();
            if is_case {
                guard(p)?;
            }
            p.expect(SyntaxKind::COLON)?;
            stmt_list(p, |k| {
                matches!(
                    k,
                    SyntaxKind::CASE_KW | SyntaxKind::DEFAULT_KW | SyntaxKind::R_BRACE
                )
            })?;
            p.close(m, SyntaxKind::CASE_CLAUSE);
        }
        Ok(())
    })?;
    p.expect(SyntaxKind::R_BRACE)
}
