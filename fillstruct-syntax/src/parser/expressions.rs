//! Expressions, including composite literals.

use crate::syntax_kind::SyntaxKind;

use super::{statements, types, MarkClosed, PResult, Parser};

pub(crate) fn expr(p: &mut Parser) -> PResult<MarkClosed> {
    binary(p, 1)
}

/// Comma-separated expressions; a single expression is returned as is.
pub(crate) fn expr_list(p: &mut Parser) -> PResult<MarkClosed> {
    let first = expr(p)?;
    if !p.at(SyntaxKind::COMMA) {
        return Ok(first);
    }
    let m = p.open_before(first);
    while p.eat(SyntaxKind::COMMA) {
        expr(p)?;
    }
    Ok(p.close(m, SyntaxKind::EXPR_LIST))
}

fn binary(p: &mut Parser, min_prec: u8) -> PResult<MarkClosed> {
    let mut lhs = unary(p)?;
    while let Some(prec) = p.current().binary_precedence() {
        if prec < min_prec {
            break;
        }
        let m = p.open_before(lhs);
        p.advance();
        binary(p, prec + 1)?;
        lhs = p.close(m, SyntaxKind::BINARY_EXPR);
    }
    Ok(lhs)
}

fn unary(p: &mut Parser) -> PResult<MarkClosed> {
    use SyntaxKind::*;
    match p.current() {
        PLUS | MINUS | BANG | CARET | STAR | AMP | ARROW | TILDE => {
            let m = p.open();
            p.advance();
            unary(p)?;
            Ok(p.close(m, UNARY_EXPR))
        }
        _ => primary(p),
    }
}

fn primary(p: &mut Parser) -> PResult<MarkClosed> {
    use SyntaxKind::*;
    let mut x = operand(p)?;
    // `T`, `pkg.T`
    let mut type_name = x.kind == NAME;
    // Anything that may precede `{` in a composite literal.
    let mut literal_type =
        type_name || matches!(x.kind, ARRAY_TYPE | SLICE_TYPE | MAP_TYPE | STRUCT_TYPE);
    loop {
        match p.current() {
            DOT => {
                let base_is_name = x.kind == NAME;
                x = selector_or_assert(p, x)?;
                type_name = base_is_name && x.kind == SELECTOR_EXPR;
                literal_type = type_name;
            }
            L_BRACKET => {
                let base_is_type = type_name;
                x = index_or_slice(p, x)?;
                type_name = false;
                literal_type = base_is_type && x.kind == INDEX_EXPR;
            }
            L_PAREN => {
                x = call(p, x)?;
                type_name = false;
                literal_type = false;
            }
            L_BRACE if literal_type && (p.expr_lev >= 0 || !type_name) => {
                x = composite_lit(p, Some(x))?;
                type_name = false;
                literal_type = false;
            }
            _ => return Ok(x),
        }
    }
}

fn operand(p: &mut Parser) -> PResult<MarkClosed> {
    use SyntaxKind::*;
    match p.current() {
        IDENT => {
            let m = p.open();
            p.advance();
            Ok(p.close(m, NAME))
        }
        INT | FLOAT | IMAG | CHAR | STRING => {
            let m = p.open();
            p.advance();
            Ok(p.close(m, BASIC_LIT))
        }
        L_PAREN => {
            let m = p.open();
            p.advance();
            p.with_expr_lev(p.expr_lev.max(0) + 1, expr)?;
            p.expect(R_PAREN)?;
            Ok(p.close(m, PAREN_EXPR))
        }
        FUNC_KW => {
            let sig = types::func_type(p)?;
            if !p.at(L_BRACE) {
                return Ok(sig);
            }
            let m = p.open_before(sig);
            p.with_expr_lev(0, statements::block)?;
            Ok(p.close(m, FUNC_LIT))
        }
        L_BRACKET | MAP_KW | CHAN_KW | STRUCT_KW | INTERFACE_KW => types::ty(p),
        _ => p.unexpected("expression"),
    }
}

fn selector_or_assert(p: &mut Parser, x: MarkClosed) -> PResult<MarkClosed> {
    let m = p.open_before(x);
    p.expect(SyntaxKind::DOT)?;
    if p.eat(SyntaxKind::L_PAREN) {
        if !p.eat(SyntaxKind::TYPE_KW) {
            types::ty(p)?;
        }
        p.expect(SyntaxKind::R_PAREN)?;
        return Ok(p.close(m, SyntaxKind::TYPE_ASSERT_EXPR));
    }
    p.expect(SyntaxKind::IDENT)?;
    Ok(p.close(m, SyntaxKind::SELECTOR_EXPR))
}

fn index_or_slice(p: &mut Parser, x: MarkClosed) -> PResult<MarkClosed> {
    let m = p.open_before(x);
    p.expect(SyntaxKind::L_BRACKET)?;
    let is_slice = p.with_expr_lev(p.expr_lev.max(0) + 1, |p| {
        if !p.at(SyntaxKind::COLON) {
            expr(p)?;
        }
        // Type argument lists: `F[int, string]`.
        while p.eat(SyntaxKind::COMMA) {
            if !p.at(SyntaxKind::R_BRACKET) {
                expr(p)?;
            }
        }
        let mut is_slice = false;
        while p.eat(SyntaxKind::COLON) {
            is_slice = true;
            if !p.at(SyntaxKind::COLON) && !p.at(SyntaxKind::R_BRACKET) {
                expr(p)?;
            }
        }
        Ok(is_slice)
    })?;
    p.expect(SyntaxKind::R_BRACKET)?;
    let kind = if is_slice {
        SyntaxKind::SLICE_EXPR
    } else {
        SyntaxKind::INDEX_EXPR
    };
    Ok(p.close(m, kind))
}

fn call(p: &mut Parser, func: MarkClosed) -> PResult<MarkClosed> {
    let m = p.open_before(func);
    let args = p.open();
    p.expect(SyntaxKind::L_PAREN)?;
    p.with_expr_lev(p.expr_lev.max(0) + 1, |p| {
        while !p.at(SyntaxKind::R_PAREN) {
            expr(p)?;
            p.eat(SyntaxKind::ELLIPSIS);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        Ok(())
    })?;
    p.expect(SyntaxKind::R_PAREN)?;
    p.close(args, SyntaxKind::ARGS);
    Ok(p.close(m, SyntaxKind::CALL_EXPR))
}

/// `T{...}`, or `{...}` with an elided type when `ty` is `None`.
pub(crate) fn composite_lit(p: &mut Parser, ty: Option<MarkClosed>) -> PResult<MarkClosed> {
    let m = match ty {
        Some(ty) => p.open_before(ty),
        None => p.open(),
    };
    p.expect(SyntaxKind::L_BRACE)?;
    p.with_expr_lev(0, |p| {
        while !p.at(SyntaxKind::R_BRACE) {
            if !element(p)? {
                break;
            }
        }
        Ok(())
    })?;
    if !p.at(SyntaxKind::R_BRACE) {
        return p.unexpected("',' or '}' in composite literal");
    }
    p.advance();
    Ok(p.close(m, SyntaxKind::COMPOSITE_LIT))
}

/// One element with its trailing comma; returns whether a comma was found.
fn element(p: &mut Parser) -> PResult<bool> {
    let m = p.open();
    element_value(p)?;
    let kind = if p.eat(SyntaxKind::COLON) {
        element_value(p)?;
        SyntaxKind::KEYED_ELEMENT
    } else {
        SyntaxKind::ELEMENT
    };
    let has_comma = p.eat(SyntaxKind::COMMA);
    p.close(m, kind);
    Ok(has_comma)
}

fn element_value(p: &mut Parser) -> PResult<MarkClosed> {
    if p.at(SyntaxKind::L_BRACE) {
        composite_lit(p, None)
    } else {
        expr(p)
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse_expr, SyntaxKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn precedence_builds_left_leaning_tree() {
        let e = parse_expr("a + b*c - d").expect("parse");
        assert_eq!(e.kind(), SyntaxKind::BINARY_EXPR);
        let lhs = e.first_child().expect("lhs");
        assert_eq!(lhs.to_string(), "a + b*c");
    }

    #[test]
    fn composite_literal_forms() {
        for src in [
            "&pkg.T{A: 1}",
            "[...]int{1, 2}",
            "map[string]T{\"k\": {A: 1}}",
            "struct{ A int }{A: 1}",
            "List[int]{}",
            "Pair[string, int]{Key: \"a\"}",
            "[]*T{{A: 1}, nil}",
        ] {
            let e = parse_expr(src).expect(src);
            assert_eq!(e.to_string(), src);
            let lits = e
                .descendants()
                .filter(|n| n.kind() == SyntaxKind::COMPOSITE_LIT)
                .count();
            assert!(lits > 0, "{src}");
        }
    }

    #[test]
    fn element_owns_its_comma_but_not_the_line_break() {
        let e = parse_expr("T{\n\tA: 1, // one\n\tB: 2,\n}").expect("parse");
        let elems: Vec<_> = e
            .children()
            .filter(|n| n.kind() == SyntaxKind::KEYED_ELEMENT)
            .map(|n| n.to_string())
            .collect();
        assert_eq!(elems, vec!["A: 1,", "B: 2,"]);
    }

    #[test]
    fn multi_line_literal_requires_trailing_comma() {
        assert!(parse_expr("T{\n\tA: 1,\n}").is_ok());
        let err = parse_expr("T{\n\tA: 1\n}").expect_err("missing comma");
        assert!(err.message.contains("composite literal"), "{}", err.message);
    }

    #[test]
    fn calls_selectors_and_slices() {
        let e = parse_expr("f(x...)[1:2].y.(T)").expect("parse");
        assert_eq!(e.kind(), SyntaxKind::TYPE_ASSERT_EXPR);
    }
}
