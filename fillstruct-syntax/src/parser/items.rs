//! Source files and declarations.

use crate::syntax_kind::SyntaxKind;

use super::expressions::expr_list;
use super::statements::block;
use super::types::{self, param_list, result, ty, type_params};
use super::{PResult, Parser};

/// Parse a whole file. Errors are recorded on the parser and the failing
/// declaration is wrapped in an `ERROR_NODE`, so parsing always reaches the
/// end of the input.
pub(crate) fn source_file(p: &mut Parser) {
    let root = p.open();

    let cp = p.checkpoint();
    if let Err(err) = package_clause(p).and_then(|()| decl_end(p)) {
        p.recover(cp, err);
    }

    while !p.at(SyntaxKind::EOF) {
        if p.eat(SyntaxKind::SEMICOLON) {
            continue;
        }
        let cp = p.checkpoint();
        if let Err(err) = decl(p).and_then(|()| decl_end(p)) {
            p.recover(cp, err);
        }
    }

    p.close(root, SyntaxKind::SOURCE_FILE);
}

pub(crate) fn starts_decl(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(kind, FUNC_KW | TYPE_KW | VAR_KW | CONST_KW | IMPORT_KW)
}

fn package_clause(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    p.expect(SyntaxKind::PACKAGE_KW)?;
    p.expect(SyntaxKind::IDENT)?;
    p.close(m, SyntaxKind::PACKAGE_CLAUSE);
    Ok(())
}

fn decl(p: &mut Parser) -> PResult<()> {
    match p.current() {
        SyntaxKind::IMPORT_KW | SyntaxKind::VAR_KW | SyntaxKind::CONST_KW | SyntaxKind::TYPE_KW => {
            gen_decl(p)
        }
        SyntaxKind::FUNC_KW => func_decl(p),
        _ => p.unexpected("declaration"),
    }
}

fn decl_end(p: &mut Parser) -> PResult<()> {
    if p.eat(SyntaxKind::SEMICOLON) || p.at(SyntaxKind::EOF) {
        Ok(())
    } else {
        p.unexpected("';' or newline after declaration")
    }
}

/// `import`, `const`, `var` or `type`, single or grouped.
pub(crate) fn gen_decl(p: &mut Parser) -> PResult<()> {
    let (kind, spec): (SyntaxKind, fn(&mut Parser) -> PResult<()>) = match p.current() {
        SyntaxKind::IMPORT_KW => (SyntaxKind::IMPORT_DECL, import_spec),
        SyntaxKind::CONST_KW => (SyntaxKind::CONST_DECL, value_spec),
        SyntaxKind::VAR_KW => (SyntaxKind::VAR_DECL, value_spec),
        SyntaxKind::TYPE_KW => (SyntaxKind::TYPE_DECL, type_spec),
        _ => return p.unexpected("declaration keyword"),
    };
    let m = p.open();
    p.advance();
    if p.eat(SyntaxKind::L_PAREN) {
        while !p.at(SyntaxKind::R_PAREN) {
            if p.eat(SyntaxKind::SEMICOLON) {
                continue;
            }
            spec(p)?;
            if !p.eat(SyntaxKind::SEMICOLON) {
                break;
            }
        }
        p.expect(SyntaxKind::R_PAREN)?;
    } else {
        spec(p)?;
    }
    p.close(m, kind);
    Ok(())
}

fn import_spec(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    if p.at(SyntaxKind::IDENT) || p.at(SyntaxKind::DOT) {
        p.advance();
    }
    p.expect(SyntaxKind::STRING)?;
    p.close(m, SyntaxKind::IMPORT_SPEC);
    Ok(())
}

fn ident_list(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    p.expect(SyntaxKind::IDENT)?;
    while p.eat(SyntaxKind::COMMA) {
        p.expect(SyntaxKind::IDENT)?;
    }
    p.close(m, SyntaxKind::IDENT_LIST);
    Ok(())
}

fn value_spec(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    ident_list(p)?;
    if types::starts_type(p.current()) {
        ty(p)?;
    }
    if p.eat(SyntaxKind::EQ) {
        expr_list(p)?;
    }
    p.close(m, SyntaxKind::VALUE_SPEC);
    Ok(())
}

fn type_spec(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    p.expect(SyntaxKind::IDENT)?;
    // `type T[P any]` declares parameters; `type A [N]int` is an array.
    let has_params = p.at(SyntaxKind::L_BRACKET)
        && p.nth(1) == SyntaxKind::IDENT
        && p.nth(2) != SyntaxKind::R_BRACKET;
    if has_params {
        type_params(p)?;
    }
    p.eat(SyntaxKind::EQ);
    ty(p)?;
    p.close(m, SyntaxKind::TYPE_SPEC);
    Ok(())
}

fn func_decl(p: &mut Parser) -> PResult<()> {
    let m = p.open();
    p.expect(SyntaxKind::FUNC_KW)?;
    if p.at(SyntaxKind::L_PAREN) {
        param_list(p)?;
    }
    p.expect(SyntaxKind::IDENT)?;
    if p.at(SyntaxKind::L_BRACKET) {
        type_params(p)?;
    }
    param_list(p)?;
    result(p)?;
    if p.at(SyntaxKind::L_BRACE) {
        block(p)?;
    }
    p.close(m, SyntaxKind::FUNC_DECL);
    Ok(())
}
