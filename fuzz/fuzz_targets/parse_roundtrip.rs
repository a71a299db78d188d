#![no_main]

//! Fuzz target for lossless lexing and parsing.
//!
//! Every byte of the input must survive tokenizing and tolerant parsing,
//! and a tree that parses cleanly must print back to exactly the input.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    let mut lexed = String::with_capacity(source.len());
    for token in fillstruct_syntax::lexer::tokenize(source) {
        lexed.push_str(token.text(source));
    }
    assert_eq!(lexed, source, "tokenizing lost bytes");

    let parse = fillstruct_syntax::parse(source);
    assert_eq!(parse.syntax().to_string(), source, "tolerant parse lost bytes");
    if let Ok(tree) = parse.ok() {
        assert_eq!(tree.to_string(), source, "printing a parsed file lost bytes");
        // Canonical printing may fail on nothing that parsed once.
        let _ = fillstruct_syntax::printer::print_canonical(&tree);
    }
    let _ = fillstruct_syntax::parse_expr(source);
    let _ = fillstruct_syntax::parse_type(source);
});
