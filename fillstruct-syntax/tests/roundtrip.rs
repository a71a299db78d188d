//! Property-based tests for lossless lexing and printing.
//!
//! These tests verify:
//! - Lexing never loses bytes, whatever the input
//! - Parsing then printing reproduces generated Go sources exactly
//! - Canonical alignment, trailing comments included, is idempotent

use fillstruct_syntax::format::canonicalize;
use fillstruct_syntax::{lexer, parse_file, printer};
use proptest::prelude::*;

fn concat(source: &str, tokens: &[lexer::Token]) -> String {
    tokens.iter().map(|t| t.text(source)).collect()
}

/// Strategy for a keyed entry with optional comments and spacing.
fn arb_entry() -> impl Strategy<Value = String> {
    (
        prop::string::string_regex(r"[A-Z][a-zA-Z0-9]{0,12}").unwrap(),
        prop_oneof![
            Just("\"\"".to_string()),
            Just("0".to_string()),
            Just("nil".to_string()),
            Just("time.Time{}".to_string()),
            Just("[]int{1, 2}".to_string()),
            Just("`raw`".to_string()),
        ],
        prop_oneof![
            Just(String::new()),
            Just(" // trailing".to_string()),
            Just(" /* note */".to_string()),
        ],
        prop_oneof![Just(" ".to_string()), Just("  ".to_string()), Just("\t".to_string())],
    )
        .prop_map(|(key, value, comment, gap)| format!("\t\t{key}:{gap}{value},{comment}\n"))
}

fn arb_source() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(arb_entry(), 0..6),
        prop::bool::ANY,
        prop::bool::ANY,
    )
        .prop_map(|(entries, pointer, blank)| {
            let amp = if pointer { "&" } else { "" };
            let sep = if blank { "\n" } else { "" };
            format!(
                "// Package p is generated.\npackage p\n\nimport \"time\"\n{sep}\nfunc main() {{\n\t_ = {amp}T{{\n{}\t}}\n}}\n",
                entries.concat()
            )
        })
}

proptest! {
    #[test]
    fn lexing_is_lossless(source in r"[ -~\t\n]{0,200}") {
        let tokens = lexer::tokenize(&source);
        prop_assert_eq!(concat(&source, &tokens), source);
    }

    #[test]
    fn lexing_is_lossless_for_unicode(source in r"\PC{0,64}") {
        let tokens = lexer::tokenize(&source);
        prop_assert_eq!(concat(&source, &tokens), source);
    }

    #[test]
    fn parse_print_roundtrip(source in arb_source()) {
        let file = parse_file(&source).expect("generated source parses");
        prop_assert_eq!(printer::print(&file), source);
    }

    #[test]
    fn canonical_alignment_is_idempotent(source in arb_source()) {
        let once = printer::print_canonical(&parse_file(&source).expect("parse")).expect("print");
        let again = parse_file(&once).expect("reparse").clone_for_update();
        canonicalize(&again);
        prop_assert_eq!(printer::print(&again), once);
    }
}
