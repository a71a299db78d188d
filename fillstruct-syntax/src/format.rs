//! Canonical alignment of composite-literal entries.
//!
//! Mirrors how `gofmt` lays out element lists that span several lines.
//! Consecutive single-line `key: value` entries that each start a line share
//! a value column, one space after the longest `key:`. A section ends at a
//! blank line, a comment line, an entry spanning several lines, an entry
//! sharing a line with its predecessor, or when key widths diverge.
//!
//! Trailing line comments are aligned the way gofmt's tabwriter does it:
//! consecutive entries of one section that each end their line with a
//! comment put it one space after the widest entry. An entry without a
//! comment ends the run.
//!
//! Only whitespace is rewritten. The tree must be mutable.

use crate::cst::{SyntaxElement, SyntaxNode, SyntaxToken};
use crate::make;
use crate::syntax_kind::SyntaxKind;

/// Keys up to this width always align with each other.
const SMALL_SIZE: usize = 40;
/// Maximum ratio between a key width and the running geometric mean.
const RATIO: f64 = 2.5;

/// Align entries in every composite literal under `root`, innermost first.
pub fn canonicalize(root: &SyntaxNode) {
    let lits: Vec<SyntaxNode> = root
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::COMPOSITE_LIT)
        .collect();
    for lit in lits.iter().rev() {
        align_entries(lit);
    }
}

struct Entry {
    node: SyntaxNode,
    starts_line: bool,
    /// Line breaks before the entry.
    breaks: usize,
    comment_before: bool,
    /// Alignment width; zero for entries spanning lines.
    size: usize,
    /// Gofmt section the entry belongs to.
    section: usize,
}

fn align_entries(lit: &SyntaxNode) {
    let mut entries: Vec<Entry> = lit
        .children()
        .filter(|n| n.kind().is_element())
        .map(describe)
        .collect();
    if entries.len() < 2 {
        return;
    }

    let mut key_sections: Vec<Vec<usize>> = Vec::new();
    let mut run: Vec<usize> = Vec::new();
    let mut section = 0usize;
    let mut lnsum = 0.0_f64;
    let mut count = 0usize;
    let mut prev_size = 0usize;
    let mut prev_break: Option<usize> = None;

    for i in 0..entries.len() {
        let entry = &entries[i];
        let size = entry.size;

        let mut use_ff = true;
        if prev_size > 0 && size > 0 {
            if count == 0 || (prev_size <= SMALL_SIZE && size <= SMALL_SIZE) {
                use_ff = false;
            } else {
                let geomean = (lnsum / count as f64).exp();
                let ratio = size as f64 / geomean;
                use_ff = RATIO * ratio <= 1.0 || RATIO <= ratio;
            }
        }

        if entry.starts_line {
            if i > 0 {
                let shared_line = prev_break.is_none_or(|b| b + 1 < i);
                if entry.breaks > 1 {
                    lnsum = 0.0;
                    count = 0;
                }
                if use_ff || shared_line || entry.breaks > 1 || entry.comment_before {
                    flush(&mut key_sections, &mut run);
                    section += 1;
                }
            }
            prev_break = Some(i);
        }

        if entry.node.kind() == SyntaxKind::KEYED_ELEMENT && size > 0 && entry.starts_line {
            run.push(i);
        } else {
            flush(&mut key_sections, &mut run);
            if size == 0 {
                section += 1;
            }
        }
        entries[i].section = section;

        if size > 0 {
            lnsum += (size as f64).ln();
            count += 1;
        }
        prev_size = size;
    }
    flush(&mut key_sections, &mut run);

    for indices in key_sections {
        let widest = indices.iter().map(|&i| entries[i].size).max().unwrap_or(0);
        for i in indices {
            set_colon_padding(&entries[i].node, widest - entries[i].size + 1);
        }
    }

    align_comments(lit, &entries);
}

fn flush(sections: &mut Vec<Vec<usize>>, run: &mut Vec<usize>) {
    if !run.is_empty() {
        sections.push(std::mem::take(run));
    }
}

fn describe(node: SyntaxNode) -> Entry {
    let mut before: Vec<SyntaxElement> = Vec::new();
    let mut prev = node.prev_sibling_or_token();
    while let Some(element) = prev.filter(|e| e.kind().is_trivia()) {
        prev = element.prev_sibling_or_token();
        before.push(element);
    }
    before.reverse();
    let own_line = before
        .iter()
        .position(breaks_line)
        .map_or(&before[..0], |i| &before[i..]);
    let prefix: String = own_line.iter().map(|e| e.to_string()).collect();

    let text = node.to_string();
    // The key of a keyed entry, the value otherwise.
    let size = if text.contains('\n') {
        0
    } else {
        node.first_child()
            .map_or(0, |n| n.to_string().chars().count())
    };

    Entry {
        starts_line: prefix.contains('\n'),
        breaks: prefix.matches('\n').count(),
        comment_before: own_line.iter().any(|e| e.kind() == SyntaxKind::COMMENT),
        size,
        section: 0,
        node,
    }
}

/// Whether a trivia element moves on to the next line.
fn breaks_line(element: &SyntaxElement) -> bool {
    match element.kind() {
        SyntaxKind::NEWLINE => true,
        SyntaxKind::COMMENT => element.to_string().contains('\n'),
        _ => false,
    }
}

/// Replace blank space after the colon of a keyed entry.
fn set_colon_padding(entry: &SyntaxNode, spaces: usize) {
    let Some(colon) = entry
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::COLON)
    else {
        return;
    };
    let start = colon.index() + 1;
    let mut end = start;
    let mut next = colon.next_sibling_or_token();
    while let Some(element) = next {
        match element.kind() {
            SyntaxKind::WHITESPACE => {
                end += 1;
                next = element.next_sibling_or_token();
            }
            SyntaxKind::COMMENT => return,
            _ => break,
        }
    }
    entry.splice_children(start..end, spaces_token(spaces));
}

fn spaces_token(n: usize) -> Vec<SyntaxElement> {
    make::tokens(&[(SyntaxKind::WHITESPACE, &" ".repeat(n))])
}

/// A comment ending the entry's line, and the blank gap before it.
struct Trailing {
    gap_start: usize,
    comment: SyntaxToken,
}

fn trailing_comment(entry: &SyntaxNode) -> Option<Trailing> {
    let gap_start = entry.index() + 1;
    let mut next = entry.next_sibling_or_token();
    while let Some(element) = next {
        match element {
            SyntaxElement::Token(t) if t.kind() == SyntaxKind::WHITESPACE => {
                next = t.next_sibling_or_token();
            }
            SyntaxElement::Token(t) if t.kind() == SyntaxKind::COMMENT => {
                if t.text().contains('\n') {
                    return None;
                }
                let ends_line = match t.next_sibling_or_token() {
                    Some(after) => after.kind() == SyntaxKind::NEWLINE,
                    None => true,
                };
                return ends_line.then_some(Trailing {
                    gap_start,
                    comment: t,
                });
            }
            _ => return None,
        }
    }
    None
}

fn align_comments(lit: &SyntaxNode, entries: &[Entry]) {
    let mut block: Vec<(usize, Trailing)> = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let trailing = if entry.starts_line && entry.size > 0 {
            trailing_comment(&entry.node)
        } else {
            None
        };
        let Some(trailing) = trailing else {
            pad_comments(lit, entries, &mut block);
            continue;
        };
        let continues = block
            .last()
            .is_some_and(|(last, _)| *last + 1 == i && entries[*last].section == entry.section);
        if !continues {
            pad_comments(lit, entries, &mut block);
        }
        block.push((i, trailing));
    }
    pad_comments(lit, entries, &mut block);
}

fn pad_comments(lit: &SyntaxNode, entries: &[Entry], block: &mut Vec<(usize, Trailing)>) {
    let widths: Vec<usize> = block
        .iter()
        .map(|(i, _)| entries[*i].node.to_string().chars().count())
        .collect();
    let widest = widths.iter().copied().max().unwrap_or(0);
    for ((_, trailing), width) in block.drain(..).zip(widths) {
        let range = trailing.gap_start..trailing.comment.index();
        lit.splice_children(range, spaces_token(widest - width + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_file;
    use pretty_assertions::assert_eq;

    fn format(src: &str) -> String {
        let file = parse_file(src).expect("parse").clone_for_update();
        canonicalize(&file);
        file.to_string()
    }

    fn wrap(body: &str) -> String {
        format!("package p\n\nvar _ = T{{\n{body}}}\n")
    }

    #[test]
    fn aligns_values_after_longest_key() {
        let got = format(&wrap("\tName: \"x\",\n\tStatus: S,\n\tAge: 0,\n"));
        assert_eq!(got, wrap("\tName:   \"x\",\n\tStatus: S,\n\tAge:    0,\n"));
    }

    #[test]
    fn blank_line_starts_new_section() {
        let got = format(&wrap("\tA: 1,\n\tLonger: 2,\n\n\tB: 3,\n\tBB: 4,\n"));
        assert_eq!(got, wrap("\tA:      1,\n\tLonger: 2,\n\n\tB:  3,\n\tBB: 4,\n"));
    }

    #[test]
    fn multi_line_entry_breaks_section() {
        let got = format(&wrap("\tA: 1,\n\tNested: U{\n\t\tX: 1,\n\t},\n\tLongest: 2,\n\tB: 3,\n"));
        assert_eq!(
            got,
            wrap("\tA: 1,\n\tNested: U{\n\t\tX: 1,\n\t},\n\tLongest: 2,\n\tB:       3,\n")
        );
    }

    #[test]
    fn comment_line_breaks_section() {
        let got = format(&wrap("\tA: 1,\n\t// doc\n\tLonger: 2,\n"));
        assert_eq!(got, wrap("\tA: 1,\n\t// doc\n\tLonger: 2,\n"));
    }

    #[test]
    fn single_line_literals_are_untouched() {
        let src = "package p\n\nvar _ = T{A:  1, Bee: 2}\n";
        assert_eq!(format(src), src);
    }

    #[test]
    fn divergent_key_widths_split_sections() {
        let long = "K".repeat(45);
        let body = format!("\tA: 1,\n\tBB: 2,\n\t{long}: 3,\n");
        let got = format(&wrap(&body));
        let expected = format!("\tA:  1,\n\tBB: 2,\n\t{long}: 3,\n");
        assert_eq!(got, wrap(&expected));
    }

    #[test]
    fn trailing_comments_share_a_column() {
        let got = format(&wrap("\tName: \"x\", // n\n\tEmail: \"eeee\", // e\n"));
        assert_eq!(got, wrap("\tName:  \"x\",    // n\n\tEmail: \"eeee\", // e\n"));
    }

    #[test]
    fn line_without_comment_breaks_the_comment_column() {
        let got = format(&wrap("\tName:  \"x\",    // n\n\tAge: 0,\n\tEmail: \"eeee\", // e\n"));
        assert_eq!(
            got,
            wrap("\tName:  \"x\", // n\n\tAge:   0,\n\tEmail: \"eeee\", // e\n")
        );
    }

    #[test]
    fn positional_entries_align_comments_too() {
        let got = format(&wrap("\t1, // one\n\t22,   // two\n"));
        assert_eq!(got, wrap("\t1,  // one\n\t22, // two\n"));
    }

    #[test]
    fn is_idempotent() {
        let once = format(&wrap("\tName: \"x\", // n\n\tStatus: S,\n\tAge: 0, // a\n"));
        assert_eq!(format(&once), once);
    }
}
