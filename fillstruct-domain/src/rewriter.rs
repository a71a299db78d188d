//! Completion rewriter: rebuilds a literal's element list in declaration
//! order with defaults for the missing fields.
//!
//! Existing elements are moved, never rebuilt, so their values and comments
//! travel with them. New elements copy whitespace from their neighbours.
//! The literal must belong to a mutable tree; its body is detached, edited
//! and spliced back in one step.

use std::collections::{BTreeMap, BTreeSet};

use fillstruct_syntax::ast::{AstNode, LitElement};
use fillstruct_syntax::{make, SyntaxElement, SyntaxKind, SyntaxNode};
use fillstruct_types::FieldDescriptor;

use crate::error::SiteError;
use crate::matcher::CompositeLiteralSite;
use crate::policy::DefaultPolicy;

/// Complete `lit` in place. Returns whether anything changed.
///
/// `line_indent` is the indentation of the line holding the literal's `{`;
/// it is only used when the literal has no elements to copy layout from.
/// On error the literal is left as it was.
pub fn complete(
    lit: &SyntaxNode,
    site: &CompositeLiteralSite,
    fields: &[FieldDescriptor],
    policy: &DefaultPolicy<'_>,
    line_indent: &str,
) -> Result<bool, SiteError> {
    let mut fresh = BTreeMap::new();
    for field in fields
        .iter()
        .filter(|f| f.exported && !site.present.contains(&f.name))
    {
        let value = policy
            .default_for(&field.ty)
            .map_err(|source| SiteError {
                field: field.name.clone(),
                source,
            })?;
        fresh.insert(field.name.clone(), make::keyed_element(&field.name, &value));
    }
    if fresh.is_empty() {
        return Ok(false);
    }
    let Some((open, close)) = brace_indices(lit) else {
        return Ok(false);
    };

    let body: Vec<SyntaxElement> = lit
        .children_with_tokens()
        .skip(open + 1)
        .take(close - open - 1)
        .collect();
    lit.splice_children(open + 1..close, Vec::new());

    let Parts {
        mut open_suffix,
        entries,
        mut closing,
    } = Parts::split(body);
    let style = ListStyle::observe(&mut open_suffix, &entries, &mut closing, line_indent);

    let declared: BTreeSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    let mut by_name = BTreeMap::new();
    let mut unknown = Vec::new();
    for entry in entries {
        match entry.key_name() {
            Some(key) if declared.contains(key.as_str()) && !by_name.contains_key(&key) => {
                by_name.insert(key, entry);
            }
            _ => unknown.push(entry),
        }
    }

    let mut list = Vec::with_capacity(fields.len() + unknown.len());
    for field in fields {
        if let Some(entry) = by_name.remove(&field.name) {
            list.push(entry);
        } else if let Some(node) = fresh.remove(&field.name) {
            list.push(Entry {
                prefix: make::trivia(&style.element_prefix),
                node,
                suffix: Vec::new(),
            });
        }
    }
    list.extend(unknown);

    let last = list.len() - 1;
    for i in 0..list.len() {
        let separator = match list.get(i + 1) {
            Some(next) if !next.starts_line() => style.same_line_separator.as_str(),
            _ => "",
        };
        let wants_comma = i < last || style.trailing_comma;
        set_comma(&mut list[i], wants_comma, separator);
    }
    if !style.trailing_comma && is_blank(&text_of(&list[last].suffix)) {
        list[last].suffix = spaces(&style.end_space);
    }

    let mut rebuilt = open_suffix;
    for entry in list {
        rebuilt.extend(entry.prefix);
        rebuilt.push(entry.node.into());
        rebuilt.extend(entry.suffix);
    }
    rebuilt.append(&mut closing);
    lit.splice_children(open + 1..open + 1, rebuilt);
    Ok(true)
}

/// Child indices of the literal's own `{` and `}`.
fn brace_indices(lit: &SyntaxNode) -> Option<(usize, usize)> {
    let mut open = None;
    let mut close = None;
    for (i, child) in lit.children_with_tokens().enumerate() {
        match child.kind() {
            SyntaxKind::L_BRACE if open.is_none() => open = Some(i),
            SyntaxKind::R_BRACE => close = Some(i),
            _ => {}
        }
    }
    Some((open?, close?))
}

/// One element with the trivia that travels with it: the lines before it
/// and whatever follows it on its last line.
struct Entry {
    prefix: Vec<SyntaxElement>,
    node: SyntaxNode,
    suffix: Vec<SyntaxElement>,
}

impl Entry {
    fn starts_line(&self) -> bool {
        text_of(&self.prefix).contains('\n')
    }

    fn key_name(&self) -> Option<String> {
        LitElement::cast(self.node.clone()).and_then(|e| e.key_name())
    }

    fn comma(&self) -> Option<SyntaxElement> {
        self.node
            .last_child_or_token()
            .filter(|last| last.kind() == SyntaxKind::COMMA)
    }
}

/// A literal's body between the braces.
struct Parts {
    /// Trivia after `{` on its own line.
    open_suffix: Vec<SyntaxElement>,
    entries: Vec<Entry>,
    /// Trivia on the lines before `}`.
    closing: Vec<SyntaxElement>,
}

impl Parts {
    fn split(body: Vec<SyntaxElement>) -> Self {
        let mut open_suffix = Vec::new();
        let mut entries: Vec<Entry> = Vec::new();
        let mut run = Vec::new();
        for element in body {
            let node = match element {
                SyntaxElement::Node(n) if n.kind().is_element() => n,
                other => {
                    run.push(other);
                    continue;
                }
            };
            let (same_line, prefix) = split_at_line_break(std::mem::take(&mut run));
            match entries.last_mut() {
                Some(prev) => prev.suffix = same_line,
                None => open_suffix = same_line,
            }
            entries.push(Entry {
                prefix,
                node,
                suffix: Vec::new(),
            });
        }
        let (same_line, closing) = split_at_line_break(run);
        match entries.last_mut() {
            Some(prev) => prev.suffix = same_line,
            None => open_suffix = same_line,
        }
        Parts {
            open_suffix,
            entries,
            closing,
        }
    }
}

/// Split trivia at the first element that moves to a new line.
fn split_at_line_break(mut run: Vec<SyntaxElement>) -> (Vec<SyntaxElement>, Vec<SyntaxElement>) {
    let at = run
        .iter()
        .position(|e| match e.kind() {
            SyntaxKind::NEWLINE => true,
            SyntaxKind::COMMENT => e.to_string().contains('\n'),
            _ => false,
        })
        .unwrap_or(run.len());
    let rest = run.split_off(at);
    (run, rest)
}

struct ListStyle {
    /// Trivia given to new elements.
    element_prefix: String,
    /// Space after a comma between two elements sharing a line.
    same_line_separator: String,
    trailing_comma: bool,
    /// Whitespace between the last element and `}` when there is no
    /// trailing comma.
    end_space: String,
}

impl ListStyle {
    fn observe(
        open_suffix: &mut Vec<SyntaxElement>,
        entries: &[Entry],
        closing: &mut Vec<SyntaxElement>,
        line_indent: &str,
    ) -> Self {
        let closing_text = text_of(closing);
        if entries.is_empty() {
            // Own-line layout one level deeper than the literal's line.
            if is_blank(&text_of(open_suffix)) {
                open_suffix.clear();
            }
            let closing_indent = if closing_text.contains('\n') {
                after_last_newline(&closing_text).to_string()
            } else {
                *closing = make::trivia(&format!("\n{line_indent}"));
                line_indent.to_string()
            };
            return ListStyle {
                element_prefix: format!("\n{closing_indent}\t"),
                same_line_separator: " ".to_string(),
                trailing_comma: true,
                end_space: String::new(),
            };
        }

        let multi_line = closing_text.contains('\n') || entries.iter().any(Entry::starts_line);
        let element_prefix = if multi_line {
            let indent = entries
                .iter()
                .map(|e| text_of(&e.prefix))
                .filter(|prefix| prefix.contains('\n'))
                .map(|prefix| after_last_newline(&prefix).to_string())
                .find(|tail| is_blank(tail))
                .unwrap_or_else(|| {
                    if closing_text.contains('\n') {
                        format!("{}\t", after_last_newline(&closing_text))
                    } else {
                        format!("{line_indent}\t")
                    }
                });
            format!("\n{indent}")
        } else {
            String::new()
        };

        let same_line_separator = entries
            .windows(2)
            .filter(|pair| !pair[1].starts_line() && pair[0].comma().is_some())
            .map(|pair| text_of(&pair[0].suffix))
            .find(|suffix| !suffix.is_empty() && is_blank(suffix))
            .unwrap_or_else(|| " ".to_string());

        let last = &entries[entries.len() - 1];
        let trailing_comma = last.comma().is_some();
        let last_suffix = text_of(&last.suffix);
        let end_space = if !trailing_comma && is_blank(&last_suffix) {
            last_suffix
        } else {
            String::new()
        };

        ListStyle {
            element_prefix,
            same_line_separator,
            trailing_comma,
            end_space,
        }
    }
}

fn set_comma(entry: &mut Entry, wanted: bool, separator: &str) {
    match (wanted, entry.comma()) {
        (true, None) => {
            // A comment after the value stays before the new comma.
            let mut added = std::mem::take(&mut entry.suffix);
            if is_blank(&text_of(&added)) {
                added.clear();
            }
            added.extend(make::comma());
            let end = entry.node.children_with_tokens().count();
            entry.node.splice_children(end..end, added);
            entry.suffix = spaces(separator);
        }
        (true, Some(_)) => {
            if entry.suffix.is_empty() {
                entry.suffix = spaces(separator);
            }
        }
        (false, Some(comma)) => {
            match comma {
                SyntaxElement::Token(t) => t.detach(),
                SyntaxElement::Node(n) => n.detach(),
            }
            if is_blank(&text_of(&entry.suffix)) {
                entry.suffix.clear();
            }
        }
        (false, None) => {}
    }
}

fn spaces(text: &str) -> Vec<SyntaxElement> {
    if text.is_empty() {
        Vec::new()
    } else {
        make::trivia(text)
    }
}

fn text_of(elements: &[SyntaxElement]) -> String {
    elements.iter().map(|e| e.to_string()).collect()
}

fn after_last_newline(trivia: &str) -> &str {
    trivia.rfind('\n').map_or(trivia, |i| &trivia[i + 1..])
}

fn is_blank(trivia: &str) -> bool {
    trivia.chars().all(|c| c == ' ' || c == '\t')
}
