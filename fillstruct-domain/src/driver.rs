//! Transform driver: completes every matching literal in one file.
//!
//! Completion runs in two passes. The first walks the parsed tree, where
//! offsets still match the source, resolves literal types and records a
//! plan for every literal to complete. The second applies the plans to a
//! mutable copy of the tree, innermost literal first.

use camino::Utf8Path;
use fillstruct_syntax::ast::{AstNode, CompositeLit, LitElement};
use fillstruct_syntax::{LineIndex, SyntaxKind, SyntaxNode};
use fillstruct_types::{CustomDefaults, FieldDescriptor, FormatError, FormatResult, Type};
use tracing::{debug, trace};

use crate::error::FillError;
use crate::matcher::{classify, CompositeLiteralSite, TargetSet};
use crate::model::{fields_of, VisibilityMode};
use crate::policy::DefaultPolicy;
use crate::ports::{Printer, TypeInfo};
use crate::rewriter;

/// What to complete and with which defaults.
#[derive(Debug, Clone, Default)]
pub struct FillOptions {
    pub targets: TargetSet,
    pub defaults: CustomDefaults,
    pub visibility: VisibilityMode,
}

/// Parse `source` and complete it.
pub fn fill_source(
    path: &Utf8Path,
    source: &str,
    info: &dyn TypeInfo,
    options: &FillOptions,
    printer: &dyn Printer,
) -> Result<FormatResult, FillError> {
    let tree = fillstruct_syntax::parse_file(source).map_err(|source| FillError::Parse {
        path: path.to_owned(),
        source,
    })?;
    fill(path, source, &tree, info, options, printer)
}

/// Complete every literal of a target type in `tree`, parsed from `source`.
///
/// `tree` itself is not modified. The printer only runs when at least one
/// literal changed; otherwise the result carries no output.
pub fn fill(
    path: &Utf8Path,
    source: &str,
    tree: &SyntaxNode,
    info: &dyn TypeInfo,
    options: &FillOptions,
    printer: &dyn Printer,
) -> Result<FormatResult, FillError> {
    if tree.kind() != SyntaxKind::SOURCE_FILE {
        return Err(FillError::NotAFile {
            path: path.to_owned(),
            kind: tree.kind(),
        });
    }

    let mut planner = Planner {
        source,
        lines: LineIndex::new(source),
        info,
        options,
        next_ordinal: 0,
        plans: Vec::new(),
    };
    planner.visit(tree, None);
    let Planner { lines, plans, .. } = planner;
    if plans.is_empty() {
        trace!(%path, "no literal to complete");
        return Ok(FormatResult::unchanged(path.to_owned(), Vec::new()));
    }

    let root = SyntaxNode::new_root_mut(tree.green().into_owned());
    let lits: Vec<SyntaxNode> = root
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::COMPOSITE_LIT)
        .collect();
    let policy = DefaultPolicy::new(info, &options.defaults);
    let position = |offset: u32| {
        let (line, col) = lines.line_col(offset);
        format!("{path}:{line}:{col}")
    };

    let mut completed = 0usize;
    let mut errors = Vec::new();
    for plan in plans {
        let Some(lit) = lits.get(plan.ordinal) else {
            continue;
        };
        match rewriter::complete(lit, &plan.site, &plan.fields, &policy, &plan.indent) {
            Ok(true) => {
                completed += 1;
                debug!(at = %position(plan.site.position), ty = %plan.resolved, "completed literal");
            }
            Ok(false) => {}
            Err(err) => {
                debug!(at = %position(plan.site.position), %err, "left literal untouched");
                errors.push(FormatError {
                    message: err.to_string(),
                    position_text: position(plan.site.position),
                });
            }
        }
    }

    if completed == 0 {
        trace!(%path, errors = errors.len(), "no literal changed");
        return Ok(FormatResult::unchanged(path.to_owned(), errors));
    }
    debug!(%path, completed, "printing completed file");
    let output = printer.print(&root).map_err(|source| FillError::Print {
        path: path.to_owned(),
        source,
    })?;
    Ok(FormatResult::changed(path.to_owned(), output, errors))
}

/// A literal to complete, found by the first pass.
struct Plan {
    /// Index of the literal among the file's literals, in preorder.
    ordinal: usize,
    resolved: Type,
    site: CompositeLiteralSite,
    fields: Vec<FieldDescriptor>,
    /// Indentation of the line holding the literal's `{`.
    indent: String,
}

struct Planner<'a> {
    source: &'a str,
    lines: LineIndex,
    info: &'a dyn TypeInfo,
    options: &'a FillOptions,
    next_ordinal: usize,
    /// Innermost literals first.
    plans: Vec<Plan>,
}

impl Planner<'_> {
    /// `expected` is the type an elided literal at `node` takes from its
    /// enclosing literal.
    fn visit(&mut self, node: &SyntaxNode, expected: Option<&Type>) {
        if let Some(lit) = CompositeLit::cast(node.clone()) {
            self.visit_literal(&lit, expected);
            return;
        }
        for child in node.children() {
            self.visit(&child, None);
        }
    }

    fn visit_literal(&mut self, lit: &CompositeLit, expected: Option<&Type>) {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let resolved = match (lit.ty(), expected) {
            (Some(ty), _) => self.info.resolve_type(&ty),
            (None, Some(ty)) => ty.clone(),
            (None, None) => Type::unresolved("{...}"),
        };
        let (key_ty, value_ty) = self.element_types(&resolved);

        for child in lit.syntax().children() {
            match LitElement::cast(child.clone()) {
                Some(element) => {
                    if let Some(key) = element.key() {
                        self.visit(&key, key_ty.as_ref());
                    }
                    if let Some(value) = element.value() {
                        self.visit(&value, value_ty.as_ref());
                    }
                }
                None => self.visit(&child, None),
            }
        }

        self.plan(lit, ordinal, resolved);
    }

    /// Types taken by elided key and element literals inside a literal of
    /// type `ty`.
    fn element_types(&self, ty: &Type) -> (Option<Type>, Option<Type>) {
        let shape = match ty.deref() {
            Type::Named { id, args } => self.info.underlying(id, args),
            other => Some(other.clone()),
        };
        match shape {
            Some(Type::Slice { elem }) | Some(Type::Array { elem, .. }) => (None, Some(*elem)),
            Some(Type::Map { key, value }) => (Some(*key), Some(*value)),
            _ => (None, None),
        }
    }

    fn plan(&mut self, lit: &CompositeLit, ordinal: usize, resolved: Type) {
        let Some(site) = classify(lit, &resolved, self.info, &self.options.targets) else {
            return;
        };
        let fields = fields_of(&site.layout, self.options.visibility.predicate());
        let indent = lit
            .l_brace()
            .map_or("", |t| self.lines.indent_at(self.source, t.text_range().start().into()))
            .to_string();
        self.plans.push(Plan {
            ordinal,
            resolved,
            site,
            fields,
            indent,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CanonicalPrinter;
    use crate::testing::{FakeInfo, PKG};
    use fillstruct_types::{BasicKind, StructField, StructType, TypeIdentity};
    use pretty_assertions::assert_eq;

    fn field(name: &str, ty: Type) -> StructField {
        StructField {
            name: name.to_string(),
            ty,
            embedded: false,
        }
    }

    fn person() -> TypeIdentity {
        TypeIdentity::new(PKG, "Person")
    }

    fn info() -> FakeInfo {
        let person_ty = Type::named(person());
        FakeInfo::new()
            .declare(
                "Person",
                Type::Struct(StructType {
                    fields: vec![
                        field("Name", Type::basic(BasicKind::String)),
                        field("Age", Type::basic(BasicKind::Int)),
                    ],
                }),
            )
            .declare(
                "Team",
                Type::Struct(StructType {
                    fields: vec![
                        field("Lead", person_ty.clone()),
                        field("Tags", Type::slice(Type::basic(BasicKind::String))),
                    ],
                }),
            )
            .expr("[]*Person", Type::slice(Type::pointer(person_ty.clone())))
            .expr(
                "map[string]Person",
                Type::Map {
                    key: Box::new(Type::basic(BasicKind::String)),
                    value: Box::new(person_ty),
                },
            )
            .expr("ext.Thing", Type::unresolved("ext.Thing"))
    }

    fn run(source: &str, options: &FillOptions) -> FormatResult {
        fill_source(
            Utf8Path::new("app.go"),
            source,
            &info(),
            options,
            &CanonicalPrinter,
        )
        .expect("fill")
    }

    fn output(result: &FormatResult) -> String {
        String::from_utf8(result.output.clone().expect("output")).expect("utf8")
    }

    fn all() -> FillOptions {
        FillOptions::default()
    }

    #[test]
    fn completes_and_aligns_multi_line_literal() {
        let source = "package app\n\nfunc main() {\n\t_ = &Person{\n\t\tName: \"test\",\n\t}\n}\n";
        let result = run(source, &all());
        assert!(result.changed);
        assert!(result.errors.is_empty());
        assert_eq!(
            output(&result),
            "package app\n\nfunc main() {\n\t_ = &Person{\n\t\tName: \"test\",\n\t\tAge:  0,\n\t}\n}\n"
        );
    }

    #[test]
    fn elided_literals_take_the_element_type() {
        let source = "package app\n\nvar people = []*Person{{Name: \"a\"}}\nvar byName = map[string]Person{\"b\": {Age: 2}}\n";
        let result = run(source, &all());
        assert_eq!(
            output(&result),
            "package app\n\nvar people = []*Person{{Name: \"a\", Age: 0}}\nvar byName = map[string]Person{\"b\": {Name: \"\", Age: 2}}\n"
        );
    }

    #[test]
    fn nested_literals_complete_inside_out() {
        let source = "package app\n\nvar t = Team{Lead: Person{Name: \"x\"}}\n";
        let result = run(source, &all());
        assert_eq!(
            output(&result),
            "package app\n\nvar t = Team{Lead: Person{Name: \"x\", Age: 0}, Tags: nil}\n"
        );
    }

    #[test]
    fn only_target_types_are_completed() {
        let options = FillOptions {
            targets: [TypeIdentity::new(PKG, "Team")].into_iter().collect(),
            ..FillOptions::default()
        };
        let source = "package app\n\nvar t = Team{Lead: Person{}}\n";
        let result = run(source, &options);
        assert_eq!(
            output(&result),
            "package app\n\nvar t = Team{Lead: Person{}, Tags: nil}\n"
        );
    }

    #[test]
    fn untouched_files_have_no_output() {
        let source = "package app\n\nvar a = Person{Name: \"x\", Age: 1}\nvar b = Person{\"Alice\", 0}\n";
        let result = run(source, &all());
        assert!(!result.changed);
        assert!(result.output.is_none());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn site_errors_are_collected_with_positions() {
        let info = info().declare(
            "Box",
            Type::Struct(StructType {
                fields: vec![field("Item", Type::unresolved("ext.Thing"))],
            }),
        );
        let source = "package app\n\nvar a = Box{}\nvar b = Person{}\n";
        let result = fill_source(
            Utf8Path::new("app.go"),
            source,
            &info,
            &all(),
            &CanonicalPrinter,
        )
        .expect("fill");
        assert!(result.changed);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].position_text, "app.go:3:9");
        assert_eq!(
            result.errors[0].message,
            "cannot synthesize default for field Item: cannot resolve type ext.Thing"
        );
        assert!(output(&result).contains("var a = Box{}\n"));
    }

    #[test]
    fn invalid_override_fails_the_file() {
        let mut options = all();
        options.defaults.insert("int", "not valid");
        let source = "package app\n\nvar a = Person{Name: \"x\"}\n";
        let err = fill_source(
            Utf8Path::new("app.go"),
            source,
            &info(),
            &options,
            &CanonicalPrinter,
        )
        .expect_err("reparse fails");
        assert!(err.is_print_failure());
    }

    #[test]
    fn rejects_non_file_trees() {
        let tree = fillstruct_syntax::parse_expr("Person{}").expect("parse");
        let err = fill(
            Utf8Path::new("x.go"),
            "Person{}",
            &tree,
            &info(),
            &all(),
            &CanonicalPrinter,
        )
        .expect_err("not a file");
        assert!(matches!(err, FillError::NotAFile { .. }));
    }

    #[test]
    fn generic_literals_complete_with_instantiated_fields() {
        let info = info().declare_generic(
            "Pair[string, int]",
            "Pair",
            vec![Type::basic(BasicKind::String), Type::basic(BasicKind::Int)],
            Type::Struct(StructType {
                fields: vec![
                    field("Key", Type::basic(BasicKind::String)),
                    field("Val", Type::basic(BasicKind::Int)),
                ],
            }),
        );
        let source = "package app\n\nvar p = Pair[string, int]{Key: \"a\"}\n";
        let result = fill_source(
            Utf8Path::new("app.go"),
            source,
            &info,
            &all(),
            &CanonicalPrinter,
        )
        .expect("fill");
        assert_eq!(
            output(&result),
            "package app\n\nvar p = Pair[string, int]{Key: \"a\", Val: 0}\n"
        );
    }

    #[test]
    fn input_tree_is_left_untouched() {
        let source = "package app\n\nvar a = Person{Name: \"x\"}\n";
        let tree = fillstruct_syntax::parse_file(source).expect("parse");
        let result = fill(
            Utf8Path::new("app.go"),
            source,
            &tree,
            &info(),
            &all(),
            &CanonicalPrinter,
        )
        .expect("fill");
        assert!(result.changed);
        assert_eq!(tree.to_string(), source);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let source = "package app\n\nfunc f() {\n\tp := Person{\n\t\tAge: 3,\n\t}\n\t_ = p\n}\n";
        let first = run(source, &all());
        let once = output(&first);
        let second = run(&once, &all());
        assert!(!second.changed);
    }
}
