#![no_main]

//! Fuzz target for literal completion.
//!
//! Builds a struct declaration and a literal from arbitrary field choices,
//! completes the literal against an in-memory type table and checks that the
//! result parses and is stable under a second pass.

use arbitrary::Arbitrary;
use camino::Utf8Path;
use fillstruct_domain::{fill_source, CanonicalPrinter, FillOptions, TypeInfo, VisibilityMode};
use fillstruct_syntax::SyntaxNode;
use fillstruct_types::{BasicKind, StructField, StructType, Type, TypeIdentity};
use libfuzzer_sys::fuzz_target;

const PKG: &str = "example.com/fuzz";
const NAMES: [&str; 8] = ["Name", "Age", "Tags", "next", "ID", "Ready", "Score", "Parent"];

#[derive(Debug, Arbitrary)]
enum Shape {
    Bool,
    String,
    Int,
    Float64,
    Slice,
    Pointer,
    Map,
}

#[derive(Debug, Arbitrary)]
struct Input {
    fields: Vec<(u8, Shape)>,
    present: Vec<u8>,
    multi_line: bool,
    exported_only: bool,
}

struct Table {
    layout: StructType,
}

impl TypeInfo for Table {
    fn package_path(&self) -> &str {
        PKG
    }

    fn resolve_type(&self, ty: &SyntaxNode) -> Type {
        match ty.to_string().as_str() {
            "T" => Type::named(TypeIdentity::new(PKG, "T")),
            other => Type::unresolved(other),
        }
    }

    fn underlying(&self, id: &TypeIdentity, _args: &[Type]) -> Option<Type> {
        (id.module_path == PKG && id.name == "T").then(|| Type::Struct(self.layout.clone()))
    }

    fn qualifier(&self, _module_path: &str) -> Option<String> {
        None
    }
}

fn field_type(shape: &Shape) -> (Type, &'static str) {
    match shape {
        Shape::Bool => (Type::basic(BasicKind::Bool), "bool"),
        Shape::String => (Type::basic(BasicKind::String), "string"),
        Shape::Int => (Type::basic(BasicKind::Int), "int"),
        Shape::Float64 => (Type::basic(BasicKind::Float64), "float64"),
        Shape::Slice => (Type::slice(Type::basic(BasicKind::Byte)), "[]byte"),
        Shape::Pointer => (Type::pointer(Type::named(TypeIdentity::new(PKG, "T"))), "*T"),
        Shape::Map => (
            Type::Map {
                key: Box::new(Type::basic(BasicKind::String)),
                value: Box::new(Type::basic(BasicKind::Int)),
            },
            "map[string]int",
        ),
    }
}

fuzz_target!(|input: Input| {
    let mut layout = StructType::default();
    let mut decl = String::from("package fuzz\n\ntype T struct {\n");
    for (index, shape) in input.fields.iter().take(NAMES.len()) {
        let name = NAMES[usize::from(*index) % NAMES.len()];
        if layout.fields.iter().any(|f| f.name == name) {
            continue;
        }
        let (ty, written) = field_type(shape);
        decl.push_str(&format!("\t{name} {written}\n"));
        layout.fields.push(StructField {
            name: name.to_string(),
            ty,
            embedded: false,
        });
    }
    decl.push_str("}\n\n");

    let mut keyed = Vec::new();
    for index in &input.present {
        let Some(field) = layout.fields.get(usize::from(*index) % layout.fields.len().max(1)) else {
            break;
        };
        let entry = format!("{}: {}", field.name, placeholder(&field.ty));
        if !keyed.contains(&entry) {
            keyed.push(entry);
        }
    }
    let literal = if input.multi_line {
        let body: String = keyed.iter().map(|e| format!("\t{e},\n")).collect();
        format!("T{{\n{body}}}")
    } else {
        format!("T{{{}}}", keyed.join(", "))
    };
    let source = format!("{decl}var v = {literal}\n");

    let info = Table { layout };
    let options = FillOptions {
        visibility: if input.exported_only {
            VisibilityMode::Exported
        } else {
            VisibilityMode::All
        },
        ..FillOptions::default()
    };
    let path = Utf8Path::new("fuzz.go");
    let Ok(first) = fill_source(path, &source, &info, &options, &CanonicalPrinter) else {
        return;
    };
    let Some(output) = first.output else {
        return;
    };
    let once = String::from_utf8(output).expect("printer emits UTF-8");
    fillstruct_syntax::parse_file(&once).expect("completed file parses");
    let second = fill_source(path, &once, &info, &options, &CanonicalPrinter)
        .expect("completed file completes");
    assert!(!second.changed, "second pass changed:\n{once}");
});

fn placeholder(ty: &Type) -> &'static str {
    match ty {
        Type::Basic {
            basic: BasicKind::Bool,
        } => "true",
        Type::Basic {
            basic: BasicKind::String,
        } => "\"x\"",
        Type::Basic { .. } => "1",
        _ => "nil",
    }
}
