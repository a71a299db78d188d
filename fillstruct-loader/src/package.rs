//! Parsed files and the package-level declarations indexed from them.

use std::collections::{BTreeMap, BTreeSet};

use camino::Utf8PathBuf;
use fillstruct_syntax::ast::{self, AstNode};
use fillstruct_syntax::{GreenNode, ParseError, SyntaxKind, SyntaxNode};
use tracing::debug;

/// One `import` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Explicit local name, including `.` and `_`.
    pub alias: Option<String>,
    pub path: String,
}

/// A parsed Go file. The tree is kept green so a loaded program can be
/// shared between threads; [`SourceFile::syntax`] gives a navigable root.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: Utf8PathBuf,
    pub text: String,
    pub green: GreenNode,
    pub package_name: String,
    pub imports: Vec<Import>,
}

impl SourceFile {
    /// Parse a file that is going to be rewritten; any syntax error fails.
    pub fn parse(path: Utf8PathBuf, text: String) -> Result<Self, ParseError> {
        let tree = fillstruct_syntax::parse_file(&text)?;
        Ok(Self::from_tree(path, text, tree))
    }

    /// Parse a dependency file. Declarations that do not parse are skipped,
    /// the rest stays usable.
    pub fn parse_lenient(path: Utf8PathBuf, text: String) -> Self {
        let parse = fillstruct_syntax::parse(&text);
        if let Some(error) = parse.errors().first() {
            debug!(%path, %error, errors = parse.errors().len(), "dependency file has syntax errors");
        }
        let tree = parse.syntax();
        Self::from_tree(path, text, tree)
    }

    fn from_tree(path: Utf8PathBuf, text: String, tree: SyntaxNode) -> Self {
        let (package_name, imports) = match ast::SourceFile::cast(tree.clone()) {
            Some(file) => (
                file.package_name().unwrap_or_default(),
                file.imports()
                    .filter_map(|spec| {
                        Some(Import {
                            alias: spec.alias(),
                            path: spec.path()?,
                        })
                    })
                    .collect(),
            ),
            None => (String::new(), Vec::new()),
        };
        Self {
            path,
            text,
            green: tree.green().into_owned(),
            package_name,
            imports,
        }
    }

    /// A fresh immutable root over the file's tree.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn is_test(&self) -> bool {
        self.path.as_str().ends_with("_test.go")
    }

    fn ast(&self) -> Option<ast::SourceFile> {
        ast::SourceFile::cast(self.syntax())
    }
}

/// A package-level `type` declaration.
#[derive(Debug, Clone)]
pub(crate) struct TypeDecl {
    /// Index of the declaring file in [`Package::files`].
    pub(crate) file: usize,
    pub(crate) ty: GreenNode,
    /// Type parameter names; empty unless the type is generic.
    pub(crate) params: Vec<String>,
    pub(crate) alias: bool,
}

impl TypeDecl {
    pub(crate) fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.ty.clone())
    }
}

/// Where a package's files were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageSource {
    /// The module being completed.
    Module,
    /// The module's `vendor/` directory.
    Vendor,
    /// A required module in the module cache, or a `replace` directory.
    ModCache,
    /// `$GOROOT/src`.
    GoRoot,
    /// Builtin declarations, used when the package cannot be found on disk.
    Stub,
}

#[derive(Debug, Clone)]
pub struct Package {
    /// Import path; external test packages carry a `_test` suffix.
    pub path: String,
    pub name: String,
    pub files: Vec<SourceFile>,
    pub source: PackageSource,
    pub(crate) types: BTreeMap<String, TypeDecl>,
    pub(crate) consts: BTreeMap<String, u64>,
}

impl Package {
    pub(crate) fn new(
        path: String,
        name: String,
        files: Vec<SourceFile>,
        source: PackageSource,
    ) -> Self {
        let mut package = Package {
            path,
            name,
            files,
            source,
            types: BTreeMap::new(),
            consts: BTreeMap::new(),
        };
        package.index();
        package
    }

    pub fn declares(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Index of the file at `path`.
    pub(crate) fn file_index(&self, path: &camino::Utf8Path) -> Option<usize> {
        self.files.iter().position(|f| f.path == path)
    }

    fn index(&mut self) {
        let mut types = BTreeMap::new();
        let mut consts = BTreeMap::new();
        for (index, file) in self.files.iter().enumerate() {
            let Some(tree) = file.ast() else {
                continue;
            };
            for spec in tree.type_specs() {
                if let Some((name, decl)) = type_decl(index, &spec) {
                    types.entry(name).or_insert(decl);
                }
            }
            for spec in tree.const_specs() {
                index_consts(&spec, &mut consts);
            }
        }
        self.types = types;
        self.consts = consts;
    }

    /// Imports that the package's type declarations refer to. Dependencies
    /// only need these to resolve struct layouts.
    pub(crate) fn type_imports(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for (index, file) in self.files.iter().enumerate() {
            let mut qualifiers: BTreeSet<String> = self
                .types
                .values()
                .filter(|decl| decl.file == index)
                .flat_map(|decl| qualifiers_in(&decl.syntax()))
                .collect();
            let mut unmatched = Vec::new();
            for import in &file.imports {
                let name = match import.alias.as_deref() {
                    Some("_") => continue,
                    Some(".") => {
                        out.insert(import.path.clone());
                        continue;
                    }
                    Some(alias) => alias.to_string(),
                    None => default_name(&import.path),
                };
                if qualifiers.remove(&name) {
                    out.insert(import.path.clone());
                } else if import.alias.is_none() {
                    unmatched.push(&import.path);
                }
            }
            // A package name that differs from its path: keep every
            // candidate rather than guess.
            if !qualifiers.is_empty() {
                out.extend(unmatched.into_iter().cloned());
            }
        }
        out
    }
}

/// Package qualifiers used in a type expression: `pkg.T` and `[pkg.N]`.
fn qualifiers_in(ty: &SyntaxNode) -> Vec<String> {
    ty.descendants()
        .filter_map(|node| match node.kind() {
            SyntaxKind::TYPE_NAME => {
                let idents: Vec<_> = ast::child_tokens(&node, SyntaxKind::IDENT).collect();
                (idents.len() == 2).then(|| idents[0].text().to_string())
            }
            SyntaxKind::SELECTOR_EXPR => node.first_child().as_ref().and_then(ast::ident_text),
            _ => None,
        })
        .collect()
}

fn type_decl(file: usize, spec: &ast::TypeSpec) -> Option<(String, TypeDecl)> {
    let name = spec.name()?.text().to_string();
    let ty = spec.ty()?;
    Some((
        name,
        TypeDecl {
            file,
            ty: ty.green().into_owned(),
            params: spec.type_params(),
            alias: spec.is_alias(),
        },
    ))
}

/// Record `const X = 4` style integer constants; anything computed is skipped.
fn index_consts(spec: &ast::ValueSpec, consts: &mut BTreeMap<String, u64>) {
    for (name, value) in spec.names().into_iter().zip(spec.values()) {
        let known = match value.kind() {
            SyntaxKind::BASIC_LIT => value.first_token().and_then(|t| parse_int(t.text())),
            SyntaxKind::NAME => ast::ident_text(&value).and_then(|n| consts.get(&n).copied()),
            _ => None,
        };
        if let Some(known) = known {
            consts.insert(name, known);
        }
    }
}

/// Name a package is referred to by when its clause is not known: the last
/// path element, skipping a major version suffix.
pub(crate) fn default_name(import_path: &str) -> String {
    let mut segments = import_path.rsplit('/');
    let last = segments.next().unwrap_or(import_path);
    let is_major_version =
        last.len() > 1 && last.starts_with('v') && last[1..].chars().all(|c| c.is_ascii_digit());
    match segments.next() {
        Some(prev) if is_major_version => prev.to_string(),
        _ => last.to_string(),
    }
}

/// Parse a Go integer literal.
pub(crate) fn parse_int(text: &str) -> Option<u64> {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();
    let (radix, body) = if let Some(hex) = lower.strip_prefix("0x") {
        (16, hex)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (2, bin)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (8, oct)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };
    u64::from_str_radix(body, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(text: &str) -> SourceFile {
        SourceFile::parse(Utf8PathBuf::from("/m/a.go"), text.to_string()).expect("parse")
    }

    fn package(files: Vec<SourceFile>) -> Package {
        Package::new("example.com/p".into(), "p".into(), files, PackageSource::Module)
    }

    #[test]
    fn reads_package_clause_and_imports() {
        let f = file(
            "package models\n\nimport (\n\t\"time\"\n\tx \"example.com/m/x\"\n\t. \"example.com/m/dot\"\n\t_ \"embed\"\n)\n",
        );
        assert_eq!(f.package_name, "models");
        assert_eq!(
            f.imports,
            vec![
                Import {
                    alias: None,
                    path: "time".into()
                },
                Import {
                    alias: Some("x".into()),
                    path: "example.com/m/x".into()
                },
                Import {
                    alias: Some(".".into()),
                    path: "example.com/m/dot".into()
                },
                Import {
                    alias: Some("_".into()),
                    path: "embed".into()
                },
            ]
        );
        assert!(!f.is_test());
        assert_eq!(f.syntax().to_string(), f.text);
    }

    #[test]
    fn indexes_types_and_integer_constants() {
        let f = file(
            "package p\n\nconst (\n\tSize = 4\n\tAlias = Size\n\tHex, Other = 0x10, \"s\"\n)\n\ntype (\n\tA struct{ X int }\n\tB = A\n\tPair[K comparable, V any] struct{ Key K; Val V }\n\tGrid [Size]int\n)\n",
        );
        let pkg = package(vec![f]);
        assert_eq!(pkg.type_names().collect::<Vec<_>>(), vec!["A", "B", "Grid", "Pair"]);
        assert!(pkg.types["B"].alias);
        assert_eq!(pkg.types["Pair"].params, vec!["K".to_string(), "V".to_string()]);
        assert!(pkg.types["A"].params.is_empty());
        assert_eq!(pkg.types["Grid"].syntax().kind(), SyntaxKind::ARRAY_TYPE);
        assert_eq!(pkg.consts.get("Size"), Some(&4));
        assert_eq!(pkg.consts.get("Alias"), Some(&4));
        assert_eq!(pkg.consts.get("Hex"), Some(&16));
        assert_eq!(pkg.consts.get("Other"), None);
    }

    #[test]
    fn lenient_files_keep_the_declarations_that_parse() {
        let f = SourceFile::parse_lenient(
            Utf8PathBuf::from("/goroot/src/p/p.go"),
            "package p\n\nfunc broken( {\n}\n\ntype Kept struct{ A int }\n".to_string(),
        );
        assert_eq!(f.package_name, "p");
        let pkg = package(vec![f]);
        assert!(pkg.declares("Kept"));
    }

    #[test]
    fn only_type_imports_are_followed() {
        let f = file(
            "package p\n\nimport (\n\t\"fmt\"\n\t\"time\"\n\tu \"github.com/google/uuid\"\n\t\"math/bits\"\n)\n\nconst N = bits.UintSize\n\ntype T struct {\n\tAt time.Time\n\tID u.UUID\n}\n\nfunc f() { fmt.Println() }\n",
        );
        let imports: Vec<String> = package(vec![f]).type_imports().into_iter().collect();
        assert_eq!(imports, vec!["github.com/google/uuid".to_string(), "time".to_string()]);
    }

    #[test]
    fn unmatched_qualifiers_keep_every_candidate() {
        let f = file(
            "package p\n\nimport (\n\t\"time\"\n\t\"gopkg.in/yaml.v3\"\n)\n\ntype T struct{ N yaml.Node }\n",
        );
        let imports: Vec<String> = package(vec![f]).type_imports().into_iter().collect();
        assert_eq!(imports, vec!["gopkg.in/yaml.v3".to_string(), "time".to_string()]);
    }

    #[test]
    fn default_names_skip_major_versions() {
        assert_eq!(default_name("net/netip"), "netip");
        assert_eq!(default_name("github.com/acme/widgets/v2"), "widgets");
        assert_eq!(default_name("time"), "time");
    }

    #[test]
    fn parses_integer_literals() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("0x1F"), Some(31));
        assert_eq!(parse_int("0b101"), Some(5));
        assert_eq!(parse_int("0o17"), Some(15));
        assert_eq!(parse_int("017"), Some(15));
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("1.5"), None);
    }
}
