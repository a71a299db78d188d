//! Resolution of type expressions to [`Type`] values.

use fillstruct_syntax::ast::{self, AstNode};
use fillstruct_syntax::{SyntaxKind, SyntaxNode};
use fillstruct_types::{
    ArrayLen, BasicKind, ChanDir, LocalSite, StructField, StructType, Type, TypeIdentity,
};

use crate::package::{parse_int, Import, Package, TypeDecl};
use crate::program::Program;

/// Bound on alias and named-type chains.
const MAX_DEPTH: u8 = 32;

/// Where a type expression is written: a file of a package, plus the type
/// arguments bound while resolving a generic declaration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Site<'a> {
    pub(crate) package: &'a Package,
    pub(crate) file: usize,
    pub(crate) bindings: &'a [(String, Type)],
}

impl<'a> Site<'a> {
    pub(crate) fn new(package: &'a Package, file: usize) -> Self {
        Self {
            package,
            file,
            bindings: &[],
        }
    }

    fn bound(&self, name: &str) -> Option<&'a Type> {
        self.bindings.iter().find(|(n, _)| n == name).map(|(_, ty)| ty)
    }
}

fn bind(params: &[String], args: &[Type]) -> Vec<(String, Type)> {
    params.iter().cloned().zip(args.iter().cloned()).collect()
}

impl Program {
    /// Underlying shape of a named type instantiated with `args`. Named
    /// chains are followed; generic types need one argument per parameter.
    pub fn underlying(&self, id: &TypeIdentity, args: &[Type]) -> Option<Type> {
        self.underlying_at(id, args, 0)
    }

    fn underlying_at(&self, id: &TypeIdentity, args: &[Type], depth: u8) -> Option<Type> {
        if depth > MAX_DEPTH {
            return None;
        }
        if id.is_universe() {
            return (id.name == "error").then(|| Type::Interface {
                text: "interface{ Error() string }".to_string(),
            });
        }
        let package = self.package(&id.module_path)?;
        let resolved = match &id.local {
            Some(site) => self.local_underlying(package, site, depth)?,
            None => {
                let decl = package.types.get(&id.name)?;
                if decl.params.len() != args.len() {
                    return Some(Type::unresolved(id.to_string()));
                }
                let bindings = bind(&decl.params, args);
                let site = Site {
                    package,
                    file: decl.file,
                    bindings: &bindings,
                };
                self.resolve_in(site, &decl.syntax(), depth + 1)
            }
        };
        match resolved {
            Type::Named { id: next, args } => self.underlying_at(&next, &args, depth + 1),
            other => Some(other),
        }
    }

    /// The declared type of a function-local type, resolved inside its
    /// function so it can use the other local types in scope.
    fn local_underlying(&self, package: &Package, local: &LocalSite, depth: u8) -> Option<Type> {
        let file = package.file_index(&local.file)?;
        let spec = package.files[file]
            .syntax()
            .descendants()
            .filter_map(ast::TypeSpec::cast)
            .find(|spec| u32::from(spec.syntax().text_range().start()) == local.offset)?;
        let ty = spec.ty()?;
        Some(self.resolve_in(Site::new(package, file), &ty, depth + 1))
    }

    /// Resolve `node` as written at `site`.
    pub(crate) fn resolve_in(&self, site: Site<'_>, node: &SyntaxNode, depth: u8) -> Type {
        let written = || Type::unresolved(node.to_string());
        if depth > MAX_DEPTH {
            return written();
        }
        let sub = |n: &SyntaxNode| self.resolve_in(site, n, depth + 1);
        let nodes: Vec<SyntaxNode> = node.children().collect();
        match node.kind() {
            SyntaxKind::NAME => match ast::ident_text(node) {
                Some(name) => self.resolve_name(site, node, &name, Vec::new(), depth),
                None => written(),
            },
            SyntaxKind::TYPE_NAME => {
                let args: Vec<Type> = nodes
                    .iter()
                    .filter(|n| n.kind() == SyntaxKind::TYPE_ARGS)
                    .flat_map(|list| list.children())
                    .map(|arg| sub(&arg))
                    .collect();
                let idents: Vec<String> = ast::child_tokens(node, SyntaxKind::IDENT)
                    .map(|t| t.text().to_string())
                    .collect();
                match idents.as_slice() {
                    [name] => self.resolve_name(site, node, name, args, depth),
                    [qualifier, name] => {
                        self.resolve_qualified(site, node, qualifier, name, args, depth)
                    }
                    _ => written(),
                }
            }
            SyntaxKind::SELECTOR_EXPR => self.resolve_selector(site, node, Vec::new(), depth),
            // `Pair[string, int]` in expression position.
            SyntaxKind::INDEX_EXPR => match nodes.split_first() {
                Some((base, args)) => {
                    let args: Vec<Type> = args.iter().map(sub).collect();
                    match base.kind() {
                        SyntaxKind::NAME => match ast::ident_text(base) {
                            Some(name) => self.resolve_name(site, node, &name, args, depth),
                            None => written(),
                        },
                        SyntaxKind::SELECTOR_EXPR => self.resolve_selector(site, base, args, depth),
                        _ => written(),
                    }
                }
                None => written(),
            },
            SyntaxKind::POINTER_TYPE => match nodes.as_slice() {
                [elem] => Type::pointer(sub(elem)),
                _ => written(),
            },
            SyntaxKind::UNARY_EXPR if ast::child_token(node, SyntaxKind::STAR).is_some() => {
                match nodes.as_slice() {
                    [elem] => Type::pointer(sub(elem)),
                    _ => written(),
                }
            }
            SyntaxKind::PAREN_TYPE | SyntaxKind::PAREN_EXPR => match nodes.as_slice() {
                [inner] => sub(inner),
                _ => written(),
            },
            SyntaxKind::SLICE_TYPE => match nodes.last() {
                Some(elem) => Type::slice(sub(elem)),
                None => written(),
            },
            SyntaxKind::ARRAY_TYPE => match nodes.as_slice() {
                [len, elem] => Type::Array {
                    len: self.array_len(site, len),
                    elem: Box::new(sub(elem)),
                },
                [elem] => Type::Array {
                    len: ArrayLen::Expr("...".to_string()),
                    elem: Box::new(sub(elem)),
                },
                _ => written(),
            },
            SyntaxKind::MAP_TYPE => match nodes.as_slice() {
                [key, value] => Type::Map {
                    key: Box::new(sub(key)),
                    value: Box::new(sub(value)),
                },
                _ => written(),
            },
            SyntaxKind::CHAN_TYPE => {
                let first = node
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .find(|t| !t.kind().is_trivia())
                    .map(|t| t.kind());
                let dir = match first {
                    Some(SyntaxKind::ARROW) => ChanDir::Recv,
                    _ if ast::child_token(node, SyntaxKind::ARROW).is_some() => ChanDir::Send,
                    _ => ChanDir::Both,
                };
                match nodes.last() {
                    Some(elem) => Type::Chan {
                        dir,
                        elem: Box::new(sub(elem)),
                    },
                    None => written(),
                }
            }
            SyntaxKind::FUNC_TYPE => self.func_type(site, &nodes, depth),
            SyntaxKind::INTERFACE_TYPE => Type::Interface {
                text: node.to_string(),
            },
            SyntaxKind::STRUCT_TYPE => Type::Struct(self.struct_type(site, node, depth)),
            _ => written(),
        }
    }

    fn resolve_selector(
        &self,
        site: Site<'_>,
        node: &SyntaxNode,
        args: Vec<Type>,
        depth: u8,
    ) -> Type {
        let qualifier = node.first_child().as_ref().and_then(ast::ident_text);
        let name = ast::child_tokens(node, SyntaxKind::IDENT).last();
        match (qualifier, name) {
            (Some(qualifier), Some(name)) => {
                self.resolve_qualified(site, node, &qualifier, name.text(), args, depth)
            }
            _ => Type::unresolved(node.to_string()),
        }
    }

    /// An unqualified name: a bound type parameter, a type declared in an
    /// enclosing function, a package-level or dot-imported type, or a
    /// predeclared one.
    fn resolve_name(
        &self,
        site: Site<'_>,
        node: &SyntaxNode,
        name: &str,
        args: Vec<Type>,
        depth: u8,
    ) -> Type {
        if args.is_empty() {
            if let Some(ty) = site.bound(name) {
                return ty.clone();
            }
        }
        if let Some(spec) = local_type(node, name) {
            return self.local(site, &spec, name, args, depth);
        }
        if let Some(decl) = site.package.types.get(name) {
            return self.declared(site.package, node, name, decl, args, depth);
        }
        for import in dot_imports(site) {
            if let Some(dep) = self.package(&import.path) {
                if let Some(decl) = dep.types.get(name) {
                    return self.declared(dep, node, name, decl, args, depth);
                }
            }
        }
        match universe(name) {
            Some(ty) if args.is_empty() => ty,
            _ => Type::unresolved(node.to_string()),
        }
    }

    fn local(
        &self,
        site: Site<'_>,
        spec: &ast::TypeSpec,
        name: &str,
        args: Vec<Type>,
        depth: u8,
    ) -> Type {
        let unresolved = || Type::unresolved(name);
        if !args.is_empty() || !spec.type_params().is_empty() {
            return unresolved();
        }
        if spec.is_alias() {
            return match spec.ty() {
                Some(ty) => self.resolve_in(Site::new(site.package, site.file), &ty, depth + 1),
                None => unresolved(),
            };
        }
        let Some(file) = site.package.files.get(site.file) else {
            return unresolved();
        };
        let offset = u32::from(spec.syntax().text_range().start());
        Type::named(TypeIdentity::local(
            site.package.path.as_str(),
            name,
            file.path.clone(),
            offset,
        ))
    }

    fn resolve_qualified(
        &self,
        site: Site<'_>,
        node: &SyntaxNode,
        qualifier: &str,
        name: &str,
        args: Vec<Type>,
        depth: u8,
    ) -> Type {
        let Some(import) = self.import_named(site.package, site.file, qualifier) else {
            return Type::unresolved(node.to_string());
        };
        if import.path == "unsafe" && name == "Pointer" {
            return Type::basic(BasicKind::UnsafePointer);
        }
        let Some(dep) = self.package(&import.path) else {
            return Type::unresolved(node.to_string());
        };
        match dep.types.get(name) {
            Some(decl) => self.declared(dep, node, name, decl, args, depth),
            None => Type::unresolved(node.to_string()),
        }
    }

    /// A reference to a package-level declaration. Generic types must be
    /// given one argument per parameter.
    fn declared(
        &self,
        package: &Package,
        node: &SyntaxNode,
        name: &str,
        decl: &TypeDecl,
        args: Vec<Type>,
        depth: u8,
    ) -> Type {
        if decl.params.len() != args.len() {
            return Type::unresolved(node.to_string());
        }
        if decl.alias {
            let bindings = bind(&decl.params, &args);
            let site = Site {
                package,
                file: decl.file,
                bindings: &bindings,
            };
            return self.resolve_in(site, &decl.syntax(), depth + 1);
        }
        Type::instantiated(TypeIdentity::new(package.path.as_str(), name), args)
    }

    /// The import a qualifier refers to in one file.
    pub(crate) fn import_named<'a>(
        &self,
        package: &'a Package,
        file: usize,
        qualifier: &str,
    ) -> Option<&'a Import> {
        package.files.get(file)?.imports.iter().find(|import| {
            match import.alias.as_deref() {
                Some(".") | Some("_") => false,
                Some(alias) => alias == qualifier,
                None => self.package_name(&import.path) == qualifier,
            }
        })
    }

    fn array_len(&self, site: Site<'_>, len: &SyntaxNode) -> ArrayLen {
        let known = match len.kind() {
            SyntaxKind::BASIC_LIT => len.first_token().and_then(|t| parse_int(t.text())),
            SyntaxKind::NAME => {
                ast::ident_text(len).and_then(|name| site.package.consts.get(&name).copied())
            }
            SyntaxKind::SELECTOR_EXPR => {
                let qualifier = len.first_child().as_ref().and_then(ast::ident_text);
                let name = ast::child_tokens(len, SyntaxKind::IDENT).last();
                qualifier
                    .and_then(|q| self.import_named(site.package, site.file, &q))
                    .and_then(|import| self.package(&import.path))
                    .zip(name)
                    .and_then(|(dep, name)| dep.consts.get(name.text()).copied())
            }
            SyntaxKind::PAREN_EXPR => {
                return match len.first_child() {
                    Some(inner) => self.array_len(site, &inner),
                    None => ArrayLen::Expr(len.to_string()),
                };
            }
            _ => None,
        };
        match known {
            Some(n) => ArrayLen::Known(n),
            None => ArrayLen::Expr(len.to_string()),
        }
    }

    fn struct_type(&self, site: Site<'_>, node: &SyntaxNode, depth: u8) -> StructType {
        let mut fields = Vec::new();
        for decl in ast::child_nodes::<ast::FieldDecl>(node) {
            let Some(ty_node) = decl.ty() else {
                continue;
            };
            let ty = self.resolve_in(site, &ty_node, depth + 1);
            if decl.is_embedded() {
                fields.push(StructField {
                    name: embedded_name(&ty_node).unwrap_or_default(),
                    ty,
                    embedded: true,
                });
                continue;
            }
            for name in decl.names() {
                fields.push(StructField {
                    name: name.text().to_string(),
                    ty: ty.clone(),
                    embedded: false,
                });
            }
        }
        StructType { fields }
    }

    fn func_type(&self, site: Site<'_>, nodes: &[SyntaxNode], depth: u8) -> Type {
        let mut lists = nodes.iter();
        let (params, variadic) = match lists.next() {
            Some(list) => self.params(site, list, depth),
            None => (Vec::new(), false),
        };
        let results = match lists.next() {
            Some(list) if list.kind() == SyntaxKind::PARAM_LIST => {
                self.params(site, list, depth).0
            }
            Some(single) => vec![self.resolve_in(site, single, depth + 1)],
            None => Vec::new(),
        };
        Type::Func {
            params,
            results,
            variadic,
        }
    }

    /// Parameter types of a list. In a list with names, a lone identifier is a
    /// name sharing the type of the next named parameter.
    fn params(&self, site: Site<'_>, list: &SyntaxNode, depth: u8) -> (Vec<Type>, bool) {
        let params: Vec<SyntaxNode> = list
            .children()
            .filter(|n| n.kind() == SyntaxKind::PARAM)
            .collect();
        let any_named = params.iter().any(is_named);
        let variadic = params
            .last()
            .is_some_and(|p| ast::child_token(p, SyntaxKind::ELLIPSIS).is_some());

        let mut types = Vec::with_capacity(params.len());
        let mut shared: Option<Type> = None;
        for (i, param) in params.iter().enumerate().rev() {
            let Some(ty_node) = param.first_child() else {
                continue;
            };
            let ty = if is_named(param) || !any_named {
                let mut ty = self.resolve_in(site, &ty_node, depth + 1);
                if variadic && i + 1 == params.len() {
                    ty = Type::slice(ty);
                }
                shared = Some(ty.clone());
                ty
            } else {
                shared
                    .clone()
                    .unwrap_or_else(|| Type::unresolved(ty_node.to_string()))
            };
            types.push(ty);
        }
        types.reverse();
        (types, variadic)
    }
}

fn is_named(param: &SyntaxNode) -> bool {
    ast::child_token(param, SyntaxKind::IDENT).is_some()
}

/// The innermost `type name ...` declared in a function body before `node`.
fn local_type(node: &SyntaxNode, name: &str) -> Option<ast::TypeSpec> {
    let at = node.text_range().start();
    node.ancestors()
        .filter(|scope| matches!(scope.kind(), SyntaxKind::BLOCK | SyntaxKind::CASE_CLAUSE))
        .find_map(|scope| {
            scope
                .children()
                .filter(|stmt| {
                    stmt.kind() == SyntaxKind::DECL_STMT && stmt.text_range().start() < at
                })
                .flat_map(|stmt| stmt.children())
                .filter(|decl| decl.kind() == SyntaxKind::TYPE_DECL)
                .flat_map(|decl| ast::child_nodes::<ast::TypeSpec>(&decl))
                .filter(|spec| spec.name().is_some_and(|n| n.text() == name))
                .last()
        })
}

fn dot_imports<'a>(site: Site<'a>) -> impl Iterator<Item = &'a Import> {
    site.package
        .files
        .get(site.file)
        .into_iter()
        .flat_map(|f| f.imports.iter())
        .filter(|i| i.alias.as_deref() == Some("."))
}

fn universe(name: &str) -> Option<Type> {
    if let Some(kind) = BasicKind::from_name(name) {
        return Some(Type::basic(kind));
    }
    match name {
        "error" => Some(Type::named(TypeIdentity::universe("error"))),
        "any" | "comparable" => Some(Type::Interface {
            text: name.to_string(),
        }),
        _ => None,
    }
}

/// Field name of an embedded type: its type name without pointer or package.
fn embedded_name(ty: &SyntaxNode) -> Option<String> {
    match ty.kind() {
        SyntaxKind::POINTER_TYPE => embedded_name(&ty.first_child()?),
        SyntaxKind::TYPE_NAME => ast::child_tokens(ty, SyntaxKind::IDENT)
            .last()
            .map(|t| t.text().to_string()),
        _ => None,
    }
}
