use std::collections::BTreeMap;

use fillstruct_syntax::SyntaxNode;
use fillstruct_types::{Type, TypeIdentity};

use crate::ports::TypeInfo;

pub(crate) const PKG: &str = "example.com/app";

/// In-memory type information keyed by type expression text.
#[derive(Debug, Default)]
pub(crate) struct FakeInfo {
    exprs: BTreeMap<String, Type>,
    decls: BTreeMap<TypeIdentity, Type>,
    imports: BTreeMap<String, String>,
}

impl FakeInfo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Declare `name` in the current package and make its name resolve.
    pub(crate) fn declare(self, name: &str, underlying: Type) -> Self {
        self.declare_in(PKG, name, name, underlying)
    }

    /// Declare `name` in `path`, referenced as `written` from this file.
    pub(crate) fn declare_in(mut self, path: &str, written: &str, name: &str, underlying: Type) -> Self {
        let id = TypeIdentity::new(path, name);
        self.exprs.insert(written.to_string(), Type::named(id.clone()));
        self.decls.insert(id, underlying);
        self
    }

    /// Declare generic `name` and make `written` resolve to the instantiation
    /// with `args`. `underlying` is the already substituted shape.
    pub(crate) fn declare_generic(
        mut self,
        written: &str,
        name: &str,
        args: Vec<Type>,
        underlying: Type,
    ) -> Self {
        let id = TypeIdentity::new(PKG, name);
        self.exprs
            .insert(written.to_string(), Type::instantiated(id.clone(), args));
        self.decls.insert(id, underlying);
        self
    }

    pub(crate) fn expr(mut self, text: &str, ty: Type) -> Self {
        self.exprs.insert(text.to_string(), ty);
        self
    }

    pub(crate) fn import(mut self, qualifier: &str, path: &str) -> Self {
        self.imports.insert(path.to_string(), qualifier.to_string());
        self
    }
}

impl TypeInfo for FakeInfo {
    fn package_path(&self) -> &str {
        PKG
    }

    fn resolve_type(&self, ty: &SyntaxNode) -> Type {
        let text = ty.to_string();
        self.exprs
            .get(&text)
            .cloned()
            .unwrap_or_else(|| Type::unresolved(text))
    }

    /// Declarations are stored already instantiated, so `args` is ignored.
    fn underlying(&self, id: &TypeIdentity, _args: &[Type]) -> Option<Type> {
        self.decls.get(id).cloned()
    }

    fn qualifier(&self, module_path: &str) -> Option<String> {
        if module_path == PKG || module_path.is_empty() {
            return None;
        }
        self.imports.get(module_path).cloned()
    }
}
