use fillstruct_domain::TypeInfo;
use fillstruct_syntax::SyntaxNode;
use fillstruct_types::{Type, TypeIdentity};

use crate::package::{Package, SourceFile};
use crate::program::Program;
use crate::resolve::Site;

/// Type information as seen from one file: its package scope and imports.
#[derive(Debug, Clone, Copy)]
pub struct FileScope<'p> {
    program: &'p Program,
    package: &'p Package,
    file: usize,
}

impl<'p> FileScope<'p> {
    pub(crate) fn new(program: &'p Program, package: &'p Package, file: usize) -> Self {
        Self {
            program,
            package,
            file,
        }
    }

    pub fn file(&self) -> &'p SourceFile {
        &self.package.files[self.file]
    }

    pub fn package(&self) -> &'p Package {
        self.package
    }
}

impl TypeInfo for FileScope<'_> {
    fn package_path(&self) -> &str {
        &self.package.path
    }

    fn resolve_type(&self, ty: &SyntaxNode) -> Type {
        self.program
            .resolve_in(Site::new(self.package, self.file), ty, 0)
    }

    fn underlying(&self, id: &TypeIdentity, args: &[Type]) -> Option<Type> {
        self.program.underlying(id, args)
    }

    fn qualifier(&self, module_path: &str) -> Option<String> {
        if module_path.is_empty() || module_path == self.package.path {
            return None;
        }
        let import = self
            .file()
            .imports
            .iter()
            .find(|import| import.path == module_path);
        match import.and_then(|i| i.alias.as_deref()) {
            Some(".") => None,
            Some(alias) if alias != "_" => Some(alias.to_string()),
            _ => Some(self.program.package_name(module_path)),
        }
    }
}
