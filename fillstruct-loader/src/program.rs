//! Loading a pattern's packages and everything their types depend on.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use camino::{Utf8Path, Utf8PathBuf};
use fillstruct_syntax::ParseError;
use fs_err as fs;
use tracing::{debug, warn};

use crate::constraint;
use crate::env::GoEnv;
use crate::error::LoadError;
use crate::module::{module_cache_dir, GoModule, Replacement};
use crate::package::{default_name, Package, PackageSource, SourceFile};
use crate::pattern::{package_files, Pattern};
use crate::scope::FileScope;
use crate::stubs;

/// A file that could not be parsed.
#[derive(Debug, Clone)]
pub struct BrokenFile {
    pub path: Utf8PathBuf,
    pub error: ParseError,
}

/// A file selected by the pattern.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileRef {
    pub package: String,
    pub index: usize,
}

/// Every package needed to resolve the types used by the pattern's files.
///
/// Immutable once loading is done, so it can be shared across workers.
#[derive(Debug)]
pub struct Program {
    module: GoModule,
    env: GoEnv,
    packages: BTreeMap<String, Package>,
    roots: Vec<FileRef>,
    broken: Vec<BrokenFile>,
    missing: BTreeSet<String>,
}

impl Program {
    /// Load the packages matched by `pattern`, relative to `cwd`, with the
    /// toolchain locations found in the environment.
    pub fn load(pattern: &str, cwd: &Utf8Path) -> Result<Self, LoadError> {
        Self::load_with(pattern, cwd, &GoEnv::from_env())
    }

    /// Load with explicit toolchain locations.
    pub fn load_with(pattern: &str, cwd: &Utf8Path, env: &GoEnv) -> Result<Self, LoadError> {
        let parsed = Pattern::parse(pattern, cwd)?;
        let module = GoModule::discover(parsed.dir())?;
        let selected = parsed.files()?;
        if selected.is_empty() {
            return Err(LoadError::NoFiles {
                pattern: pattern.to_string(),
            });
        }
        let candidates = match &parsed {
            // Sibling files declare types the selected file may use.
            Pattern::File(_) => package_files(parsed.dir())?,
            _ => selected.clone(),
        };

        let mut program = Program {
            module,
            env: env.clone(),
            packages: BTreeMap::new(),
            roots: Vec::new(),
            broken: Vec::new(),
            missing: BTreeSet::new(),
        };

        let mut groups: BTreeMap<String, (String, Vec<SourceFile>)> = BTreeMap::new();
        for path in candidates {
            let text = fs::read_to_string(&path)?;
            match SourceFile::parse(path.clone(), text) {
                Ok(file) => {
                    let key = program.package_key(&file);
                    groups
                        .entry(key)
                        .or_insert_with(|| (file.package_name.clone(), Vec::new()))
                        .1
                        .push(file);
                }
                Err(error) => {
                    warn!(%path, %error, "skipping file that does not parse");
                    if selected.contains(&path) {
                        program.broken.push(BrokenFile { path, error });
                    }
                }
            }
        }

        let mut imports = Vec::new();
        for (key, (name, files)) in groups {
            for (index, file) in files.iter().enumerate() {
                if selected.contains(&file.path) {
                    program.roots.push(FileRef {
                        package: key.clone(),
                        index,
                    });
                }
                imports.extend(file.imports.iter().map(|i| i.path.clone()));
            }
            debug!(package = %key, files = files.len(), "loaded pattern package");
            program.packages.insert(
                key.clone(),
                Package::new(key, name, files, PackageSource::Module),
            );
        }
        for path in imports {
            program.load_package(&path)?;
        }

        let mut roots = std::mem::take(&mut program.roots);
        roots.sort_by(|a, b| program.file_path(a).cmp(&program.file_path(b)));
        program.roots = roots;
        Ok(program)
    }

    fn package_key(&self, file: &SourceFile) -> String {
        let dir = file.path.parent().unwrap_or(&file.path);
        let base = self
            .module
            .import_path(dir)
            .unwrap_or_else(|| file.package_name.clone());
        if file.package_name.ends_with("_test") {
            format!("{base}_test")
        } else {
            base
        }
    }

    /// Load `import_path` and the packages its type declarations use, if
    /// they are not loaded yet. Returns whether the package is available
    /// afterwards.
    pub fn load_package(&mut self, import_path: &str) -> Result<bool, LoadError> {
        let mut queue = VecDeque::from([import_path.to_string()]);
        while let Some(path) = queue.pop_front() {
            if self.packages.contains_key(&path) || self.missing.contains(&path) {
                continue;
            }
            match self.read_package(&path)? {
                Some(package) => {
                    debug!(package = %path, source = ?package.source, "loaded dependency");
                    queue.extend(package.type_imports());
                    self.packages.insert(path, package);
                }
                None => {
                    debug!(package = %path, "import not available, its types stay unresolved");
                    self.missing.insert(path);
                }
            }
        }
        Ok(self.packages.contains_key(import_path))
    }

    /// Find a package the way the `go` command does: the main module, its
    /// `vendor/` directory, the module cache for required modules, then the
    /// standard library. Builtin declarations cover packages found nowhere.
    fn read_package(&self, path: &str) -> Result<Option<Package>, LoadError> {
        if path == "C" {
            return Ok(None);
        }
        for (dir, source) in self.candidate_dirs(path) {
            if let Some(package) = self.read_dir(&dir, path, source)? {
                return Ok(Some(package));
            }
        }
        let Some(text) = stubs::source(path) else {
            return Ok(None);
        };
        let file = SourceFile::parse(
            Utf8PathBuf::from(format!("$GOROOT/src/{path}/stub.go")),
            text.to_string(),
        )
        .map_err(|source| LoadError::Stub {
            path: path.to_string(),
            source,
        })?;
        let name = file.package_name.clone();
        Ok(Some(Package::new(
            path.to_string(),
            name,
            vec![file],
            PackageSource::Stub,
        )))
    }

    fn candidate_dirs(&self, path: &str) -> Vec<(Utf8PathBuf, PackageSource)> {
        let mut dirs = Vec::new();
        if let Some(dir) = self.module.dir_of(path) {
            dirs.push((dir, PackageSource::Module));
            return dirs;
        }
        if is_std(path) {
            dirs.extend(self.env.std_dir(path).map(|d| (d, PackageSource::GoRoot)));
            return dirs;
        }
        dirs.push((
            self.module.root.join("vendor").join(path),
            PackageSource::Vendor,
        ));
        if let Some((module, version, rest)) = self.module.requirement_for(path) {
            let root = match self.module.replaces.get(module) {
                Some(Replacement::Dir(dir)) => Some(dir.clone()),
                Some(Replacement::Module {
                    path: replacement,
                    version,
                }) => self
                    .env
                    .module_cache()
                    .map(|cache| module_cache_dir(cache, replacement, version)),
                None => self
                    .env
                    .module_cache()
                    .map(|cache| module_cache_dir(cache, module, version)),
            };
            dirs.extend(root.map(|root| (join_rel(&root, rest), PackageSource::ModCache)));
        }
        // Packages the standard library vendors for itself.
        dirs.extend(
            self.env
                .std_dir(&format!("vendor/{path}"))
                .map(|d| (d, PackageSource::GoRoot)),
        );
        dirs
    }

    /// Parse the buildable files of one directory. Files of another package
    /// clause (a stray `main` or documentation file) lose to the majority.
    fn read_dir(
        &self,
        dir: &Utf8Path,
        path: &str,
        source: PackageSource,
    ) -> Result<Option<Package>, LoadError> {
        if !dir.is_dir() {
            return Ok(None);
        }
        let mut by_name: BTreeMap<String, Vec<SourceFile>> = BTreeMap::new();
        for file in package_files(dir)? {
            let text = fs::read_to_string(&file)?;
            let Some(name) = file.file_name() else {
                continue;
            };
            if !constraint::selects(&self.env, name, &text) {
                debug!(path = %file, "file excluded by build constraints");
                continue;
            }
            let parsed = SourceFile::parse_lenient(file.clone(), text);
            by_name
                .entry(parsed.package_name.clone())
                .or_default()
                .push(parsed);
        }
        let Some((name, files)) = by_name.into_iter().max_by_key(|(_, files)| files.len()) else {
            return Ok(None);
        };
        debug!(package = %path, %dir, ?source, files = files.len(), "read package directory");
        Ok(Some(Package::new(path.to_string(), name, files, source)))
    }

    pub fn module(&self) -> &GoModule {
        &self.module
    }

    pub fn env(&self) -> &GoEnv {
        &self.env
    }

    /// Files selected by the pattern, sorted by path.
    pub fn roots(&self) -> &[FileRef] {
        &self.roots
    }

    /// Selected files that failed to parse.
    pub fn broken(&self) -> &[BrokenFile] {
        &self.broken
    }

    pub fn package(&self, path: &str) -> Option<&Package> {
        self.packages.get(path)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn file(&self, file: &FileRef) -> Option<&SourceFile> {
        self.packages.get(&file.package)?.files.get(file.index)
    }

    fn file_path(&self, file: &FileRef) -> Option<&Utf8Path> {
        self.file(file).map(|f| f.path.as_path())
    }

    /// Type information for one loaded file.
    pub fn scope(&self, file: &FileRef) -> Option<FileScope<'_>> {
        let package = self.packages.get(&file.package)?;
        package.files.get(file.index)?;
        Some(FileScope::new(self, package, file.index))
    }

    /// Name a package is referred to by when imported without an alias.
    pub fn package_name(&self, import_path: &str) -> String {
        match self.packages.get(import_path) {
            Some(package) => package.name.clone(),
            None => default_name(import_path),
        }
    }
}

/// Standard-library import paths have no dot in their first element.
fn is_std(path: &str) -> bool {
    path.split('/').next().is_some_and(|first| !first.contains('.'))
}

fn join_rel(root: &Utf8Path, rest: &str) -> Utf8PathBuf {
    if rest.is_empty() {
        root.to_owned()
    } else {
        root.join(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_paths_have_no_domain() {
        assert!(is_std("net/netip"));
        assert!(is_std("time"));
        assert!(!is_std("github.com/google/uuid"));
        assert!(!is_std("gopkg.in/yaml.v3"));
    }
}
