//! Turning `--type` and `--default` specifiers into canonical identities.

use fillstruct_domain::TargetSet;
use fillstruct_types::{BasicKind, CustomDefaults, Type, TypeIdentity};
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::program::Program;

/// Resolve every specifier to a struct identity. The first failure aborts.
pub fn resolve_target_types<S: AsRef<str>>(
    program: &mut Program,
    specs: &[S],
) -> Result<TargetSet, ResolveError> {
    let mut ids = Vec::with_capacity(specs.len());
    for spec in specs {
        let spec = spec.as_ref().trim();
        let id = resolve_type_spec(program, spec)?;
        if !matches!(program.underlying(&id, &[]), Some(Type::Struct(_))) {
            return Err(ResolveError::NotAStruct {
                spec: spec.to_string(),
            });
        }
        debug!(%spec, %id, "resolved target type");
        ids.push(id);
    }
    Ok(ids.into_iter().collect())
}

/// Resolve `importpath.TypeName`, `pkgname.TypeName` or a bare `TypeName`
/// to the identity of a declared type.
pub fn resolve_type_spec(program: &mut Program, spec: &str) -> Result<TypeIdentity, ResolveError> {
    let spec = spec.trim();
    let invalid = || ResolveError::InvalidSpec {
        spec: spec.to_string(),
    };
    if spec.is_empty() || spec.contains(char::is_whitespace) {
        return Err(invalid());
    }
    match TypeIdentity::parse(spec) {
        Some(id) => resolve_qualified(program, spec, id),
        None if !spec.contains(['.', '/']) => unique(
            spec,
            program
                .packages()
                .filter(|p| p.declares(spec))
                .map(|p| TypeIdentity::new(p.path.as_str(), spec))
                .collect(),
        ),
        None => Err(invalid()),
    }
}

fn resolve_qualified(
    program: &mut Program,
    spec: &str,
    id: TypeIdentity,
) -> Result<TypeIdentity, ResolveError> {
    let loaded = program
        .load_package(&id.module_path)
        .map_err(|e| ResolveError::Load {
            spec: spec.to_string(),
            message: e.to_string(),
        })?;
    if loaded {
        let declared = program
            .package(&id.module_path)
            .is_some_and(|p| p.declares(&id.name));
        return if declared {
            Ok(id)
        } else {
            Err(ResolveError::TypeNotFound {
                spec: spec.to_string(),
            })
        };
    }

    let suffix = format!("/{}", id.module_path);
    let packages: Vec<_> = program
        .packages()
        .filter(|p| p.name == id.module_path || p.path.ends_with(&suffix))
        .collect();
    if packages.is_empty() {
        return Err(ResolveError::PackageNotFound {
            path: id.module_path,
        });
    }
    unique(
        spec,
        packages
            .into_iter()
            .filter(|p| p.declares(&id.name))
            .map(|p| TypeIdentity::new(p.path.as_str(), id.name.as_str()))
            .collect(),
    )
}

fn unique(spec: &str, mut candidates: Vec<TypeIdentity>) -> Result<TypeIdentity, ResolveError> {
    match candidates.len() {
        0 => Err(ResolveError::TypeNotFound {
            spec: spec.to_string(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(ResolveError::Ambiguous {
            spec: spec.to_string(),
            candidates: candidates.iter().map(ToString::to_string).collect(),
        }),
    }
}

/// Re-key non-basic default overrides by canonical identity. Keys that do
/// not resolve are kept as written.
pub fn normalize_defaults(program: &mut Program, defaults: &CustomDefaults) -> CustomDefaults {
    let mut out = CustomDefaults::new();
    for (key, replacement) in defaults.iter() {
        if BasicKind::from_name(key).is_some() {
            out.insert(key, replacement);
            continue;
        }
        match resolve_type_spec(program, key) {
            Ok(id) => out.insert(id.to_string(), replacement),
            Err(err) => {
                warn!(%key, %err, "default override key did not resolve, keeping it as written");
                out.insert(key, replacement);
            }
        }
    }
    out
}
