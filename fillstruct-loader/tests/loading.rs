use camino::{Utf8Path, Utf8PathBuf};
use fillstruct_domain::TypeInfo;
use fillstruct_loader::{
    normalize_defaults, resolve_target_types, resolve_type_spec, GoEnv, LoadError, PackageSource,
    Program, ResolveError,
};
use fillstruct_types::{BasicKind, CustomDefaults, Type, TypeIdentity};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const MODELS: &str = r#"package models

import "time"

type Status int

type Address struct {
	Street string
	City   string
}

type User struct {
	Name    string
	Age     int
	Home    Address
	Created time.Time
	Tags    []string
	secret  bool
}

type Alias = User
"#;

const MAIN: &str = r#"package main

import (
	"example.com/app/models"
	m2 "example.com/app/models"
)

func main() {
	_ = models.User{Name: "x"}
	_ = m2.Address{}
}
"#;

fn write(root: &Utf8Path, rel: &str, text: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, text).expect("write");
}

fn module() -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
    write(&root, "go.mod", "module example.com/app\n\ngo 1.22\n");
    write(&root, "models/models.go", MODELS);
    write(&root, "cmd/main.go", MAIN);
    (dir, root)
}

/// Load without any toolchain: only the module and builtin declarations.
fn load(pattern: &str, root: &Utf8Path) -> Result<Program, LoadError> {
    Program::load_with(pattern, root, &GoEnv::default())
}

fn user() -> TypeIdentity {
    TypeIdentity::new("example.com/app/models", "User")
}

#[test]
fn tree_pattern_loads_every_package() {
    let (_dir, root) = module();
    let program = load("./...", &root).expect("load");

    assert_eq!(program.module().path, "example.com/app");
    assert_eq!(program.roots().len(), 2);
    let models = program.package("example.com/app/models").expect("models");
    assert_eq!(models.name, "models");
    assert!(models.declares("User"));
    assert!(program
        .package("time")
        .is_some_and(|p| p.source == PackageSource::Stub));
    assert!(program.broken().is_empty());
}

#[test]
fn resolves_imported_types_from_a_file_scope() {
    let (_dir, root) = module();
    let program = load("cmd", &root).expect("load");
    let main = &program.roots()[0];
    let scope = program.scope(main).expect("scope");

    let expr = fillstruct_syntax::parse_expr("models.User").expect("parse");
    assert_eq!(scope.resolve_type(&expr), Type::named(user()));
    let aliased = fillstruct_syntax::parse_expr("m2.Alias").expect("parse");
    assert_eq!(scope.resolve_type(&aliased), Type::named(user()));

    let Some(Type::Struct(layout)) = scope.underlying(&user(), &[]) else {
        panic!("User is a struct");
    };
    let names: Vec<&str> = layout.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Name", "Age", "Home", "Created", "Tags", "secret"]);
    assert_eq!(
        layout.fields[3].ty,
        Type::named(TypeIdentity::new("time", "Time"))
    );
    assert_eq!(
        layout.fields[2].ty,
        Type::named(TypeIdentity::new("example.com/app/models", "Address"))
    );
}

#[test]
fn qualifiers_follow_the_file_imports() {
    let (_dir, root) = module();
    let program = load("./...", &root).expect("load");
    let main = program
        .roots()
        .iter()
        .find(|r| r.package == "example.com/app/cmd")
        .expect("main file");
    let scope = program.scope(main).expect("scope");

    assert_eq!(scope.package_path(), "example.com/app/cmd");
    assert_eq!(scope.qualifier("example.com/app/cmd"), None);
    assert_eq!(scope.qualifier("example.com/app/models").as_deref(), Some("models"));
    assert_eq!(scope.qualifier("time").as_deref(), Some("time"));
    assert_eq!(
        scope.qualifier("github.com/acme/widgets/v2").as_deref(),
        Some("widgets")
    );
}

#[test]
fn single_file_pattern_sees_sibling_declarations() {
    let (_dir, root) = module();
    write(&root, "models/extra.go", "package models\n\ntype Extra struct{ U User }\n");
    let program = load("models/extra.go", &root).expect("load");

    assert_eq!(program.roots().len(), 1);
    let scope = program.scope(&program.roots()[0]).expect("scope");
    assert_eq!(scope.file().path.file_name(), Some("extra.go"));
    let expr = fillstruct_syntax::parse_expr("User").expect("parse");
    assert_eq!(scope.resolve_type(&expr), Type::named(user()));
}

#[test]
fn broken_files_are_reported_not_fatal() {
    let (_dir, root) = module();
    write(&root, "models/broken.go", "package models\n\ntype Broken struct {\n");
    let program = load("models", &root).expect("load");

    assert_eq!(program.broken().len(), 1);
    assert!(program.broken()[0].path.ends_with("models/broken.go"));
    assert_eq!(program.roots().len(), 1);
}

#[test]
fn missing_module_and_empty_patterns_fail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
    write(&root, "a.go", "package a\n");
    // The temp directory has no go.mod above it on a normal system.
    if !root.ancestors().any(|a| a.join("go.mod").is_file()) {
        let err = load("./...", &root).expect_err("no module");
        assert!(matches!(err, LoadError::NoModule { .. }));
    }

    let (_dir, root) = module();
    write(&root, "empty/README", "nothing here\n");
    let err = load("empty", &root).expect_err("no files");
    assert!(matches!(err, LoadError::NoFiles { .. }));
}

#[test]
fn type_specifiers_resolve_in_every_spelling() {
    let (_dir, root) = module();
    let mut program = load("cmd", &root).expect("load");

    for spec in ["example.com/app/models.User", "models.User", "User", " models.User "] {
        assert_eq!(resolve_type_spec(&mut program, spec), Ok(user()), "{spec}");
    }
    assert_eq!(
        resolve_type_spec(&mut program, "time.Time"),
        Ok(TypeIdentity::new("time", "Time"))
    );
}

#[test]
fn type_specifier_failures_are_distinguished() {
    let (_dir, root) = module();
    let mut program = load("./...", &root).expect("load");

    assert_eq!(
        resolve_type_spec(&mut program, "models.Missing"),
        Err(ResolveError::TypeNotFound {
            spec: "models.Missing".into()
        })
    );
    assert_eq!(
        resolve_type_spec(&mut program, "nope.User"),
        Err(ResolveError::PackageNotFound {
            path: "nope".into()
        })
    );
    assert!(matches!(
        resolve_type_spec(&mut program, ""),
        Err(ResolveError::InvalidSpec { .. })
    ));
    assert!(matches!(
        resolve_type_spec(&mut program, "a b"),
        Err(ResolveError::InvalidSpec { .. })
    ));
}

#[test]
fn bare_names_declared_twice_are_ambiguous() {
    let (_dir, root) = module();
    write(&root, "billing/billing.go", "package billing\n\ntype User struct{ ID int }\n");
    let mut program = load("./...", &root).expect("load");

    let err = resolve_type_spec(&mut program, "User").expect_err("ambiguous");
    let ResolveError::Ambiguous { candidates, .. } = err else {
        panic!("expected ambiguity, got {err:?}");
    };
    assert_eq!(
        candidates,
        vec![
            "example.com/app/billing.User".to_string(),
            "example.com/app/models.User".to_string()
        ]
    );
}

#[test]
fn targets_must_be_structs() {
    let (_dir, root) = module();
    let mut program = load("./...", &root).expect("load");

    let targets = resolve_target_types(&mut program, &["models.User", "models.Address"])
        .expect("targets");
    assert_eq!(targets.len(), 2);
    assert!(targets.contains(&user()));

    assert_eq!(
        resolve_target_types(&mut program, &["models.Status"]),
        Err(ResolveError::NotAStruct {
            spec: "models.Status".into()
        })
    );
}

#[test]
fn default_keys_are_canonicalized() {
    let (_dir, root) = module();
    let mut program = load("./...", &root).expect("load");
    let mut defaults = CustomDefaults::new();
    defaults.insert("string", "\"n/a\"");
    defaults.insert("models.Status", "models.StatusActive");
    defaults.insert("ghost.Type", "nil");

    let normalized = normalize_defaults(&mut program, &defaults);
    assert_eq!(normalized.for_basic(BasicKind::String), Some("\"n/a\""));
    assert_eq!(
        normalized.get("example.com/app/models.Status"),
        Some("models.StatusActive")
    );
    assert_eq!(normalized.get("ghost.Type"), Some("nil"));
    assert_eq!(normalized.len(), 3);
}

fn env_in(root: &Utf8Path) -> GoEnv {
    GoEnv {
        goroot: Some(root.join("goroot")),
        gomodcache: Some(root.join("modcache")),
        goos: "linux".into(),
        goarch: "amd64".into(),
    }
}

fn struct_fields(scope: &impl TypeInfo, id: &TypeIdentity, args: &[Type]) -> Vec<(String, Type)> {
    let Some(Type::Struct(layout)) = scope.underlying(id, args) else {
        panic!("{id} is not a struct");
    };
    layout.fields.into_iter().map(|f| (f.name, f.ty)).collect()
}

#[test]
fn standard_library_comes_from_goroot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
    write(&root, "app/go.mod", "module example.com/app\n\ngo 1.22\n");
    write(
        &root,
        "app/main.go",
        "package main\n\nimport (\n\t\"net/netip\"\n\t\"time\"\n)\n\nvar _ = netip.Addr{}\nvar _ = time.Time{}\n",
    );
    write(
        &root,
        "goroot/src/net/netip/netip.go",
        "package netip\n\nimport \"unique\"\n\ntype Addr struct {\n\taddr uint128\n\tz    unique.Handle[addrDetail]\n}\n\ntype uint128 struct{ hi, lo uint64 }\n\ntype addrDetail struct{ isV6 bool }\n",
    );
    write(&root, "goroot/src/net/netip/addr_windows.go", "package netip\n\ntype Addr int\n");
    write(&root, "goroot/src/net/netip/addr_test.go", "package netip\n\ntype Addr string\n");
    write(
        &root,
        "goroot/src/net/netip/gen.go",
        "//go:build ignore\n\npackage main\n\ntype Addr bool\n",
    );
    write(
        &root,
        "goroot/src/unique/handle.go",
        "package unique\n\ntype Handle[T comparable] struct{ value *T }\n",
    );

    let program =
        Program::load_with("main.go", &root.join("app"), &env_in(&root)).expect("load");
    let netip = program.package("net/netip").expect("netip");
    assert_eq!(netip.source, PackageSource::GoRoot);
    assert_eq!(netip.files.len(), 1);
    assert!(program.package("unique").is_some());
    // No `time` directory under the GOROOT: the builtin declarations answer.
    assert_eq!(
        program.package("time").map(|p| p.source),
        Some(PackageSource::Stub)
    );

    let scope = program.scope(&program.roots()[0]).expect("scope");
    let addr = TypeIdentity::new("net/netip", "Addr");
    let fields = struct_fields(&scope, &addr, &[]);
    assert_eq!(
        fields,
        vec![
            (
                "addr".to_string(),
                Type::named(TypeIdentity::new("net/netip", "uint128"))
            ),
            (
                "z".to_string(),
                Type::instantiated(
                    TypeIdentity::new("unique", "Handle"),
                    vec![Type::named(TypeIdentity::new("net/netip", "addrDetail"))]
                )
            ),
        ]
    );
}

#[test]
fn required_modules_come_from_the_module_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
    write(
        &root,
        "app/go.mod",
        "module example.com/app\n\ngo 1.22\n\nrequire (\n\tgithub.com/BurntSushi/toml v1.3.2\n\tgithub.com/google/uuid v1.6.0\n)\n",
    );
    write(
        &root,
        "app/main.go",
        "package main\n\nimport (\n\t\"github.com/BurntSushi/toml\"\n\t\"github.com/google/uuid\"\n)\n\nvar _ = toml.Position{}\nvar _ = uuid.UUID{}\n",
    );
    write(
        &root,
        "modcache/github.com/!burnt!sushi/toml@v1.3.2/decode.go",
        "package toml\n\ntype Position struct {\n\tLine int\n\tStart int\n}\n",
    );
    write(
        &root,
        "modcache/github.com/google/uuid@v1.6.0/uuid.go",
        "package uuid\n\ntype UUID [16]byte\n",
    );

    let program =
        Program::load_with("main.go", &root.join("app"), &env_in(&root)).expect("load");
    let toml = program.package("github.com/BurntSushi/toml").expect("toml");
    assert_eq!(toml.source, PackageSource::ModCache);
    assert!(toml.declares("Position"));
    let scope = program.scope(&program.roots()[0]).expect("scope");
    let expr = fillstruct_syntax::parse_expr("uuid.UUID").expect("parse");
    let uuid = TypeIdentity::new("github.com/google/uuid", "UUID");
    assert_eq!(scope.resolve_type(&expr), Type::named(uuid.clone()));
    assert!(matches!(
        scope.underlying(&uuid, &[]),
        Some(Type::Array { .. })
    ));
}

#[test]
fn vendor_and_replace_directories_win_over_the_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
    write(
        &root,
        "app/go.mod",
        "module example.com/app\n\ngo 1.22\n\nrequire (\n\tgithub.com/acme/vendored v1.0.0\n\tgithub.com/acme/forked v1.0.0\n)\n\nreplace github.com/acme/forked => ../forked\n",
    );
    write(
        &root,
        "app/main.go",
        "package main\n\nimport (\n\t\"github.com/acme/forked\"\n\t\"github.com/acme/vendored\"\n)\n\nvar _ = forked.T{}\nvar _ = vendored.T{}\n",
    );
    write(&root, "app/vendor/github.com/acme/vendored/v.go", "package vendored\n\ntype T struct{ FromVendor int }\n");
    write(&root, "modcache/github.com/acme/vendored@v1.0.0/v.go", "package vendored\n\ntype T struct{ FromCache int }\n");
    write(&root, "forked/f.go", "package forked\n\ntype T struct{ FromFork int }\n");
    write(&root, "modcache/github.com/acme/forked@v1.0.0/f.go", "package forked\n\ntype T struct{ FromCache int }\n");

    let program =
        Program::load_with("main.go", &root.join("app"), &env_in(&root)).expect("load");
    let scope = program.scope(&program.roots()[0]).expect("scope");
    let names = |path: &str| -> Vec<String> {
        struct_fields(&scope, &TypeIdentity::new(path, "T"), &[])
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    };
    assert_eq!(names("github.com/acme/vendored"), vec!["FromVendor".to_string()]);
    assert_eq!(
        program.package("github.com/acme/vendored").map(|p| p.source),
        Some(PackageSource::Vendor)
    );
    assert_eq!(names("github.com/acme/forked"), vec!["FromFork".to_string()]);
}

const GENERIC: &str = r#"package main

type Pair[K comparable, V any] struct {
	Key K
	Val V
}

type Box struct {
	Name string
	P    Pair[string, int]
}

type Named = Pair[string, bool]

func main() {
	type L struct{ A, B int }
	type M struct {
		L    L
		Next *M
	}
	_ = L{A: 1}
	_ = Pair[string, int]{Key: "a"}
}

func other() {
	type L struct{ C string }
	_ = L{}
}
"#;

#[test]
fn generic_instantiations_bind_their_arguments() {
    let (_dir, root) = module();
    write(&root, "gen/main.go", GENERIC);
    let program = load("gen", &root).expect("load");
    let scope = program.scope(&program.roots()[0]).expect("scope");
    let pair = TypeIdentity::new("example.com/app/gen", "Pair");

    let expr = fillstruct_syntax::parse_expr("Pair[string, int]").expect("parse");
    let args = vec![Type::basic(BasicKind::String), Type::basic(BasicKind::Int)];
    assert_eq!(scope.resolve_type(&expr), Type::instantiated(pair.clone(), args.clone()));
    assert_eq!(
        struct_fields(&scope, &pair, &args),
        vec![
            ("Key".to_string(), Type::basic(BasicKind::String)),
            ("Val".to_string(), Type::basic(BasicKind::Int)),
        ]
    );
    // Uninstantiated generics have no layout to complete.
    assert!(!matches!(scope.underlying(&pair, &[]), Some(Type::Struct(_))));

    let boxed = struct_fields(&scope, &TypeIdentity::new("example.com/app/gen", "Box"), &[]);
    assert_eq!(boxed[1].1, Type::instantiated(pair.clone(), args));
    let alias = fillstruct_syntax::parse_expr("Named").expect("parse");
    assert_eq!(
        scope.resolve_type(&alias),
        Type::instantiated(
            pair,
            vec![Type::basic(BasicKind::String), Type::basic(BasicKind::Bool)]
        )
    );
}

#[test]
fn local_types_resolve_inside_their_function() {
    let (_dir, root) = module();
    write(&root, "gen/main.go", GENERIC);
    let program = load("gen", &root).expect("load");
    let scope = program.scope(&program.roots()[0]).expect("scope");
    let tree = scope.file().syntax();
    let literal_types: Vec<_> = tree
        .descendants()
        .filter(|n| n.kind() == fillstruct_syntax::SyntaxKind::COMPOSITE_LIT)
        .filter_map(|lit| lit.first_child())
        .filter(|ty| ty.to_string() == "L")
        .collect();
    assert_eq!(literal_types.len(), 2);

    let in_main = scope.resolve_type(&literal_types[0]);
    let in_other = scope.resolve_type(&literal_types[1]);
    let (Some(main_l), Some(other_l)) = (in_main.as_named(), in_other.as_named()) else {
        panic!("local types resolve to named types: {in_main:?} {in_other:?}");
    };
    assert!(main_l.is_local());
    assert_ne!(main_l, other_l);
    assert_eq!(
        struct_fields(&scope, main_l, &[]),
        vec![
            ("A".to_string(), Type::basic(BasicKind::Int)),
            ("B".to_string(), Type::basic(BasicKind::Int)),
        ]
    );
    assert_eq!(
        struct_fields(&scope, other_l, &[]),
        vec![("C".to_string(), Type::basic(BasicKind::String))]
    );
    // Outside any function the name means nothing.
    let bare = fillstruct_syntax::parse_expr("L").expect("parse");
    assert_eq!(scope.resolve_type(&bare), Type::unresolved("L"));
}

#[test]
fn local_types_see_earlier_local_types() {
    let (_dir, root) = module();
    write(&root, "gen/main.go", GENERIC);
    let program = load("gen", &root).expect("load");
    let scope = program.scope(&program.roots()[0]).expect("scope");
    let tree = scope.file().syntax();
    let m_spec = tree
        .descendants()
        .find(|n| {
            n.kind() == fillstruct_syntax::SyntaxKind::TYPE_SPEC && n.to_string().starts_with("M ")
        })
        .expect("type M");
    let offset = u32::from(m_spec.text_range().start());
    let m = TypeIdentity::local("example.com/app/gen", "M", scope.file().path.clone(), offset);
    let fields = struct_fields(&scope, &m, &[]);
    assert_eq!(fields[0].0, "L");
    assert!(fields[0].1.as_named().is_some_and(TypeIdentity::is_local));
    assert_eq!(fields[1].1, Type::pointer(Type::named(m)));
}
