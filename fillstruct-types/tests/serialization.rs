use camino::Utf8PathBuf;
use fillstruct_types::{
    BasicKind, CustomDefaults, FormatError, FormatResult, StructField, StructType, Type,
    TypeIdentity,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn format_result_json_omits_output_bytes() {
    let result = FormatResult::changed(
        Utf8PathBuf::from("/repo/main.go"),
        b"package main\n".to_vec(),
        vec![FormatError {
            message: "cannot resolve type of field Foo".to_string(),
            position_text: "/repo/main.go:3:7".to_string(),
        }],
    );
    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "path": "/repo/main.go",
            "changed": true,
            "errors": [{
                "message": "cannot resolve type of field Foo",
                "position_text": "/repo/main.go:3:7"
            }]
        })
    );

    let back: FormatResult = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back.output, None);
    assert!(back.changed);
}

#[test]
fn format_error_displays_position_then_message() {
    let err = FormatError {
        message: "boom".to_string(),
        position_text: "a.go:1:2".to_string(),
    };
    assert_eq!(err.to_string(), "a.go:1:2:\nboom");
}

#[test]
fn unchanged_result_has_no_output() {
    let result = FormatResult::unchanged(Utf8PathBuf::from("x.go"), Vec::new());
    assert!(!result.changed);
    assert!(result.output.is_none());
}

#[test]
fn type_shapes_use_tagged_json() {
    let ty = Type::Struct(StructType {
        fields: vec![StructField {
            name: "ID".to_string(),
            ty: Type::basic(BasicKind::Int64),
            embedded: false,
        }],
    });
    let json = serde_json::to_value(&ty).expect("serialize");
    assert_eq!(json["kind"], "struct");
    assert_eq!(json["fields"][0]["ty"]["basic"], "int64");
    let back: Type = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, ty);

    let named = Type::named(TypeIdentity::new("example.com/m", "User"));
    let json = serde_json::to_value(&named).expect("serialize");
    assert_eq!(json["id"]["name"], "User");
    assert!(json.get("args").is_none());
    assert!(json["id"].get("local").is_none());
}

#[test]
fn instantiated_local_types_round_trip() {
    let ty = Type::instantiated(
        TypeIdentity::local("example.com/app", "Pair", "main.go", 57),
        vec![Type::basic(BasicKind::String), Type::basic(BasicKind::Int)],
    );
    let json = serde_json::to_value(&ty).expect("serialize");
    assert_eq!(json["args"][1]["basic"], "int");
    assert_eq!(json["id"]["local"]["offset"], 57);
    let back: Type = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, ty);
}

proptest! {
    #[test]
    fn well_formed_specs_always_parse(
        ty in r"[a-z][a-z0-9./]{0,20}[A-Za-z0-9]",
        name in r"[A-Z][A-Za-z0-9_]{0,15}",
        pad in r" {0,2}",
    ) {
        let spec = format!("{pad}{ty}{pad}={pad}{name}{pad}");
        let defaults = CustomDefaults::parse_specs([spec.as_str()]).expect("valid spec");
        prop_assert_eq!(defaults.get(&ty), Some(name.as_str()));
    }

    #[test]
    fn specs_without_separator_are_rejected(spec in r"[A-Za-z0-9./ ]{0,30}") {
        prop_assert!(CustomDefaults::parse_spec(&spec).is_err());
    }
}
