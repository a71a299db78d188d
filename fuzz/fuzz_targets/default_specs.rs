#![no_main]

//! Fuzz target for `--default` and `--type` specifier parsing.

use fillstruct_types::{CustomDefaults, TypeIdentity};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|specs: Vec<String>| {
    if let Ok(defaults) = CustomDefaults::parse_specs(&specs) {
        for (ty, replacement) in defaults.iter() {
            assert!(!ty.is_empty() && !replacement.is_empty());
            assert_eq!(ty, ty.trim());
        }
    }
    for spec in &specs {
        if let Some(id) = TypeIdentity::parse(spec) {
            assert!(!id.name.is_empty());
            assert_eq!(id.to_string(), spec.as_str());
        }
    }
});
