//! Default value policy.
//!
//! A missing field gets, in order of preference, the configured override for
//! its type or the structural zero value of its shape.

use fillstruct_syntax::{make, SyntaxKind, SyntaxNode};
use fillstruct_types::{BasicKind, ChanDir, CustomDefaults, StructType, Type, TypeIdentity};

use crate::error::PolicyError;
use crate::ports::TypeInfo;

pub struct DefaultPolicy<'a> {
    info: &'a dyn TypeInfo,
    overrides: &'a CustomDefaults,
}

impl<'a> DefaultPolicy<'a> {
    pub fn new(info: &'a dyn TypeInfo, overrides: &'a CustomDefaults) -> Self {
        Self { info, overrides }
    }

    /// Default expression for a field of type `ty`.
    pub fn default_for(&self, ty: &Type) -> Result<SyntaxNode, PolicyError> {
        if let Some(replacement) = self.override_for(ty) {
            return Ok(make::name(replacement));
        }
        self.zero_value(ty)
    }

    fn override_for(&self, ty: &Type) -> Option<&'a str> {
        match ty {
            Type::Basic { basic } => self.overrides.for_basic(*basic),
            Type::Named { id, .. } => self.overrides.for_named(id),
            _ => None,
        }
    }

    fn zero_value(&self, ty: &Type) -> Result<SyntaxNode, PolicyError> {
        match ty {
            Type::Basic { basic } => Ok(basic_zero(*basic)),
            Type::Array { .. } | Type::Struct(_) => self.empty_literal_of(ty),
            Type::Named { id, args } => self.named_zero(ty, id, args),
            Type::Unresolved { text } => Err(PolicyError::Unresolved { text: text.clone() }),
            _ => Ok(make::name("nil")),
        }
    }

    /// `T{}` with `ty` rendered as written in this file.
    fn empty_literal_of(&self, ty: &Type) -> Result<SyntaxNode, PolicyError> {
        let text = self.type_to_expr(ty)?;
        let node = make::type_from_text(&text).map_err(|e| PolicyError::Render {
            text,
            message: e.message,
        })?;
        Ok(make::empty_composite(&node))
    }

    fn named_zero(
        &self,
        ty: &Type,
        id: &TypeIdentity,
        args: &[Type],
    ) -> Result<SyntaxNode, PolicyError> {
        let Some(underlying) = self.info.underlying(id, args) else {
            return Err(PolicyError::UnknownNamed { id: id.clone() });
        };
        match underlying {
            Type::Basic { basic } => Ok(basic_zero(basic)),
            Type::Struct(_) | Type::Array { .. } if args.is_empty() => {
                Ok(make::empty_composite(&self.named_type_node(id)))
            }
            Type::Struct(_) | Type::Array { .. } => self.empty_literal_of(ty),
            Type::Unresolved { text } => Err(PolicyError::Unresolved { text }),
            _ => Ok(make::name("nil")),
        }
    }

    fn named_type_node(&self, id: &TypeIdentity) -> SyntaxNode {
        match self.qualifier_for(id) {
            Some(pkg) => make::selector(&pkg, &id.name),
            None => make::name(&id.name),
        }
    }

    fn qualifier_for(&self, id: &TypeIdentity) -> Option<String> {
        if id.is_universe() || id.module_path == self.info.package_path() {
            return None;
        }
        self.info.qualifier(&id.module_path)
    }

    /// Render `ty` as Go type syntax valid in the current file. Overrides are
    /// not consulted.
    pub fn type_to_expr(&self, ty: &Type) -> Result<String, PolicyError> {
        Ok(match ty {
            Type::Basic { basic } => basic.name().to_string(),
            Type::Named { id, args } => {
                let mut text = match self.qualifier_for(id) {
                    Some(pkg) => format!("{pkg}.{}", id.name),
                    None => id.name.clone(),
                };
                if !args.is_empty() {
                    let args = args
                        .iter()
                        .map(|a| self.type_to_expr(a))
                        .collect::<Result<Vec<_>, _>>()?;
                    text.push_str(&format!("[{}]", args.join(", ")));
                }
                text
            }
            Type::Pointer { elem } => format!("*{}", self.type_to_expr(elem)?),
            Type::Slice { elem } => format!("[]{}", self.type_to_expr(elem)?),
            Type::Array { len, elem } => format!("[{len}]{}", self.type_to_expr(elem)?),
            Type::Map { key, value } => format!(
                "map[{}]{}",
                self.type_to_expr(key)?,
                self.type_to_expr(value)?
            ),
            Type::Chan { dir, elem } => {
                let elem = self.type_to_expr(elem)?;
                match dir {
                    ChanDir::Both => format!("chan {elem}"),
                    ChanDir::Send => format!("chan<- {elem}"),
                    ChanDir::Recv => format!("<-chan {elem}"),
                }
            }
            Type::Func {
                params,
                results,
                variadic,
            } => self.func_to_expr(params, results, *variadic)?,
            Type::Interface { text } => text.clone(),
            Type::Struct(st) => self.struct_to_expr(st)?,
            Type::Unresolved { text } => {
                return Err(PolicyError::Unresolved { text: text.clone() });
            }
        })
    }

    fn func_to_expr(
        &self,
        params: &[Type],
        results: &[Type],
        variadic: bool,
    ) -> Result<String, PolicyError> {
        let mut rendered = Vec::with_capacity(params.len());
        for (i, param) in params.iter().enumerate() {
            let text = match param {
                Type::Slice { elem } if variadic && i + 1 == params.len() => {
                    format!("...{}", self.type_to_expr(elem)?)
                }
                other => self.type_to_expr(other)?,
            };
            rendered.push(text);
        }
        let mut out = format!("func({})", rendered.join(", "));
        match results {
            [] => {}
            [single] => {
                out.push(' ');
                out.push_str(&self.type_to_expr(single)?);
            }
            many => {
                let many = many
                    .iter()
                    .map(|r| self.type_to_expr(r))
                    .collect::<Result<Vec<_>, _>>()?;
                out.push_str(&format!(" ({})", many.join(", ")));
            }
        }
        Ok(out)
    }

    fn struct_to_expr(&self, st: &StructType) -> Result<String, PolicyError> {
        if st.fields.is_empty() {
            return Ok("struct{}".to_string());
        }
        let mut fields = Vec::with_capacity(st.fields.len());
        for field in &st.fields {
            let ty = self.type_to_expr(&field.ty)?;
            fields.push(if field.embedded {
                ty
            } else {
                format!("{} {ty}", field.name)
            });
        }
        Ok(format!("struct{{ {} }}", fields.join("; ")))
    }
}

fn basic_zero(kind: BasicKind) -> SyntaxNode {
    match kind {
        BasicKind::Bool => make::name("false"),
        BasicKind::String => make::basic_lit(SyntaxKind::STRING, "\"\""),
        BasicKind::UnsafePointer => make::name("nil"),
        _ => make::basic_lit(SyntaxKind::INT, "0"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeInfo, PKG};
    use fillstruct_types::{ArrayLen, StructField};
    use pretty_assertions::assert_eq;

    fn status() -> TypeIdentity {
        TypeIdentity::new(PKG, "Status")
    }

    fn info() -> FakeInfo {
        FakeInfo::new()
            .declare("Status", Type::basic(BasicKind::Int))
            .declare("Address", Type::Struct(StructType::default()))
            .declare("Matrix", Type::Array {
                len: ArrayLen::Known(4),
                elem: Box::new(Type::basic(BasicKind::Float64)),
            })
            .declare("Handler", Type::Func {
                params: vec![],
                results: vec![],
                variadic: false,
            })
            .declare_in("time", "time.Time", "Time", Type::Struct(StructType::default()))
            .import("time", "time")
            .declare_generic(
                "Pair[string, int]",
                "Pair",
                vec![Type::basic(BasicKind::String), Type::basic(BasicKind::Int)],
                Type::Struct(StructType::default()),
            )
    }

    fn render(policy: &DefaultPolicy<'_>, ty: Type) -> String {
        policy.default_for(&ty).expect("default").to_string()
    }

    #[test]
    fn structural_zero_values() {
        let info = info();
        let overrides = CustomDefaults::new();
        let policy = DefaultPolicy::new(&info, &overrides);

        assert_eq!(render(&policy, Type::basic(BasicKind::Bool)), "false");
        assert_eq!(render(&policy, Type::basic(BasicKind::String)), "\"\"");
        assert_eq!(render(&policy, Type::basic(BasicKind::Complex128)), "0");
        assert_eq!(render(&policy, Type::basic(BasicKind::UnsafePointer)), "nil");
        assert_eq!(render(&policy, Type::pointer(Type::named(status()))), "nil");
        assert_eq!(render(&policy, Type::slice(Type::basic(BasicKind::Byte))), "nil");
        assert_eq!(
            render(&policy, Type::Interface { text: "interface{}".into() }),
            "nil"
        );
    }

    #[test]
    fn named_types_follow_their_underlying_shape() {
        let info = info();
        let overrides = CustomDefaults::new();
        let policy = DefaultPolicy::new(&info, &overrides);

        assert_eq!(render(&policy, Type::named(status())), "0");
        assert_eq!(
            render(&policy, Type::named(TypeIdentity::new(PKG, "Address"))),
            "Address{}"
        );
        assert_eq!(
            render(&policy, Type::named(TypeIdentity::new(PKG, "Matrix"))),
            "Matrix{}"
        );
        assert_eq!(
            render(&policy, Type::named(TypeIdentity::new(PKG, "Handler"))),
            "nil"
        );
        assert_eq!(
            render(&policy, Type::named(TypeIdentity::new("time", "Time"))),
            "time.Time{}"
        );
    }

    #[test]
    fn instantiated_generics_keep_their_arguments() {
        let info = info();
        let overrides = CustomDefaults::new();
        let policy = DefaultPolicy::new(&info, &overrides);

        let pair = Type::instantiated(
            TypeIdentity::new(PKG, "Pair"),
            vec![
                Type::basic(BasicKind::String),
                Type::named(TypeIdentity::new("time", "Time")),
            ],
        );
        assert_eq!(render(&policy, pair), "Pair[string, time.Time]{}");
    }

    #[test]
    fn local_types_are_unqualified() {
        let info = info();
        let overrides = CustomDefaults::new();
        let policy = DefaultPolicy::new(&info, &overrides);
        let local = TypeIdentity::local(PKG, "L", "app.go", 30);
        assert_eq!(
            policy.type_to_expr(&Type::named(local)).expect("render"),
            "L"
        );
    }

    #[test]
    fn arrays_and_anonymous_structs_render_their_type() {
        let info = info();
        let overrides = CustomDefaults::new();
        let policy = DefaultPolicy::new(&info, &overrides);

        let array = Type::Array {
            len: ArrayLen::Known(3),
            elem: Box::new(Type::named(TypeIdentity::new("time", "Time"))),
        };
        assert_eq!(render(&policy, array), "[3]time.Time{}");

        let anon = Type::Struct(StructType {
            fields: vec![
                StructField {
                    name: "X".into(),
                    ty: Type::basic(BasicKind::Int),
                    embedded: false,
                },
                StructField {
                    name: "Status".into(),
                    ty: Type::named(status()),
                    embedded: true,
                },
            ],
        });
        assert_eq!(render(&policy, anon), "struct{ X int; Status }{}");
    }

    #[test]
    fn overrides_win_over_structure() {
        let info = info();
        let mut overrides = CustomDefaults::new();
        overrides.insert(status().to_string(), "StatusUnknown");
        overrides.insert("string", "DefaultName");
        overrides.insert("example.com/app.Address", "NoAddress");
        let policy = DefaultPolicy::new(&info, &overrides);

        assert_eq!(render(&policy, Type::named(status())), "StatusUnknown");
        assert_eq!(render(&policy, Type::basic(BasicKind::String)), "DefaultName");
        assert_eq!(
            render(&policy, Type::named(TypeIdentity::new(PKG, "Address"))),
            "NoAddress"
        );
        // Basic overrides apply to the basic kind only, not to named types over it.
        overrides.insert("int", "Zero");
        let policy = DefaultPolicy::new(&info, &overrides);
        assert_eq!(
            render(&policy, Type::named(TypeIdentity::new(PKG, "Status"))),
            "StatusUnknown"
        );
    }

    #[test]
    fn unresolved_types_are_errors() {
        let info = info();
        let overrides = CustomDefaults::new();
        let policy = DefaultPolicy::new(&info, &overrides);

        assert_eq!(
            policy.default_for(&Type::unresolved("pkg.Missing")),
            Err(PolicyError::Unresolved {
                text: "pkg.Missing".into()
            })
        );
        let ghost = TypeIdentity::new(PKG, "Ghost");
        assert_eq!(
            policy.default_for(&Type::named(ghost.clone())),
            Err(PolicyError::UnknownNamed { id: ghost })
        );
        let array = Type::Array {
            len: ArrayLen::Known(2),
            elem: Box::new(Type::unresolved("x.Y")),
        };
        assert!(policy.default_for(&array).is_err());
    }

    #[test]
    fn renders_function_and_channel_types() {
        let info = info();
        let overrides = CustomDefaults::new();
        let policy = DefaultPolicy::new(&info, &overrides);

        let func = Type::Func {
            params: vec![
                Type::basic(BasicKind::String),
                Type::slice(Type::basic(BasicKind::Int)),
            ],
            results: vec![Type::basic(BasicKind::Bool), Type::named(status())],
            variadic: true,
        };
        assert_eq!(
            policy.type_to_expr(&func).expect("render"),
            "func(string, ...int) (bool, Status)"
        );
        let chan = Type::Chan {
            dir: ChanDir::Recv,
            elem: Box::new(Type::named(TypeIdentity::new("time", "Time"))),
        };
        assert_eq!(policy.type_to_expr(&chan).expect("render"), "<-chan time.Time");
    }
}
