//! Resolved type shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::TypeIdentity;

/// Predeclared non-composite kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    Bool,
    String,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    /// Alias of `uint8` that keeps its spelling.
    Byte,
    /// Alias of `int32` that keeps its spelling.
    Rune,
    UnsafePointer,
}

impl BasicKind {
    const ALL: [BasicKind; 20] = [
        BasicKind::Bool,
        BasicKind::String,
        BasicKind::Int,
        BasicKind::Int8,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::Uint,
        BasicKind::Uint8,
        BasicKind::Uint16,
        BasicKind::Uint32,
        BasicKind::Uint64,
        BasicKind::Uintptr,
        BasicKind::Float32,
        BasicKind::Float64,
        BasicKind::Complex64,
        BasicKind::Complex128,
        BasicKind::Byte,
        BasicKind::Rune,
        BasicKind::UnsafePointer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::String => "string",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::Byte => "byte",
            BasicKind::Rune => "rune",
            BasicKind::UnsafePointer => "unsafe.Pointer",
        }
    }

    /// Look up a kind by its spelled name, including `unsafe.Pointer`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// `byte` and `rune` map to the kinds they alias.
    pub fn canonical(self) -> Self {
        match self {
            BasicKind::Byte => BasicKind::Uint8,
            BasicKind::Rune => BasicKind::Int32,
            other => other,
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            BasicKind::Bool | BasicKind::String | BasicKind::UnsafePointer
        )
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayLen {
    Known(u64),
    /// Length expression as written, when it is not a plain constant.
    Expr(String),
}

impl fmt::Display for ArrayLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayLen::Known(n) => write!(f, "{n}"),
            ArrayLen::Expr(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub ty: Type,
    pub embedded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructType {
    pub fields: Vec<StructField>,
}

/// A resolved Go type.
///
/// Named types are referenced by identity; their underlying shape comes from
/// whoever resolved them, so recursive types stay finite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    Basic { basic: BasicKind },
    /// A declared type, with type arguments when it is generic.
    Named {
        id: TypeIdentity,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<Type>,
    },
    Pointer { elem: Box<Type> },
    Slice { elem: Box<Type> },
    Array { len: ArrayLen, elem: Box<Type> },
    Map { key: Box<Type>, value: Box<Type> },
    Chan { dir: ChanDir, elem: Box<Type> },
    Func {
        params: Vec<Type>,
        results: Vec<Type>,
        variadic: bool,
    },
    /// Interface bodies are kept as text.
    Interface { text: String },
    Struct(StructType),
    /// Could not be resolved; carries the type expression as written.
    Unresolved { text: String },
}

impl Type {
    pub fn basic(kind: BasicKind) -> Self {
        Type::Basic { basic: kind }
    }

    pub fn named(id: TypeIdentity) -> Self {
        Type::Named {
            id,
            args: Vec::new(),
        }
    }

    /// An instantiation such as `Pair[string, int]`.
    pub fn instantiated(id: TypeIdentity, args: Vec<Type>) -> Self {
        Type::Named { id, args }
    }

    pub fn pointer(elem: Type) -> Self {
        Type::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: Type) -> Self {
        Type::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn unresolved(text: impl Into<String>) -> Self {
        Type::Unresolved { text: text.into() }
    }

    pub fn as_named(&self) -> Option<&TypeIdentity> {
        match self {
            Type::Named { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The pointee of a pointer, or the type itself.
    pub fn deref(&self) -> &Type {
        match self {
            Type::Pointer { elem } => elem,
            other => other,
        }
    }

    /// Whether the zero value of this shape is `nil`.
    pub fn is_nilable(&self) -> bool {
        matches!(
            self,
            Type::Pointer { .. }
                | Type::Slice { .. }
                | Type::Map { .. }
                | Type::Chan { .. }
                | Type::Func { .. }
                | Type::Interface { .. }
                | Type::Basic {
                    basic: BasicKind::UnsafePointer
                }
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic { basic } => write!(f, "{basic}"),
            Type::Named { id, args } => {
                write!(f, "{id}")?;
                if !args.is_empty() {
                    f.write_str("[")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str("]")?;
                }
                Ok(())
            }
            Type::Pointer { elem } => write!(f, "*{elem}"),
            Type::Slice { elem } => write!(f, "[]{elem}"),
            Type::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Type::Map { key, value } => write!(f, "map[{key}]{value}"),
            Type::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            Type::Func { .. } => f.write_str("func(...)"),
            Type::Interface { text } => f.write_str(text),
            Type::Struct(st) => {
                f.write_str("struct{")?;
                for (i, field) in st.fields.iter().enumerate() {
                    let sep = if i == 0 { " " } else { "; " };
                    if field.embedded {
                        write!(f, "{sep}{}", field.ty)?;
                    } else {
                        write!(f, "{sep}{} {}", field.name, field.ty)?;
                    }
                }
                if !st.fields.is_empty() {
                    f.write_str(" ")?;
                }
                f.write_str("}")
            }
            Type::Unresolved { text } => f.write_str(text),
        }
    }
}
