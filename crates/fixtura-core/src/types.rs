use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Primitive kinds served by the scalar provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Bool,
    U8,
    I8,
    Char,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    String,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    Uuid,
    IpAddr,
    Uri,
}

impl ScalarKind {
    /// Every registered primitive kind, in declaration order.
    pub const ALL: &'static [ScalarKind] = &[
        ScalarKind::Bool,
        ScalarKind::U8,
        ScalarKind::I8,
        ScalarKind::Char,
        ScalarKind::I16,
        ScalarKind::U16,
        ScalarKind::I32,
        ScalarKind::U32,
        ScalarKind::I64,
        ScalarKind::U64,
        ScalarKind::F32,
        ScalarKind::F64,
        ScalarKind::Decimal,
        ScalarKind::String,
        ScalarKind::DateTime,
        ScalarKind::DateTimeOffset,
        ScalarKind::TimeSpan,
        ScalarKind::Uuid,
        ScalarKind::IpAddr,
        ScalarKind::Uri,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::U8 => "u8",
            ScalarKind::I8 => "i8",
            ScalarKind::Char => "char",
            ScalarKind::I16 => "i16",
            ScalarKind::U16 => "u16",
            ScalarKind::I32 => "i32",
            ScalarKind::U32 => "u32",
            ScalarKind::I64 => "i64",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Decimal => "decimal",
            ScalarKind::String => "string",
            ScalarKind::DateTime => "datetime",
            ScalarKind::DateTimeOffset => "datetimeoffset",
            ScalarKind::TimeSpan => "timespan",
            ScalarKind::Uuid => "uuid",
            ScalarKind::IpAddr => "ipaddr",
            ScalarKind::Uri => "uri",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structural reference to a type.
///
/// `Named` references are resolved through the
/// [`TypeCatalog`](crate::catalog::TypeCatalog); every other variant describes
/// its shape inline. The `Display` form is the canonical type name used for
/// stack identity and `"Type.Member"` skip paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeRef {
    Scalar(ScalarKind),
    Named(String),
    ByRef(Box<TypeRef>),
    Nullable(Box<TypeRef>),
    Array(Box<TypeRef>),
    List(Box<TypeRef>),
    Set(Box<TypeRef>),
    Collection(Box<TypeRef>),
    Sequence(Box<TypeRef>),
    Map(Box<TypeRef>, Box<TypeRef>),
    ReadOnlyMap(Box<TypeRef>, Box<TypeRef>),
    Record,
    Table,
    TableSet,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn by_ref(inner: impl Into<TypeRef>) -> Self {
        TypeRef::ByRef(Box::new(inner.into()))
    }

    pub fn nullable(inner: impl Into<TypeRef>) -> Self {
        TypeRef::Nullable(Box::new(inner.into()))
    }

    pub fn array(element: impl Into<TypeRef>) -> Self {
        TypeRef::Array(Box::new(element.into()))
    }

    pub fn list(element: impl Into<TypeRef>) -> Self {
        TypeRef::List(Box::new(element.into()))
    }

    pub fn set(element: impl Into<TypeRef>) -> Self {
        TypeRef::Set(Box::new(element.into()))
    }

    pub fn collection(element: impl Into<TypeRef>) -> Self {
        TypeRef::Collection(Box::new(element.into()))
    }

    pub fn sequence(element: impl Into<TypeRef>) -> Self {
        TypeRef::Sequence(Box::new(element.into()))
    }

    pub fn map(key: impl Into<TypeRef>, value: impl Into<TypeRef>) -> Self {
        TypeRef::Map(Box::new(key.into()), Box::new(value.into()))
    }

    pub fn read_only_map(key: impl Into<TypeRef>, value: impl Into<TypeRef>) -> Self {
        TypeRef::ReadOnlyMap(Box::new(key.into()), Box::new(value.into()))
    }
}

impl From<ScalarKind> for TypeRef {
    fn from(kind: ScalarKind) -> Self {
        TypeRef::Scalar(kind)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::Named(name.to_string())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(kind) => write!(f, "{kind}"),
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::ByRef(inner) => write!(f, "{inner}&"),
            TypeRef::Nullable(inner) => write!(f, "{inner}?"),
            TypeRef::Array(element) => write!(f, "{element}[]"),
            TypeRef::List(element) => write!(f, "List<{element}>"),
            TypeRef::Set(element) => write!(f, "Set<{element}>"),
            TypeRef::Collection(element) => write!(f, "Collection<{element}>"),
            TypeRef::Sequence(element) => write!(f, "Sequence<{element}>"),
            TypeRef::Map(key, value) => write!(f, "Map<{key}, {value}>"),
            TypeRef::ReadOnlyMap(key, value) => write!(f, "ReadOnlyMap<{key}, {value}>"),
            TypeRef::Record => f.write_str("Record"),
            TypeRef::Table => f.write_str("Table"),
            TypeRef::TableSet => f.write_str("TableSet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_canonical_names() {
        let ty = TypeRef::map(ScalarKind::String, TypeRef::list(TypeRef::named("Node")));
        assert_eq!(ty.to_string(), "Map<string, List<Node>>");
        assert_eq!(TypeRef::nullable(ScalarKind::I32).to_string(), "i32?");
        assert_eq!(TypeRef::array(ScalarKind::U8).to_string(), "u8[]");
    }

    #[test]
    fn type_ref_serializes_with_kind_tag() {
        let ty = TypeRef::list(ScalarKind::Uuid);
        let json = serde_json::to_value(&ty).expect("serialize type ref");
        assert_eq!(
            json,
            serde_json::json!({"kind": "list", "of": {"kind": "scalar", "of": "uuid"}})
        );
        let back: TypeRef = serde_json::from_value(json).expect("deserialize type ref");
        assert_eq!(back, ty);
    }
}
