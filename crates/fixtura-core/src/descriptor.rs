use std::fmt;
use std::sync::Arc;

use crate::schema::{TableSchema, TableSetSchema};
use crate::types::{ScalarKind, TypeRef};
use crate::value::{Object, Value};

/// Declaration category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Concrete reference type; failing to construct one is an error.
    Class,
    /// Value-like type with an implicit default.
    Struct,
    Interface,
    Abstract,
}

/// Base shape of a type, independent of the container protocols it exposes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Scalar(ScalarKind),
    ByRef(TypeRef),
    Record,
    Array(TypeRef),
    /// Relational table; `None` is the untyped table.
    Table(Option<Arc<TableSchema>>),
    /// Set of related tables; `None` is the untyped table set.
    TableSet(Option<Arc<TableSetSchema>>),
    Enum(Vec<String>),
    Nullable(TypeRef),
    Composite,
}

/// Container protocol implemented by a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    Map { key: TypeRef, value: TypeRef },
    ReadOnlyMap { key: TypeRef, value: TypeRef },
    List(TypeRef),
    Set(TypeRef),
    Collection(TypeRef),
    Sequence(TypeRef),
}

/// Builds an instance from generated constructor arguments.
pub type BuildFn = Arc<dyn Fn(Vec<Value>) -> Result<Value, String> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Construction entry point: an ordered parameter list plus the function
/// invoked with one generated value per parameter.
#[derive(Clone)]
pub struct Constructor {
    pub params: Vec<Parameter>,
    build: BuildFn,
}

impl Constructor {
    pub fn new<F>(params: Vec<Parameter>, build: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            params,
            build: Arc::new(build),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, String> {
        (self.build)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    ReadWrite,
    /// Readable only; populated by appending into the existing container.
    ReadOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub ty: TypeRef,
    pub access: Access,
}

impl Member {
    pub fn is_read_only(&self) -> bool {
        self.access == Access::ReadOnly
    }
}

/// Description of a generatable type.
///
/// Named types are registered in a [`TypeCatalog`](crate::catalog::TypeCatalog);
/// structural references (`List<T>`, `Map<K, V>`, `T?`, ...) are materialized
/// with [`TypeDescriptor::structural`].
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub name: String,
    pub kind: TypeKind,
    pub shape: Shape,
    pub protocols: Vec<Protocol>,
    /// Whether the type exposes an insertion operation.
    pub insertable: bool,
    pub constructors: Vec<Constructor>,
    pub members: Vec<Member>,
}

impl TypeDescriptor {
    fn with_shape(name: impl Into<String>, kind: TypeKind, shape: Shape) -> Self {
        Self {
            name: name.into(),
            kind,
            shape,
            protocols: Vec::new(),
            insertable: false,
            constructors: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Concrete user type with named members.
    pub fn composite(name: impl Into<String>) -> Self {
        Self::with_shape(name, TypeKind::Class, Shape::Composite)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::with_shape(name, TypeKind::Struct, Shape::Composite)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_shape(name, TypeKind::Interface, Shape::Composite)
    }

    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::with_shape(name, TypeKind::Abstract, Shape::Composite)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let variants = variants.into_iter().map(Into::into).collect();
        Self::with_shape(name, TypeKind::Struct, Shape::Enum(variants))
    }

    /// Typed table named after its schema.
    pub fn table(schema: TableSchema) -> Self {
        let name = schema.name.clone();
        Self::with_shape(name, TypeKind::Class, Shape::Table(Some(Arc::new(schema))))
    }

    pub fn table_set(schema: TableSetSchema) -> Self {
        let name = schema.name.clone();
        Self::with_shape(
            name,
            TypeKind::Class,
            Shape::TableSet(Some(Arc::new(schema))),
        )
    }

    /// Dynamic record type registered under its own name.
    pub fn record(name: impl Into<String>) -> Self {
        Self::with_shape(name, TypeKind::Class, Shape::Record)
    }

    pub fn member(mut self, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.members.push(Member {
            name: name.into(),
            ty: ty.into(),
            access: Access::ReadWrite,
        });
        self
    }

    pub fn read_only_member(mut self, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.members.push(Member {
            name: name.into(),
            ty: ty.into(),
            access: Access::ReadOnly,
        });
        self
    }

    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Zero-argument constructor yielding an object whose read-write members
    /// are unset and whose read-only container members hold empty containers.
    pub fn with_default_constructor(self) -> Self {
        let template = self.default_object();
        self.constructor(Constructor::new(Vec::new(), move |_| {
            Ok(Value::Object(template.clone()))
        }))
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        if !self.protocols.contains(&protocol) {
            self.protocols.push(protocol);
        }
        self
    }

    pub fn insertable(mut self) -> Self {
        self.insertable = true;
        self
    }

    /// Object with every member at its default value.
    pub fn default_object(&self) -> Object {
        self.members
            .iter()
            .fold(Object::new(self.name.clone()), |object, member| {
                let value = match member.access {
                    Access::ReadOnly => empty_container(&member.ty),
                    Access::ReadWrite => Value::Null,
                };
                object.with_field(member.name.clone(), value)
            })
    }

    pub fn member_named(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name == name)
    }

    pub fn is_map_like(&self) -> bool {
        self.protocols.iter().any(|protocol| {
            matches!(protocol, Protocol::Map { .. } | Protocol::ReadOnlyMap { .. })
        })
    }

    pub fn is_collection_like(&self) -> bool {
        self.protocols.iter().any(|protocol| {
            matches!(
                protocol,
                Protocol::List(_) | Protocol::Set(_) | Protocol::Collection(_)
            )
        })
    }

    pub fn is_sequence_like(&self) -> bool {
        self.protocols
            .iter()
            .any(|protocol| matches!(protocol, Protocol::Sequence(_)))
    }

    /// Materialize the descriptor of a structural reference.
    ///
    /// Returns `None` for `Named` references, which only a catalog can resolve.
    pub fn structural(ty: &TypeRef) -> Option<Self> {
        let name = ty.to_string();
        let descriptor = match ty {
            TypeRef::Named(_) => return None,
            TypeRef::Scalar(kind) => {
                Self::with_shape(name, TypeKind::Struct, Shape::Scalar(*kind))
            }
            TypeRef::ByRef(inner) => {
                Self::with_shape(name, TypeKind::Struct, Shape::ByRef((**inner).clone()))
            }
            TypeRef::Nullable(inner) => {
                Self::with_shape(name, TypeKind::Struct, Shape::Nullable((**inner).clone()))
            }
            TypeRef::Array(element) => {
                Self::with_shape(name, TypeKind::Class, Shape::Array((**element).clone()))
                    .protocol(Protocol::Sequence((**element).clone()))
            }
            TypeRef::List(element) => {
                let element = (**element).clone();
                Self::with_shape(name, TypeKind::Class, Shape::Composite)
                    .protocol(Protocol::List(element.clone()))
                    .protocol(Protocol::Collection(element.clone()))
                    .protocol(Protocol::Sequence(element))
                    .insertable()
                    .constructor(empty_constructor(Value::List(Vec::new())))
            }
            TypeRef::Set(element) => {
                let element = (**element).clone();
                Self::with_shape(name, TypeKind::Class, Shape::Composite)
                    .protocol(Protocol::Set(element.clone()))
                    .protocol(Protocol::Collection(element.clone()))
                    .protocol(Protocol::Sequence(element))
                    .insertable()
                    .constructor(empty_constructor(Value::Set(Vec::new())))
            }
            TypeRef::Collection(element) => {
                let element = (**element).clone();
                Self::with_shape(name, TypeKind::Interface, Shape::Composite)
                    .protocol(Protocol::Collection(element.clone()))
                    .protocol(Protocol::Sequence(element))
                    .insertable()
            }
            TypeRef::Sequence(element) => {
                Self::with_shape(name, TypeKind::Interface, Shape::Composite)
                    .protocol(Protocol::Sequence((**element).clone()))
            }
            TypeRef::Map(key, value) => {
                let (key, value) = ((**key).clone(), (**value).clone());
                Self::with_shape(name, TypeKind::Class, Shape::Composite)
                    .protocol(Protocol::Map {
                        key: key.clone(),
                        value: value.clone(),
                    })
                    .protocol(Protocol::ReadOnlyMap { key, value })
                    .insertable()
                    .constructor(empty_constructor(Value::Map(Vec::new())))
            }
            TypeRef::ReadOnlyMap(key, value) => {
                Self::with_shape(name, TypeKind::Interface, Shape::Composite).protocol(
                    Protocol::ReadOnlyMap {
                        key: (**key).clone(),
                        value: (**value).clone(),
                    },
                )
            }
            TypeRef::Record => Self::with_shape(name, TypeKind::Class, Shape::Record),
            TypeRef::Table => Self::with_shape(name, TypeKind::Class, Shape::Table(None)),
            TypeRef::TableSet => Self::with_shape(name, TypeKind::Class, Shape::TableSet(None)),
        };
        Some(descriptor)
    }
}

fn empty_constructor(empty: Value) -> Constructor {
    Constructor::new(Vec::new(), move |_| Ok(empty.clone()))
}

/// Empty container for appendable structural types, `Null` otherwise.
fn empty_container(ty: &TypeRef) -> Value {
    match ty {
        TypeRef::List(_) | TypeRef::Collection(_) | TypeRef::Sequence(_) => {
            Value::List(Vec::new())
        }
        TypeRef::Set(_) => Value::Set(Vec::new()),
        TypeRef::Map(_, _) | TypeRef::ReadOnlyMap(_, _) => Value::Map(Vec::new()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_map_exposes_both_map_protocols() {
        let descriptor =
            TypeDescriptor::structural(&TypeRef::map(ScalarKind::String, ScalarKind::I32))
                .expect("structural map");
        assert_eq!(descriptor.name, "Map<string, i32>");
        assert!(descriptor.is_map_like());
        assert!(descriptor.insertable);
        assert_eq!(descriptor.constructors.len(), 1);
    }

    #[test]
    fn named_references_are_not_structural() {
        assert!(TypeDescriptor::structural(&TypeRef::named("Order")).is_none());
    }

    #[test]
    fn default_constructor_initializes_read_only_containers() {
        let descriptor = TypeDescriptor::composite("Basket")
            .member("Owner", ScalarKind::String)
            .read_only_member("Items", TypeRef::list(ScalarKind::I32))
            .with_default_constructor();

        let value = descriptor.constructors[0]
            .invoke(Vec::new())
            .expect("default constructor");
        let object = value.as_object().expect("object");
        assert_eq!(object.field("Owner"), &Value::Null);
        assert_eq!(object.field("Items"), &Value::List(Vec::new()));
    }
}
