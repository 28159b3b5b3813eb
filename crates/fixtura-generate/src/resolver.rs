use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use fixtura_core::{
    Protocol, ScalarKind, Shape, TableSchema, TableSetSchema, TypeCatalog, TypeDescriptor,
    TypeRef, Value,
};

use crate::context::GenerateContext;
use crate::errors::GenerationError;
use crate::generators::{containers, record};
use crate::tables;

/// Generation strategy selected for a type.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Record,
    Array(TypeRef),
    Table(Option<Arc<TableSchema>>),
    TableSet(Option<Arc<TableSetSchema>>),
    Enum(Vec<String>),
    Nullable(TypeRef),
    Map { key: TypeRef, value: TypeRef },
    ReadOnlyMap { key: TypeRef, value: TypeRef },
    List(TypeRef),
    Set(TypeRef),
    Collection(TypeRef),
    Sequence(TypeRef),
    Scalar(ScalarKind),
    Composite,
}

/// A resolved strategy together with the descriptor it operates on.
///
/// For by-reference types the descriptor is the referenced type's.
#[derive(Debug)]
pub struct Resolution {
    pub strategy: Strategy,
    pub descriptor: Arc<TypeDescriptor>,
}

impl Resolution {
    pub(crate) fn generate(&self, ctx: &mut GenerateContext<'_>) -> Result<Value, GenerationError> {
        let descriptor = self.descriptor.as_ref();
        match &self.strategy {
            Strategy::Record => record::generate(ctx),
            Strategy::Array(element) => Ok(Value::Array(ctx.generate_many(element, None)?)),
            Strategy::Table(schema) => tables::generate_table(ctx, schema.as_deref()),
            Strategy::TableSet(schema) => tables::generate_table_set(ctx, schema.as_deref()),
            Strategy::Enum(variants) => Ok(containers::pick_enum(ctx, descriptor, variants)),
            Strategy::Nullable(inner) => ctx.generate_value(inner),
            Strategy::Map { key, value } => containers::generate_map(ctx, descriptor, key, value),
            Strategy::ReadOnlyMap { key, value } => {
                containers::generate_read_only_map(ctx, descriptor, key, value)
            }
            Strategy::List(element) | Strategy::Collection(element) => {
                containers::generate_list(ctx, descriptor, element)
            }
            Strategy::Set(element) => containers::generate_set(ctx, descriptor, element),
            Strategy::Sequence(element) => Ok(Value::List(ctx.generate_many(element, None)?)),
            Strategy::Scalar(kind) => Ok(ctx.next_scalar(*kind)),
            Strategy::Composite => generate_composite(ctx, descriptor),
        }
    }
}

fn generate_composite(
    ctx: &mut GenerateContext<'_>,
    descriptor: &TypeDescriptor,
) -> Result<Value, GenerationError> {
    let binder = ctx.config().binder();
    let mut instance = binder.create_instance(ctx, descriptor)?;
    if instance.is_null() {
        return Ok(instance);
    }
    binder.populate_instance(ctx, &mut instance, descriptor, None)?;
    Ok(instance)
}

/// Maps type references to strategies, caching each resolution.
#[derive(Debug, Default)]
pub struct Resolver {
    cache: RwLock<HashMap<TypeRef, Arc<Resolution>>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &self,
        catalog: &TypeCatalog,
        ty: &TypeRef,
    ) -> Result<Arc<Resolution>, GenerationError> {
        if let Ok(cache) = self.cache.read()
            && let Some(resolution) = cache.get(ty)
        {
            return Ok(Arc::clone(resolution));
        }

        let resolution = Arc::new(resolve_uncached(catalog, ty)?);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(ty.clone(), Arc::clone(&resolution));
        }
        Ok(resolution)
    }
}

fn resolve_uncached(catalog: &TypeCatalog, ty: &TypeRef) -> Result<Resolution, GenerationError> {
    let descriptor = catalog.descriptor(ty)?;

    let strategy = match &descriptor.shape {
        Shape::ByRef(inner) => return resolve_uncached(catalog, inner),
        Shape::Record => Strategy::Record,
        Shape::Array(element) => Strategy::Array(element.clone()),
        Shape::Table(schema) => Strategy::Table(schema.clone()),
        Shape::TableSet(schema) => Strategy::TableSet(schema.clone()),
        Shape::Enum(variants) => Strategy::Enum(variants.clone()),
        Shape::Nullable(inner) => Strategy::Nullable(inner.clone()),
        Shape::Scalar(kind) => {
            container_strategy(ty, &descriptor).unwrap_or(Strategy::Scalar(*kind))
        }
        Shape::Composite => container_strategy(ty, &descriptor).unwrap_or(Strategy::Composite),
    };

    Ok(Resolution {
        strategy,
        descriptor,
    })
}

/// Container protocol with the highest priority:
/// map > read-only map > list > set > collection > sequence.
fn container_strategy(ty: &TypeRef, descriptor: &TypeDescriptor) -> Option<Strategy> {
    let find = |pick: fn(&Protocol) -> Option<Strategy>| descriptor.protocols.iter().find_map(pick);

    let read_only = find(|protocol| match protocol {
        Protocol::ReadOnlyMap { key, value } => Some(Strategy::ReadOnlyMap {
            key: key.clone(),
            value: value.clone(),
        }),
        _ => None,
    });

    if let Some(map) = find(|protocol| match protocol {
        Protocol::Map { key, value } => Some(Strategy::Map {
            key: key.clone(),
            value: value.clone(),
        }),
        _ => None,
    }) {
        return match read_only {
            Some(read_only) if !descriptor.insertable => Some(read_only),
            _ => Some(map),
        };
    }
    if read_only.is_some() {
        return read_only;
    }

    find(|protocol| match protocol {
        Protocol::List(element) => Some(Strategy::List(element.clone())),
        _ => None,
    })
    .or_else(|| {
        find(|protocol| match protocol {
            Protocol::Set(element) => Some(Strategy::Set(element.clone())),
            _ => None,
        })
    })
    .or_else(|| {
        find(|protocol| match protocol {
            Protocol::Collection(element) => Some(Strategy::Collection(element.clone())),
            _ => None,
        })
    })
    .or_else(|| match ty {
        TypeRef::Sequence(element) => Some(Strategy::Sequence((**element).clone())),
        _ => None,
    })
}
