use fixtura_core::{TypeDescriptor, TypeRef, Value};

use crate::context::GenerateContext;
use crate::errors::GenerationError;

/// Uniform pick among the declared variants; `Null` when there are none.
pub(crate) fn pick_enum(
    ctx: &mut GenerateContext<'_>,
    descriptor: &TypeDescriptor,
    variants: &[String],
) -> Value {
    let index = ctx.scalars().next_index(variants.len());
    match variants.get(index) {
        Some(variant) => Value::Enum {
            type_name: descriptor.name.clone(),
            variant: variant.clone(),
        },
        None => Value::Null,
    }
}

pub(crate) fn generate_list(
    ctx: &mut GenerateContext<'_>,
    descriptor: &TypeDescriptor,
    element: &TypeRef,
) -> Result<Value, GenerationError> {
    let container = construct_empty(descriptor, |value| {
        matches!(value, Value::List(_) | Value::Array(_))
    })
    .unwrap_or(Value::List(Vec::new()));
    let items = ctx.generate_many(element, None)?;
    Ok(append_items(container, items))
}

/// Set of generated elements; duplicates collapse, so the set may hold fewer
/// elements than the repeat count.
pub(crate) fn generate_set(
    ctx: &mut GenerateContext<'_>,
    descriptor: &TypeDescriptor,
    element: &TypeRef,
) -> Result<Value, GenerationError> {
    let container = construct_empty(descriptor, |value| matches!(value, Value::Set(_)))
        .unwrap_or(Value::Set(Vec::new()));
    let items = ctx.generate_many(element, None)?;
    Ok(append_items(container, items))
}

pub(crate) fn generate_map(
    ctx: &mut GenerateContext<'_>,
    descriptor: &TypeDescriptor,
    key: &TypeRef,
    value: &TypeRef,
) -> Result<Value, GenerationError> {
    let container = construct_empty(descriptor, |value| matches!(value, Value::Map(_)))
        .unwrap_or(Value::Map(Vec::new()));
    let entries = generate_entries(ctx, key, value)?;
    Ok(append_entries(container, entries))
}

/// Build a plain map, then hand it to the type's single map-argument
/// constructor when it has one.
pub(crate) fn generate_read_only_map(
    ctx: &mut GenerateContext<'_>,
    descriptor: &TypeDescriptor,
    key: &TypeRef,
    value: &TypeRef,
) -> Result<Value, GenerationError> {
    let map = Value::Map(generate_entries(ctx, key, value)?);

    let constructor = descriptor.constructors.iter().find(|constructor| {
        constructor.arity() == 1
            && matches!(
                constructor.params[0].ty,
                TypeRef::Map(_, _) | TypeRef::ReadOnlyMap(_, _)
            )
    });

    match constructor {
        Some(constructor) => {
            constructor
                .invoke(vec![map])
                .map_err(|message| GenerationError::ConstructorFailed {
                    type_name: descriptor.name.clone(),
                    message,
                })
        }
        None => Ok(map),
    }
}

/// Unique keys, one generated value per key; pairs without a value are
/// dropped.
fn generate_entries(
    ctx: &mut GenerateContext<'_>,
    key: &TypeRef,
    value: &TypeRef,
) -> Result<Vec<(Value, Value)>, GenerationError> {
    let keys = ctx.generate_unique_many(key, None)?;
    let mut entries = Vec::with_capacity(keys.len());
    for key in keys {
        let value = ctx.generate_value(value)?;
        if !value.is_null() {
            entries.push((key, value));
        }
    }
    Ok(entries)
}

/// Result of the type's own zero-argument constructor, when it yields the
/// expected container.
fn construct_empty(descriptor: &TypeDescriptor, accepts: fn(&Value) -> bool) -> Option<Value> {
    descriptor
        .constructors
        .iter()
        .find(|constructor| constructor.arity() == 0)
        .and_then(|constructor| constructor.invoke(Vec::new()).ok())
        .filter(accepts)
}

pub(crate) fn append_items(container: Value, items: Vec<Value>) -> Value {
    match container {
        Value::List(mut existing) => {
            existing.extend(items);
            Value::List(existing)
        }
        Value::Array(mut existing) => {
            existing.extend(items);
            Value::Array(existing)
        }
        Value::Set(mut existing) => {
            for item in items {
                if !existing.contains(&item) {
                    existing.push(item);
                }
            }
            Value::Set(existing)
        }
        other => other,
    }
}

pub(crate) fn append_entries(container: Value, entries: Vec<(Value, Value)>) -> Value {
    match container {
        Value::Map(mut existing) => {
            for (key, value) in entries {
                if !existing.iter().any(|(present, _)| *present == key) {
                    existing.push((key, value));
                }
            }
            Value::Map(existing)
        }
        other => other,
    }
}
