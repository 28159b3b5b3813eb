use tracing::debug;

use fixtura_core::{Access, Constructor, Member, TypeDescriptor, TypeKind, TypeRef, Value};

use crate::context::GenerateContext;
use crate::errors::GenerationError;
use crate::generators::containers::{append_entries, append_items};

/// Creates and populates composite instances.
///
/// Install a custom binder through
/// [`GenerateConfig::with_binder`](crate::config::GenerateConfig::with_binder)
/// to supply instances for types without constructors.
pub trait Binder: Send + Sync {
    fn create_instance(
        &self,
        ctx: &mut GenerateContext<'_>,
        descriptor: &TypeDescriptor,
    ) -> Result<Value, GenerationError>;

    /// Populate members of `instance`: the default candidate set, or exactly
    /// the named members when `members` is given.
    fn populate_instance(
        &self,
        ctx: &mut GenerateContext<'_>,
        instance: &mut Value,
        descriptor: &TypeDescriptor,
        members: Option<&[&str]>,
    ) -> Result<(), GenerationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBinder;

impl Binder for DefaultBinder {
    fn create_instance(
        &self,
        ctx: &mut GenerateContext<'_>,
        descriptor: &TypeDescriptor,
    ) -> Result<Value, GenerationError> {
        let Some(constructor) = select_constructor(descriptor) else {
            return match descriptor.kind {
                TypeKind::Struct => Ok(Value::Object(descriptor.default_object())),
                TypeKind::Interface | TypeKind::Abstract => Ok(Value::Null),
                TypeKind::Class => Err(GenerationError::ConstructorNotFound {
                    type_name: descriptor.name.clone(),
                }),
            };
        };

        let owner = ctx.owner_type();
        let mut args = Vec::with_capacity(constructor.arity());
        for param in &constructor.params {
            let path = format!("{}.{}", descriptor.name, param.name);
            if should_skip(ctx, &param.ty, &path) {
                debug!(path = %path, param_type = %param.ty, "parameter skipped");
                args.push(Value::Null);
                continue;
            }

            ctx.push_type(param.ty.clone());
            let value = ctx.generate_member(owner.clone(), param.ty.clone(), param.name.clone());
            ctx.pop_type();
            args.push(value?);
        }

        constructor
            .invoke(args)
            .map_err(|message| GenerationError::ConstructorFailed {
                type_name: descriptor.name.clone(),
                message,
            })
    }

    fn populate_instance(
        &self,
        ctx: &mut GenerateContext<'_>,
        instance: &mut Value,
        descriptor: &TypeDescriptor,
        members: Option<&[&str]>,
    ) -> Result<(), GenerationError> {
        let owner = ctx.owner_type();
        let candidates = candidate_members(ctx, descriptor, members)?;
        let Some(object) = instance.as_object_mut() else {
            return Ok(());
        };

        for member in candidates {
            let path = format!("{}.{}", descriptor.name, member.name);
            if should_skip(ctx, &member.ty, &path) {
                debug!(path = %path, member_type = %member.ty, "member skipped");
                continue;
            }

            ctx.push_type(member.ty.clone());
            let value = ctx.generate_member(owner.clone(), member.ty.clone(), member.name.clone());
            ctx.pop_type();
            let value = value?;

            match member.access {
                Access::ReadWrite => object.set(member.name.clone(), value),
                Access::ReadOnly => {
                    if let Err(reason) = append_into(object.get_mut(&member.name), value) {
                        debug!(path = %path, reason, "population failed, member left unchanged");
                    }
                }
            }
        }

        Ok(())
    }
}

/// Constructor choice: a single map argument for map-like types, a single
/// sequence argument for sequence-like types, then a zero-argument
/// constructor, then the first declared one.
fn select_constructor(descriptor: &TypeDescriptor) -> Option<&Constructor> {
    let single = move |accepts: fn(&TypeRef) -> bool| {
        descriptor
            .constructors
            .iter()
            .find(|constructor| constructor.arity() == 1 && accepts(&constructor.params[0].ty))
    };

    let preferred = if descriptor.is_map_like() {
        single(|ty| matches!(ty, TypeRef::Map(_, _) | TypeRef::ReadOnlyMap(_, _)))
    } else if descriptor.is_sequence_like() {
        single(|ty| matches!(ty, TypeRef::Sequence(_)))
    } else {
        None
    };

    preferred
        .or_else(|| {
            descriptor
                .constructors
                .iter()
                .find(|constructor| constructor.arity() == 0)
        })
        .or_else(|| descriptor.constructors.first())
}

fn candidate_members<'d>(
    ctx: &GenerateContext<'_>,
    descriptor: &'d TypeDescriptor,
    members: Option<&[&str]>,
) -> Result<Vec<&'d Member>, GenerationError> {
    if let Some(names) = members {
        if let Some(unknown) = names
            .iter()
            .find(|name| descriptor.member_named(name).is_none())
        {
            return Err(GenerationError::UnknownMember {
                type_name: descriptor.name.clone(),
                member: unknown.to_string(),
            });
        }
        return Ok(descriptor
            .members
            .iter()
            .filter(|member| names.contains(&member.name.as_str()))
            .collect());
    }

    Ok(descriptor
        .members
        .iter()
        .filter(|member| match member.access {
            Access::ReadWrite => true,
            Access::ReadOnly => ctx
                .catalog()
                .descriptor(&member.ty)
                .is_ok_and(|ty| ty.is_map_like() || ty.is_collection_like()),
        })
        .collect())
}

/// Skip rules, in order: skipped types and paths, tree depth, then
/// recursion depth of the member's type on the current path.
fn should_skip(ctx: &GenerateContext<'_>, ty: &TypeRef, path: &str) -> bool {
    let options = &ctx.config().options;
    if options.is_skipped_type(ty) || options.is_skipped_path(path) {
        return true;
    }

    let stack = ctx.types_stack();
    if options.tree_depth.is_some_and(|depth| stack.len() >= depth) {
        return true;
    }

    let recursion = stack.iter().filter(|entry| *entry == ty).count();
    recursion >= options.recursive_depth
}

/// Append a generated container into the container already held by a
/// read-only member.
fn append_into(target: Option<&mut Value>, value: Value) -> Result<(), &'static str> {
    let Some(target) = target else {
        return Ok(());
    };
    match target {
        Value::Null => Ok(()),
        Value::Map(_) => match value {
            Value::Map(entries) => {
                let current = std::mem::replace(target, Value::Null);
                *target = append_entries(current, entries);
                Ok(())
            }
            _ => Err("generated value is not a map"),
        },
        Value::List(_) | Value::Set(_) | Value::Array(_) => match value {
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                let current = std::mem::replace(target, Value::Null);
                *target = append_items(current, items);
                Ok(())
            }
            _ => Err("generated value is not a collection"),
        },
        _ => Err("member does not hold an appendable container"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtura_core::{Parameter, ScalarKind};

    #[test]
    fn prefers_zero_argument_constructor() {
        let descriptor = TypeDescriptor::composite("Order")
            .constructor(Constructor::new(
                vec![Parameter::new("id", ScalarKind::I32)],
                |_| Ok(Value::Null),
            ))
            .constructor(Constructor::new(Vec::new(), |_| Ok(Value::Bool(true))));

        let constructor = select_constructor(&descriptor).expect("constructor");
        assert_eq!(constructor.arity(), 0);
    }

    #[test]
    fn sequence_like_types_prefer_sequence_constructor() {
        let descriptor = TypeDescriptor::composite("Pages")
            .protocol(fixtura_core::Protocol::Sequence(ScalarKind::String.into()))
            .constructor(Constructor::new(Vec::new(), |_| Ok(Value::Null)))
            .constructor(Constructor::new(
                vec![Parameter::new("items", TypeRef::sequence(ScalarKind::String))],
                |_| Ok(Value::Null),
            ));

        let constructor = select_constructor(&descriptor).expect("constructor");
        assert_eq!(constructor.arity(), 1);
    }

    #[test]
    fn append_into_rejects_mismatched_values() {
        let mut target = Value::List(vec![Value::I32(1)]);
        append_into(Some(&mut target), Value::List(vec![Value::I32(2)])).expect("append");
        assert_eq!(target, Value::List(vec![Value::I32(1), Value::I32(2)]));

        assert!(append_into(Some(&mut target), Value::I32(3)).is_err());
        assert_eq!(target, Value::List(vec![Value::I32(1), Value::I32(2)]));

        let mut empty = Value::Null;
        append_into(Some(&mut empty), Value::List(vec![Value::I32(1)])).expect("ignored");
        assert_eq!(empty, Value::Null);
    }
}
