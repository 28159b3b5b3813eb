use std::fmt;
use std::sync::Arc;

use fixtura_core::{TypeRef, Value};

use crate::context::GenerateContext;
use crate::errors::GenerationError;
use crate::resolver::Resolution;

/// Interceptor for generation requests.
///
/// Overrides are matched against every request; matching overrides run in
/// registration order, each seeing the instance left by the previous one.
pub trait GenerateOverride: Send + Sync {
    fn can_override(&self, ctx: &GenerateContext<'_>) -> bool;

    fn generate(&self, octx: &mut OverrideContext<'_, '_>) -> Result<(), GenerationError>;

    /// When `true`, the default strategy runs first and its result is the
    /// starting instance. When `false`, the override alone produces the value.
    fn preinitialize(&self) -> bool {
        true
    }
}

/// View of the current request handed to an override.
pub struct OverrideContext<'c, 'a> {
    instance: Option<Value>,
    ctx: &'c mut GenerateContext<'a>,
}

impl<'c, 'a> OverrideContext<'c, 'a> {
    fn new(ctx: &'c mut GenerateContext<'a>) -> Self {
        Self {
            instance: None,
            ctx,
        }
    }

    pub fn instance(&self) -> Option<&Value> {
        self.instance.as_ref()
    }

    pub fn instance_mut(&mut self) -> Option<&mut Value> {
        self.instance.as_mut()
    }

    pub fn set_instance(&mut self, value: Value) {
        self.instance = Some(value);
    }

    pub fn generate_type(&self) -> &TypeRef {
        self.ctx.generate_type()
    }

    pub fn generate_name(&self) -> Option<&str> {
        self.ctx.generate_name()
    }

    pub fn parent_type(&self) -> Option<&TypeRef> {
        self.ctx.parent_type()
    }

    /// The underlying context, for nested generation and scalar values.
    pub fn context(&mut self) -> &mut GenerateContext<'a> {
        &mut *self.ctx
    }
}

type OverrideFn = dyn Fn(&mut OverrideContext<'_, '_>) -> Result<(), GenerationError> + Send + Sync;

/// Override for every request of one type.
pub struct TypeOverride {
    ty: TypeRef,
    apply: Box<OverrideFn>,
    preinitialize: bool,
}

impl TypeOverride {
    pub fn new<F>(ty: impl Into<TypeRef>, apply: F) -> Self
    where
        F: Fn(&mut OverrideContext<'_, '_>) -> Result<(), GenerationError> + Send + Sync + 'static,
    {
        Self {
            ty: ty.into(),
            apply: Box::new(apply),
            preinitialize: true,
        }
    }

    pub fn with_preinitialize(mut self, preinitialize: bool) -> Self {
        self.preinitialize = preinitialize;
        self
    }
}

impl GenerateOverride for TypeOverride {
    fn can_override(&self, ctx: &GenerateContext<'_>) -> bool {
        *ctx.generate_type() == self.ty
    }

    fn generate(&self, octx: &mut OverrideContext<'_, '_>) -> Result<(), GenerationError> {
        (self.apply)(octx)
    }

    fn preinitialize(&self) -> bool {
        self.preinitialize
    }
}

impl fmt::Debug for TypeOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeOverride")
            .field("ty", &self.ty)
            .field("preinitialize", &self.preinitialize)
            .finish_non_exhaustive()
    }
}

/// Override for one member (or constructor parameter) of an owner type.
/// Member names match case-insensitively.
pub struct MemberOverride {
    owner: TypeRef,
    member: String,
    apply: Box<OverrideFn>,
    preinitialize: bool,
}

impl MemberOverride {
    pub fn new<F>(owner: impl Into<TypeRef>, member: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&mut OverrideContext<'_, '_>) -> Result<(), GenerationError> + Send + Sync + 'static,
    {
        Self {
            owner: owner.into(),
            member: member.into(),
            apply: Box::new(apply),
            preinitialize: true,
        }
    }

    pub fn with_preinitialize(mut self, preinitialize: bool) -> Self {
        self.preinitialize = preinitialize;
        self
    }
}

impl GenerateOverride for MemberOverride {
    fn can_override(&self, ctx: &GenerateContext<'_>) -> bool {
        ctx.parent_type() == Some(&self.owner)
            && ctx
                .generate_name()
                .is_some_and(|name| name.eq_ignore_ascii_case(&self.member))
    }

    fn generate(&self, octx: &mut OverrideContext<'_, '_>) -> Result<(), GenerationError> {
        (self.apply)(octx)
    }

    fn preinitialize(&self) -> bool {
        self.preinitialize
    }
}

impl fmt::Debug for MemberOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberOverride")
            .field("owner", &self.owner)
            .field("member", &self.member)
            .field("preinitialize", &self.preinitialize)
            .finish_non_exhaustive()
    }
}

/// Run the matching overrides around the resolved strategy.
///
/// The strategy runs at most once per missing instance, and only for
/// overrides that ask for preinitialization.
pub(crate) fn run_chain(
    ctx: &mut GenerateContext<'_>,
    resolution: &Resolution,
    overrides: &[Arc<dyn GenerateOverride>],
) -> Result<Value, GenerationError> {
    let mut octx = OverrideContext::new(ctx);

    for generate_override in overrides {
        if generate_override.preinitialize() && octx.instance.as_ref().is_none_or(Value::is_null)
        {
            let seed = resolution.generate(&mut *octx.ctx)?;
            octx.instance = Some(seed);
        }
        generate_override.generate(&mut octx)?;
    }

    Ok(octx.instance.take().unwrap_or(Value::Null))
}
