use std::sync::Arc;

use tracing::debug;

use fixtura_core::{ScalarKind, TypeCatalog, TypeRef, Value};

use crate::config::GenerateConfig;
use crate::errors::GenerationError;
use crate::overrides::{self, GenerateOverride};
use crate::resolver::Resolver;
use crate::scalars::ScalarProvider;

/// Per-request generation state threaded through every nested call.
///
/// The current request (`parent_type`, `generate_type`, `generate_name`) is
/// scoped: it is replaced for each nested call and restored when that call
/// returns, on error paths too.
pub struct GenerateContext<'a> {
    config: &'a GenerateConfig,
    catalog: &'a TypeCatalog,
    resolver: &'a Resolver,
    scalars: Box<dyn ScalarProvider>,
    parent_type: Option<TypeRef>,
    generate_type: TypeRef,
    generate_name: Option<String>,
    types_stack: Vec<TypeRef>,
    instance: Option<Value>,
    last_id: i32,
}

struct Scope {
    parent_type: Option<TypeRef>,
    generate_type: TypeRef,
    generate_name: Option<String>,
    instance: Option<Value>,
}

impl<'a> GenerateContext<'a> {
    pub(crate) fn new(
        config: &'a GenerateConfig,
        catalog: &'a TypeCatalog,
        resolver: &'a Resolver,
        generate_type: TypeRef,
    ) -> Self {
        Self {
            config,
            catalog,
            resolver,
            scalars: config.scalar_provider(),
            parent_type: None,
            generate_type,
            generate_name: None,
            types_stack: Vec::new(),
            instance: None,
            last_id: 0,
        }
    }

    pub fn config(&self) -> &'a GenerateConfig {
        self.config
    }

    pub fn catalog(&self) -> &'a TypeCatalog {
        self.catalog
    }

    pub fn parent_type(&self) -> Option<&TypeRef> {
        self.parent_type.as_ref()
    }

    pub fn generate_type(&self) -> &TypeRef {
        &self.generate_type
    }

    pub fn generate_name(&self) -> Option<&str> {
        self.generate_name.as_deref()
    }

    /// Types currently being generated on this call path, outermost first.
    pub fn types_stack(&self) -> &[TypeRef] {
        &self.types_stack
    }

    pub fn scalars(&mut self) -> &mut dyn ScalarProvider {
        self.scalars.as_mut()
    }

    pub fn next_scalar(&mut self, kind: ScalarKind) -> Value {
        self.scalars.next_scalar(kind)
    }

    /// Next value of the request-scoped identifier counter, starting at 1.
    pub fn next_id(&mut self) -> i32 {
        self.last_id = self.last_id.wrapping_add(1);
        self.last_id
    }

    pub fn repeat_count(&self) -> usize {
        self.config.repeat_count(self)
    }

    /// Type whose members are being populated: the requested type with any
    /// by-reference wrapper removed.
    pub fn owner_type(&self) -> TypeRef {
        match &self.generate_type {
            TypeRef::ByRef(inner) => (**inner).clone(),
            other => other.clone(),
        }
    }

    /// Generate one value of `ty` outside of any member.
    pub fn generate_value(&mut self, ty: &TypeRef) -> Result<Value, GenerationError> {
        self.generate_request(None, ty.clone(), None, None)
    }

    /// Generate the value of a member or constructor parameter of `parent`.
    pub fn generate_member(
        &mut self,
        parent: TypeRef,
        ty: TypeRef,
        name: impl Into<String>,
    ) -> Result<Value, GenerationError> {
        self.generate_request(Some(parent), ty, Some(name.into()), None)
    }

    /// Generate `count` values (the repeat count when `None`), dropping
    /// values that could not be generated.
    pub fn generate_many(
        &mut self,
        ty: &TypeRef,
        count: Option<usize>,
    ) -> Result<Vec<Value>, GenerationError> {
        let count = count.unwrap_or_else(|| self.repeat_count());
        let mut items = Vec::with_capacity(count);
        self.fill(ty, &mut items, count)?;
        Ok(items)
    }

    /// Generate up to `count` distinct values.
    ///
    /// Duplicates are removed and only the shortfall is regenerated, for at
    /// most `attempts_threshold` rounds; fewer items are returned when the
    /// domain of `ty` is too small.
    pub fn generate_unique_many(
        &mut self,
        ty: &TypeRef,
        count: Option<usize>,
    ) -> Result<Vec<Value>, GenerationError> {
        let count = count.unwrap_or_else(|| self.repeat_count());
        let attempts = self.config.options.attempts_threshold.max(1);
        let mut items = Vec::with_capacity(count);

        for _ in 0..attempts {
            self.fill(ty, &mut items, count)?;
            dedup(&mut items);
            if items.len() >= count {
                return Ok(items);
            }
        }

        debug!(
            type_name = %ty,
            requested = count,
            generated = items.len(),
            "unique generation fell short"
        );
        Ok(items)
    }

    fn fill(
        &mut self,
        ty: &TypeRef,
        items: &mut Vec<Value>,
        count: usize,
    ) -> Result<(), GenerationError> {
        for _ in items.len()..count {
            let item = self.generate_value(ty)?;
            if !item.is_null() {
                items.push(item);
            }
        }
        Ok(())
    }

    pub(crate) fn generate_request(
        &mut self,
        parent: Option<TypeRef>,
        ty: TypeRef,
        name: Option<String>,
        instance: Option<Value>,
    ) -> Result<Value, GenerationError> {
        let scope = self.enter(parent, ty, name, instance);
        let result = self.run_current();
        self.leave(scope);
        result
    }

    /// Take the partially-built instance handed to the current request.
    pub fn take_instance(&mut self) -> Option<Value> {
        self.instance.take()
    }

    pub(crate) fn push_type(&mut self, ty: TypeRef) {
        self.types_stack.push(ty);
    }

    pub(crate) fn pop_type(&mut self) {
        self.types_stack.pop();
    }

    fn enter(
        &mut self,
        parent: Option<TypeRef>,
        ty: TypeRef,
        name: Option<String>,
        instance: Option<Value>,
    ) -> Scope {
        Scope {
            parent_type: std::mem::replace(&mut self.parent_type, parent),
            generate_type: std::mem::replace(&mut self.generate_type, ty),
            generate_name: std::mem::replace(&mut self.generate_name, name),
            instance: std::mem::replace(&mut self.instance, instance),
        }
    }

    fn leave(&mut self, scope: Scope) {
        self.parent_type = scope.parent_type;
        self.generate_type = scope.generate_type;
        self.generate_name = scope.generate_name;
        self.instance = scope.instance;
    }

    fn run_current(&mut self) -> Result<Value, GenerationError> {
        let resolver = self.resolver;
        let config = self.config;
        let resolution = resolver.resolve(self.catalog, &self.generate_type)?;

        let matching: Vec<Arc<dyn GenerateOverride>> = config
            .overrides()
            .iter()
            .filter(|generate_override| generate_override.can_override(self))
            .cloned()
            .collect();

        if matching.is_empty() {
            resolution.generate(self)
        } else {
            overrides::run_chain(self, &resolution, &matching)
        }
    }
}

fn dedup(items: &mut Vec<Value>) {
    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    *items = unique;
}
