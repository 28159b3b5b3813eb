use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::descriptor::{Shape, TypeDescriptor};
use crate::error::{Error, Result};
use crate::types::TypeRef;
use crate::validation::{validate_table, validate_table_set};

/// Registry of named type descriptors.
///
/// Structural references are materialized on first use and cached; the
/// registry itself is read-only once generation starts.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    named: HashMap<String, Arc<TypeDescriptor>>,
    structural: RwLock<HashMap<TypeRef, Arc<TypeDescriptor>>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named descriptor. Table and table-set schemas are validated.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<()> {
        match &descriptor.shape {
            Shape::Table(Some(schema)) => validate_table(schema)?,
            Shape::TableSet(Some(schema)) => validate_table_set(schema)?,
            _ => {}
        }
        if self.named.contains_key(&descriptor.name) {
            return Err(Error::DuplicateType(descriptor.name));
        }
        self.named
            .insert(descriptor.name.clone(), Arc::new(descriptor));
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: TypeDescriptor) -> Result<Self> {
        self.register(descriptor)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// Descriptor for any type reference.
    pub fn descriptor(&self, ty: &TypeRef) -> Result<Arc<TypeDescriptor>> {
        if let TypeRef::Named(name) = ty {
            return self
                .named
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UnknownType(name.clone()));
        }

        if let Ok(cache) = self.structural.read()
            && let Some(descriptor) = cache.get(ty)
        {
            return Ok(Arc::clone(descriptor));
        }

        let descriptor = TypeDescriptor::structural(ty)
            .map(Arc::new)
            .ok_or_else(|| Error::UnknownType(ty.to_string()))?;
        if let Ok(mut cache) = self.structural.write() {
            cache.insert(ty.clone(), Arc::clone(&descriptor));
        }
        Ok(descriptor)
    }
}
