use std::sync::Arc;

use tracing::{info, warn};

use fixtura_core::{DataTable, Shape, TypeCatalog, TypeRef, Value};

use crate::config::GenerateConfig;
use crate::context::GenerateContext;
use crate::errors::GenerationError;
use crate::resolver::Resolver;
use crate::tables;

/// Entry point for generating and populating values.
///
/// A `Faker` owns the configuration template and caches resolved strategies
/// across requests; every request runs in its own [`GenerateContext`].
#[derive(Debug)]
pub struct Faker {
    catalog: Arc<TypeCatalog>,
    config: GenerateConfig,
    resolver: Resolver,
}

impl Faker {
    pub fn new(catalog: impl Into<Arc<TypeCatalog>>) -> Self {
        Self {
            catalog: catalog.into(),
            config: GenerateConfig::default(),
            resolver: Resolver::new(),
        }
    }

    pub fn with_config(mut self, config: GenerateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GenerateConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Generate one value of `ty`.
    pub fn generate(&self, ty: &TypeRef) -> Result<Value, GenerationError> {
        self.generate_using(&self.config, ty)
    }

    /// Generate with a per-call configuration derived from the template.
    pub fn generate_with<F>(&self, ty: &TypeRef, configure: F) -> Result<Value, GenerationError>
    where
        F: FnOnce(GenerateConfig) -> GenerateConfig,
    {
        let config = configure(self.config.clone());
        self.generate_using(&config, ty)
    }

    /// Generate `count` independent values of `ty`, each in its own request.
    pub fn generate_many(&self, ty: &TypeRef, count: usize) -> Result<Vec<Value>, GenerationError> {
        (0..count).map(|_| self.generate(ty)).collect()
    }

    /// Populate an existing instance of `ty`.
    ///
    /// Objects have their members populated (every candidate member, or
    /// exactly `members` when given) without being reconstructed. Records,
    /// tables and table sets are regenerated from the instance.
    pub fn populate(
        &self,
        instance: &mut Value,
        ty: &TypeRef,
        members: Option<&[&str]>,
    ) -> Result<(), GenerationError> {
        info!(type_name = %ty, members = ?members, "population started");

        let config = &self.config;
        let mut ctx = GenerateContext::new(config, &self.catalog, &self.resolver, ty.clone());
        let resolution = self.resolver.resolve(&self.catalog, ty)?;

        let result = match instance {
            Value::Object(_) => {
                let binder = config.binder();
                binder.populate_instance(&mut ctx, instance, &resolution.descriptor, members)
            }
            Value::Record(_) | Value::Table(_) | Value::TableSet(_) => {
                let current = std::mem::replace(instance, Value::Null);
                match ctx.generate_request(None, ty.clone(), None, Some(current.clone())) {
                    Ok(populated) => {
                        *instance = populated;
                        Ok(())
                    }
                    Err(err) => {
                        *instance = current;
                        Err(err)
                    }
                }
            }
            other => Err(GenerationError::InvalidInstance {
                type_name: ty.to_string(),
                message: format!("value {:?} cannot be populated", other.to_json()),
            }),
        };

        match &result {
            Ok(()) => info!(type_name = %ty, "population finished"),
            Err(err) => warn!(type_name = %ty, error = %err, "population failed"),
        }
        result
    }

    /// Append generated rows to `table`, a table of type `ty`, resolving
    /// foreign keys against `related`.
    pub fn populate_table(
        &self,
        table: &mut DataTable,
        ty: &TypeRef,
        related: &[DataTable],
    ) -> Result<(), GenerationError> {
        let descriptor = self.catalog.descriptor(ty)?;
        let Shape::Table(Some(schema)) = &descriptor.shape else {
            return Err(GenerationError::InvalidInstance {
                type_name: ty.to_string(),
                message: "not a typed table".to_string(),
            });
        };

        info!(table = %schema.name, related = related.len(), "table population started");
        let mut ctx = GenerateContext::new(&self.config, &self.catalog, &self.resolver, ty.clone());
        let result = tables::populate_rows(&mut ctx, schema, table, &related);
        if let Err(err) = &result {
            warn!(table = %schema.name, error = %err, "table population failed");
        }
        result
    }

    fn generate_using(
        &self,
        config: &GenerateConfig,
        ty: &TypeRef,
    ) -> Result<Value, GenerationError> {
        info!(
            type_name = %ty,
            seed = ?config.options.seed,
            recursive_depth = config.options.recursive_depth,
            "generation started"
        );

        let mut ctx = GenerateContext::new(config, &self.catalog, &self.resolver, ty.clone());
        match ctx.generate_value(ty) {
            Ok(value) => {
                info!(type_name = %ty, "generation finished");
                Ok(value)
            }
            Err(err) => {
                warn!(type_name = %ty, error = %err, "generation failed");
                Err(err)
            }
        }
    }
}
