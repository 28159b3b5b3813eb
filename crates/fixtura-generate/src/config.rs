use std::fmt;
use std::sync::Arc;

use fixtura_core::{TableSchema, TypeRef};

use crate::binder::{Binder, DefaultBinder};
use crate::context::GenerateContext;
use crate::model::GenerateOptions;
use crate::overrides::GenerateOverride;
use crate::scalars::{ScalarProvider, SeededScalars};

pub type RepeatCountFn = Arc<dyn Fn(&GenerateContext<'_>) -> usize + Send + Sync>;
pub type TableRowCountFn = Arc<dyn Fn(&TableSchema) -> usize + Send + Sync>;
pub type ScalarProviderFn = Arc<dyn Fn(Option<u64>) -> Box<dyn ScalarProvider> + Send + Sync>;

/// Immutable configuration template.
///
/// Builder methods consume and return the config, so a per-call
/// configuration is a clone of a shared template with some settings
/// overridden.
#[derive(Clone, Default)]
pub struct GenerateConfig {
    pub options: GenerateOptions,
    overrides: Vec<Arc<dyn GenerateOverride>>,
    repeat_count_fn: Option<RepeatCountFn>,
    table_row_count_fn: Option<TableRowCountFn>,
    scalar_provider_fn: Option<ScalarProviderFn>,
    binder: Option<Arc<dyn Binder>>,
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: GenerateOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_recursive_depth(mut self, depth: usize) -> Self {
        self.options.recursive_depth = depth;
        self
    }

    pub fn with_tree_depth(mut self, depth: Option<usize>) -> Self {
        self.options.tree_depth = depth;
        self
    }

    pub fn with_repeat_count(mut self, count: usize) -> Self {
        self.options.repeat_count = count;
        self.repeat_count_fn = None;
        self
    }

    pub fn with_repeat_count_fn<F>(mut self, count: F) -> Self
    where
        F: Fn(&GenerateContext<'_>) -> usize + Send + Sync + 'static,
    {
        self.repeat_count_fn = Some(Arc::new(count));
        self
    }

    pub fn with_table_row_count(mut self, count: usize) -> Self {
        self.options.table_row_count = Some(count);
        self.table_row_count_fn = None;
        self
    }

    pub fn with_table_row_count_fn<F>(mut self, count: F) -> Self
    where
        F: Fn(&TableSchema) -> usize + Send + Sync + 'static,
    {
        self.table_row_count_fn = Some(Arc::new(count));
        self
    }

    pub fn with_attempts_threshold(mut self, attempts: usize) -> Self {
        self.options.attempts_threshold = attempts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    pub fn with_skip_type(mut self, ty: impl Into<TypeRef>) -> Self {
        let ty = ty.into();
        if !self.options.skip_types.contains(&ty) {
            self.options.skip_types.push(ty);
        }
        self
    }

    /// Skip the `owner.member` path.
    pub fn with_skip_member(mut self, owner: impl Into<TypeRef>, member: &str) -> Self {
        let path = format!("{}.{}", owner.into(), member);
        if !self.options.is_skipped_path(&path) {
            self.options.skip_paths.push(path);
        }
        self
    }

    /// Register an override. Registering the same override twice is a no-op;
    /// overrides apply in registration order.
    pub fn with_override(mut self, generate_override: Arc<dyn GenerateOverride>) -> Self {
        let registered = self
            .overrides
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &generate_override));
        if !registered {
            self.overrides.push(generate_override);
        }
        self
    }

    pub fn with_binder(mut self, binder: Arc<dyn Binder>) -> Self {
        self.binder = Some(binder);
        self
    }

    /// Replace the scalar provider. The factory receives the configured seed.
    pub fn with_scalar_provider<F>(mut self, factory: F) -> Self
    where
        F: Fn(Option<u64>) -> Box<dyn ScalarProvider> + Send + Sync + 'static,
    {
        self.scalar_provider_fn = Some(Arc::new(factory));
        self
    }

    pub fn overrides(&self) -> &[Arc<dyn GenerateOverride>] {
        &self.overrides
    }

    pub fn binder(&self) -> Arc<dyn Binder> {
        match &self.binder {
            Some(binder) => Arc::clone(binder),
            None => Arc::new(DefaultBinder),
        }
    }

    pub fn repeat_count(&self, ctx: &GenerateContext<'_>) -> usize {
        match &self.repeat_count_fn {
            Some(count) => count(ctx),
            None => self.options.repeat_count,
        }
    }

    /// Explicit row count for a table, if one is configured.
    pub fn table_row_count(&self, schema: &TableSchema) -> Option<usize> {
        match &self.table_row_count_fn {
            Some(count) => Some(count(schema)),
            None => self.options.table_row_count,
        }
    }

    pub(crate) fn scalar_provider(&self) -> Box<dyn ScalarProvider> {
        match &self.scalar_provider_fn {
            Some(factory) => factory(self.options.seed),
            None => Box::new(SeededScalars::new(self.options.seed)),
        }
    }
}

impl fmt::Debug for GenerateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateConfig")
            .field("options", &self.options)
            .field("overrides", &self.overrides.len())
            .field("repeat_count_fn", &self.repeat_count_fn.is_some())
            .field("table_row_count_fn", &self.table_row_count_fn.is_some())
            .field("scalar_provider_fn", &self.scalar_provider_fn.is_some())
            .field("custom_binder", &self.binder.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::TypeOverride;
    use fixtura_core::{ScalarKind, Value};

    #[test]
    fn same_override_is_registered_once() {
        let generate_override: Arc<dyn GenerateOverride> =
            Arc::new(TypeOverride::new(ScalarKind::I32, |octx| {
                octx.set_instance(Value::I32(1));
                Ok(())
            }));
        let config = GenerateConfig::new()
            .with_override(Arc::clone(&generate_override))
            .with_override(generate_override);
        assert_eq!(config.overrides().len(), 1);
    }

    #[test]
    fn template_clones_are_independent() {
        let template = GenerateConfig::new().with_repeat_count(4);
        let per_call = template.clone().with_repeat_count(1).with_skip_member("Order", "Lines");

        assert_eq!(template.options.repeat_count, 4);
        assert!(template.options.skip_paths.is_empty());
        assert_eq!(per_call.options.repeat_count, 1);
        assert_eq!(per_call.options.skip_paths, vec!["Order.Lines".to_string()]);
    }

    #[test]
    fn row_count_function_takes_precedence() {
        let table = TableSchema::new("orders");
        let config = GenerateConfig::new()
            .with_table_row_count(3)
            .with_table_row_count_fn(|schema| schema.name.len());
        assert_eq!(config.table_row_count(&table), Some(6));
        assert_eq!(GenerateConfig::new().table_row_count(&table), None);
    }
}
