use serde::{Deserialize, Serialize};

use fixtura_core::TypeRef;

/// Options for the generation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// How many times a type may appear on the current path before members of
    /// that type are skipped.
    pub recursive_depth: usize,
    /// Maximum stack depth at which members are still populated.
    pub tree_depth: Option<usize>,
    /// Number of elements generated for containers.
    pub repeat_count: usize,
    /// Explicit row count for generated tables.
    pub table_row_count: Option<usize>,
    /// Regeneration rounds allowed when collecting unique items.
    pub attempts_threshold: usize,
    /// Seed for the scalar provider; a random seed is drawn when unset.
    pub seed: Option<u64>,
    pub skip_types: Vec<TypeRef>,
    /// `"Type.Member"` paths never populated.
    pub skip_paths: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            recursive_depth: 2,
            tree_depth: None,
            repeat_count: 3,
            table_row_count: None,
            attempts_threshold: 3,
            seed: None,
            skip_types: Vec::new(),
            skip_paths: Vec::new(),
        }
    }
}

impl GenerateOptions {
    pub fn is_skipped_type(&self, ty: &TypeRef) -> bool {
        self.skip_types.contains(ty)
    }

    pub fn is_skipped_path(&self, path: &str) -> bool {
        self.skip_paths.iter().any(|skip| skip == path)
    }
}
