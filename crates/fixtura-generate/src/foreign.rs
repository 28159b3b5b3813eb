use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use fixtura_core::{DataTable, ForeignKey, TableSchema, Value};

use crate::errors::GenerationError;
use crate::scalars::ScalarProvider;

/// Already-populated tables that foreign keys may reference.
pub trait ForeignContext {
    fn related_table(&self, name: &str) -> Option<&DataTable>;
}

/// Tables populated so far while generating a table set.
#[derive(Debug, Default)]
pub struct InMemoryForeignContext {
    tables: BTreeMap<String, DataTable>,
}

impl InMemoryForeignContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest_table(&mut self, table: DataTable) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn take_table(&mut self, name: &str) -> Option<DataTable> {
        self.tables.remove(name)
    }
}

impl ForeignContext for InMemoryForeignContext {
    fn related_table(&self, name: &str) -> Option<&DataTable> {
        self.tables.get(name)
    }
}

impl ForeignContext for &[DataTable] {
    fn related_table(&self, name: &str) -> Option<&DataTable> {
        self.iter().find(|table| table.name == name)
    }
}

/// Source column covered by a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstrainedColumn {
    /// Index of the foreign key in the table schema.
    pub foreign_key: usize,
    /// Position of the column within that foreign key.
    pub position: usize,
}

/// Foreign-key bookkeeping for one table.
#[derive(Debug, Default)]
pub struct ConstraintIndex {
    columns: HashMap<String, ConstrainedColumn>,
    unique_sourced: Vec<bool>,
}

impl ConstraintIndex {
    /// Index every foreign-key source column.
    ///
    /// Rejects columns that source more than one foreign key and
    /// self-references over non-nullable columns.
    pub fn build(schema: &TableSchema) -> Result<Self, GenerationError> {
        let mut index = Self::default();

        for (fk_index, fk) in schema.foreign_keys.iter().enumerate() {
            for (position, column) in fk.columns.iter().enumerate() {
                if index.columns.contains_key(column) {
                    warn!(table = %schema.name, column = %column, "column constrained by several foreign keys");
                    return Err(GenerationError::MultiplyConstrainedColumn {
                        table: schema.name.clone(),
                        column: column.clone(),
                    });
                }
                index.columns.insert(
                    column.clone(),
                    ConstrainedColumn {
                        foreign_key: fk_index,
                        position,
                    },
                );
            }

            if schema.is_self_referencing(fk) && !self_reference_is_nullable(schema, fk) {
                warn!(table = %schema.name, foreign_key = %fk.label(), "non-nullable self reference");
                return Err(GenerationError::SelfReferenceNotNullable {
                    table: schema.name.clone(),
                    foreign_key: fk.label(),
                });
            }

            index.unique_sourced.push(schema.is_unique_sourced(fk));
        }

        Ok(index)
    }

    pub fn constrained(&self, column: &str) -> Option<ConstrainedColumn> {
        self.columns.get(column).copied()
    }

    pub fn is_unique_sourced(&self, foreign_key: usize) -> bool {
        self.unique_sourced.get(foreign_key).copied().unwrap_or(false)
    }
}

fn self_reference_is_nullable(schema: &TableSchema, fk: &ForeignKey) -> bool {
    fk.columns.iter().all(|name| {
        schema
            .column(name)
            .is_some_and(|column| column.nullable)
    })
}

/// Pick the referenced row for one foreign key and return the values of its
/// referenced columns.
///
/// Unique-sourced keys take the target row at `row_index`, so rows map 1:1 in
/// order; other keys take a random target row. Returns `None` when there is
/// no row to reference.
pub fn pick_referenced(
    target: &DataTable,
    fk: &ForeignKey,
    unique_sourced: bool,
    row_index: usize,
    scalars: &mut dyn ScalarProvider,
) -> Option<Vec<Value>> {
    let row = if unique_sourced {
        target.rows.get(row_index)?
    } else if target.rows.is_empty() {
        return None;
    } else {
        target.rows.get(scalars.next_index(target.rows.len()))?
    };

    Some(
        fk.referenced_columns
            .iter()
            .map(|column| {
                target
                    .column_index(column)
                    .and_then(|index| row.get(index))
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect(),
    )
}
