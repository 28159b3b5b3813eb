use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::{ForeignKey, UniqueConstraint};
use crate::types::{ScalarKind, TypeRef};

/// A set of interdependent tables generated together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableSetSchema {
    pub name: String,
    pub tables: Vec<TableSchema>,
}

impl TableSetSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.tables.push(table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|table| table.name == name)
    }
}

/// Tabular schema with declared columns and constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub unique_constraints: Vec<UniqueConstraint>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            unique_constraints: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_unique(mut self, constraint: UniqueConstraint) -> Self {
        self.unique_constraints.push(constraint);
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    /// Whether the column is unique on its own or covered by a declared
    /// uniqueness constraint.
    pub fn is_unique_column(&self, name: &str) -> bool {
        self.column(name).is_some_and(|column| column.unique)
            || self
                .unique_constraints
                .iter()
                .any(|constraint| constraint.contains(name))
    }

    /// A foreign key is unique-sourced when any of its source columns is unique.
    pub fn is_unique_sourced(&self, foreign_key: &ForeignKey) -> bool {
        foreign_key
            .columns
            .iter()
            .any(|column| self.is_unique_column(column))
    }

    pub fn is_self_referencing(&self, foreign_key: &ForeignKey) -> bool {
        foreign_key.referenced_table == self.name
    }
}

/// Column metadata for a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub unique: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: impl Into<ColumnKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            nullable: false,
            unique: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Declared column type: a primitive kind or any other type generated
/// through the full engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ColumnKind {
    Scalar(ScalarKind),
    Type(TypeRef),
}

impl From<ScalarKind> for ColumnKind {
    fn from(kind: ScalarKind) -> Self {
        ColumnKind::Scalar(kind)
    }
}

impl From<TypeRef> for ColumnKind {
    fn from(ty: TypeRef) -> Self {
        match ty {
            TypeRef::Scalar(kind) => ColumnKind::Scalar(kind),
            other => ColumnKind::Type(other),
        }
    }
}
