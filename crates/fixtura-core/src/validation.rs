use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::schema::{TableSchema, TableSetSchema};

/// Validate internal consistency of a single table.
///
/// This checks:
/// - duplicate column names
/// - unique constraint columns exist
/// - foreign key source columns exist and pair up with referenced columns
/// - self-referencing foreign keys name existing columns
///
/// Foreign keys that reference another table are checked by
/// [`validate_table_set`] when the table belongs to a set.
pub fn validate_table(table: &TableSchema) -> Result<()> {
    if table.name.trim().is_empty() {
        return Err(Error::InvalidSchema("table name must not be empty".to_string()));
    }

    let columns = column_set(table)?;

    for unique in &table.unique_constraints {
        if unique.columns.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "unique constraint without columns in table {}",
                table.name
            )));
        }
        for column in &unique.columns {
            if !columns.contains(column.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "unique column not found: {}.{}",
                    table.name, column
                )));
            }
        }
    }

    for fk in &table.foreign_keys {
        if fk.columns.is_empty() || fk.columns.len() != fk.referenced_columns.len() {
            return Err(Error::InvalidSchema(format!(
                "foreign key {} in table {} must pair each column with one referenced column",
                fk.label(),
                table.name
            )));
        }
        for column in &fk.columns {
            if !columns.contains(column.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "foreign key column not found: {}.{}",
                    table.name, column
                )));
            }
        }
        if table.is_self_referencing(fk) {
            for column in &fk.referenced_columns {
                if !columns.contains(column.as_str()) {
                    return Err(Error::InvalidSchema(format!(
                        "referenced column not found: {}.{}",
                        table.name, column
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Validate a table set: every table, unique table names, and every
/// cross-table foreign key target.
pub fn validate_table_set(set: &TableSetSchema) -> Result<()> {
    let mut catalog: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for table in &set.tables {
        validate_table(table)?;
        if catalog.contains_key(table.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate table name: {}.{}",
                set.name, table.name
            )));
        }
        catalog.insert(
            table.name.as_str(),
            table.columns.iter().map(|column| column.name.as_str()).collect(),
        );
    }

    for table in &set.tables {
        for fk in &table.foreign_keys {
            let ref_columns = catalog.get(fk.referenced_table.as_str()).ok_or_else(|| {
                Error::InvalidSchema(format!(
                    "referenced table not found: {}.{}",
                    set.name, fk.referenced_table
                ))
            })?;

            for column in &fk.referenced_columns {
                if !ref_columns.contains(column.as_str()) {
                    return Err(Error::InvalidSchema(format!(
                        "referenced column not found: {}.{}",
                        fk.referenced_table, column
                    )));
                }
            }
        }
    }

    Ok(())
}

fn column_set(table: &TableSchema) -> Result<BTreeSet<&str>> {
    let mut columns = BTreeSet::new();
    for column in &table.columns {
        if !columns.insert(column.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate column name: {}.{}",
                table.name, column.name
            )));
        }
    }
    Ok(columns)
}
