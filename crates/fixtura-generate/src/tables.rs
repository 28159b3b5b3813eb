use tracing::{info, warn};

use fixtura_core::{
    Column, ColumnKind, DataSet, DataTable, ForeignKey, ScalarKind, TableSchema, TableSetSchema,
    Value,
};

use crate::context::GenerateContext;
use crate::errors::GenerationError;
use crate::foreign::{ConstraintIndex, ForeignContext, InMemoryForeignContext, pick_referenced};
use crate::planner::plan_table_set;

/// Column kinds drawn for untyped tables.
const UNTYPED_COLUMN_KINDS: &[ScalarKind] = &[
    ScalarKind::Bool,
    ScalarKind::Char,
    ScalarKind::I8,
    ScalarKind::U8,
    ScalarKind::I16,
    ScalarKind::U16,
    ScalarKind::I32,
    ScalarKind::U32,
    ScalarKind::I64,
    ScalarKind::U64,
    ScalarKind::F32,
    ScalarKind::F64,
    ScalarKind::Decimal,
    ScalarKind::DateTime,
    ScalarKind::String,
];

const DEFAULT_MIN_ROWS: usize = 1;
const DEFAULT_MAX_ROWS: usize = 20;

/// Generate a standalone table. A table handed to the request is extended;
/// foreign keys to other tables find no rows to reference.
pub(crate) fn generate_table(
    ctx: &mut GenerateContext<'_>,
    schema: Option<&TableSchema>,
) -> Result<Value, GenerationError> {
    let random_schema;
    let schema = match schema {
        Some(schema) => schema,
        None => {
            random_schema = untyped_schema(ctx);
            &random_schema
        }
    };

    let mut table = match ctx.take_instance() {
        Some(Value::Table(table)) if table.name == schema.name => table,
        _ => empty_table(schema),
    };
    populate_rows(ctx, schema, &mut table, &InMemoryForeignContext::new())?;
    Ok(Value::Table(table))
}

/// Generate every table of a set in dependency order. Tables of a data set
/// handed to the request are extended rather than replaced.
pub(crate) fn generate_table_set(
    ctx: &mut GenerateContext<'_>,
    schema: Option<&TableSetSchema>,
) -> Result<Value, GenerationError> {
    let Some(schema) = schema else {
        return generate_untyped_set(ctx);
    };

    let order = plan_table_set(schema)?;
    let mut existing = match ctx.take_instance() {
        Some(Value::TableSet(set)) => set.tables,
        _ => Vec::new(),
    };

    info!(table_set = %schema.name, tables = order.len(), "generating table set");

    let mut foreign = InMemoryForeignContext::new();
    for name in &order {
        let Some(table_schema) = schema.table(name) else {
            continue;
        };
        let mut table = match existing.iter().position(|table| table.name == *name) {
            Some(index) => existing.swap_remove(index),
            None => empty_table(table_schema),
        };
        populate_rows(ctx, table_schema, &mut table, &foreign)?;
        foreign.ingest_table(table);
    }

    let mut data = DataSet::new(schema.name.clone());
    for table_schema in &schema.tables {
        if let Some(table) = foreign.take_table(&table_schema.name) {
            data.tables.push(table);
        }
    }
    Ok(Value::TableSet(data))
}

fn generate_untyped_set(ctx: &mut GenerateContext<'_>) -> Result<Value, GenerationError> {
    let name = word(ctx);
    let count = ctx.scalars().next_in_range(2, 6);
    let mut data = DataSet::new(name);
    for _ in 0..count {
        let schema = untyped_schema(ctx);
        let mut table = empty_table(&schema);
        populate_rows(ctx, &schema, &mut table, &InMemoryForeignContext::new())?;
        data.tables.push(table);
    }
    Ok(Value::TableSet(data))
}

/// Append generated rows to `table`.
///
/// Row count: the configured explicit count, else one row per target row
/// still unreferenced by the tightest unique-sourced foreign key, else a
/// random count. An explicit count beyond that capacity is an error.
pub(crate) fn populate_rows(
    ctx: &mut GenerateContext<'_>,
    schema: &TableSchema,
    table: &mut DataTable,
    related: &dyn ForeignContext,
) -> Result<(), GenerationError> {
    let index = ConstraintIndex::build(schema)?;
    let explicit = ctx.config().table_row_count(schema);

    // Unique-sourced references pick target row `table.rows.len() + k`, so
    // rows already present use up part of the target.
    let mut capacity: Option<(usize, &ForeignKey)> = None;
    for (fk_index, fk) in schema.foreign_keys.iter().enumerate() {
        if !index.is_unique_sourced(fk_index) || schema.is_self_referencing(fk) {
            continue;
        }
        let available = related
            .related_table(&fk.referenced_table)
            .map_or(0, DataTable::row_count)
            .saturating_sub(table.rows.len());
        if capacity.is_none_or(|(least, _)| available < least) {
            capacity = Some((available, fk));
        }
    }

    let row_count = match (explicit, capacity) {
        (Some(requested), Some((available, fk))) if requested > available => {
            warn!(
                table = %schema.name,
                foreign_key = %fk.label(),
                requested,
                available,
                "row count cannot be satisfied"
            );
            return Err(GenerationError::RowCountUnsatisfiable {
                table: schema.name.clone(),
                foreign_key: fk.label(),
                referenced_table: fk.referenced_table.clone(),
                requested,
                available,
            });
        }
        (Some(requested), _) => requested,
        (None, Some((available, _))) => available,
        (None, None) => ctx
            .scalars()
            .next_in_range(DEFAULT_MIN_ROWS, DEFAULT_MAX_ROWS),
    };

    info!(table = %schema.name, rows = row_count, "populating table");

    let empty = DataTable::new(String::new(), Vec::new());
    for _ in 0..row_count {
        let row_index = table.rows.len();

        let mut referenced = Vec::with_capacity(schema.foreign_keys.len());
        for (fk_index, fk) in schema.foreign_keys.iter().enumerate() {
            let target: &DataTable = if schema.is_self_referencing(fk) {
                &*table
            } else {
                related.related_table(&fk.referenced_table).unwrap_or(&empty)
            };
            referenced.push(pick_referenced(
                target,
                fk,
                index.is_unique_sourced(fk_index),
                row_index,
                ctx.scalars(),
            ));
        }

        let mut row = Vec::with_capacity(schema.columns.len());
        for column in &schema.columns {
            let value = match index.constrained(&column.name) {
                Some(constrained) => referenced
                    .get(constrained.foreign_key)
                    .and_then(Option::as_ref)
                    .and_then(|values| values.get(constrained.position))
                    .cloned()
                    .unwrap_or(Value::Null),
                None => column_value(ctx, column)?,
            };
            row.push(value);
        }
        table.rows.push(row);
    }

    Ok(())
}

/// Value for a column not covered by a foreign key. `i32` columns whose
/// name ends with `id` take the request's identifier counter.
fn column_value(ctx: &mut GenerateContext<'_>, column: &Column) -> Result<Value, GenerationError> {
    match &column.kind {
        ColumnKind::Scalar(ScalarKind::I32) if column.name.to_ascii_lowercase().ends_with("id") => {
            Ok(Value::I32(ctx.next_id()))
        }
        ColumnKind::Scalar(kind) => Ok(ctx.next_scalar(*kind)),
        ColumnKind::Type(ty) => ctx.generate_value(ty),
    }
}

fn empty_table(schema: &TableSchema) -> DataTable {
    DataTable::new(schema.name.clone(), schema.column_names())
}

/// Random schema of 4 to 11 primitive columns.
fn untyped_schema(ctx: &mut GenerateContext<'_>) -> TableSchema {
    let mut schema = TableSchema::new(word(ctx));
    let columns = ctx.scalars().next_in_range(4, 11);
    for position in (0..columns).rev() {
        let name = format!("{}{position}", word(ctx));
        let pick = ctx.scalars().next_index(UNTYPED_COLUMN_KINDS.len());
        let kind = UNTYPED_COLUMN_KINDS
            .get(pick)
            .copied()
            .unwrap_or(ScalarKind::String);
        schema = schema.with_column(Column::new(name, kind));
    }
    schema
}

fn word(ctx: &mut GenerateContext<'_>) -> String {
    match ctx.next_scalar(ScalarKind::String) {
        Value::Text(text) => text,
        _ => String::from("table"),
    }
}
