use std::collections::BTreeSet;

use tracing::warn;

use fixtura_core::{TableSetSchema, build_fk_graph_report};

use crate::errors::GenerationError;

/// Order in which the tables of a set are populated.
///
/// Each pass schedules every table whose referenced tables (other than
/// itself) are already scheduled, in declaration order. A pass that
/// schedules nothing while tables remain means the set cannot be generated.
pub fn plan_table_set(set: &TableSetSchema) -> Result<Vec<String>, GenerationError> {
    let mut remaining: Vec<&str> = set.tables.iter().map(|table| table.name.as_str()).collect();
    let mut scheduled: BTreeSet<&str> = BTreeSet::new();
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let mut made_progress = false;
        let mut index = 0;

        while index < remaining.len() {
            let name = remaining[index];
            let eligible = set.table(name).is_some_and(|table| {
                table
                    .foreign_keys
                    .iter()
                    .map(|fk| fk.referenced_table.as_str())
                    .filter(|referenced| *referenced != name)
                    .all(|referenced| scheduled.contains(referenced))
            });

            if eligible {
                scheduled.insert(name);
                order.push(name.to_string());
                remaining.remove(index);
                made_progress = true;
            } else {
                index += 1;
            }
        }

        if !made_progress {
            let remaining: Vec<String> = remaining.iter().map(|name| name.to_string()).collect();
            let cycle = build_fk_graph_report(set).cycle;
            warn!(
                table_set = %set.name,
                remaining = ?remaining,
                cycle = ?cycle,
                "table set cannot be scheduled"
            );
            return Err(GenerationError::UnschedulableTables {
                set: set.name.clone(),
                remaining,
                cycle,
            });
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtura_core::{Column, ForeignKey, ScalarKind, TableSchema};

    fn table(name: &str, references: &[&str]) -> TableSchema {
        let mut table = TableSchema::new(name).with_column(Column::new("id", ScalarKind::I32));
        for target in references {
            let column = format!("{target}_id");
            table = table
                .with_column(Column::new(column.clone(), ScalarKind::I32).nullable())
                .with_foreign_key(ForeignKey::new([column], *target, ["id"]));
        }
        table
    }

    #[test]
    fn referenced_tables_come_first() {
        let set = TableSetSchema::new("shop")
            .with_table(table("order_line", &["orders", "products"]))
            .with_table(table("orders", &["customers"]))
            .with_table(table("customers", &["customers"]))
            .with_table(table("products", &[]));

        let order = plan_table_set(&set).expect("schedule");
        assert_eq!(order, vec!["customers", "products", "orders", "order_line"]);
    }

    #[test]
    fn cycle_is_reported() {
        let set = TableSetSchema::new("crm")
            .with_table(table("users", &["teams"]))
            .with_table(table("teams", &["users"]))
            .with_table(table("audit", &[]))
            .with_table(table("digest", &["users"]));

        let err = plan_table_set(&set).unwrap_err();
        match err {
            GenerationError::UnschedulableTables {
                remaining, cycle, ..
            } => {
                assert_eq!(remaining, vec!["users", "teams", "digest"]);
                assert_eq!(cycle, Some(vec!["users".to_string(), "teams".to_string()]));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
