use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no constructor found for type '{type_name}'")]
    ConstructorNotFound { type_name: String },
    #[error("constructor for type '{type_name}' failed: {message}")]
    ConstructorFailed { type_name: String, message: String },
    #[error("type '{type_name}' has no member named '{member}'")]
    UnknownMember { type_name: String, member: String },
    #[error("cannot populate type '{type_name}': {message}")]
    InvalidInstance { type_name: String, message: String },
    #[error(
        "column is constrained in multiple foreign key relationships simultaneously: {column} in table {table}"
    )]
    MultiplyConstrainedColumn { table: String, column: String },
    #[error(
        "self-reference columns must be nullable so that at least one row can be added when the table is initially empty: foreign key {foreign_key} in table {table}"
    )]
    SelfReferenceNotNullable { table: String, foreign_key: String },
    #[error(
        "unable to satisfy the requested row count of {requested} for table {table} because foreign key {foreign_key} on {referenced_table} must be unique, and that table only has {available} row(s)"
    )]
    RowCountUnsatisfiable {
        table: String,
        foreign_key: String,
        referenced_table: String,
        requested: usize,
        available: usize,
    },
    #[error("{}", describe_unschedulable(.set, .remaining, .cycle.as_deref()))]
    UnschedulableTables {
        set: String,
        remaining: Vec<String>,
        cycle: Option<Vec<String>>,
    },
    #[error(transparent)]
    Core(#[from] fixtura_core::Error),
}

fn describe_unschedulable(set: &str, remaining: &[String], cycle: Option<&[String]>) -> String {
    let mut message = format!(
        "couldn't generate data for all tables in table set {set} because there are constraints that can't be satisfied; remaining tables: {}",
        remaining.join(", ")
    );
    if let Some(cycle @ [first, ..]) = cycle {
        message.push_str(&format!("; dependency cycle: {} -> {first}", cycle.join(" -> ")));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unschedulable_message_names_tables_and_cycle() {
        let err = GenerationError::UnschedulableTables {
            set: "crm".to_string(),
            remaining: vec!["teams".to_string(), "users".to_string()],
            cycle: Some(vec!["teams".to_string(), "users".to_string()]),
        };
        let message = err.to_string();
        assert!(message.contains("table set crm"));
        assert!(message.contains("remaining tables: teams, users"));
        assert!(message.contains("dependency cycle: teams -> users -> teams"));
    }
}
