use thiserror::Error;

/// Core error type shared across Fixtura crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A table or table-set schema violates structural invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A named type reference is not registered in the catalog.
    #[error("unknown type '{0}'")]
    UnknownType(String),
    /// Two descriptors were registered under the same name.
    #[error("type '{0}' is already registered")]
    DuplicateType(String),
}

/// Convenience alias for results returned by Fixtura crates.
pub type Result<T> = std::result::Result<T, Error>;
