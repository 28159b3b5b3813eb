//! Core contracts for Fixtura.
//!
//! This crate defines the type model the generation engine works from
//! (scalar kinds, type references, descriptors and the type catalog), the
//! generated value tree, and the relational schema model with its validation
//! and foreign-key graph helpers.

pub mod catalog;
pub mod constraints;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

pub use catalog::TypeCatalog;
pub use constraints::{ForeignKey, UniqueConstraint};
pub use descriptor::{
    Access, BuildFn, Constructor, Member, Parameter, Protocol, Shape, TypeDescriptor, TypeKind,
};
pub use error::{Error, Result};
pub use graph::{FkGraphReport, FkGraphSummary, build_fk_graph_report};
pub use schema::{Column, ColumnKind, TableSchema, TableSetSchema};
pub use types::{ScalarKind, TypeRef};
pub use validation::{validate_table, validate_table_set};
pub use value::{DataSet, DataTable, Object, Record, Value};
