//! Strategies for container shapes and dynamic records.

pub mod containers;
pub mod record;
