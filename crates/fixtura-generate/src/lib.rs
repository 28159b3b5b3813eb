//! Test-fixture generation engine for Fixtura.
//!
//! Given a type from a [`fixtura_core::TypeCatalog`], this crate resolves a
//! generation strategy, constructs and populates instances recursively under
//! depth, cycle and skip limits, lets registered overrides intercept any
//! request, and synthesizes relational tables whose foreign-key and
//! uniqueness constraints hold.

pub mod binder;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod foreign;
pub mod generators;
pub mod model;
pub mod overrides;
pub mod planner;
pub mod resolver;
pub mod scalars;
mod tables;

pub use binder::{Binder, DefaultBinder};
pub use config::GenerateConfig;
pub use context::GenerateContext;
pub use engine::Faker;
pub use errors::GenerationError;
pub use foreign::{ForeignContext, InMemoryForeignContext};
pub use model::GenerateOptions;
pub use overrides::{GenerateOverride, MemberOverride, OverrideContext, TypeOverride};
pub use resolver::{Resolver, Strategy};
pub use scalars::{ScalarProvider, SeededScalars};
