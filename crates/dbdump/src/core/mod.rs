//! Core abstractions for dialect-agnostic catalog extraction.
//!
//! - [`schema`]: Table, column and constraint metadata plus the [`Hierarchy`]
//! - [`query`]: Catalog query descriptors, filters and expected row shapes
//! - [`traits`]: The dialect strategy and the connection the materializer reads from
//!
//! Driver modules (`drivers/mysql`, `drivers/postgres`) implement the traits;
//! everything else only talks to them through this module.

pub mod query;
pub mod schema;
pub mod traits;

pub use query::{CatalogFilter, CatalogQuery, CatalogRow, CatalogValue, RowShape, ValueKind};
pub use schema::{
    Column, Constraint, ConstraintKind, ConstraintMember, ConstraintType, Hierarchy, KeyRole,
    Table, TableKind,
};
pub use traits::{CatalogConnection, CatalogDialect, RowError};
