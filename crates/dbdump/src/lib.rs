//! # dbdump
//!
//! Dump the logical schema of a MySQL or PostgreSQL database.
//!
//! The library reads the engine's catalog (tables, columns, key column usage
//! and table constraints), folds the flat rows into a
//! schema → table → {columns, constraints} [`Hierarchy`] and renders it
//! through a pluggable [`Formatter`]:
//!
//! - **Dialects** build the catalog queries for each engine
//! - **Materializer** runs them over one connection and decodes the rows
//! - **Aggregator** joins the row sets in memory, preserving query order
//! - **Formatters** (`json`, `yaml`, `template`) render the result
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbdump::{Config, Dumper, FormatterRegistry};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> dbdump::Result<()> {
//!     let config = Config::load("dbdump.yaml")?;
//!     let registry = FormatterRegistry::with_builtins();
//!     let payload = Dumper::new(&config, &registry).run().await?;
//!     println!("{}", String::from_utf8_lossy(&payload));
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod core;
pub mod drivers;
pub mod dumper;
pub mod error;
pub mod formatter;
pub mod materialize;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient access
pub use aggregate::aggregate;
pub use config::{Config, DumpConfig, SourceConfig};
pub use core::{CatalogFilter, Column, Constraint, ConstraintKind, Hierarchy, KeyRole, Table};
pub use dumper::Dumper;
pub use error::{DumpError, Result};
pub use formatter::{Formatter, FormatterRegistry};
pub use materialize::{CatalogRows, Materializer};
