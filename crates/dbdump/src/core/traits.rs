//! Core traits for dialect-agnostic catalog extraction.
//!
//! - [`CatalogDialect`]: builds the catalog queries for one database engine
//! - [`CatalogConnection`]: executes them and decodes rows at the driver boundary
//!
//! # Design Patterns
//!
//! - **Strategy**: each dialect owns its catalog names and placeholder syntax
//! - **Template Method**: [`CatalogDialect::columns_queries`] lets a dialect
//!   choose between one bulk query and one query per table

use async_trait::async_trait;
use thiserror::Error;

use super::query::{CatalogFilter, CatalogQuery, CatalogRow};
use super::schema::Table;

/// SQL strategy for reading one engine's catalog.
pub trait CatalogDialect: Send + Sync {
    /// Get the dialect identifier (e.g., "mysql", "postgres").
    fn name(&self) -> &str;

    /// Get a parameter placeholder for the given 1-based index.
    ///
    /// - MySQL: `?`
    /// - PostgreSQL: `$1`, `$2`, etc.
    fn param_placeholder(&self, index: usize) -> String;

    /// Query listing tables in scope.
    fn tables_query(&self, filter: &CatalogFilter) -> CatalogQuery;

    /// Queries listing the columns of the tables in scope.
    ///
    /// `tables` holds the rows already returned by [`tables_query`](Self::tables_query)
    /// for dialects that introspect one relation at a time. Every query must
    /// return columns ordered by ordinal position within a table.
    fn columns_queries(&self, filter: &CatalogFilter, tables: &[Table]) -> Vec<CatalogQuery>;

    /// Query listing `(constraint, table, column)` membership rows.
    fn constraint_members_query(&self, filter: &CatalogFilter) -> CatalogQuery;

    /// Query listing the type of each constraint.
    fn constraint_types_query(&self, filter: &CatalogFilter) -> CatalogQuery;
}

/// Failure reported by a connection while running a catalog query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The statement did not run (bad SQL, permissions, dropped connection).
    #[error("{0}")]
    Query(String),

    /// The statement ran but a row did not match the expected shape.
    #[error("{0}")]
    Scan(String),
}

/// A single open, read-only connection to a database catalog.
///
/// Implementations decode each row into the value kinds listed by the
/// query's [`RowShape`](super::query::RowShape) and report mismatches as
/// [`RowError::Scan`].
#[async_trait]
pub trait CatalogConnection: Send + Sync {
    /// Execute a catalog query and decode all rows.
    async fn query(&self, query: &CatalogQuery) -> std::result::Result<Vec<CatalogRow>, RowError>;

    /// Get the database type identifier (e.g., "mysql", "postgres").
    fn db_type(&self) -> &str;

    /// Release the connection.
    async fn close(&self);
}
