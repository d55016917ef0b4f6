//! Catalog drivers.
//!
//! - [`mysql`]: MySQL/MariaDB (`sqlx`)
//! - [`postgres`]: PostgreSQL (`tokio-postgres` + `deadpool-postgres`)
//! - [`common`]: TLS setup
//!
//! Each driver provides a [`CatalogDialect`] (which queries to run) and a
//! [`CatalogConnection`] (how to run them). [`DialectImpl`] and
//! [`ConnectionImpl`] dispatch over the supported engines with a plain
//! `match` instead of trait objects.
//!
//! # Adding New Databases
//!
//! 1. Create a module under `drivers/` with a dialect and a connection
//! 2. Add a variant to [`DialectImpl`] and [`ConnectionImpl`]
//! 3. Map its type names in [`DialectImpl::from_db_type`]

pub mod common;
pub mod mysql;
pub mod postgres;

pub use common::{SslMode, TlsBuilder};
pub use mysql::{MysqlConnection, MysqlDialect};
pub use postgres::{PostgresConnection, PostgresDialect};

use async_trait::async_trait;

use crate::config::SourceConfig;
use crate::core::query::{CatalogFilter, CatalogQuery, CatalogRow};
use crate::core::schema::Table;
use crate::core::traits::{CatalogConnection, CatalogDialect, RowError};
use crate::error::{DumpError, Result};

/// Database type names accepted by [`DialectImpl::from_db_type`].
pub const SUPPORTED_DB_TYPES: &str = "mysql, mariadb, pgsql, postgres, postgresql, pg";

/// Static dispatch over the supported dialects.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Mysql(MysqlDialect),
    Postgres(PostgresDialect),
}

impl DialectImpl {
    /// Create a dialect from a database type string.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Config`] if the database type is not recognized.
    pub fn from_db_type(db_type: &str) -> Result<Self> {
        match db_type.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DialectImpl::Mysql(MysqlDialect::new())),
            "pgsql" | "postgres" | "postgresql" | "pg" => {
                Ok(DialectImpl::Postgres(PostgresDialect::new()))
            }
            other => Err(DumpError::Config(format!(
                "Unknown database type: '{}'. Supported types: {}",
                other, SUPPORTED_DB_TYPES
            ))),
        }
    }

    /// Server port used when the configuration leaves it out.
    pub fn default_port(&self) -> u16 {
        match self {
            DialectImpl::Mysql(_) => 3306,
            DialectImpl::Postgres(_) => 5432,
        }
    }
}

impl CatalogDialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Mysql(d) => d.name(),
            DialectImpl::Postgres(d) => d.name(),
        }
    }

    fn param_placeholder(&self, index: usize) -> String {
        match self {
            DialectImpl::Mysql(d) => d.param_placeholder(index),
            DialectImpl::Postgres(d) => d.param_placeholder(index),
        }
    }

    fn tables_query(&self, filter: &CatalogFilter) -> CatalogQuery {
        match self {
            DialectImpl::Mysql(d) => d.tables_query(filter),
            DialectImpl::Postgres(d) => d.tables_query(filter),
        }
    }

    fn columns_queries(&self, filter: &CatalogFilter, tables: &[Table]) -> Vec<CatalogQuery> {
        match self {
            DialectImpl::Mysql(d) => d.columns_queries(filter, tables),
            DialectImpl::Postgres(d) => d.columns_queries(filter, tables),
        }
    }

    fn constraint_members_query(&self, filter: &CatalogFilter) -> CatalogQuery {
        match self {
            DialectImpl::Mysql(d) => d.constraint_members_query(filter),
            DialectImpl::Postgres(d) => d.constraint_members_query(filter),
        }
    }

    fn constraint_types_query(&self, filter: &CatalogFilter) -> CatalogQuery {
        match self {
            DialectImpl::Mysql(d) => d.constraint_types_query(filter),
            DialectImpl::Postgres(d) => d.constraint_types_query(filter),
        }
    }
}

/// Static dispatch over the supported connections.
pub enum ConnectionImpl {
    Mysql(MysqlConnection),
    Postgres(PostgresConnection),
}

impl ConnectionImpl {
    /// Open the connection described by `config` for `dialect`.
    pub async fn connect(dialect: &DialectImpl, config: &SourceConfig) -> Result<Self> {
        match dialect {
            DialectImpl::Mysql(_) => Ok(ConnectionImpl::Mysql(
                MysqlConnection::connect(config).await?,
            )),
            DialectImpl::Postgres(_) => Ok(ConnectionImpl::Postgres(
                PostgresConnection::connect(config).await?,
            )),
        }
    }
}

#[async_trait]
impl CatalogConnection for ConnectionImpl {
    async fn query(&self, query: &CatalogQuery) -> std::result::Result<Vec<CatalogRow>, RowError> {
        match self {
            ConnectionImpl::Mysql(c) => c.query(query).await,
            ConnectionImpl::Postgres(c) => c.query(query).await,
        }
    }

    fn db_type(&self) -> &str {
        match self {
            ConnectionImpl::Mysql(c) => c.db_type(),
            ConnectionImpl::Postgres(c) => c.db_type(),
        }
    }

    async fn close(&self) {
        match self {
            ConnectionImpl::Mysql(c) => c.close().await,
            ConnectionImpl::Postgres(c) => c.close().await,
        }
    }
}
