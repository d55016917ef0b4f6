//! Top-level dump driver.
//!
//! Resolves the formatter first (an unknown name or a bad configuration
//! fails before any connection is opened), then reads the catalog over a
//! single connection, aggregates and renders.

use tracing::{debug, info};

use crate::config::Config;
use crate::core::query::CatalogFilter;
use crate::core::schema::Hierarchy;
use crate::core::traits::{CatalogConnection, CatalogDialect};
use crate::drivers::{ConnectionImpl, DialectImpl};
use crate::error::Result;
use crate::formatter::{Formatter, FormatterRegistry};
use crate::materialize::Materializer;

/// Runs one dump for a configuration.
pub struct Dumper<'a> {
    config: &'a Config,
    registry: &'a FormatterRegistry,
}

impl<'a> Dumper<'a> {
    pub fn new(config: &'a Config, registry: &'a FormatterRegistry) -> Self {
        Self { config, registry }
    }

    /// Create and initialize the configured formatter.
    pub fn prepare_formatter(&self) -> Result<Box<dyn Formatter>> {
        let dump = &self.config.dump;
        let mut formatter = self.registry.create(&dump.format)?;
        let payload = dump.resolve_format_config()?;
        formatter.initialize(&payload)?;
        debug!(
            "Formatter {} initialized ({} bytes of configuration)",
            formatter.name(),
            payload.len()
        );
        Ok(formatter)
    }

    /// Catalog scope derived from the configuration.
    pub fn filter(&self) -> CatalogFilter {
        CatalogFilter {
            database: self.config.source.database.clone(),
            schema: self.config.dump.schema.clone(),
            tables: self.config.dump.tables.clone(),
        }
    }

    pub fn dialect(&self) -> Result<DialectImpl> {
        DialectImpl::from_db_type(&self.config.source.r#type)
    }

    /// Connect, introspect, close, then render.
    ///
    /// The connection is closed whether or not introspection succeeds.
    pub async fn run(&self) -> Result<Vec<u8>> {
        let formatter = self.prepare_formatter()?;
        let dialect = self.dialect()?;

        let conn = ConnectionImpl::connect(&dialect, &self.config.source).await?;
        let hierarchy = introspect_and_close(&conn, &dialect, &self.filter()).await?;
        render(formatter.as_ref(), &hierarchy)
    }

    /// Like [`run`](Self::run) over a connection owned by the caller, which
    /// is left open.
    pub async fn run_with<C>(&self, conn: &C) -> Result<Vec<u8>>
    where
        C: CatalogConnection + ?Sized,
    {
        let formatter = self.prepare_formatter()?;
        let dialect = self.dialect()?;
        let hierarchy = introspect(conn, &dialect, &self.filter()).await?;
        render(formatter.as_ref(), &hierarchy)
    }
}

/// Read the catalog in scope and aggregate it.
pub async fn introspect<C, D>(conn: &C, dialect: &D, filter: &CatalogFilter) -> Result<Hierarchy>
where
    C: CatalogConnection + ?Sized,
    D: CatalogDialect + ?Sized,
{
    info!(
        "Reading {} catalog over {} connection",
        dialect.name(),
        conn.db_type()
    );
    let rows = Materializer::new(conn, dialect).run(filter).await?;
    let hierarchy = rows.into_hierarchy();
    info!(
        "Aggregated {} tables in {} schemas",
        hierarchy.table_count(),
        hierarchy.schema_count()
    );
    Ok(hierarchy)
}

/// [`introspect`], then close the connection on every path.
pub async fn introspect_and_close<C, D>(
    conn: &C,
    dialect: &D,
    filter: &CatalogFilter,
) -> Result<Hierarchy>
where
    C: CatalogConnection + ?Sized,
    D: CatalogDialect + ?Sized,
{
    let result = introspect(conn, dialect, filter).await;
    conn.close().await;
    debug!("Closed {} connection", conn.db_type());
    result
}

fn render(formatter: &dyn Formatter, hierarchy: &Hierarchy) -> Result<Vec<u8>> {
    let payload = formatter.format(hierarchy)?;
    debug!("Formatter {} produced {} bytes", formatter.name(), payload.len());
    Ok(payload)
}
