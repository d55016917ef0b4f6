//! PostgreSQL catalog connection.
//!
//! A `deadpool-postgres` pool capped at one connection; the single pooled
//! client is checked out on connect and held until [`close`](CatalogConnection::close).

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use tokio::sync::Mutex;
use tokio_postgres::types::ToSql;
use tokio_postgres::Config as PgConfig;
use tokio_postgres::Row;
use tracing::{debug, info, warn};

use crate::config::SourceConfig;
use crate::core::query::{CatalogQuery, CatalogRow, CatalogValue, ValueKind};
use crate::core::traits::{CatalogConnection, RowError};
use crate::drivers::common::TlsBuilder;
use crate::error::{DumpError, Result};

/// Maintenance database used when no database filter is configured.
const DEFAULT_DATABASE: &str = "postgres";

pub struct PostgresConnection {
    pool: Pool,
    client: Mutex<Option<Object>>,
}

impl PostgresConnection {
    /// Open and verify the connection.
    pub async fn connect(config: &SourceConfig) -> Result<Self> {
        let port = config.resolved_port();
        let database = config.database.as_deref().unwrap_or(DEFAULT_DATABASE);

        let mut pg_config = PgConfig::new();
        pg_config.host(&config.host);
        pg_config.port(port);
        pg_config.dbname(database);
        pg_config.user(&config.user);
        pg_config.password(&config.password);

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let mgr = match TlsBuilder::new(config.ssl_mode).build()? {
            Some(tls) => Manager::from_config(pg_config, tls, mgr_config),
            None => {
                warn!("PostgreSQL TLS is disabled. Credentials will be transmitted in plaintext.");
                Manager::from_config(pg_config, tokio_postgres::NoTls, mgr_config)
            }
        };
        let pool = Pool::builder(mgr)
            .max_size(1)
            .build()
            .map_err(|e| DumpError::connection(e, "creating PostgreSQL pool"))?;

        let client = pool
            .get()
            .await
            .map_err(|e| DumpError::connection(e, "connecting to PostgreSQL"))?;
        if let Err(e) = client.simple_query("SELECT 1").await {
            drop(client);
            pool.close();
            return Err(DumpError::connection(e, "verifying PostgreSQL connection"));
        }

        info!("Connected to PostgreSQL: {}:{}/{}", config.host, port, database);
        Ok(Self {
            pool,
            client: Mutex::new(Some(client)),
        })
    }

    fn decode(row: &Row, kinds: &[ValueKind]) -> std::result::Result<CatalogRow, RowError> {
        if row.len() != kinds.len() {
            return Err(RowError::Scan(format!(
                "expected {} columns, got {}",
                kinds.len(),
                row.len()
            )));
        }

        kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let value = match kind {
                    ValueKind::Text => row.try_get::<_, String>(i).map(CatalogValue::Text),
                    ValueKind::NullableText => {
                        row.try_get::<_, Option<String>>(i).map(CatalogValue::from)
                    }
                    ValueKind::Int => row.try_get::<_, i64>(i).map(CatalogValue::Int),
                };
                value.map_err(|e| RowError::Scan(format!("column {}: {}", i, e)))
            })
            .collect()
    }
}

#[async_trait]
impl CatalogConnection for PostgresConnection {
    async fn query(&self, query: &CatalogQuery) -> std::result::Result<Vec<CatalogRow>, RowError> {
        debug!(params = ?query.params, "postgres: {}", query.sql);

        let guard = self.client.lock().await;
        let client = guard
            .as_ref()
            .ok_or_else(|| RowError::Query("connection is closed".into()))?;

        let params: Vec<&(dyn ToSql + Sync)> = query
            .params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect();
        let rows = client
            .query(query.sql.as_str(), &params)
            .await
            .map_err(|e| RowError::Query(e.to_string()))?;

        let kinds = query.shape.kinds();
        rows.iter().map(|row| Self::decode(row, kinds)).collect()
    }

    fn db_type(&self) -> &str {
        "postgres"
    }

    async fn close(&self) {
        // Returning the object to a closed pool drops the underlying connection.
        self.pool.close();
        self.client.lock().await.take();
        debug!("PostgreSQL connection closed");
    }
}
