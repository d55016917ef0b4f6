//! MySQL/MariaDB catalog connection backed by a single-connection `sqlx` pool.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlSslMode};
use sqlx::Row;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::core::query::{CatalogQuery, CatalogRow, CatalogValue, ValueKind};
use crate::core::traits::{CatalogConnection, RowError};
use crate::error::{DumpError, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Catalog reads go through `information_schema`, never the user database.
const CATALOG_DATABASE: &str = "information_schema";

pub struct MysqlConnection {
    pool: MySqlPool,
}

impl MysqlConnection {
    /// Open and verify the connection.
    pub async fn connect(config: &SourceConfig) -> Result<Self> {
        let port = config.resolved_port();
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(port)
            .database(CATALOG_DATABASE)
            .username(&config.user)
            .password(&config.password)
            .ssl_mode(MySqlSslMode::Preferred);

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(CONNECT_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| DumpError::connection(e, "connecting to MySQL"))?;

        if let Err(e) = sqlx::query("SELECT 1").fetch_one(&pool).await {
            pool.close().await;
            return Err(DumpError::connection(e, "verifying MySQL connection"));
        }

        info!("Connected to MySQL: {}:{}", config.host, port);
        Ok(Self { pool })
    }

    fn decode(row: &MySqlRow, kinds: &[ValueKind]) -> std::result::Result<CatalogRow, RowError> {
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
                    ValueKind::Text => row.try_get::<String, _>(i).map(CatalogValue::Text),
                    ValueKind::NullableText => {
                        row.try_get::<Option<String>, _>(i).map(CatalogValue::from)
                    }
                    ValueKind::Int => row.try_get::<i64, _>(i).map(CatalogValue::Int),
                };
                value.map_err(|e| RowError::Scan(format!("column {}: {}", i, e)))
            })
            .collect()
    }
}

#[async_trait]
impl CatalogConnection for MysqlConnection {
    async fn query(&self, query: &CatalogQuery) -> std::result::Result<Vec<CatalogRow>, RowError> {
        debug!(params = ?query.params, "mysql: {}", query.sql);

        let mut stmt = sqlx::query(&query.sql);
        for param in &query.params {
            stmt = stmt.bind(param);
        }
        let rows: Vec<MySqlRow> = stmt
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RowError::Query(e.to_string()))?;

        let kinds = query.shape.kinds();
        rows.iter().map(|row| Self::decode(row, kinds)).collect()
    }

    fn db_type(&self) -> &str {
        "mysql"
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!("MySQL connection closed");
    }
}
