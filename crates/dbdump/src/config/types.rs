//! Configuration type definitions.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::drivers::{DialectImpl, SslMode};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database to read the catalog from.
    #[serde(default)]
    pub source: SourceConfig,

    /// What to dump and how to render it.
    #[serde(default)]
    pub dump: DumpConfig,
}

/// Source database connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Database type: mysql, mariadb, pgsql, postgres, postgresql or pg.
    #[serde(default = "default_db_type")]
    pub r#type: String,

    /// Database host (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port. Defaults to 3306 for MySQL and 5432 for PostgreSQL.
    #[serde(default)]
    pub port: Option<u16>,

    /// Username (default: root).
    #[serde(default = "default_user")]
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// Database filter. For PostgreSQL this is also the database connected to.
    #[serde(default)]
    pub database: Option<String>,

    /// TLS mode for PostgreSQL connections (default: disable).
    #[serde(default)]
    pub ssl_mode: SslMode,
}

impl SourceConfig {
    /// Port to connect to, falling back to the engine default.
    pub fn resolved_port(&self) -> u16 {
        self.port.unwrap_or_else(|| {
            DialectImpl::from_db_type(&self.r#type)
                .map(|d| d.default_port())
                .unwrap_or(3306)
        })
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            r#type: default_db_type(),
            host: default_host(),
            port: None,
            user: default_user(),
            password: String::new(),
            database: None,
            ssl_mode: SslMode::default(),
        }
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("type", &self.r#type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

/// Dump scope and output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Schema filter.
    #[serde(default)]
    pub schema: Option<String>,

    /// Table allow-list; empty dumps every table in scope.
    #[serde(default)]
    pub tables: Vec<String>,

    /// Registered formatter name (default: json).
    #[serde(default = "default_format")]
    pub format: String,

    /// Formatter configuration. A leading `@` names a file to read it from.
    #[serde(default)]
    pub format_config: Option<String>,

    /// Output file; stdout when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            schema: None,
            tables: Vec::new(),
            format: default_format(),
            format_config: None,
            output: None,
        }
    }
}

fn default_db_type() -> String {
    "mysql".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_user() -> String {
    "root".to_string()
}

fn default_format() -> String {
    "json".to_string()
}
