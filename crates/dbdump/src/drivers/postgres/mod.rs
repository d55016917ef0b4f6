//! PostgreSQL catalog driver.

mod connection;
mod dialect;

pub use connection::PostgresConnection;
pub use dialect::{PostgresDialect, SYSTEM_SCHEMAS};
