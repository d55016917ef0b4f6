//! Configuration validation.

use super::Config;
use crate::drivers::DialectImpl;
use crate::error::{DumpError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let source = &config.source;
    DialectImpl::from_db_type(&source.r#type)?;

    if source.host.trim().is_empty() {
        return Err(DumpError::Config("source.host is required".into()));
    }
    if source.user.trim().is_empty() {
        return Err(DumpError::Config("source.user is required".into()));
    }
    if source.port == Some(0) {
        return Err(DumpError::Config("source.port must be non-zero".into()));
    }
    if source.database.as_deref().is_some_and(|d| d.trim().is_empty()) {
        return Err(DumpError::Config(
            "source.database must not be empty when set".into(),
        ));
    }

    let dump = &config.dump;
    if dump.format.trim().is_empty() {
        return Err(DumpError::Config("dump.format is required".into()));
    }
    if dump.schema.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(DumpError::Config(
            "dump.schema must not be empty when set".into(),
        ));
    }
    if dump.tables.iter().any(|t| t.trim().is_empty()) {
        return Err(DumpError::Config(
            "dump.tables must not contain empty names".into(),
        ));
    }
    if dump
        .output
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        return Err(DumpError::Config(
            "dump.output must not be empty when set".into(),
        ));
    }

    Ok(())
}
