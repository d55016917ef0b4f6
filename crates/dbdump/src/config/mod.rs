//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use crate::error::Result;

/// Marks a formatter configuration value that names a file.
pub const FILE_MARKER: char = '@';

impl Config {
    /// Load and validate configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML file without validating it, for callers that apply
    /// overrides before calling [`validate`](Self::validate).
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

impl DumpConfig {
    /// Formatter configuration payload.
    ///
    /// `@path` reads the file at `path`; any other value is used as is.
    /// No value yields an empty payload.
    pub fn resolve_format_config(&self) -> Result<Vec<u8>> {
        match self.format_config.as_deref() {
            None => Ok(Vec::new()),
            Some(raw) => match raw.strip_prefix(FILE_MARKER) {
                Some(path) => Ok(std::fs::read(path)?),
                None => Ok(raw.as_bytes().to_vec()),
            },
        }
    }
}
