//! Structural YAML formatter.

use super::{config_text, Formatter};
use crate::core::schema::Hierarchy;
use crate::error::{DumpError, Result};

/// Lossless YAML rendering of the hierarchy. Takes no configuration.
#[derive(Debug, Default)]
pub struct YamlFormatter;

impl YamlFormatter {
    pub const NAME: &'static str = "yaml";

    pub fn new() -> Self {
        Self
    }
}

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialize(&mut self, config: &[u8]) -> Result<()> {
        match config_text(Self::NAME, config)? {
            None => Ok(()),
            Some(_) => Err(DumpError::formatter_config(
                Self::NAME,
                "the yaml formatter takes no configuration",
            )),
        }
    }

    fn format(&self, hierarchy: &Hierarchy) -> Result<Vec<u8>> {
        serde_yaml::to_string(hierarchy)
            .map(String::into_bytes)
            .map_err(|e| DumpError::format(Self::NAME, e))
    }
}
