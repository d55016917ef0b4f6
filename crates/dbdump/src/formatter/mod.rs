//! Output formatters.
//!
//! A [`Formatter`] receives its configuration payload once through
//! [`initialize`](Formatter::initialize) and then renders a [`Hierarchy`]
//! into bytes. Formatters are created by name through a
//! [`FormatterRegistry`]; the dumper never inspects the concrete type.

mod json;
mod registry;
mod template;
mod yaml;

pub use json::{JsonFormatter, JsonOptions};
pub use registry::{FormatterConstructor, FormatterRegistry};
pub use template::TemplateFormatter;
pub use yaml::YamlFormatter;

use crate::core::schema::Hierarchy;
use crate::error::Result;

/// Renders a [`Hierarchy`] into an output payload.
pub trait Formatter: Send + Sync {
    /// Name the formatter is registered under, used in error context.
    fn name(&self) -> &str;

    /// Apply the configuration payload.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::FormatterConfig`](crate::DumpError::FormatterConfig)
    /// when the payload is malformed.
    fn initialize(&mut self, config: &[u8]) -> Result<()>;

    /// Render the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Format`](crate::DumpError::Format) when rendering fails.
    fn format(&self, hierarchy: &Hierarchy) -> Result<Vec<u8>>;
}

/// Configuration payload as UTF-8 text, or `None` when it is blank.
pub(crate) fn config_text<'a>(formatter: &str, config: &'a [u8]) -> Result<Option<&'a str>> {
    let text = std::str::from_utf8(config)
        .map_err(|e| crate::error::DumpError::formatter_config(formatter, e))?;
    Ok(Some(text).filter(|t| !t.trim().is_empty()))
}
