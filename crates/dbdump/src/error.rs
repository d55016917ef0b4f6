//! Error types for catalog extraction and rendering.

use thiserror::Error;

/// Main error type for dump operations.
#[derive(Error, Debug)]
pub enum DumpError {
    /// Configuration error (invalid YAML, missing fields, unknown dialect, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The database could not be reached or the connection check failed
    #[error("Connection error: {message}\n  Context: {context}")]
    Connection { message: String, context: String },

    /// A catalog query did not run
    #[error("{context} failed: {message}")]
    Query { context: String, message: String },

    /// A catalog query ran but returned rows of an unexpected shape
    #[error("{context} failed: {message}")]
    Scan { context: String, message: String },

    /// No formatter is registered under the requested name
    #[error("{0} formatter not found")]
    FormatterNotFound(String),

    /// Formatter rejected its configuration payload
    #[error("initialize formatter {formatter} failed: {message}")]
    FormatterConfig { formatter: String, message: String },

    /// Formatter failed while rendering the hierarchy
    #[error("format output with {formatter} failed: {message}")]
    Format { formatter: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DumpError {
    /// Create a Connection error with context about where it occurred
    pub fn connection(message: impl ToString, context: impl Into<String>) -> Self {
        DumpError::Connection {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Create a Query error
    pub fn query(context: impl Into<String>, message: impl Into<String>) -> Self {
        DumpError::Query {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a Scan error
    pub fn scan(context: impl Into<String>, message: impl Into<String>) -> Self {
        DumpError::Scan {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a FormatterConfig error
    pub fn formatter_config(formatter: impl Into<String>, message: impl ToString) -> Self {
        DumpError::FormatterConfig {
            formatter: formatter.into(),
            message: message.to_string(),
        }
    }

    /// Create a Format error
    pub fn format(formatter: impl Into<String>, message: impl ToString) -> Self {
        DumpError::Format {
            formatter: formatter.into(),
            message: message.to_string(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DumpError::Config(_) | DumpError::Yaml(_) => 1,
            DumpError::Connection { .. } => 2,
            DumpError::Query { .. } => 3,
            DumpError::Scan { .. } => 4,
            DumpError::FormatterNotFound(_) => 5,
            DumpError::FormatterConfig { .. } | DumpError::Format { .. } => 6,
            DumpError::Io(_) => 7,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\n\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for dump operations.
pub type Result<T> = std::result::Result<T, DumpError>;
