//! Name-keyed formatter factory.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::{Formatter, JsonFormatter, TemplateFormatter, YamlFormatter};
use crate::error::{DumpError, Result};

/// Zero-argument constructor for a fresh, uninitialized formatter.
pub type FormatterConstructor = Arc<dyn Fn() -> Box<dyn Formatter> + Send + Sync>;

/// Registry of formatter constructors.
///
/// Built explicitly at startup and passed by reference to the
/// [`Dumper`](crate::Dumper); there is no process-wide registry.
#[derive(Default, Clone)]
pub struct FormatterRegistry {
    constructors: HashMap<String, FormatterConstructor>,
}

impl FormatterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `json`, `yaml` and `template` registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(JsonFormatter::NAME, || Box::new(JsonFormatter::new()));
        registry.register(YamlFormatter::NAME, || Box::new(YamlFormatter::new()));
        registry.register(TemplateFormatter::NAME, || {
            Box::new(TemplateFormatter::new())
        });
        registry
    }

    /// Register a constructor. A later registration under the same name
    /// replaces the earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn Formatter> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    /// Create a new formatter instance.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::FormatterNotFound`] if nothing is registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Formatter>> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| DumpError::FormatterNotFound(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn list_names(&self) -> BTreeSet<String> {
        self.constructors.keys().cloned().collect()
    }
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("names", &self.list_names())
            .finish()
    }
}
