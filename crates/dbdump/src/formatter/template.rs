//! User-supplied `handlebars` template formatter.
//!
//! The configuration payload is the template source. The template is
//! rendered against the hierarchy serialized as
//! `{ schema: [ { name, columns, constraints, .. } ] }`.
//!
//! Strict mode is on, so a reference to a field the hierarchy does not have
//! fails the render instead of producing an empty string. The built-in `if`
//! and `unless` are replaced so that a missing condition fails too. Output is
//! plain text: no HTML escaping is applied.
//!
//! Helpers:
//! - `join list sep`: join a list of strings, e.g. `{{join members ", "}}`

use handlebars::{
    handlebars_helper, no_escape, Context, Handlebars, Helper, HelperDef, HelperResult, JsonTruthy,
    Output,
    RenderContext, RenderErrorReason, Renderable,
};

use super::{config_text, Formatter};
use crate::core::schema::Hierarchy;
use crate::error::{DumpError, Result};

const TEMPLATE_NAME: &str = "dump";

handlebars_helper!(join: |items: array, sep: str| {
    items
        .iter()
        .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
        .collect::<Vec<_>>()
        .join(sep)
});

/// `if`/`unless` that reject a condition naming a missing value.
#[derive(Clone, Copy)]
struct StrictIf {
    positive: bool,
}

impl HelperDef for StrictIf {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let name = if self.positive { "if" } else { "unless" };
        let param = h
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex(name, 0))?;
        if param.is_value_missing() {
            return Err(RenderErrorReason::MissingVariable(param.relative_path().cloned()).into());
        }
        let include_zero = h
            .hash_get("includeZero")
            .and_then(|v| v.value().as_bool())
            .unwrap_or(false);

        let truthy = param.value().is_truthy(include_zero);
        let branch = if truthy == self.positive {
            h.template()
        } else {
            h.inverse()
        };
        match branch {
            Some(t) => t.render(r, ctx, rc, out),
            None => Ok(()),
        }
    }
}

pub struct TemplateFormatter {
    registry: Handlebars<'static>,
    ready: bool,
}

impl TemplateFormatter {
    pub const NAME: &'static str = "template";

    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);
        registry.register_helper("join", Box::new(join));
        registry.register_helper("if", Box::new(StrictIf { positive: true }));
        registry.register_helper("unless", Box::new(StrictIf { positive: false }));
        Self {
            registry,
            ready: false,
        }
    }
}

impl Default for TemplateFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for TemplateFormatter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialize(&mut self, config: &[u8]) -> Result<()> {
        let source = config_text(Self::NAME, config)?
            .ok_or_else(|| DumpError::formatter_config(Self::NAME, "template is empty"))?;
        self.registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| DumpError::formatter_config(Self::NAME, e))?;
        self.ready = true;
        Ok(())
    }

    fn format(&self, hierarchy: &Hierarchy) -> Result<Vec<u8>> {
        if !self.ready {
            return Err(DumpError::format(Self::NAME, "no template was loaded"));
        }
        self.registry
            .render(TEMPLATE_NAME, hierarchy)
            .map(String::into_bytes)
            .map_err(|e| DumpError::format(Self::NAME, e))
    }
}
