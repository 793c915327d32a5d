// ABOUTME: Template engine adapter wrapping Handlebars
// ABOUTME: Registers the synchronous helper set and renders page fragments

use std::sync::Arc;

use handlebars::Handlebars;
use serde_json::Value as JsonValue;

use super::error::{Result, TemplateError};
use super::helpers;
use crate::helpers::HelperRegistry;

/// A handlebars instance wired to the synchronous helpers.
///
/// The asynchronous data helpers (collections, counts, adjacent and related
/// posts) are not registered here; an async-capable engine drives those
/// through [`HelperRegistry::dispatch`] and the chunk scheduler.
#[derive(Clone)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new(registry: Arc<HelperRegistry>) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.set_dev_mode(false);
        helpers::register_helpers(&mut handlebars, registry);
        Self { handlebars }
    }

    /// Render a template string with the given context data.
    pub fn render_template(&self, template: &str, data: &JsonValue) -> Result<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(TemplateError::RenderError)
    }

    /// Validate template syntax without rendering.
    pub fn validate_template(&self, template: &str) -> Result<()> {
        handlebars::Template::compile(template)
            .map(|_| ())
            .map_err(|e| TemplateError::SyntaxError(e.to_string()))
    }
}
