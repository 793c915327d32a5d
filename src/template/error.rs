// ABOUTME: Error types for the template engine adapter
// ABOUTME: Wraps handlebars render and compile failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template syntax error: {0}")]
    SyntaxError(String),

    #[error("template render error: {0}")]
    RenderError(#[from] handlebars::RenderError),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
