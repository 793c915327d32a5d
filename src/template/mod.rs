// ABOUTME: Handlebars engine adapter for the synchronous helpers
// ABOUTME: Asynchronous data helpers are driven through the registry and chunk scheduler

pub mod engine;
pub mod error;
pub mod helpers;

pub use engine::TemplateEngine;
pub use error::{Result, TemplateError};
