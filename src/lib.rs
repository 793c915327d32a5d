// ABOUTME: Main library module for the folio document assembly engine
// ABOUTME: Exports the helper runtime, chunk scheduler, content transforms, and query adapter

pub mod chunk;
pub mod config;
pub mod context;
pub mod helpers;
pub mod query;
pub mod signing;
pub mod template;
pub mod transform;

// Re-export commonly used types
pub use chunk::ChunkScheduler;
pub use config::EngineConfig;
pub use context::{ScopeFrame, ScopeStack};
pub use helpers::{HelperInvocation, HelperKind, HelperRegistry};
pub use query::{DataStore, Entity, QuerySpec, SortOrder};
pub use signing::UrlSigner;
pub use template::TemplateEngine;

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
