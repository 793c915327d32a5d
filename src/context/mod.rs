// ABOUTME: Render context module providing scoped variable resolution
// ABOUTME: Exposes the scope frame stack used by every helper invocation

pub mod resolver;

pub use resolver::{ScopeFrame, ScopeGuard, ScopeStack, AMBIENT_POST_KEYS};
