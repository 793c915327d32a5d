// ABOUTME: Helper registry module composing the resolver, scheduler, transforms, and query adapter
// ABOUTME: Maps helper identity to implementation via a closed dispatch table

pub mod assets;
pub mod content;
pub mod data;
pub mod error;
pub mod invocation;
pub mod post;
pub mod registry;
pub mod sources;

pub use error::{HelperError, Result};
pub use invocation::{BlockFn, HelperInvocation, HelperKind};
pub use registry::HelperRegistry;
pub use sources::{
    NavItem, NavigationSource, SettingsSource, FOOT_INJECTION_KEY, HEAD_INJECTION_KEY,
};
