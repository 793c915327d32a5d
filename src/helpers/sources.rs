// ABOUTME: Read-only external sources consumed by helpers
// ABOUTME: Settings key lookups and the ordered navigation sequence

use serde::{Deserialize, Serialize};

/// Settings key holding markup injected into the document head.
pub const HEAD_INJECTION_KEY: &str = "codeinjection_head";
/// Settings key holding markup injected before the closing body tag.
pub const FOOT_INJECTION_KEY: &str = "codeinjection_foot";

/// Read-only settings lookups; persistence is owned externally.
pub trait SettingsSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub link: String,
}

/// Read-only ordered navigation sequence.
pub trait NavigationSource: Send + Sync {
    fn items(&self) -> Vec<NavItem>;
}
