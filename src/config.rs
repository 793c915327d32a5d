// ABOUTME: Engine configuration validated at application bootstrap
// ABOUTME: Carries the URL-signing secret and content transform defaults

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("URL signing secret is missing or empty")]
    MissingSecret,

    #[error("words per minute must be greater than zero")]
    InvalidWordsPerMinute,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration injected into the helper registry at construction time.
///
/// Validation happens once at bootstrap; a missing signing secret is a fatal
/// configuration fault and never a per-request error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Shared secret used to sign derived resource URLs.
    pub signing_secret: String,

    /// Words-per-minute rate used by the reading time estimate.
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,

    /// Overrides the default excerpt tag allow-list when set.
    #[serde(default)]
    pub excerpt_allowed_tags: Option<Vec<String>>,
}

impl EngineConfig {
    /// Create a configuration with the given signing secret and defaults.
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            words_per_minute: default_words_per_minute(),
            excerpt_allowed_tags: None,
        }
    }

    /// Validate the configuration, returning the first fault found.
    pub fn validate(&self) -> Result<()> {
        if self.signing_secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.words_per_minute == 0 {
            return Err(ConfigError::InvalidWordsPerMinute);
        }
        Ok(())
    }
}

fn default_words_per_minute() -> u32 {
    crate::transform::DEFAULT_WORDS_PER_MINUTE
}
