// ABOUTME: Helper identity and invocation payload passed in by the template engine
// ABOUTME: Carries resolved parameters plus optional block and else bodies

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::ScopeStack;

/// A nested template body, rendered by the external engine against the
/// scope stack the helper prepares.
pub type BlockFn = Arc<dyn Fn(&ScopeStack) -> String + Send + Sync>;

/// Closed set of helpers; dispatch is an enumerated table resolved at
/// registration, never string-keyed dynamic lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperKind {
    GetPosts,
    GetAuthors,
    GetTags,
    PostCount,
    NextPost,
    PreviousPost,
    RelatedPosts,
    PostIsPublic,
    Excerpt,
    ReadingTime,
    Elements,
    DynamicImage,
    Navigation,
    HeadInjection,
    FootInjection,
}

impl HelperKind {
    pub const ALL: &'static [HelperKind] = &[
        HelperKind::GetPosts,
        HelperKind::GetAuthors,
        HelperKind::GetTags,
        HelperKind::PostCount,
        HelperKind::NextPost,
        HelperKind::PreviousPost,
        HelperKind::RelatedPosts,
        HelperKind::PostIsPublic,
        HelperKind::Excerpt,
        HelperKind::ReadingTime,
        HelperKind::Elements,
        HelperKind::DynamicImage,
        HelperKind::Navigation,
        HelperKind::HeadInjection,
        HelperKind::FootInjection,
    ];

    /// Template-facing helper name.
    pub fn name(&self) -> &'static str {
        match self {
            HelperKind::GetPosts => "get_posts",
            HelperKind::GetAuthors => "get_authors",
            HelperKind::GetTags => "get_tags",
            HelperKind::PostCount => "post_count",
            HelperKind::NextPost => "next_post",
            HelperKind::PreviousPost => "previous_post",
            HelperKind::RelatedPosts => "related_posts",
            HelperKind::PostIsPublic => "post_is_public",
            HelperKind::Excerpt => "excerpt",
            HelperKind::ReadingTime => "reading_time",
            HelperKind::Elements => "elements",
            HelperKind::DynamicImage => "dynamic_image",
            HelperKind::Navigation => "navigation",
            HelperKind::HeadInjection => "head_injection",
            HelperKind::FootInjection => "foot_injection",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Whether the helper opens an async branch through the chunk scheduler.
    pub fn is_async(&self) -> bool {
        matches!(
            self,
            HelperKind::GetPosts
                | HelperKind::GetAuthors
                | HelperKind::GetTags
                | HelperKind::PostCount
                | HelperKind::NextPost
                | HelperKind::PreviousPost
                | HelperKind::RelatedPosts
        )
    }
}

/// One helper invocation handed over by the template engine: resolved
/// parameters and the optional `block`/`else` bodies.
#[derive(Clone, Default)]
pub struct HelperInvocation {
    pub params: HashMap<String, Value>,
    pub block: Option<BlockFn>,
    pub inverse: Option<BlockFn>,
}

impl HelperInvocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn with_block<F>(mut self, block: F) -> Self
    where
        F: Fn(&ScopeStack) -> String + Send + Sync + 'static,
    {
        self.block = Some(Arc::new(block));
        self
    }

    pub fn with_inverse<F>(mut self, inverse: F) -> Self
    where
        F: Fn(&ScopeStack) -> String + Send + Sync + 'static,
    {
        self.inverse = Some(Arc::new(inverse));
        self
    }

    /// Render the block body, or nothing when the helper has none.
    pub fn render_block(&self, ctx: &ScopeStack) -> String {
        self.block.as_ref().map(|block| block(ctx)).unwrap_or_default()
    }

    /// Render the else body, or nothing when the helper has none.
    pub fn render_inverse(&self, ctx: &ScopeStack) -> String {
        self.inverse
            .as_ref()
            .map(|inverse| inverse(ctx))
            .unwrap_or_default()
    }
}

impl fmt::Debug for HelperInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperInvocation")
            .field("params", &self.params)
            .field("block", &self.block.is_some())
            .field("inverse", &self.inverse.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in HelperKind::ALL {
            assert_eq!(HelperKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(HelperKind::from_name("no_such_helper"), None);
    }

    #[test]
    fn test_missing_bodies_render_empty() {
        let invocation = HelperInvocation::new();
        let ctx = ScopeStack::new();
        assert_eq!(invocation.render_block(&ctx), "");
        assert_eq!(invocation.render_inverse(&ctx), "");
    }

    #[test]
    fn test_data_helpers_are_async() {
        assert!(HelperKind::GetPosts.is_async());
        assert!(HelperKind::PostCount.is_async());
        assert!(!HelperKind::Excerpt.is_async());
        assert!(!HelperKind::DynamicImage.is_async());
    }
}
