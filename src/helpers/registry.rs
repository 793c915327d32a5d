// ABOUTME: Closed dispatch table from helper identity to implementation
// ABOUTME: Owns the store, settings, navigation, and signer collaborators

use std::sync::Arc;

use tracing::debug;

use super::invocation::{HelperInvocation, HelperKind};
use super::sources::{NavigationSource, SettingsSource, FOOT_INJECTION_KEY, HEAD_INJECTION_KEY};
use super::{assets, content, data, post};
use crate::chunk::ChunkScheduler;
use crate::config::{self, EngineConfig};
use crate::context::ScopeStack;
use crate::query::{Adjacency, DataStore, Entity};
use crate::signing::UrlSigner;

/// Composes the context resolver, chunk scheduler, transform pipeline,
/// signer, and query adapter behind a single dispatch entry point invoked by
/// the external template engine.
pub struct HelperRegistry {
    config: EngineConfig,
    store: Arc<dyn DataStore>,
    settings: Arc<dyn SettingsSource>,
    navigation: Arc<dyn NavigationSource>,
    signer: UrlSigner,
}

impl HelperRegistry {
    /// Build the registry at application bootstrap. Configuration faults,
    /// including a missing signing secret, are fatal here and never reach
    /// the per-request path.
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn DataStore>,
        settings: Arc<dyn SettingsSource>,
        navigation: Arc<dyn NavigationSource>,
    ) -> config::Result<Self> {
        config.validate()?;
        let signer = UrlSigner::new(&config.signing_secret)?;
        Ok(Self {
            config,
            store,
            settings,
            navigation,
            signer,
        })
    }

    /// Execute a helper against the render context, writing all output
    /// through the chunk scheduler. No helper failure aborts the page;
    /// faults degrade to the `else` body or empty output.
    pub fn dispatch(
        &self,
        kind: HelperKind,
        invocation: HelperInvocation,
        ctx: &ScopeStack,
        out: &mut ChunkScheduler,
    ) {
        debug!(helper = kind.name(), "dispatching helper");
        match kind {
            HelperKind::GetPosts => data::collection(self, Entity::Post, invocation, ctx, out),
            HelperKind::GetAuthors => data::collection(self, Entity::Author, invocation, ctx, out),
            HelperKind::GetTags => data::collection(self, Entity::Tag, invocation, ctx, out),
            HelperKind::PostCount => data::post_count(self, invocation, out),
            HelperKind::NextPost => post::adjacent(self, Adjacency::Next, invocation, ctx, out),
            HelperKind::PreviousPost => {
                post::adjacent(self, Adjacency::Previous, invocation, ctx, out)
            }
            HelperKind::RelatedPosts => post::related(self, invocation, ctx, out),
            HelperKind::PostIsPublic => post::post_is_public(invocation, ctx, out),
            HelperKind::Excerpt => content::excerpt_helper(self, invocation, ctx, out),
            HelperKind::ReadingTime => content::reading_time_helper(self, invocation, ctx, out),
            HelperKind::Elements => content::elements_helper(invocation, ctx, out),
            HelperKind::DynamicImage => assets::dynamic_image(self, invocation, out),
            HelperKind::Navigation => assets::navigation(self, invocation, ctx, out),
            HelperKind::HeadInjection => assets::injection(self, HEAD_INJECTION_KEY, out),
            HelperKind::FootInjection => assets::injection(self, FOOT_INJECTION_KEY, out),
        }
    }

    pub(crate) fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> Arc<dyn DataStore> {
        Arc::clone(&self.store)
    }

    pub(crate) fn settings(&self) -> &dyn SettingsSource {
        self.settings.as_ref()
    }

    pub(crate) fn navigation(&self) -> &dyn NavigationSource {
        self.navigation.as_ref()
    }

    pub(crate) fn signer(&self) -> &UrlSigner {
        &self.signer
    }
}
