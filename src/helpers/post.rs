// ABOUTME: Single-post derivation helpers: adjacent, related, and visibility
// ABOUTME: Resolves a source post from an explicit parameter or the ambient context

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::HelperError;
use super::invocation::HelperInvocation;
use super::registry::HelperRegistry;
use crate::chunk::ChunkScheduler;
use crate::context::{ScopeFrame, ScopeStack};
use crate::query::spec::{param_str, param_u64};
use crate::query::Adjacency;

const DEFAULT_RELATED_COUNT: u64 = 3;

/// Render the block against the post adjacent to the source post, or the
/// else body when there is none, the source cannot be resolved, or the
/// store fails.
pub(super) fn adjacent(
    registry: &HelperRegistry,
    direction: Adjacency,
    invocation: HelperInvocation,
    ctx: &ScopeStack,
    out: &mut ChunkScheduler,
) {
    let source = source_post(&invocation, ctx);
    let store = registry.store();
    let ctx = ctx.clone();

    out.map(async move {
        let mut scope = ctx;
        let rendered = match source {
            Some(post) => match store.get_adjacent(&post, direction).await {
                Ok(Some(found)) => render_with_post(&invocation, &mut scope, found),
                Ok(None) => invocation.render_inverse(&scope),
                Err(e) => {
                    warn!(direction = ?direction, "adjacent post helper degraded: {e}");
                    invocation.render_inverse(&scope)
                }
            },
            None => {
                debug!("adjacent post helper has no source post");
                invocation.render_inverse(&scope)
            }
        };
        Ok::<_, HelperError>(rendered)
    });
}

/// Render the block against posts the store considers related to the source
/// post. Similarity ranking is the store's concern.
pub(super) fn related(
    registry: &HelperRegistry,
    invocation: HelperInvocation,
    ctx: &ScopeStack,
    out: &mut ChunkScheduler,
) {
    let source = source_post(&invocation, ctx);
    let count = param_u64(&invocation.params, "count", DEFAULT_RELATED_COUNT);
    let offset = param_u64(&invocation.params, "offset", 0);
    let store = registry.store();
    let ctx = ctx.clone();

    out.map(async move {
        let mut scope = ctx;
        let rendered = match source {
            Some(post) => match store.get_related(&post, count, offset).await {
                Ok(related) if !related.is_empty() => {
                    let mut frame = ScopeFrame::new();
                    frame.insert("posts".to_string(), Value::Array(related));
                    let guard = scope.scoped(frame);
                    invocation.render_block(guard.stack())
                }
                Ok(_) => invocation.render_inverse(&scope),
                Err(e) => {
                    warn!("related posts helper degraded: {e}");
                    invocation.render_inverse(&scope)
                }
            },
            None => invocation.render_inverse(&scope),
        };
        Ok::<_, HelperError>(rendered)
    });
}

/// Render the block when the current post is publicly visible: published
/// status and a publication date not in the future. A date the store never
/// set does not hold a published post back.
pub(super) fn post_is_public(
    invocation: HelperInvocation,
    ctx: &ScopeStack,
    out: &mut ChunkScheduler,
) {
    let status = param_str(&invocation.params, "status")
        .or_else(|| ctx.get_str("status").map(str::to_string));
    let published_at = param_str(&invocation.params, "published_at")
        .or_else(|| ctx.get_str("published_at").map(str::to_string));

    let rendered = if is_public(status.as_deref(), published_at.as_deref(), Utc::now()) {
        invocation.render_block(ctx)
    } else {
        invocation.render_inverse(ctx)
    };
    out.write(&rendered);
    out.end();
}

/// Visibility rule shared by the registry path and the engine adapter.
pub fn is_public(status: Option<&str>, published_at: Option<&str>, now: DateTime<Utc>) -> bool {
    if status != Some("published") {
        return false;
    }
    match published_at.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok()) {
        Some(at) => at.with_timezone(&Utc) <= now,
        None => true,
    }
}

fn render_with_post(
    invocation: &HelperInvocation,
    scope: &mut ScopeStack,
    post: Value,
) -> String {
    let mut frame = ScopeFrame::new();
    if let Value::Object(fields) = &post {
        for (key, value) in fields {
            frame.insert(key.clone(), value.clone());
        }
    }
    frame.insert("post".to_string(), post);
    let guard = scope.scoped(frame);
    invocation.render_block(guard.stack())
}

/// Explicit `post` parameter wins; otherwise fall back to the ambient
/// current-post keys on the context.
fn source_post(invocation: &HelperInvocation, ctx: &ScopeStack) -> Option<Value> {
    match invocation.params.get("post") {
        Some(value @ Value::Object(_)) => Some(value.clone()),
        _ => ctx.ambient_post(),
    }
}
