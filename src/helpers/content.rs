// ABOUTME: Synchronous content helpers over the transform pipeline
// ABOUTME: Excerpt, reading time, and selector-based element blocks

use serde_json::{json, Value};
use tracing::warn;

use super::error::{HelperError, Result};
use super::invocation::HelperInvocation;
use super::registry::HelperRegistry;
use crate::chunk::ChunkScheduler;
use crate::context::{ScopeFrame, ScopeStack};
use crate::query::spec::{param_opt_u64, param_str, param_u64};
use crate::transform::{excerpt, extract_elements, reading_time, ExcerptOptions};

/// Write an excerpt of the current content. An explicit `content` parameter
/// wins over the ambient context value; missing content yields nothing.
pub(super) fn excerpt_helper(
    registry: &HelperRegistry,
    invocation: HelperInvocation,
    ctx: &ScopeStack,
    out: &mut ChunkScheduler,
) {
    let content = resolved_content(&invocation, ctx);
    let mut options = ExcerptOptions::default();
    if let Some(tags) = &registry.config().excerpt_allowed_tags {
        options.allowed_tags = tags.clone();
    }
    options.paragraphs = param_u64(&invocation.params, "paragraphs", 1) as usize;
    options.words = param_opt_u64(&invocation.params, "words").map(|w| w as usize);

    out.write(&excerpt(&content, &options));
    out.end();
}

/// Write the estimated reading time, e.g. "4 min read".
pub(super) fn reading_time_helper(
    registry: &HelperRegistry,
    invocation: HelperInvocation,
    ctx: &ScopeStack,
    out: &mut ChunkScheduler,
) {
    let content = resolved_content(&invocation, ctx);
    let minutes = reading_time(&content, registry.config().words_per_minute);
    out.write(&format!("{minutes} min read"));
    out.end();
}

/// Render the block once per element matching the `selector` parameter,
/// sliced by `offset`/`count`. No matches, a missing selector, or an invalid
/// selector all degrade to the else body.
pub(super) fn elements_helper(
    invocation: HelperInvocation,
    ctx: &ScopeStack,
    out: &mut ChunkScheduler,
) {
    let content = resolved_content(&invocation, ctx);
    let offset = param_u64(&invocation.params, "offset", 0) as usize;
    let count = param_opt_u64(&invocation.params, "count")
        .map(|c| c as usize)
        .unwrap_or(usize::MAX);

    let extracted: Result<_> = param_str(&invocation.params, "selector")
        .ok_or(HelperError::MissingParameter("selector"))
        .and_then(|selector| Ok(extract_elements(&content, &selector, offset, count)?));
    let matches = match extracted {
        Ok(matches) => matches,
        Err(e) => {
            warn!("elements helper degraded to else branch: {e}");
            Vec::new()
        }
    };

    if matches.is_empty() {
        out.write(&invocation.render_inverse(ctx));
        out.end();
        return;
    }

    let mut scope = ctx.clone();
    let mut rendered = String::new();
    for element in matches {
        let attributes: Value = element
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), json!(v)))
            .collect::<serde_json::Map<_, _>>()
            .into();
        let mut frame = ScopeFrame::new();
        frame.insert("tag".to_string(), json!(element.tag));
        frame.insert("attributes".to_string(), attributes);
        frame.insert("html".to_string(), json!(element.inner_html));
        let guard = scope.scoped(frame);
        rendered.push_str(&invocation.render_block(guard.stack()));
    }
    out.write(&rendered);
    out.end();
}

fn resolved_content(invocation: &HelperInvocation, ctx: &ScopeStack) -> String {
    param_str(&invocation.params, "content")
        .or_else(|| ctx.get_str("content").map(str::to_string))
        .unwrap_or_default()
}
