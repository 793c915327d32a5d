// ABOUTME: Collection and count helpers backed by the external data store
// ABOUTME: Builds a query spec, binds results into a scope frame, renders block or else

use serde_json::Value;
use tracing::warn;

use super::error::HelperError;
use super::invocation::HelperInvocation;
use super::registry::HelperRegistry;
use crate::chunk::ChunkScheduler;
use crate::context::{ScopeFrame, ScopeStack};
use crate::query::spec::{csv_list, param_str};
use crate::query::{Entity, Filter, QuerySpec};

/// Fetch a collection and render the block against it, or the else body for
/// an empty result. A store rejection degrades to the else body; it never
/// escapes the helper boundary.
pub(super) fn collection(
    registry: &HelperRegistry,
    entity: Entity,
    invocation: HelperInvocation,
    ctx: &ScopeStack,
    out: &mut ChunkScheduler,
) {
    let query = QuerySpec::from_params(entity, &invocation.params);
    let store = registry.store();
    let ctx = ctx.clone();

    out.map(async move {
        let mut scope = ctx;
        let rendered = match store.find_all(entity, &query).await {
            Ok(rows) if !rows.is_empty() => {
                let mut frame = ScopeFrame::new();
                frame.insert(entity.collection_key().to_string(), Value::Array(rows));
                let guard = scope.scoped(frame);
                invocation.render_block(guard.stack())
            }
            Ok(_) => invocation.render_inverse(&scope),
            Err(e) => {
                warn!(entity = ?entity, "collection helper degraded to else branch: {e}");
                invocation.render_inverse(&scope)
            }
        };
        Ok::<_, HelperError>(rendered)
    });
}

/// Count posts matching the flag parameters and write the scalar. Each flag
/// parses its own parameter. A store failure degrades to empty output
/// through the scheduler.
pub(super) fn post_count(
    registry: &HelperRegistry,
    invocation: HelperInvocation,
    out: &mut ChunkScheduler,
) {
    let mut filters = Vec::new();
    if let Some(featured) = param_str(&invocation.params, "featured") {
        if let Ok(flag) = featured.trim().parse::<bool>() {
            filters.push(Filter {
                field: "featured".to_string(),
                values: vec![flag.to_string()],
            });
        }
    }
    let statuses = csv_list(invocation.params.get("status"));
    if !statuses.is_empty() {
        filters.push(Filter {
            field: "status".to_string(),
            values: statuses,
        });
    }

    let store = registry.store();
    out.map(async move {
        let count = store.get_count(Entity::Post, &filters).await?;
        Ok::<_, HelperError>(count.to_string())
    });
}
