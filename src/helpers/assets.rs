// ABOUTME: Asset and site-chrome helpers: signed images, navigation, code injection
// ABOUTME: Escapes externally-sourced content before embedding it in markup

use std::collections::BTreeMap;

use handlebars::html_escape;
use tracing::debug;

use super::invocation::HelperInvocation;
use super::registry::HelperRegistry;
use super::sources::NavItem;
use crate::chunk::ChunkScheduler;
use crate::context::{ScopeFrame, ScopeStack};
use crate::query::spec::{param_str, value_to_string};

/// Write a signed URL for a derived image. Every parameter except `src`
/// becomes a transform parameter in the canonical query; external URLs pass
/// through unsigned.
pub(super) fn dynamic_image(
    registry: &HelperRegistry,
    invocation: HelperInvocation,
    out: &mut ChunkScheduler,
) {
    let Some(src) = param_str(&invocation.params, "src") else {
        debug!("dynamic image helper invoked without src");
        out.end();
        return;
    };

    let mut transform_params = BTreeMap::new();
    for (key, value) in &invocation.params {
        if key == "src" {
            continue;
        }
        let rendered = value_to_string(value);
        if !rendered.is_empty() {
            transform_params.insert(key.clone(), rendered);
        }
    }

    out.write(&registry.signer().sign(&src, &transform_params));
    out.end();
}

/// Render the site navigation: the block once per item, or default list
/// markup when the helper has no block. No items renders the else body.
pub(super) fn navigation(
    registry: &HelperRegistry,
    invocation: HelperInvocation,
    ctx: &ScopeStack,
    out: &mut ChunkScheduler,
) {
    let items = registry.navigation().items();
    if items.is_empty() {
        out.write(&invocation.render_inverse(ctx));
        out.end();
        return;
    }

    if invocation.block.is_some() {
        let mut scope = ctx.clone();
        let mut rendered = String::new();
        for item in &items {
            let mut frame = ScopeFrame::new();
            frame.insert("label".to_string(), item.label.clone().into());
            frame.insert("link".to_string(), item.link.clone().into());
            let guard = scope.scoped(frame);
            rendered.push_str(&invocation.render_block(guard.stack()));
        }
        out.write(&rendered);
    } else {
        out.write(&default_navigation_markup(&items));
    }
    out.end();
}

/// Fallback navigation markup used when the template supplies no block.
pub fn default_navigation_markup(items: &[NavItem]) -> String {
    let mut markup = String::from("<ul class=\"nav\">");
    for item in items {
        markup.push_str("<li class=\"nav-item\"><a href=\"");
        markup.push_str(&html_escape(&item.link));
        markup.push_str("\">");
        markup.push_str(&html_escape(&item.label));
        markup.push_str("</a></li>");
    }
    markup.push_str("</ul>");
    markup
}

/// Write settings-sourced injected markup, or nothing when the key is unset.
pub(super) fn injection(registry: &HelperRegistry, key: &str, out: &mut ChunkScheduler) {
    if let Some(markup) = registry.settings().get(key) {
        out.write(&markup);
    }
    out.end();
}
