// ABOUTME: Handlebars helper definitions bridging templates to the helper runtime
// ABOUTME: Each helper resolves hash parameters then delegates to the shared implementations

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use handlebars::{
    BlockContext, Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    Renderable,
};
use serde_json::{json, Value};

use crate::helpers::post::is_public;
use crate::helpers::{assets, HelperRegistry, FOOT_INJECTION_KEY, HEAD_INJECTION_KEY};
use crate::query::spec::{param_opt_u64, param_str, param_u64, value_to_string};
use crate::transform::{excerpt, reading_time, ExcerptOptions};

/// Register every synchronous helper on a handlebars instance.
pub fn register_helpers(handlebars: &mut Handlebars<'static>, registry: Arc<HelperRegistry>) {
    handlebars.register_helper(
        "excerpt",
        Box::new(ExcerptHelper {
            registry: Arc::clone(&registry),
        }),
    );
    handlebars.register_helper(
        "reading_time",
        Box::new(ReadingTimeHelper {
            registry: Arc::clone(&registry),
        }),
    );
    handlebars.register_helper(
        "dynamic_image",
        Box::new(DynamicImageHelper {
            registry: Arc::clone(&registry),
        }),
    );
    handlebars.register_helper(
        "navigation",
        Box::new(NavigationHelper {
            registry: Arc::clone(&registry),
        }),
    );
    handlebars.register_helper("post_is_public", Box::new(PostIsPublicHelper));
    handlebars.register_helper(
        "head_injection",
        Box::new(InjectionHelper {
            registry: Arc::clone(&registry),
            key: HEAD_INJECTION_KEY,
        }),
    );
    handlebars.register_helper(
        "foot_injection",
        Box::new(InjectionHelper {
            registry,
            key: FOOT_INJECTION_KEY,
        }),
    );
}

fn hash_params(h: &Helper) -> HashMap<String, Value> {
    h.hash()
        .iter()
        .map(|(key, value)| (key.to_string(), value.value().clone()))
        .collect()
}

fn content_param(params: &HashMap<String, Value>, ctx: &Context) -> String {
    param_str(params, "content")
        .or_else(|| {
            ctx.data()
                .get("content")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_default()
}

struct ExcerptHelper {
    registry: Arc<HelperRegistry>,
}

impl HelperDef for ExcerptHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let params = hash_params(h);
        let content = content_param(&params, ctx);

        let mut options = ExcerptOptions::default();
        if let Some(tags) = &self.registry.config().excerpt_allowed_tags {
            options.allowed_tags = tags.clone();
        }
        options.paragraphs = param_u64(&params, "paragraphs", 1) as usize;
        options.words = param_opt_u64(&params, "words").map(|w| w as usize);

        out.write(&excerpt(&content, &options))?;
        Ok(())
    }
}

struct ReadingTimeHelper {
    registry: Arc<HelperRegistry>,
}

impl HelperDef for ReadingTimeHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let params = hash_params(h);
        let content = content_param(&params, ctx);
        let minutes = reading_time(&content, self.registry.config().words_per_minute);
        out.write(&format!("{minutes} min read"))?;
        Ok(())
    }
}

struct DynamicImageHelper {
    registry: Arc<HelperRegistry>,
}

impl HelperDef for DynamicImageHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let params = hash_params(h);
        let Some(src) = param_str(&params, "src") else {
            return Ok(());
        };
        let transform_params: BTreeMap<String, String> = params
            .iter()
            .filter(|(key, _)| key.as_str() != "src")
            .map(|(key, value)| (key.clone(), value_to_string(value)))
            .filter(|(_, value)| !value.is_empty())
            .collect();
        out.write(&self.registry.signer().sign(&src, &transform_params))?;
        Ok(())
    }
}

struct NavigationHelper {
    registry: Arc<HelperRegistry>,
}

impl HelperDef for NavigationHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let items = self.registry.navigation().items();
        if items.is_empty() {
            if let Some(inverse) = h.inverse() {
                inverse.render(r, ctx, rc, out)?;
            }
            return Ok(());
        }

        match h.template() {
            Some(template) => {
                for item in &items {
                    let mut block = BlockContext::new();
                    block.set_base_value(json!({
                        "label": item.label,
                        "link": item.link,
                    }));
                    rc.push_block(block);
                    template.render(r, ctx, rc, out)?;
                    rc.pop_block();
                }
            }
            None => out.write(&assets::default_navigation_markup(&items))?,
        }
        Ok(())
    }
}

struct PostIsPublicHelper;

impl HelperDef for PostIsPublicHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let params = hash_params(h);
        let status = param_str(&params, "status").or_else(|| {
            ctx.data()
                .get("status")
                .and_then(Value::as_str)
                .map(str::to_string)
        });
        let published_at = param_str(&params, "published_at").or_else(|| {
            ctx.data()
                .get("published_at")
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        let body = if is_public(status.as_deref(), published_at.as_deref(), Utc::now()) {
            h.template()
        } else {
            h.inverse()
        };
        if let Some(template) = body {
            template.render(r, ctx, rc, out)?;
        }
        Ok(())
    }
}

struct InjectionHelper {
    registry: Arc<HelperRegistry>,
    key: &'static str,
}

impl HelperDef for InjectionHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        _: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        if let Some(markup) = self.registry.settings().get(self.key) {
            out.write(&markup)?;
        }
        Ok(())
    }
}
