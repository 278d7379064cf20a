//! Navigation: fetching `SUMMARY.md` and rewriting its links.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use pagehook_types::{Payload, Resource};
use regex::{Captures, Regex};
use serde_json::Value;

use super::title::strip_first_title;
use super::{set_context_path, HookContext, HookError, PreHook};
use crate::config::normalize_context_path;
use crate::fetch::fetch_summary;
use crate::markdown::MarkdownRenderer;

static MD_HREF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"]*)\.md""#).unwrap());

static HREF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"]*)""#).unwrap());

/// Which links a [`NavRewriter`] touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteMode {
    /// Only `href="*.md"` links
    MarkdownOnly,
    /// Every relative link is prefixed; `.md` targets become `.html`
    AllRelative,
}

/// Rewrites links in rendered nav fragments to site-relative URLs
#[derive(Debug, Clone)]
pub struct NavRewriter {
    context_path: String,
    mode: RewriteMode,
}

impl NavRewriter {
    pub fn new(context_path: &str) -> Self {
        Self {
            context_path: normalize_context_path(context_path),
            mode: RewriteMode::MarkdownOnly,
        }
    }

    pub fn all_relative(context_path: &str) -> Self {
        Self {
            context_path: normalize_context_path(context_path),
            mode: RewriteMode::AllRelative,
        }
    }

    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// Rewrite every link in one HTML fragment
    pub fn rewrite(&self, fragment: &str) -> String {
        match self.mode {
            RewriteMode::MarkdownOnly => MD_HREF_RE
                .replace_all(fragment, |caps: &Captures| {
                    let target = &caps[1];
                    if is_external(target) {
                        caps[0].to_string()
                    } else {
                        format!("href=\"{}{}.html\"", self.context_path, strip_root(target))
                    }
                })
                .into_owned(),
            RewriteMode::AllRelative => HREF_RE
                .replace_all(fragment, |caps: &Captures| {
                    let target = &caps[1];
                    if is_external(target) {
                        return caps[0].to_string();
                    }
                    let target = strip_root(target);
                    match target.strip_suffix(".md") {
                        Some(stem) => format!("href=\"{}{}.html\"", self.context_path, stem),
                        None => format!("href=\"{}{}\"", self.context_path, target),
                    }
                })
                .into_owned(),
        }
    }

    /// Rewrite string children; other nodes pass through untouched
    pub fn rewrite_children(&self, children: Vec<Value>) -> Vec<Value> {
        children
            .into_iter()
            .map(|child| match child {
                Value::String(fragment) => Value::String(self.rewrite(&fragment)),
                other => other,
            })
            .collect()
    }
}

fn is_external(target: &str) -> bool {
    target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with("//")
        || target.starts_with("mailto:")
        || target.starts_with('#')
}

fn strip_root(target: &str) -> &str {
    target.trim_start_matches('/')
}

/// Fetch `SUMMARY.md` and render it into a nav resource.
///
/// `Ok(None)` when no raw root is configured.
pub async fn fetch_nav(
    ctx: &HookContext,
    payload: &Payload,
    renderer: &MarkdownRenderer,
) -> Result<Option<Resource>, HookError> {
    let Some(body) = fetch_summary(ctx.fetcher(), &ctx.secrets, payload).await? else {
        return Ok(None);
    };

    let rendered = renderer.render(&body);
    tracing::debug!("Rendered nav into {} fragments", rendered.children.len());

    Ok(Some(Resource {
        body: Some(body),
        html: Some(rendered.html),
        ..Resource::from_fragments(rendered.children)
    }))
}

/// Strip the nav title and rewrite its links under `context_path`
pub fn collect_nav(children: Option<Vec<Value>>, context_path: &str) -> Vec<Value> {
    let nav = NavRewriter::new(context_path).rewrite_children(strip_first_title(children));
    tracing::debug!("Collected {} nav entries", nav.len());
    nav
}

/// Hook for a resource that is itself the nav: the strain is the context
/// path, the title is dropped and `.md` links point at `.html` pages.
#[derive(Debug, Default)]
pub struct NavPreHook;

impl NavPreHook {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PreHook for NavPreHook {
    fn name(&self) -> &'static str {
        "nav"
    }

    async fn run(&self, mut payload: Payload, _ctx: &HookContext) -> Result<Payload, HookError> {
        if payload.resource.is_none() {
            payload.resource = Some(Resource::default());
        }
        let context_path = set_context_path(&mut payload);

        if let Some(resource) = payload.resource.as_mut() {
            resource.children = Some(collect_nav(resource.children.take(), &context_path));
        }
        Ok(payload)
    }
}
