//! Hook for a rendered `SUMMARY.md` page served from a sub-folder.

use async_trait::async_trait;
use pagehook_types::Payload;

use super::nav::NavRewriter;
use super::title::strip_first_title;
use super::{HookContext, HookError, PreHook};
use crate::config::folder_context_path;

/// Strips the summary title and resolves every relative link against the
/// folder of the requested path.
#[derive(Debug, Default)]
pub struct SummaryPreHook;

impl SummaryPreHook {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PreHook for SummaryPreHook {
    fn name(&self) -> &'static str {
        "summary"
    }

    async fn run(&self, mut payload: Payload, _ctx: &HookContext) -> Result<Payload, HookError> {
        let request_path = payload.path.clone().unwrap_or_default();
        tracing::debug!("Requested path: {}", request_path);

        if payload.resource.is_none() {
            tracing::debug!("Payload has no resource, nothing to do");
            return Ok(payload);
        }

        let rewriter = NavRewriter::all_relative(&folder_context_path(&request_path));
        if let Some(resource) = payload.resource.as_mut() {
            let nav = rewriter.rewrite_children(strip_first_title(resource.children.take()));
            if nav.is_empty() {
                tracing::debug!("Navigation payload has no children");
            } else {
                tracing::debug!("Collected {} nav entries", nav.len());
            }
            resource.children = Some(nav);
        }

        Ok(payload)
    }
}
