//! Hook preparing a page resource for HTML rendering.

use async_trait::async_trait;
use chrono::Utc;
use pagehook_types::{commit_records, Payload};

use super::committers::extract_committers;
use super::last_modified::extract_last_modified;
use super::nav::{collect_nav, fetch_nav};
use super::title::strip_first_title;
use super::{set_context_path, HookContext, HookError, PreHook};
use crate::fetch::fetch_commit_history;
use crate::markdown::MarkdownRenderer;

/// Runs, in order: context path, title removal, commit metadata,
/// committers, last modified, nav.
///
/// Steps touching the resource are skipped when the payload has none;
/// fetches are skipped when their root is not configured.
#[derive(Default)]
pub struct HtmlPreHook {
    renderer: MarkdownRenderer,
}

impl HtmlPreHook {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreHook for HtmlPreHook {
    fn name(&self) -> &'static str {
        "html"
    }

    async fn run(&self, mut payload: Payload, ctx: &HookContext) -> Result<Payload, HookError> {
        let context_path = set_context_path(&mut payload);

        if payload.resource.is_none() {
            tracing::debug!("Payload has no resource, nothing to collect");
            return Ok(payload);
        }

        tracing::debug!("Removing first title");
        if let Some(resource) = payload.resource.as_mut() {
            resource.children = Some(strip_first_title(resource.children.take()));
        }

        tracing::debug!("Collecting metadata");
        let metadata = fetch_commit_history(ctx.fetcher(), &ctx.secrets, &payload).await?;

        tracing::debug!("Collecting the nav");
        let nav = fetch_nav(ctx, &payload, &self.renderer).await?;

        if let Some(resource) = payload.resource.as_mut() {
            if metadata.is_some() {
                resource.metadata = metadata;
            }

            let records = commit_records(resource.metadata.as_ref());
            resource.committers = Some(extract_committers(&records));
            resource.last_modified =
                Some(extract_last_modified(&records, ctx.date_display, Utc::now()));

            if let Some(nav) = nav {
                resource.nav = Some(collect_nav(nav.children, &context_path));
            }
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Secrets;
    use crate::fetch::stub::StubFetcher;
    use crate::fetch::FetchError;
    use pagehook_types::{Committer, LastModified, Resource};
    use serde_json::json;
    use std::sync::Arc;

    const COMMITS_URL: &str = "http://localhost/repos/owner/repo/commits?path=resourcePath.md&sha=ref";
    const SUMMARY_URL: &str = "http://localhost/owner/repo/ref/SUMMARY.md";

    fn payload() -> Payload {
        Payload {
            owner: Some("owner".into()),
            repo: Some("repo".into()),
            git_ref: Some("ref".into()),
            path: Some("resourcePath.md".into()),
            resource: Some(Resource::from_fragments(["<h1>Title</h1>", "<p>a</p>", "<p>b</p>"])),
            ..Payload::default()
        }
    }

    fn secrets() -> Secrets {
        Secrets {
            repo_api_root: Some("http://localhost/".into()),
            repo_raw_root: Some("http://localhost/".into()),
        }
    }

    #[tokio::test]
    async fn test_empty_payload() {
        let ctx = HookContext::new(Secrets::default(), Arc::new(StubFetcher::new()));
        let output = HtmlPreHook::new().run(Payload::default(), &ctx).await.unwrap();
        assert_eq!(output.context_path.as_deref(), Some("/"));
        assert!(output.resource.is_none());
    }

    #[tokio::test]
    async fn test_unconfigured() {
        let fetcher = Arc::new(StubFetcher::new());
        let ctx = HookContext::new(Secrets::default(), fetcher.clone());

        let output = HtmlPreHook::new().run(payload(), &ctx).await.unwrap();
        let resource = output.resource.unwrap();

        assert_eq!(resource.children, Some(vec![json!("<p>a</p>"), json!("<p>b</p>")]));
        assert_eq!(resource.metadata, None);
        assert_eq!(resource.committers, Some(vec![]));
        assert_eq!(resource.last_modified, Some(LastModified::unknown()));
        assert_eq!(resource.nav, None);
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_full_run() {
        let commits = json!([
            { "author": { "avatar_url": "a1" },
              "commit": { "author": { "name": "a1", "email": "e1", "date": "2018-01-01T00:01:00Z" } } },
            { "author": { "avatar_url": "a1" },
              "commit": { "author": { "name": "a1b", "email": "e1b", "date": "2017-12-31T00:00:00Z" } } }
        ]);
        let fetcher = Arc::new(
            StubFetcher::new()
                .respond(COMMITS_URL, commits.to_string())
                .respond(SUMMARY_URL, "# Table of contents\n\n* [link](link.md)"),
        );
        let ctx = HookContext::new(secrets(), fetcher.clone());

        let output = HtmlPreHook::new().run(payload(), &ctx).await.unwrap();
        let resource = output.resource.unwrap();

        assert_eq!(fetcher.requests(), vec![COMMITS_URL, SUMMARY_URL]);
        assert_eq!(resource.metadata, Some(commits));
        assert_eq!(
            resource.committers,
            Some(vec![Committer {
                avatar_url: "a1".into(),
                display: "a1 | e1".into(),
            }])
        );
        assert_eq!(
            resource.last_modified,
            Some(LastModified {
                raw: Some("2018-01-01T00:01:00Z".into()),
                display: "Mon, 01 Jan 2018 00:01:00 +0000".into(),
            })
        );
        assert_eq!(
            resource.nav,
            Some(vec![
                json!("\n"),
                json!("<ul>\n<li><a href=\"/link.html\">link</a></li>\n</ul>")
            ])
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts() {
        let fetcher = Arc::new(StubFetcher::new().fail(COMMITS_URL, 500));
        let ctx = HookContext::new(secrets(), fetcher.clone());

        let err = HtmlPreHook::new().run(payload(), &ctx).await.unwrap_err();
        assert!(matches!(
            err,
            HookError::Fetch(FetchError::Status { status: 500, .. })
        ));
        assert_eq!(fetcher.requests(), vec![COMMITS_URL]);
    }

    #[tokio::test]
    async fn test_nav_fetch_failure_aborts() {
        let fetcher = Arc::new(
            StubFetcher::new()
                .respond(COMMITS_URL, "[]")
                .fail(SUMMARY_URL, 503),
        );
        let ctx = HookContext::new(secrets(), fetcher.clone());

        let err = HtmlPreHook::new().run(payload(), &ctx).await.unwrap_err();
        assert!(matches!(
            err,
            HookError::Fetch(FetchError::Status { status: 503, .. })
        ));
        assert_eq!(fetcher.requests(), vec![COMMITS_URL, SUMMARY_URL]);
    }
}
