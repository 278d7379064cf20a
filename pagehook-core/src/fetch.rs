//! Repository API access: commit history and raw file content.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::Secrets;
use pagehook_types::Payload;

/// Path of the navigation source within a repository
pub const SUMMARY_PATH: &str = "SUMMARY.md";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Minimal HTTP capability the hooks need
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `url` and return the body
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;

    /// GET `url` and parse the body as JSON
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// `Fetch` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Commit-history query for one file.
///
/// Plain concatenation: `api_root` is expected to end with a slash.
pub fn commit_history_url(
    api_root: &str,
    owner: &str,
    repo: &str,
    git_ref: &str,
    path: &str,
) -> String {
    format!("{api_root}repos/{owner}/{repo}/commits?path={path}&sha={git_ref}")
}

/// Raw URL of a file at a given ref
pub fn raw_file_url(raw_root: &str, owner: &str, repo: &str, git_ref: &str, path: &str) -> String {
    format!("{raw_root}{owner}/{repo}/{git_ref}/{path}")
}

/// Fetch the commit history of the payload's file.
///
/// Returns `Ok(None)` when no API root is configured.
pub async fn fetch_commit_history(
    fetcher: &dyn Fetch,
    secrets: &Secrets,
    payload: &Payload,
) -> Result<Option<Value>, FetchError> {
    let Some(api_root) = secrets.api_root() else {
        tracing::debug!("No REPO_API_ROOT configured; skipping commit history");
        return Ok(None);
    };

    let url = commit_history_url(
        api_root,
        payload.owner.as_deref().unwrap_or_default(),
        payload.repo.as_deref().unwrap_or_default(),
        payload.git_ref.as_deref().unwrap_or_default(),
        payload.path.as_deref().unwrap_or_default(),
    );

    tracing::debug!("Fetching commit history: {}", url);
    fetcher.get_json(&url).await.map(Some)
}

/// Fetch the raw `SUMMARY.md` of the payload's repository.
///
/// Returns `Ok(None)` when no raw root is configured.
pub async fn fetch_summary(
    fetcher: &dyn Fetch,
    secrets: &Secrets,
    payload: &Payload,
) -> Result<Option<String>, FetchError> {
    let Some(raw_root) = secrets.raw_root() else {
        tracing::debug!("No REPO_RAW_ROOT configured; skipping nav");
        return Ok(None);
    };

    let url = raw_file_url(
        raw_root,
        payload.owner.as_deref().unwrap_or_default(),
        payload.repo.as_deref().unwrap_or_default(),
        payload.git_ref.as_deref().unwrap_or_default(),
        SUMMARY_PATH,
    );

    tracing::debug!("Fetching nav source: {}", url);
    fetcher.get_text(&url).await.map(Some)
}


#[cfg(test)]
mod tests {
    use super::stub::StubFetcher;
    use super::*;
    use serde_json::json;

    fn payload() -> Payload {
        Payload {
            owner: Some("owner".into()),
            repo: Some("repo".into()),
            git_ref: Some("ref".into()),
            path: Some("resourcePath.md".into()),
            ..Payload::default()
        }
    }

    fn api_secrets() -> Secrets {
        Secrets {
            repo_api_root: Some("http://localhost/".into()),
            repo_raw_root: Some("http://localhost/".into()),
        }
    }

    #[test]
    fn test_commit_history_url() {
        assert_eq!(
            commit_history_url("http://localhost/", "owner", "repo", "ref", "resourcePath.md"),
            "http://localhost/repos/owner/repo/commits?path=resourcePath.md&sha=ref"
        );
    }

    #[test]
    fn test_raw_file_url() {
        assert_eq!(
            raw_file_url("http://localhost/", "owner", "repo", "ref", SUMMARY_PATH),
            "http://localhost/owner/repo/ref/SUMMARY.md"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_skips_fetch() {
        let fetcher = StubFetcher::new();
        let metadata = fetch_commit_history(&fetcher, &Secrets::default(), &payload())
            .await
            .unwrap();
        assert!(metadata.is_none());

        let summary = fetch_summary(&fetcher, &Secrets::default(), &payload())
            .await
            .unwrap();
        assert!(summary.is_none());
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_collect_metadata() {
        let fetcher = StubFetcher::new().respond(
            "http://localhost/repos/owner/repo/commits?path=resourcePath.md&sha=ref",
            r#"{"p1": 1, "p2": 2}"#,
        );

        let metadata = fetch_commit_history(&fetcher, &api_secrets(), &payload())
            .await
            .unwrap();
        assert_eq!(metadata, Some(json!({ "p1": 1, "p2": 2 })));
    }

    #[tokio::test]
    async fn test_http_status_propagates() {
        let fetcher = StubFetcher::new().fail(
            "http://localhost/repos/owner/repo/commits?path=resourcePath.md&sha=ref",
            500,
        );

        let err = fetch_commit_history(&fetcher, &api_secrets(), &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let fetcher = StubFetcher::new().respond(
            "http://localhost/repos/owner/repo/commits?path=resourcePath.md&sha=ref",
            "<html>rate limited</html>",
        );

        let err = fetch_commit_history(&fetcher, &api_secrets(), &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_fetch_summary() {
        let fetcher = StubFetcher::new().respond(
            "http://localhost/owner/repo/ref/SUMMARY.md",
            "# Table of contents",
        );

        let summary = fetch_summary(&fetcher, &api_secrets(), &payload())
            .await
            .unwrap();
        assert_eq!(summary.as_deref(), Some("# Table of contents"));
    }
}
