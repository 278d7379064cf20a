//! Pre-processing hooks and their sequential composition.
//!
//! A hook receives a [`Payload`] plus a [`HookContext`] and returns the
//! annotated payload. [`Pipeline`] chains hooks in order; [`execute`] turns a
//! failure into an `{ "error": ... }` result after logging it.

pub mod committers;
pub mod html;
pub mod json;
pub mod last_modified;
pub mod nav;
pub mod sanitize;
pub mod summary;
pub mod title;

use async_trait::async_trait;
use pagehook_types::Payload;
use serde::Serialize;
use std::sync::Arc;

use crate::config::{normalize_context_path, DateDisplay, HookConfig, Secrets};
use crate::fetch::{Fetch, FetchError, HttpFetcher};

pub use committers::extract_committers;
pub use html::HtmlPreHook;
pub use json::JsonPreHook;
pub use last_modified::{extract_last_modified, format_relative};
pub use nav::{NavPreHook, NavRewriter, RewriteMode};
pub use sanitize::{remove_positions, sanitize_payload};
pub use summary::SummaryPreHook;
pub use title::strip_first_title;

/// Everything a hook may consult besides the payload
pub struct HookContext {
    pub secrets: Secrets,
    pub date_display: DateDisplay,
    fetcher: Arc<dyn Fetch>,
}

impl HookContext {
    pub fn new(secrets: Secrets, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            secrets,
            date_display: DateDisplay::default(),
            fetcher,
        }
    }

    /// Build a context with an HTTP fetcher configured from `config`
    pub fn from_config(config: &HookConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&config.user_agent, config.timeout())?;
        Ok(Self {
            secrets: config.secrets.clone(),
            date_display: config.last_modified,
            fetcher: Arc::new(fetcher),
        })
    }

    pub fn with_date_display(mut self, date_display: DateDisplay) -> Self {
        self.date_display = date_display;
        self
    }

    pub fn fetcher(&self) -> &dyn Fetch {
        self.fetcher.as_ref()
    }
}

/// Errors that abort a hook
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A pipeline stage that observes or mutates the payload
#[async_trait]
pub trait PreHook: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, payload: Payload, ctx: &HookContext) -> Result<Payload, HookError>;
}

/// Result handed to the next stage: the payload, or `{ "error": ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HookOutput {
    Payload(Payload),
    Error { error: String },
}

impl HookOutput {
    pub fn is_error(&self) -> bool {
        matches!(self, HookOutput::Error { .. })
    }

    pub fn into_payload(self) -> Option<Payload> {
        match self {
            HookOutput::Payload(payload) => Some(payload),
            HookOutput::Error { .. } => None,
        }
    }

    fn failed(hook: &str, err: HookError) -> Self {
        tracing::error!(hook, "Error while executing hook: {}", err);
        HookOutput::Error {
            error: err.to_string(),
        }
    }
}

/// Run a single hook, converting failure into an error result
pub async fn execute(hook: &dyn PreHook, payload: Payload, ctx: &HookContext) -> HookOutput {
    match hook.run(payload, ctx).await {
        Ok(payload) => HookOutput::Payload(payload),
        Err(err) => HookOutput::failed(hook.name(), err),
    }
}

/// Hooks run strictly in order; the first failure ends the run
#[derive(Default)]
pub struct Pipeline {
    hooks: Vec<Box<dyn PreHook>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook
    pub fn with<H: PreHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub async fn run(&self, payload: Payload, ctx: &HookContext) -> HookOutput {
        let mut current = payload;
        for hook in &self.hooks {
            tracing::debug!(hook = hook.name(), "Running hook");
            current = match hook.run(current, ctx).await {
                Ok(next) => next,
                Err(err) => return HookOutput::failed(hook.name(), err),
            };
        }
        HookOutput::Payload(current)
    }
}

/// Set the payload's context path: the strain when given, else any existing
/// context path, else "/". Mirrored onto the resource when there is one.
pub fn set_context_path(payload: &mut Payload) -> String {
    let context_path = payload
        .strain
        .as_deref()
        .or(payload.context_path.as_deref())
        .map(normalize_context_path)
        .unwrap_or_else(|| "/".to_string());

    tracing::debug!("Setting context path: {}", context_path);
    payload.context_path = Some(context_path.clone());
    if let Some(resource) = payload.resource.as_mut() {
        resource.context_path = Some(context_path.clone());
    }
    context_path
}
