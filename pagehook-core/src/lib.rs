//! # pagehook-core
//!
//! Pre-processing hooks for a markdown content pipeline.
//!
//! Each hook takes a [`Payload`] and a [`HookContext`], annotates the
//! resource (title stripping, commit metadata, committers, last-modified
//! stamp, navigation) and hands the payload to the next stage.

pub mod config;
pub mod fetch;
pub mod hooks;
pub mod markdown;

pub use config::{normalize_context_path, DateDisplay, HookConfig, Secrets};
pub use fetch::{Fetch, FetchError, HttpFetcher};
pub use hooks::{
    execute, HookContext, HookError, HookOutput, HtmlPreHook, JsonPreHook, NavPreHook, Pipeline,
    PreHook, SummaryPreHook,
};
pub use markdown::{MarkdownRenderer, RenderedMarkdown};
pub use pagehook_types::{Committer, LastModified, Payload, Resource};
