//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Hook configuration matching the hooks.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(default)]
    pub secrets: Secrets,

    /// How `lastModified.display` is rendered
    #[serde(default)]
    pub last_modified: DateDisplay,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout for repository API calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_user_agent() -> String {
    format!("pagehook/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

/// Repository endpoints; each one gates the step that uses it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secrets {
    /// Commit-history API root, e.g. "https://api.github.com/"
    #[serde(rename = "REPO_API_ROOT", default, skip_serializing_if = "Option::is_none")]
    pub repo_api_root: Option<String>,

    /// Raw content root, e.g. "https://raw.githubusercontent.com/"
    #[serde(rename = "REPO_RAW_ROOT", default, skip_serializing_if = "Option::is_none")]
    pub repo_raw_root: Option<String>,
}

/// Rendering of the last-modified display string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateDisplay {
    /// RFC 2822 date in UTC
    #[default]
    Absolute,
    /// "3 days ago"
    Relative,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            secrets: Secrets::default(),
            last_modified: DateDisplay::default(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HookConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: HookConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Secrets {
    /// Commit-history API root, if configured (blank counts as unset)
    pub fn api_root(&self) -> Option<&str> {
        non_blank(self.repo_api_root.as_deref())
    }

    /// Raw content root, if configured (blank counts as unset)
    pub fn raw_root(&self) -> Option<&str> {
        non_blank(self.repo_raw_root.as_deref())
    }

    /// Values set in `other` take precedence
    pub fn merge(self, other: Secrets) -> Secrets {
        Secrets {
            repo_api_root: other.repo_api_root.or(self.repo_api_root),
            repo_raw_root: other.repo_raw_root.or(self.repo_raw_root),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Ensure context paths have a leading and trailing slash ("/foo/" or "/")
pub fn normalize_context_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "/".to_string();
    }

    let mut s = trimmed.to_string();
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    if !s.ends_with('/') {
        s.push('/');
    }

    // Collapse duplicate slashes
    while s.contains("//") {
        s = s.replace("//", "/");
    }

    s
}

/// Context path of the folder holding `path` ("/docs/api/SUMMARY.md" -> "/docs/api/")
pub fn folder_context_path(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => normalize_context_path(&path[..idx]),
        None => "/".to_string(),
    }
}
