//! Hook command implementation.

use anyhow::{Context, Result};
use pagehook_core::{
    execute, HookConfig, HookContext, HtmlPreHook, JsonPreHook, NavPreHook, Payload, PreHook,
    Secrets, SummaryPreHook,
};
use std::path::{Path, PathBuf};

use super::{print_json, read_input};

/// Global options shared by every hook command
pub struct Settings {
    pub config: Option<PathBuf>,
    pub api_root: Option<String>,
    pub raw_root: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub enum HookKind {
    Html,
    Json,
    Nav,
    Summary,
}

impl HookKind {
    fn hook(self) -> Box<dyn PreHook> {
        match self {
            HookKind::Html => Box::new(HtmlPreHook::new()),
            HookKind::Json => Box::new(JsonPreHook::new()),
            HookKind::Nav => Box::new(NavPreHook::new()),
            HookKind::Summary => Box::new(SummaryPreHook::new()),
        }
    }
}

impl Settings {
    /// Config file (or defaults) with command-line roots applied on top
    fn load_config(&self) -> Result<HookConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config from {:?}", path);
                HookConfig::from_file(path).context("Failed to load configuration")?
            }
            None => HookConfig::default(),
        };

        config.secrets = config.secrets.merge(Secrets {
            repo_api_root: self.api_root.clone(),
            repo_raw_root: self.raw_root.clone(),
        });
        Ok(config)
    }
}

/// Run one hook over the payload in `input` and print the result.
///
/// Returns `false` when the hook produced an error object.
pub async fn run_hook(
    settings: &Settings,
    kind: HookKind,
    input: Option<&Path>,
    pretty: bool,
) -> Result<bool> {
    let config = settings.load_config()?;
    let ctx = HookContext::from_config(&config).context("Failed to create HTTP client")?;

    let raw = read_input(input)?;
    let payload: Payload = serde_json::from_str(&raw).context("Invalid payload JSON")?;

    let hook = kind.hook();
    tracing::debug!("Running {} hook", hook.name());
    let output = execute(hook.as_ref(), payload, &ctx).await;

    print_json(&serde_json::to_value(&output)?, pretty)?;
    Ok(!output.is_error())
}
