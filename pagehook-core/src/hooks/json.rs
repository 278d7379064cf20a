//! Hook producing the JSON rendition of a resource.

use async_trait::async_trait;
use pagehook_types::Payload;

use super::sanitize::sanitize_payload;
use super::{HookContext, HookError, PreHook};

/// Drops `body`/`html`, strips AST positions and stores the serialized
/// payload in `payload.json`.
#[derive(Debug, Default)]
pub struct JsonPreHook;

impl JsonPreHook {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PreHook for JsonPreHook {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn run(&self, mut payload: Payload, _ctx: &HookContext) -> Result<Payload, HookError> {
        let json = sanitize_payload(&mut payload)?;
        tracing::debug!("Serialized payload: {} bytes", json.len());
        Ok(payload)
    }
}
