//! Render command implementation.

use anyhow::Result;
use pagehook_core::{MarkdownRenderer, Resource};
use std::path::Path;

use super::{print_json, read_input};

/// Render markdown into a resource, the same way nav sources are rendered
pub fn render_markdown(input: Option<&Path>, pretty: bool) -> Result<()> {
    let body = read_input(input)?;
    let rendered = MarkdownRenderer::new().render(&body);
    tracing::debug!("Rendered {} fragments", rendered.children.len());

    let resource = Resource {
        body: Some(body),
        html: Some(rendered.html),
        ..Resource::from_fragments(rendered.children)
    };

    print_json(&serde_json::to_value(&resource)?, pretty)
}
