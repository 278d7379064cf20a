//! Markdown rendering into top-level HTML fragments.

use pulldown_cmark::{html, Event, Options, Parser};

/// Output of [`MarkdownRenderer::render`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMarkdown {
    /// Concatenation of `children`
    pub html: String,

    /// One fragment per top-level block, separated by "\n" fragments
    pub children: Vec<String>,
}

/// Markdown renderer producing one HTML fragment per top-level block
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self { options }
    }

    /// Render markdown, splitting the output at top-level block boundaries
    pub fn render(&self, markdown: &str) -> RenderedMarkdown {
        let parser = Parser::new_ext(markdown, self.options);

        let mut children: Vec<String> = Vec::new();
        let mut block: Vec<Event> = Vec::new();
        let mut depth = 0usize;

        for event in parser {
            match &event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                _ => {}
            }
            block.push(event);

            if depth == 0 {
                let mut fragment = String::new();
                html::push_html(&mut fragment, block.drain(..));
                let fragment = fragment.trim_end_matches('\n');
                if fragment.is_empty() {
                    continue;
                }
                if !children.is_empty() {
                    children.push("\n".to_string());
                }
                children.push(fragment.to_string());
            }
        }

        RenderedMarkdown {
            html: children.concat(),
            children,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
