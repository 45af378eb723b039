//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use super::highlight::{HighlightError, Highlighter, SyntectHighlighter};
use crate::config::HighlightConfig;

/// Markdown renderer with a per-code-block highlighting hook
pub struct MarkdownRenderer<H = SyntectHighlighter> {
    highlighter: H,
    lang_prefix: String,
}

/// A code block collected while walking the event stream
struct CodeBlock {
    lang: Option<String>,
    code: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::from_config(&HighlightConfig::default())
    }

    /// Create from highlight settings
    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::with_highlighter(
            SyntectHighlighter::with_fallback(&config.fallback_language),
            &config.lang_prefix,
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Highlighter> MarkdownRenderer<H> {
    /// Create with a custom highlighting hook
    pub fn with_highlighter(highlighter: H, lang_prefix: &str) -> Self {
        Self {
            highlighter,
            lang_prefix: lang_prefix.to_string(),
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String, HighlightError> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<CodeBlock> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code_block = Some(CodeBlock {
                        lang: code_block_lang(&kind),
                        code: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code_block.take() {
                        let rendered = self.render_code_block(&block)?;
                        events.push(Event::Html(CowStr::from(rendered)));
                    }
                }
                Event::Text(text) => match code_block.as_mut() {
                    Some(block) => block.code.push_str(&text),
                    None => events.push(Event::Text(text)),
                },
                event => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    fn render_code_block(&self, block: &CodeBlock) -> Result<String, HighlightError> {
        let highlighted = self
            .highlighter
            .highlight(&block.code, block.lang.as_deref())?;

        Ok(format!(
            "<pre><code class=\"{}{}\">{}</code></pre>\n",
            html_escape(&self.lang_prefix),
            html_escape(&highlighted.language),
            highlighted.html
        ))
    }
}

/// Language tag of a code block: the first word of a fence's info string
fn code_block_lang(kind: &CodeBlockKind) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
