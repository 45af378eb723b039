//! Content loader - fetches a post's markdown by slug and renders it

use thiserror::Error;

use super::fetch::{FetchError, FetchText};
use super::highlight::{HighlightError, Highlighter, SyntectHighlighter};
use super::{MarkdownRenderer, RenderedPost};
use crate::config::HighlightConfig;

/// Errors raised while loading a post
#[derive(Error, Debug)]
pub enum LoadError {
    /// The fetch completed with any status other than success
    #[error("post not found: {slug} (status {status})")]
    NotFound { slug: String, status: u16 },

    #[error("failed to fetch {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to render {slug}: {source}")]
    Render {
        slug: String,
        #[source]
        source: HighlightError,
    },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

/// Site path of the markdown source for `slug`
pub fn source_path(slug: &str) -> String {
    format!("/{}.md", slug)
}

/// Loads and renders posts on demand
///
/// Holds no per-post state: every call fetches and renders from scratch.
pub struct ContentLoader<H = SyntectHighlighter> {
    renderer: MarkdownRenderer<H>,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(config: &HighlightConfig) -> Self {
        Self {
            renderer: MarkdownRenderer::from_config(config),
        }
    }
}

impl<H: Highlighter> ContentLoader<H> {
    /// Create a loader around an existing renderer
    pub fn with_renderer(renderer: MarkdownRenderer<H>) -> Self {
        Self { renderer }
    }

    /// Fetch `/{slug}.md` through `fetcher` and render it to HTML
    pub async fn render<F: FetchText>(
        &self,
        slug: &str,
        fetcher: &F,
    ) -> Result<RenderedPost, LoadError> {
        let path = source_path(slug);
        tracing::debug!("Fetching {}", path);

        let response = fetcher
            .fetch_text(&path)
            .await
            .map_err(|source| LoadError::Fetch {
                path: path.clone(),
                source,
            })?;

        if !response.is_success() {
            return Err(LoadError::NotFound {
                slug: slug.to_string(),
                status: response.status,
            });
        }

        let html = self
            .renderer
            .render(&response.body)
            .map_err(|source| LoadError::Render {
                slug: slug.to_string(),
                source,
            })?;

        Ok(RenderedPost {
            slug: slug.to_string(),
            html,
        })
    }
}
