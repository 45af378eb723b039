//! Render a single post to stdout

use anyhow::Result;

use crate::content::RenderedPost;
use crate::Blog;

/// Load and render `slug`, returning `{slug, post}` as JSON
pub async fn render_json(blog: &Blog, slug: &str) -> Result<String> {
    let rendered: RenderedPost = blog.loader().render(slug, &blog.fetcher()).await?;
    Ok(serde_json::to_string_pretty(&rendered)?)
}

/// Render `slug` and print the JSON document
pub async fn run(blog: &Blog, slug: &str) -> Result<()> {
    println!("{}", render_json(blog, slug).await?);
    Ok(())
}
