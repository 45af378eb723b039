//! Built-in page templates using the Tera template engine
//!
//! The theme is embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{PostMetadata, RenderedPost};

/// Template renderer with the embedded theme loaded
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping would also escape the '/' in URLs; text fields
        // use the `escape` filter in the templates instead
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("error.html", include_str!("theme/error.html")),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the post listing
    pub fn render_index(&self, site: &SiteData, posts: &[PostMetadata]) -> Result<String> {
        let posts: Vec<PostData> = posts.iter().map(PostData::from).collect();

        let mut context = Context::new();
        context.insert("site", site);
        context.insert("posts", &posts);
        self.render("index.html", &context)
    }

    /// Render a post page; `meta` is absent for posts missing from the catalog
    pub fn render_post(
        &self,
        site: &SiteData,
        meta: Option<&PostMetadata>,
        rendered: &RenderedPost,
    ) -> Result<String> {
        let title = meta.map_or_else(|| rendered.slug.clone(), |m| m.title.clone());
        let date = meta.map(|m| m.date_published.format("%Y-%m-%d").to_string());

        let mut context = Context::new();
        context.insert("site", site);
        context.insert("slug", &rendered.slug);
        context.insert("title", &title);
        context.insert("date", &date);
        context.insert("post", &rendered.html);
        self.render("post.html", &context)
    }

    /// Render an error page
    pub fn render_error(&self, site: &SiteData, status: u16, message: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("status", &status);
        context.insert("message", message);
        self.render("error.html", &context)
    }
}

/// Tera filter: format a `YYYY-MM-DD` date with a strftime pattern
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%B %d, %Y".to_string(),
    };

    let date = match chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        Ok(date) => date,
        // Not a date we understand: leave it as written
        Err(_) => return Ok(tera::Value::String(s)),
    };

    let mut out = String::new();
    write!(out, "{}", date.format(&format))
        .map_err(|_| tera::Error::msg(format!("invalid date format: {}", format)))?;
    Ok(tera::Value::String(out))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub root: String,
    pub date_format: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        let root = if config.root.ends_with('/') {
            config.root.clone()
        } else {
            format!("{}/", config.root)
        };

        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            root,
            date_format: config.date_format.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub slug: String,
    pub date: String,
    pub path: String,
}

impl From<&PostMetadata> for PostData {
    fn from(post: &PostMetadata) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            date: post.date_published.format("%Y-%m-%d").to_string(),
            path: post.path(),
        }
    }
}
