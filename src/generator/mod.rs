//! Generator module - exports the site as static HTML files

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::highlight::theme_css;
use crate::content::{ContentLoader, DirFetcher, PostMetadata};
use crate::templates::{SiteData, TemplateRenderer};
use crate::Blog;

/// Outcome of a generation run
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    /// Slugs of the post pages written
    pub written: Vec<String>,
    /// Slugs whose post failed to load or render
    pub skipped: Vec<String>,
    /// Number of content assets copied
    pub assets: usize,
}

/// Static site generator using the built-in templates
pub struct Generator {
    blog: Blog,
    site: SiteData,
    loader: ContentLoader,
    fetcher: DirFetcher,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            site: SiteData::from_config(&blog.config),
            loader: blog.loader(),
            fetcher: blog.fetcher(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<GenerateReport> {
        let public_dir = &self.blog.public_dir;
        fs::create_dir_all(public_dir)?;

        let mut report = GenerateReport {
            assets: self.copy_content_assets()?,
            ..Default::default()
        };

        let css = theme_css(&self.blog.config.highlight.theme)?;
        fs::write(public_dir.join("highlight.css"), css)?;

        let posts = self.blog.posts.published();

        let index = self.renderer.render_index(&self.site, &posts)?;
        write_page(&public_dir.join("index.html"), &index)?;

        for post in &posts {
            match self.generate_post(post).await {
                Ok(()) => report.written.push(post.slug.clone()),
                Err(e) => {
                    tracing::warn!("Skipping post {}: {}", post.slug, e);
                    report.skipped.push(post.slug.clone());
                }
            }
        }

        Ok(report)
    }

    /// Render one post and write `blog/{slug}/index.html`
    async fn generate_post(&self, post: &PostMetadata) -> Result<()> {
        let rendered = self.loader.render(&post.slug, &self.fetcher).await?;
        let html = self
            .renderer
            .render_post(&self.site, Some(post), &rendered)?;

        let output = self.blog.public_dir.join(post.path()).join("index.html");
        write_page(&output, &html)?;
        tracing::debug!("Generated: {:?}", output);
        Ok(())
    }

    /// Copy everything under the content directory, markdown sources included
    fn copy_content_assets(&self) -> Result<usize> {
        let content_dir = &self.blog.content_dir;
        if !content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", content_dir);
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(content_dir)?;
            let dest = self.blog.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            copied += 1;
        }

        Ok(copied)
    }
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    Ok(())
}
