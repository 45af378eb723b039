//! slugpress: a small markdown blog front-end
//!
//! Posts are markdown files addressed by slug. A request for a slug fetches
//! `/{slug}.md`, renders it to HTML with highlighted code blocks, and embeds
//! the result in a page. The post index comes from a fixed catalog of post
//! metadata that is built once at startup.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ContentLoader, DirFetcher, PostDirectory};

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the `{slug}.md` sources
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Post catalog, shared read-only by every view
    pub posts: Arc<PostDirectory>,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Create a Blog instance from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        let posts = match &config.posts_file {
            Some(file) => PostDirectory::load(base_dir.join(file))?,
            None => PostDirectory::builtin()?,
        };
        tracing::debug!("Post catalog has {} entries", posts.len());

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            posts: Arc::new(posts),
        })
    }

    /// Fetcher reading markdown sources from the content directory
    pub fn fetcher(&self) -> DirFetcher {
        DirFetcher::new(&self.content_dir)
    }

    /// Content loader configured from the site's highlight settings
    pub fn loader(&self) -> ContentLoader {
        ContentLoader::new(&self.config.highlight)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
