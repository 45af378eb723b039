//! Post directory - the ordered, read-only catalog of post metadata
//!
//! The catalog is built once and never changes afterwards. Readers either
//! take a snapshot or subscribe; a subscription sees the current catalog
//! right away and sees replacements if the directory ever publishes one.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use super::PostMetadata;

/// Catalog compiled into the binary
const BUILTIN_POSTS: &str = include_str!("posts.yml");

/// Shared, immutable view of the catalog
pub type Posts = Arc<[PostMetadata]>;

/// Errors raised while building a directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),

    #[error("slug is not URL-safe: {0:?}")]
    InvalidSlug(String),

    #[error("post #{index} has an empty title")]
    EmptyTitle { index: usize },

    #[error("invalid post catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only, observable sequence of [`PostMetadata`]
pub struct PostDirectory {
    tx: watch::Sender<Posts>,
}

impl PostDirectory {
    /// Build a directory from records in display order
    pub fn new(posts: Vec<PostMetadata>) -> Result<Self, DirectoryError> {
        validate(&posts)?;
        let (tx, _) = watch::channel(Posts::from(posts));
        Ok(Self { tx })
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self, DirectoryError> {
        Self::from_yaml(BUILTIN_POSTS)
    }

    /// Parse a YAML list of records
    pub fn from_yaml(yaml: &str) -> Result<Self, DirectoryError> {
        let posts: Vec<PostMetadata> = serde_yaml::from_str(yaml)?;
        Self::new(posts)
    }

    /// Load a YAML catalog from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let content = fs::read_to_string(path.as_ref())?;
        let directory = Self::from_yaml(&content)?;
        tracing::debug!(
            "Loaded {} posts from {:?}",
            directory.len(),
            path.as_ref()
        );
        Ok(directory)
    }

    /// Current catalog
    pub fn snapshot(&self) -> Posts {
        self.tx.borrow().clone()
    }

    /// Published posts only, in catalog order
    pub fn published(&self) -> Vec<PostMetadata> {
        self.snapshot()
            .iter()
            .filter(|p| p.is_published)
            .cloned()
            .collect()
    }

    /// Look up a post by slug
    pub fn get(&self, slug: &str) -> Option<PostMetadata> {
        self.tx.borrow().iter().find(|p| p.slug == slug).cloned()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to the catalog; dropping the handle unsubscribes
    pub fn subscribe(&self) -> PostsSubscription {
        PostsSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Subscribe with a callback
    ///
    /// `observer` sees the current catalog immediately, then once per
    /// replacement while [`ObservedPosts::next`] is driven.
    pub fn subscribe_with<F>(&self, mut observer: F) -> ObservedPosts<F>
    where
        F: FnMut(&[PostMetadata]),
    {
        let subscription = self.subscribe();
        observer(&subscription.current());
        ObservedPosts {
            subscription,
            observer,
        }
    }

    #[cfg(test)]
    fn replace(&self, posts: Vec<PostMetadata>) -> Result<(), DirectoryError> {
        validate(&posts)?;
        self.tx.send_replace(Posts::from(posts));
        Ok(())
    }
}

/// A subscription that pushes each catalog to a callback
pub struct ObservedPosts<F> {
    subscription: PostsSubscription,
    observer: F,
}

impl<F> ObservedPosts<F>
where
    F: FnMut(&[PostMetadata]),
{
    /// Catalog as last delivered
    pub fn current(&self) -> Posts {
        self.subscription.current()
    }

    /// Wait for the next catalog and deliver it to the observer
    ///
    /// Returns `false` once the directory is dropped.
    pub async fn next(&mut self) -> bool {
        match self.subscription.changed().await {
            Some(posts) => {
                (self.observer)(&posts);
                true
            }
            None => false,
        }
    }

    /// Deliver every catalog until the directory is dropped
    pub async fn run(mut self) {
        while self.next().await {}
    }
}

/// Live handle on a [`PostDirectory`]
pub struct PostsSubscription {
    rx: watch::Receiver<Posts>,
}

impl PostsSubscription {
    /// Catalog as last seen
    pub fn current(&self) -> Posts {
        self.rx.borrow().clone()
    }

    /// Wait for the next catalog
    ///
    /// Returns `None` once the directory is dropped.
    pub async fn changed(&mut self) -> Option<Posts> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

fn validate(posts: &[PostMetadata]) -> Result<(), DirectoryError> {
    let mut seen = HashSet::new();
    for (index, post) in posts.iter().enumerate() {
        if post.title.trim().is_empty() {
            return Err(DirectoryError::EmptyTitle { index });
        }
        if post.slug.is_empty() || slug::slugify(&post.slug) != post.slug {
            return Err(DirectoryError::InvalidSlug(post.slug.clone()));
        }
        if !seen.insert(post.slug.as_str()) {
            return Err(DirectoryError::DuplicateSlug(post.slug.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn post(title: &str, slug: &str, published: bool) -> PostMetadata {
        PostMetadata {
            title: title.to_string(),
            slug: slug.to_string(),
            is_published: published,
            date_published: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let directory = PostDirectory::builtin().unwrap();
        let posts = directory.snapshot();
        assert_eq!(posts.len(), 7);

        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "create-a-game-inside-an-nft",
                "create-a-merkle-tree-using-nodejs",
                "dockerize-a-node-api",
                "build-a-simple-graphql-api-with-go",
                "build-a-cron-job-with-gocron",
                "configuring-a-kubernetes-nginx-load-balancer",
                "configuring-a-kubernetes-cert-manager",
            ]
        );

        let unique: HashSet<&str> = slugs.iter().copied().collect();
        assert_eq!(unique.len(), slugs.len());

        assert_eq!(posts[0].title, "Create a game inside an NFT");
        assert_eq!(
            posts[0].date_published,
            NaiveDate::from_ymd_opt(2023, 10, 13).unwrap()
        );
        assert!(posts.iter().all(|p| p.is_published));
    }

    #[test]
    fn test_order_is_kept_as_authored() {
        let directory = PostDirectory::new(vec![
            post("Zeta", "zeta", true),
            post("Alpha", "alpha", false),
            post("Mid", "mid", true),
        ])
        .unwrap();

        let slugs: Vec<String> = directory.snapshot().iter().map(|p| p.slug.clone()).collect();
        assert_eq!(slugs, vec!["zeta", "alpha", "mid"]);

        let published: Vec<String> = directory.published().into_iter().map(|p| p.slug).collect();
        assert_eq!(published, vec!["zeta", "mid"]);
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let result = PostDirectory::new(vec![post("One", "same", true), post("Two", "same", true)]);
        assert!(matches!(result, Err(DirectoryError::DuplicateSlug(s)) if s == "same"));
    }

    #[test]
    fn test_invalid_records_rejected() {
        let result = PostDirectory::new(vec![post("  ", "ok", true)]);
        assert!(matches!(result, Err(DirectoryError::EmptyTitle { index: 0 })));

        let result = PostDirectory::new(vec![post("Bad", "Not A Slug", true)]);
        assert!(matches!(result, Err(DirectoryError::InvalidSlug(_))));

        let result = PostDirectory::from_yaml("- title: Missing fields\n");
        assert!(matches!(result, Err(DirectoryError::Parse(_))));
    }

    #[test]
    fn test_get() {
        let directory = PostDirectory::builtin().unwrap();
        let found = directory.get("dockerize-a-node-api").unwrap();
        assert_eq!(found.title, "Dockerize a Node API");
        assert!(directory.get("missing").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.yml");
        fs::write(
            &path,
            "- title: Only\n  slug: only\n  isPublished: false\n  datePublished: 2021-05-06\n",
        )
        .unwrap();

        let directory = PostDirectory::load(&path).unwrap();
        assert_eq!(directory.len(), 1);
        assert!(directory.published().is_empty());
    }

    #[test]
    fn test_subscribe_with_delivers_immediately() {
        let directory = PostDirectory::builtin().unwrap();
        let mut delivered = Vec::new();

        let subscription = directory.subscribe_with(|posts| {
            delivered.extend(posts.iter().map(|p| p.slug.clone()));
        });
        assert_eq!(subscription.current().len(), 7);
        drop(subscription);

        assert_eq!(delivered.len(), 7);
        assert_eq!(delivered[0], "create-a-game-inside-an-nft");
    }

    #[tokio::test]
    async fn test_observer_sees_replacements() {
        let directory = PostDirectory::new(vec![post("One", "one", true)]).unwrap();
        let mut deliveries: Vec<Vec<String>> = Vec::new();

        let mut observed = directory.subscribe_with(|posts| {
            deliveries.push(posts.iter().map(|p| p.slug.clone()).collect());
        });

        directory
            .replace(vec![post("One", "one", true), post("Two", "two", true)])
            .unwrap();
        assert!(observed.next().await);
        assert_eq!(observed.current().len(), 2);

        drop(directory);
        assert!(!observed.next().await);
        drop(observed);

        assert_eq!(
            deliveries,
            vec![
                vec!["one".to_string()],
                vec!["one".to_string(), "two".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_subscription_never_sees_a_change() {
        let directory = PostDirectory::builtin().unwrap();
        let mut subscription = directory.subscribe();

        let waited = tokio::time::timeout(Duration::from_millis(20), subscription.changed()).await;
        assert!(waited.is_err(), "catalog must not change");

        drop(directory);
        assert!(subscription.changed().await.is_none());
        assert_eq!(subscription.current().len(), 7);
    }
}
