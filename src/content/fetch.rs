//! Text fetch capability used by the content loader

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Status reported for a successful fetch
pub const STATUS_OK: u16 = 200;

/// Status reported when a resource does not exist
pub const STATUS_NOT_FOUND: u16 = 404;

/// Errors raised when a fetch could not complete at all
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("resource is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// A completed fetch: a status code and a text body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: STATUS_NOT_FOUND,
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Retrieves a text resource by site-relative path (e.g. `/hello.md`)
///
/// Timeouts and retries, if any, are the implementation's business.
pub trait FetchText {
    fn fetch_text(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

/// Fetches resources from a directory on disk
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a site path onto the root, refusing anything that could escape it
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return None;
        }
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl FetchText for DirFetcher {
    async fn fetch_text(&self, path: &str) -> Result<FetchResponse, FetchError> {
        let Some(file) = self.resolve(path) else {
            tracing::debug!("Rejected fetch path: {}", path);
            return Ok(FetchResponse::not_found());
        };

        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(FetchResponse::ok(String::from_utf8(bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FetchResponse::not_found()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_dir_fetcher_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.md"), "# Hello\n").unwrap();

        let fetcher = DirFetcher::new(dir.path());
        let response = fetcher.fetch_text("/hello.md").await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.body, "# Hello\n");
    }

    #[tokio::test]
    async fn test_dir_fetcher_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = DirFetcher::new(dir.path());

        let response = fetcher.fetch_text("/nope.md").await.unwrap();
        assert_eq!(response.status, STATUS_NOT_FOUND);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_dir_fetcher_refuses_traversal() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("content");
        fs::create_dir_all(&root).unwrap();
        fs::write(parent.path().join("secret.md"), "secret").unwrap();

        let fetcher = DirFetcher::new(&root);
        let response = fetcher.fetch_text("/../secret.md").await.unwrap();
        assert_eq!(response.status, STATUS_NOT_FOUND);

        let response = fetcher.fetch_text("/").await.unwrap();
        assert_eq!(response.status, STATUS_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dir_fetcher_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bin.md"), [0xff, 0xfe, 0x00]).unwrap();

        let fetcher = DirFetcher::new(dir.path());
        let result = fetcher.fetch_text("/bin.md").await;
        assert!(matches!(result, Err(FetchError::InvalidUtf8(_))));
    }
}
