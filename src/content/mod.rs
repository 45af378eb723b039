//! Content module - post catalog, markdown loading and rendering

pub mod directory;
pub mod fetch;
pub mod highlight;
pub mod loader;
mod markdown;
mod post;

pub use directory::{DirectoryError, ObservedPosts, PostDirectory, Posts, PostsSubscription};
pub use fetch::{DirFetcher, FetchError, FetchResponse, FetchText};
pub use highlight::{Highlighted, HighlightError, Highlighter, SyntectHighlighter};
pub use loader::{ContentLoader, LoadError};
pub use markdown::MarkdownRenderer;
pub use post::{PostMetadata, RenderedPost};
