//! Post models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Listing information for one blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    /// Post title
    pub title: String,

    /// URL-safe identifier, also the name of the markdown source
    pub slug: String,

    /// Whether listing views should show the post
    pub is_published: bool,

    /// Publication date
    pub date_published: NaiveDate,
}

impl PostMetadata {
    /// Path of the rendered post page, relative to the site root
    pub fn path(&self) -> String {
        format!("blog/{}/", self.slug)
    }
}

/// A post rendered from its markdown source
///
/// Built per request and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPost {
    pub slug: String,
    #[serde(rename = "post")]
    pub html: String,
}
