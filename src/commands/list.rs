//! List the post catalog

use anyhow::Result;

use crate::content::PostMetadata;
use crate::Blog;

/// Print the catalog in authored order; drafts only with `all`
pub fn run(blog: &Blog, all: bool) -> Result<()> {
    let lines = format_listing(&blog.posts.snapshot(), all);
    println!("Posts ({}):", lines.len());
    for line in lines {
        println!("  {}", line);
    }
    Ok(())
}

fn format_listing(posts: &[PostMetadata], all: bool) -> Vec<String> {
    posts
        .iter()
        .filter(|p| all || p.is_published)
        .map(|p| {
            let draft = if p.is_published { "" } else { " (draft)" };
            format!(
                "{} - {} [{}]{}",
                p.date_published.format("%Y-%m-%d"),
                p.title,
                p.slug,
                draft
            )
        })
        .collect()
}
