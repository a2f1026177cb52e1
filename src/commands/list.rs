//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::series;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let posts = blog.load_posts()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", posts.len());
            for post in &posts {
                let date = if post.date_label().is_empty() {
                    "----------"
                } else {
                    post.date_label()
                };
                let draft = if post.front_matter.published {
                    ""
                } else {
                    " (draft)"
                };
                println!("  {} - {} [{}.mdx]{}", date, post.title(), post.slug, draft);
            }
        }
        "tag" | "tags" => {
            let mut tags: HashMap<&str, usize> = HashMap::new();
            for post in &posts {
                for tag in post.tags() {
                    *tags.entry(tag.as_str()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "series" => {
            let all = series::collect_all(&posts);
            println!("Series ({}):", all.len());
            for summary in all {
                println!("  {} ({} posts)", summary.name, summary.entries.len());
                for (order, slug, title) in &summary.entries {
                    println!("    {}. {} [{}.mdx]", order, title, slug);
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, series",
                content_type
            );
        }
    }

    Ok(())
}
