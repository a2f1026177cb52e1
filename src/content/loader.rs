//! Post loader - reads `.mdx` posts from the posts directory

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{mdx, FrontMatter, MarkdownRenderer, Post};
use crate::i18n::I18n;
use crate::Blog;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("post `{slug}` not found at {path:?}")]
    NotFound { slug: String, path: PathBuf },
}

/// Loads posts from the configured posts directory
pub struct PostLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
    i18n: I18n,
}

impl<'a> PostLoader<'a> {
    pub fn new(blog: &'a Blog, i18n: &I18n) -> Self {
        Self {
            blog,
            renderer: MarkdownRenderer::with_options(&blog.config.highlight),
            i18n: i18n.clone(),
        }
    }

    /// Load one post by slug; a trailing `.mdx` on the slug is ignored
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Post> {
        let slug = slug.strip_suffix(".mdx").unwrap_or(slug);
        let path = self.blog.posts_dir.join(format!("{}.mdx", slug));
        if !path.is_file() {
            return Err(PostError::NotFound {
                slug: slug.to_string(),
                path,
            }
            .into());
        }
        self.load_post(&path, slug)
    }

    /// Load every post, newest first
    ///
    /// Unpublished posts are skipped unless `render_drafts` is set. A missing
    /// posts directory is not an error.
    pub fn get_all_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = &self.blog.posts_dir;
        if !posts_dir.exists() {
            tracing::debug!("Posts directory {:?} does not exist", posts_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(posts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_mdx_file(path) {
                continue;
            }

            let slug = match path.file_stem().and_then(|s| s.to_str()) {
                Some(slug) => slug.to_string(),
                None => {
                    tracing::warn!("Skipping post with non UTF-8 name: {:?}", path);
                    continue;
                }
            };

            let post = self.load_post(path, &slug)?;
            if post.front_matter.published || self.blog.config.render_drafts {
                posts.push(post);
            } else {
                tracing::debug!("Skipping unpublished post: {}", slug);
            }
        }

        sort_posts(&mut posts);
        Ok(posts)
    }

    fn load_post(&self, path: &Path, slug: &str) -> Result<Post> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read post {:?}", path))?;
        let (front_matter, body) = FrontMatter::parse(&content)?;

        let expanded = mdx::expand(body, &self.i18n)
            .with_context(|| format!("Failed to expand widgets in {:?}", path))?;
        let html = self
            .renderer
            .render(&expanded)
            .with_context(|| format!("Failed to render {:?}", path))?;

        let mut post = Post::new(slug, front_matter);
        post.content = body.to_string();
        post.html = html;
        post.source = path.to_path_buf();
        Ok(post)
    }
}

/// Sort newest first; undated posts go last and ties fall back to the slug
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| match (a.sort_key(), b.sort_key()) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.slug.cmp(&b.slug)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.slug.cmp(&b.slug),
    });
}

fn is_mdx_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "mdx")
        .unwrap_or(false)
}
