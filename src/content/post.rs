//! Post model

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::PathBuf;

use super::{FrontMatter, SeriesRef};

/// A blog post loaded from an `.mdx` file
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// File name without the `.mdx` extension
    pub slug: String,

    /// Parsed front-matter
    pub front_matter: FrontMatter,

    /// Raw MDX body (front-matter removed)
    pub content: String,

    /// Rendered HTML body
    pub html: String,

    /// Full source file path
    pub source: PathBuf,
}

impl Post {
    /// Create a post with an empty body
    pub fn new(slug: impl Into<String>, front_matter: FrontMatter) -> Self {
        let slug = slug.into();
        Self {
            source: PathBuf::from(format!("{}.mdx", slug)),
            slug,
            front_matter,
            content: String::new(),
            html: String::new(),
        }
    }

    /// Title from front-matter, falling back to the slug
    pub fn title(&self) -> &str {
        self.front_matter.title.as_deref().unwrap_or(&self.slug)
    }

    /// The date exactly as written in the front-matter
    pub fn date_label(&self) -> &str {
        self.front_matter.date.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.front_matter.description.as_deref().unwrap_or("")
    }

    pub fn tags(&self) -> &[String] {
        &self.front_matter.tags
    }

    pub fn series(&self) -> Option<&SeriesRef> {
        self.front_matter.series.as_ref()
    }

    pub fn sort_key(&self) -> Option<NaiveDateTime> {
        self.front_matter.sort_key()
    }

    /// URL path relative to the site root
    pub fn path(&self) -> String {
        format!("posts/{}/", self.slug)
    }
}
