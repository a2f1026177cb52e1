//! Create a new post

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::content::SeriesRef;
use crate::Blog;

#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    date: String,
    description: &'a str,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<SeriesRef>,
}

/// Write `<posts_dir>/<slug>.mdx` with front-matter for `title`
pub fn create_post(blog: &Blog, title: &str, series: Option<SeriesRef>) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let file_path = blog.posts_dir.join(format!("{}.mdx", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let front_matter = serde_yaml::to_string(&Scaffold {
        title,
        date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        description: "",
        tags: Vec::new(),
        series,
    })?;
    let content = format!("---\n{}---\n\n", front_matter);

    fs::create_dir_all(&blog.posts_dir)
        .with_context(|| format!("Failed to create {:?}", blog.posts_dir))?;
    fs::write(&file_path, content)
        .with_context(|| format!("Failed to write {:?}", file_path))?;

    Ok(file_path)
}

/// Run the new command
pub fn run(blog: &Blog, title: &str, series: Option<SeriesRef>) -> Result<()> {
    let path = create_post(blog, title, series)?;
    println!("Created: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::FrontMatter;

    #[test]
    fn test_create_post() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());

        let path = create_post(&blog, "Hello: World", None).unwrap();
        assert!(path.ends_with("src/content/posts/hello-world.mdx"));

        let content = fs::read_to_string(&path).unwrap();
        let (fm, body) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello: World"));
        assert!(fm.sort_key().is_some());
        assert!(fm.series.is_none());
        assert!(body.is_empty());

        assert!(create_post(&blog, "Hello: World", None).is_err());
    }

    #[test]
    fn test_create_series_post() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        let series = SeriesRef {
            name: "Rust CLI".to_string(),
            order: 3,
        };

        let path = create_post(&blog, "Error handling", Some(series.clone())).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.series, Some(series));
    }

    #[test]
    fn test_title_without_slug_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        assert!(create_post(&blog, "???", None).is_err());
    }
}
