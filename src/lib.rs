//! mdx-blog: a static blog generator for MDX posts
//!
//! Posts are MDX files with YAML front-matter. The generator sorts them by
//! date, links posts that belong to the same series, expands the widget
//! tags embedded in post bodies, and renders everything through Tera
//! templates into a static output directory.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod server;
pub mod templates;
pub mod widgets;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{Post, PostLoader, SeriesRef};
use i18n::I18n;

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the `*.mdx` posts
    pub posts_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static assets copied verbatim into the output
    pub static_dir: PathBuf,
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

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.posts_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            posts_dir,
            public_dir,
            static_dir,
        }
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post, optionally as part of a series
    pub fn new_post(&self, title: &str, series: Option<SeriesRef>) -> Result<()> {
        commands::new::run(self, title, series)
    }

    /// Labels for the configured language, with site overrides applied
    pub fn i18n(&self) -> Result<I18n> {
        let mut i18n = I18n::new(&self.config.language);
        i18n.load_languages(self.base_dir.join(&self.config.i18n_dir))?;
        Ok(i18n)
    }

    /// Load every post, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let i18n = self.i18n()?;
        PostLoader::new(self, &i18n).get_all_posts()
    }

    /// Existing paths whose changes require a rebuild
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        [
            self.posts_dir.clone(),
            self.static_dir.clone(),
            self.base_dir.join(&self.config.i18n_dir),
            self.base_dir.join("_config.yml"),
        ]
        .into_iter()
        .filter(|p| p.exists())
        .collect()
    }
}
