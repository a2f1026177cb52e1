//! Generator module - writes the static site using built-in Tera templates

use anyhow::{Context as _, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{series, Post};
use crate::helpers::{
    absolutize_urls, css, escape_xml, feed_tag, full_url_for, meta_generator,
    strip_html, strip_invalid_xml_chars, url_for,
};
use crate::i18n::I18n;
use crate::templates::{
    HeadData, PostData, TagLink, TemplateRenderer, WidgetData, STYLESHEET,
};
use crate::widgets::{series_nav, terminal, theme_toggle};
use crate::Blog;

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    i18n: I18n,
}

impl Generator {
    pub fn new(blog: &Blog, i18n: I18n) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new()?,
            i18n,
        })
    }

    /// Generate the entire site from posts sorted newest first
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        let public_dir = &self.blog.public_dir;
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        self.copy_static_assets()?;
        self.write_file("css/style.css", STYLESHEET)?;

        self.generate_index_page(posts)?;
        self.generate_post_pages(posts)?;
        self.generate_tag_pages(posts)?;
        self.generate_atom_feed(posts)?;
        self.generate_search_index(posts)?;

        Ok(())
    }

    fn post_data(&self, post: &Post) -> PostData {
        PostData {
            slug: post.slug.clone(),
            title: post.title().to_string(),
            date: post.date_label().to_string(),
            description: post.description().to_string(),
            url: url_for(&self.blog.config, &post.path()),
            tags: post
                .tags()
                .iter()
                .filter(|t| !t.trim().is_empty())
                .map(|t| TagLink {
                    name: t.clone(),
                    url: url_for(&self.blog.config, &tag_path(t)),
                })
                .collect(),
            content: post.html.clone(),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let config = &self.blog.config;
        let mut context = Context::new();
        context.insert("config", config);
        context.insert("root", &url_for(config, ""));
        context.insert("t", &self.i18n.get_all_translations());
        context.insert(
            "head",
            &HeadData {
                generator: meta_generator(),
                css: css(config, "style"),
                feed: feed_tag(config, "atom.xml"),
                theme_init: theme_toggle::init_script(config.default_theme),
            },
        );
        context.insert(
            "widgets",
            &WidgetData {
                theme_toggle: theme_toggle::render(&self.i18n),
                copy_script: terminal::COPY_SCRIPT.to_string(),
            },
        );
        context.insert("current_year", &chrono::Local::now().format("%Y").to_string());
        context.insert("heading", "");
        context.insert("series_nav", "");
        context
    }

    fn generate_index_page(&self, posts: &[Post]) -> Result<()> {
        let mut context = self.create_base_context();
        let data: Vec<PostData> = posts.iter().map(|p| self.post_data(p)).collect();
        context.insert("posts", &data);

        let html = self.renderer.render("index.html", &context)?;
        self.write_file("index.html", &html)?;
        tracing::info!("Generated index with {} posts", posts.len());
        Ok(())
    }

    fn generate_post_pages(&self, posts: &[Post]) -> Result<()> {
        for post in posts {
            let mut context = self.create_base_context();
            context.insert("post", &self.post_data(post));

            if let Some(nav) = series::resolve(posts, post) {
                context.insert(
                    "series_nav",
                    &series_nav::render(&nav, &self.blog.config, &self.i18n),
                );
            }

            let html = self
                .renderer
                .render("post.html", &context)
                .with_context(|| format!("Failed to render post {}", post.slug))?;
            self.write_file(&format!("{}index.html", post.path()), &html)?;
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(())
    }

    fn generate_tag_pages(&self, posts: &[Post]) -> Result<()> {
        // Group by slug so tags differing only in case or punctuation share a
        // page; the first spelling seen names it. Posts keep newest-first order.
        let mut tags_map: BTreeMap<String, (&str, Vec<PostData>)> = BTreeMap::new();
        for post in posts {
            for tag in post.tags() {
                let slug = slug::slugify(tag);
                if slug.is_empty() {
                    if !tag.trim().is_empty() {
                        tracing::warn!("Skipping tag without a usable slug: {:?}", tag);
                    }
                    continue;
                }
                let (_, tag_posts) = tags_map
                    .entry(slug)
                    .or_insert_with(|| (tag.as_str(), Vec::new()));
                if !tag_posts.iter().any(|p| p.slug == post.slug) {
                    tag_posts.push(self.post_data(post));
                }
            }
        }

        for (slug, (name, tag_posts)) in &tags_map {
            let mut context = self.create_base_context();
            context.insert("heading", &self.i18n.format("tagged", &[*name]));
            context.insert("posts", tag_posts);

            let html = self.renderer.render("index.html", &context)?;
            self.write_file(&format!("tags/{}/index.html", slug), &html)?;
        }

        tracing::info!("Generated {} tag pages", tags_map.len());
        Ok(())
    }

    /// Generate the Atom feed
    fn generate_atom_feed(&self, posts: &[Post]) -> Result<()> {
        let config = &self.blog.config;
        let home = full_url_for(config, "");
        let base_url = config.url.trim_end_matches('/');

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        if !config.description.is_empty() {
            feed.push_str(&format!(
                "  <subtitle>{}</subtitle>\n",
                escape_xml(&config.description)
            ));
        }
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            full_url_for(config, "atom.xml")
        ));
        feed.push_str(&format!("  <link href=\"{}\"/>\n", home));
        let built_at = chrono::Utc::now().to_rfc3339();
        feed.push_str(&format!("  <updated>{}</updated>\n", built_at));
        feed.push_str(&format!("  <id>{}</id>\n", home));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for post in posts.iter().take(config.feed_limit) {
            let link = full_url_for(config, &post.path());
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(post.title())));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
            feed.push_str(&format!("    <id>{}</id>\n", link));
            // Atom requires <updated> on every entry; undated posts use the build time
            match post.sort_key() {
                Some(date) => {
                    let date = date.and_utc().to_rfc3339();
                    feed.push_str(&format!("    <published>{}</published>\n", date));
                    feed.push_str(&format!("    <updated>{}</updated>\n", date));
                }
                None => feed.push_str(&format!("    <updated>{}</updated>\n", built_at)),
            }
            if !post.description().is_empty() {
                feed.push_str(&format!(
                    "    <summary>{}</summary>\n",
                    escape_xml(post.description())
                ));
            }
            for tag in post.tags() {
                feed.push_str(&format!("    <category term=\"{}\"/>\n", escape_xml(tag)));
            }
            let content = strip_invalid_xml_chars(&absolutize_urls(&post.html, base_url));
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                content.replace("]]>", "]]]]><![CDATA[>")
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        self.write_file("atom.xml", &feed)?;
        tracing::info!("Generated atom.xml");
        Ok(())
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, posts: &[Post]) -> Result<()> {
        let search_data: Vec<serde_json::Value> = posts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "title": p.title(),
                    "url": url_for(&self.blog.config, &p.path()),
                    "date": p.date_label(),
                    "tags": p.tags(),
                    "series": p.series().map(|s| &s.name),
                    "content": strip_html(&p.html),
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&search_data)?;
        self.write_file("search.json", &json)?;
        tracing::info!("Generated search.json");
        Ok(())
    }

    /// Copy the static directory verbatim into the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.is_dir() || static_dir == &self.blog.public_dir {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files from {:?}", copied, static_dir);
        Ok(())
    }

    fn write_file(&self, relative: &str, content: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        write_with_parents(&output_path, content)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

/// Site-relative path of a tag listing
pub fn tag_path(tag: &str) -> String {
    format!("tags/{}/", slug::slugify(tag))
}

fn write_with_parents(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}
