//! Initialize a new blog

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::Blog;

const CONFIG_TEMPLATE: &str = r#"# Site
title: My Blog
description: Notes on building things
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
posts_dir: src/content/posts
public_dir: out
static_dir: public
i18n_dir: languages

# Writing
render_drafts: false
highlight:
  theme: base16-ocean.dark
  line_number: false

# Appearance
default_theme: light

# Feed
feed_limit: 20
"#;

const SAMPLE_POST: &str = r#"---
title: Hello World
date: {{ date }}
description: The first post of this blog
tags: [welcome]
---

Welcome! Posts are MDX files in `src/content/posts`.

## Widgets

<Terminal commandToCopy='mdx-blog new "My New Post"'>
mdx-blog new "My New Post"
</Terminal>

<TerminalSession commands={[
  { command: "mdx-blog generate", output: "Generated in 0.05s" },
  { command: "mdx-blog server --open" },
]} />

<ProjectExplorer title="Layout" structure={`
my-blog/
  _config.yml      # site configuration
  src/
    content/
      posts/
        hello-world.mdx
  public/          # copied verbatim
`} />
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join("_config.yml").exists() {
        anyhow::bail!("A blog already exists in {:?}", target_dir);
    }

    let posts_dir = target_dir.join("src/content/posts");
    fs::create_dir_all(&posts_dir)
        .with_context(|| format!("Failed to create {:?}", posts_dir))?;
    fs::create_dir_all(target_dir.join("public"))?;

    fs::write(target_dir.join("_config.yml"), CONFIG_TEMPLATE)?;

    let sample_post = SAMPLE_POST.replace(
        "{{ date }}",
        &chrono::Local::now().format("%Y-%m-%d").to_string(),
    );
    fs::write(posts_dir.join("hello-world.mdx"), sample_post)?;

    tracing::info!("Initialized blog in {:?}", target_dir);
    Ok(())
}

/// Run the init command with an existing Blog instance
pub fn run(blog: &Blog) -> Result<()> {
    init_site(&blog.base_dir)
}
