//! Project explorer: a file tree described with indentation
//!
//! ```text
//! my-app/
//!   src/
//!     main.rs   # entry point
//!     lib.rs
//!   Cargo.toml
//! ```
//!
//! The first line names the root directory. Every further line is one
//! entry; two columns of indentation make one level, a trailing `/` marks a
//! directory, and text after `#` is an optional description.

use std::cmp::Ordering;
use thiserror::Error;

use crate::helpers::html_escape;
use crate::i18n::I18n;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("file tree structure is empty")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub name: String,
    pub kind: NodeKind,
    pub description: Option<String>,
    /// Always empty for files
    pub children: Vec<FileNode>,
}

impl FileNode {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory,
            description: None,
            children: Vec::new(),
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            description: None,
            children: Vec::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Directories first, then names compared case-insensitively
    fn display_order(a: &FileNode, b: &FileNode) -> Ordering {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    }

    fn sort_recursive(&mut self) {
        self.children.sort_by(Self::display_order);
        for child in &mut self.children {
            child.sort_recursive();
        }
    }
}

/// Split an entry line into its name and optional `# description`
fn split_description(entry: &str) -> (&str, Option<&str>) {
    let mut prev_ws = false;
    for (i, c) in entry.char_indices() {
        if c == '#' && prev_ws {
            let description = entry[i + 1..].trim();
            let name = entry[..i].trim_end();
            return (name, (!description.is_empty()).then_some(description));
        }
        prev_ws = c.is_whitespace();
    }
    (entry, None)
}

/// Leading whitespace width in columns; a tab counts as two
fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 2 } else { 1 })
        .sum()
}

/// Parse an indentation-based structure into a tree rooted at the first line
pub fn parse_structure(structure: &str) -> Result<FileNode, TreeError> {
    let structure = structure.trim();
    let mut lines = structure.lines();
    let first = lines.next().ok_or(TreeError::Empty)?;
    if first.trim().is_empty() {
        return Err(TreeError::Empty);
    }

    let (root_name, root_description) = split_description(first.trim());
    let mut root = FileNode::directory(root_name.trim_end_matches('/'));
    root.description = root_description.map(str::to_string);

    // Open directories as (level, path of child indices from the root)
    let mut stack: Vec<(usize, Vec<usize>)> = vec![(0, Vec::new())];

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let level = indentation(line) / 2 + 1;
        let (name, description) = split_description(line.trim());
        let is_dir = name.ends_with('/');
        let mut node = if is_dir {
            FileNode::directory(name.trim_end_matches('/'))
        } else {
            FileNode::file(name)
        };
        node.description = description.map(str::to_string);

        while stack.len() > 1 && stack.last().is_some_and(|(l, _)| *l >= level) {
            stack.pop();
        }

        let parent_path = stack.last().map(|(_, path)| path.clone()).unwrap_or_default();
        let parent = node_at(&mut root, &parent_path);
        parent.children.push(node);

        if is_dir {
            let mut path = parent_path;
            path.push(parent.children.len() - 1);
            stack.push((level, path));
        }
    }

    root.sort_recursive();
    Ok(root)
}

fn node_at<'a>(root: &'a mut FileNode, path: &[usize]) -> &'a mut FileNode {
    path.iter()
        .fold(root, |node, &index| &mut node.children[index])
}

const FOLDER_ICON: &str = r##"<svg class="icon" viewBox="0 0 16 16" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M14 4.5V12.5C14 13.0523 13.5523 13.5 13 13.5H3C2.44772 13.5 2 13.0523 2 12.5V3.5C2 2.94772 2.44772 2.5 3 2.5H7L8.5 4H13C13.5523 4 14 4.22386 14 4.5Z" stroke="#757575" stroke-width="1" fill="none"/></svg>"##;

const FILE_ICON: &str = r##"<svg class="icon" viewBox="0 0 16 16" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M4.5 2H9V4C9 4.55228 9.44772 5 10 5H12.5V13C12.5 13.5523 12.0523 14 11.5 14H4.5C3.94772 14 3.5 13.5523 3.5 13V3C3.5 2.44772 3.94772 2 4.5 2Z" stroke="#6B7280" stroke-width="1" fill="none"/><path d="M9 2L12.5 5" stroke="#6B7280" stroke-width="1" fill="none"/></svg>"##;

const CHEVRON_ICON: &str = r#"<svg class="chevron" viewBox="0 0 16 16" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round"><path d="M6 12L10 8L6 4"/></svg>"#;

/// Render the explorer widget; `title` defaults to the localized label
pub fn render(tree: &FileNode, title: Option<&str>, i18n: &I18n) -> String {
    let title = title
        .map(str::to_string)
        .unwrap_or_else(|| i18n.get("explorer.title"));

    let mut out = String::new();
    out.push_str(r#"<div class="project-explorer">"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<div class="widget-header"><span class="widget-title">{}</span></div>"#,
        html_escape(&title)
    ));
    out.push('\n');
    out.push_str(r#"<div class="explorer-body">"#);
    out.push('\n');
    render_node(tree, 0, &mut out);
    out.push_str("</div>\n</div>");
    out
}

fn render_row(node: &FileNode, level: usize, has_children: bool) -> String {
    let (kind_class, icon) = if node.is_dir() {
        ("dir", FOLDER_ICON)
    } else {
        ("file", FILE_ICON)
    };
    let chevron = if has_children {
        CHEVRON_ICON
    } else {
        r#"<span class="chevron-spacer"></span>"#
    };
    let description = node
        .description
        .as_deref()
        .map(|d| format!(r#" <span class="node-description">{}</span>"#, html_escape(d)))
        .unwrap_or_default();

    format!(
        r#"<span class="node-row {}" style="padding-left: {}rem">{}{}<span class="node-name">{}</span>{}</span>"#,
        kind_class,
        level as f64 * 1.5,
        chevron,
        icon,
        html_escape(&node.name),
        description
    )
}

fn render_node(node: &FileNode, level: usize, out: &mut String) {
    let has_children = node.is_dir() && !node.children.is_empty();

    if has_children {
        out.push_str(r#"<details class="file-node" open>"#);
        out.push_str(&format!("<summary>{}</summary>\n", render_row(node, level, true)));
        for child in &node.children {
            render_node(child, level + 1, out);
        }
        out.push_str("</details>\n");
    } else {
        out.push_str(&format!(
            r#"<div class="file-node">{}</div>"#,
            render_row(node, level, false)
        ));
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(node: &FileNode) -> Vec<&str> {
        node.children.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_parse_nested_structure() {
        let tree = parse_structure(
            r#"
my-app/
  src/
    main.rs
    lib.rs
  Cargo.toml
  README.md
"#,
        )
        .unwrap();

        assert_eq!(tree.name, "my-app");
        assert!(tree.is_dir());
        assert_eq!(names(&tree), vec!["src", "Cargo.toml", "README.md"]);
        let src = &tree.children[0];
        assert!(src.is_dir());
        assert_eq!(names(src), vec!["lib.rs", "main.rs"]);
    }

    #[test]
    fn test_directories_sort_first() {
        let tree = parse_structure("root\n  b.txt\n  zeta/\n  A.txt\n  alpha/\n").unwrap();
        assert_eq!(names(&tree), vec!["alpha", "zeta", "A.txt", "b.txt"]);
    }

    #[test]
    fn test_dedent_pops_to_matching_parent() {
        let tree = parse_structure(
            "root/\n  a/\n    b/\n      deep.rs\n  top.rs\n    odd.rs\n",
        )
        .unwrap();
        // `odd.rs` is indented under a file, so it attaches to the nearest open directory
        assert_eq!(names(&tree), vec!["a", "odd.rs", "top.rs"]);
        let a = &tree.children[0];
        assert_eq!(names(a), vec!["b"]);
        assert_eq!(names(&a.children[0]), vec!["deep.rs"]);
    }

    #[test]
    fn test_files_never_have_children() {
        let tree = parse_structure("root\n  file.rs\n    child.rs\n").unwrap();
        for child in &tree.children {
            if child.kind == NodeKind::File {
                assert!(child.children.is_empty());
            }
        }
        assert_eq!(names(&tree), vec!["child.rs", "file.rs"]);
    }

    #[test]
    fn test_descriptions_and_blank_lines() {
        let tree = parse_structure("app/  # the app\n\n  main.rs   # entry point\n  c#.txt\n").unwrap();
        assert_eq!(tree.description.as_deref(), Some("the app"));
        assert_eq!(tree.children[0].name, "c#.txt");
        assert_eq!(tree.children[1].name, "main.rs");
        assert_eq!(tree.children[1].description.as_deref(), Some("entry point"));
    }

    #[test]
    fn test_tabs_count_as_two_columns() {
        let tree = parse_structure("root\n\tsrc/\n\t\tmain.rs\n").unwrap();
        assert_eq!(names(&tree), vec!["src"]);
        assert_eq!(names(&tree.children[0]), vec!["main.rs"]);
    }

    #[test]
    fn test_empty_structure_is_error() {
        assert_eq!(parse_structure("   \n  "), Err(TreeError::Empty));
    }

    #[test]
    fn test_render() {
        let tree = parse_structure("app/\n  src/\n    main.rs\n  empty/\n").unwrap();
        let html = render(&tree, None, &I18n::new("en"));
        assert!(html.contains("Project structure"));
        assert!(html.contains(r#"<span class="node-name">main.rs</span>"#));
        assert!(html.contains("padding-left: 3rem"));
        // Only directories with children get a collapsible chevron
        assert_eq!(html.matches(r#"class="chevron""#).count(), 2);
        assert!(!html.lines().any(|l| l.trim().is_empty()));
    }

    #[test]
    fn test_render_custom_title_is_escaped() {
        let tree = parse_structure("a\n").unwrap();
        let html = render(&tree, Some("<Layout>"), &I18n::new("ko"));
        assert!(html.contains("&lt;Layout&gt;"));
    }
}
