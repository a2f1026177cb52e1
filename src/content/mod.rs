//! Content module - handles posts, series, and MDX processing

mod frontmatter;
pub mod loader;
mod markdown;
pub mod mdx;
mod post;
pub mod series;

pub use frontmatter::{FrontMatter, SeriesRef};
pub use loader::{PostError, PostLoader};
pub use markdown::MarkdownRenderer;
pub use post::Post;
pub use series::{SeriesInfo, SeriesNavigation};
