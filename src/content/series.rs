//! Series resolution: ordered groups of posts sharing a series name

use serde::Serialize;
use std::collections::BTreeMap;

use super::Post;

/// A named series as seen from one of its posts
#[derive(Debug, Clone)]
pub struct SeriesInfo<'a> {
    pub name: String,
    /// Member posts sorted by series order, ascending
    pub posts: Vec<&'a Post>,
    pub current_order: u32,
    pub total_count: usize,
}

impl SeriesInfo<'_> {
    /// Completion percentage of the current post within the series
    pub fn progress(&self) -> u32 {
        if self.total_count == 0 {
            return 0;
        }
        (f64::from(self.current_order) / self.total_count as f64 * 100.0).round() as u32
    }
}

/// Series context plus adjacent posts for a single post page
#[derive(Debug, Clone)]
pub struct SeriesNavigation<'a> {
    pub series: SeriesInfo<'a>,
    pub prev: Option<&'a Post>,
    pub next: Option<&'a Post>,
}

/// Summary of a whole series, used for listings
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSummary {
    pub name: String,
    /// (order, slug, title) in series order
    pub entries: Vec<(u32, String, String)>,
}

/// Resolve series navigation for `current` among `posts`
///
/// Returns `None` when the post is not part of a series. Neighbours are the
/// posts whose order is exactly one below and one above the current order.
pub fn resolve<'a>(posts: &'a [Post], current: &Post) -> Option<SeriesNavigation<'a>> {
    let series_ref = current.series()?;

    let mut members: Vec<&Post> = posts
        .iter()
        .filter(|p| p.series().is_some_and(|s| s.name == series_ref.name))
        .collect();
    members.sort_by_key(|p| (p.series().map(|s| s.order), p.slug.clone()));

    let order = series_ref.order;
    let find = |wanted: u32| {
        members
            .iter()
            .copied()
            .find(|p| p.series().is_some_and(|s| s.order == wanted))
    };
    let prev = order.checked_sub(1).and_then(find);
    let next = order.checked_add(1).and_then(find);

    Some(SeriesNavigation {
        series: SeriesInfo {
            name: series_ref.name.clone(),
            total_count: members.len(),
            posts: members,
            current_order: order,
        },
        prev,
        next,
    })
}

/// Group every post that belongs to a series, series sorted by name
pub fn collect_all(posts: &[Post]) -> Vec<SeriesSummary> {
    let mut groups: BTreeMap<&str, Vec<&Post>> = BTreeMap::new();
    for post in posts {
        if let Some(series) = post.series() {
            groups.entry(series.name.as_str()).or_default().push(post);
        }
    }

    groups
        .into_iter()
        .map(|(name, mut members)| {
            members.sort_by_key(|p| (p.series().map(|s| s.order), p.slug.clone()));
            SeriesSummary {
                name: name.to_string(),
                entries: members
                    .iter()
                    .map(|p| {
                        (
                            p.series().map(|s| s.order).unwrap_or_default(),
                            p.slug.clone(),
                            p.title().to_string(),
                        )
                    })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FrontMatter, SeriesRef};

    fn post(slug: &str, series: Option<(&str, u32)>) -> Post {
        Post::new(
            slug,
            FrontMatter {
                title: Some(format!("Title {}", slug)),
                series: series.map(|(name, order)| SeriesRef {
                    name: name.to_string(),
                    order,
                }),
                ..Default::default()
            },
        )
    }

    fn sample() -> Vec<Post> {
        vec![
            post("rust-3", Some(("rust", 3))),
            post("go-1", Some(("go", 1))),
            post("rust-1", Some(("rust", 1))),
            post("standalone", None),
            post("rust-2", Some(("rust", 2))),
        ]
    }

    #[test]
    fn test_not_in_series() {
        let posts = sample();
        assert!(resolve(&posts, &posts[3]).is_none());
    }

    #[test]
    fn test_middle_of_series() {
        let posts = sample();
        let nav = resolve(&posts, &posts[4]).unwrap();
        assert_eq!(nav.series.name, "rust");
        assert_eq!(nav.series.total_count, 3);
        assert_eq!(nav.series.current_order, 2);
        let slugs: Vec<_> = nav.series.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["rust-1", "rust-2", "rust-3"]);
        assert_eq!(nav.prev.map(|p| p.slug.as_str()), Some("rust-1"));
        assert_eq!(nav.next.map(|p| p.slug.as_str()), Some("rust-3"));
        assert_eq!(nav.series.progress(), 67);
    }

    #[test]
    fn test_series_ends() {
        let posts = sample();
        let first = resolve(&posts, &posts[2]).unwrap();
        assert!(first.prev.is_none());
        assert_eq!(first.next.map(|p| p.slug.as_str()), Some("rust-2"));
        assert_eq!(first.series.progress(), 33);

        let last = resolve(&posts, &posts[0]).unwrap();
        assert_eq!(last.prev.map(|p| p.slug.as_str()), Some("rust-2"));
        assert!(last.next.is_none());
        assert_eq!(last.series.progress(), 100);

        let single = resolve(&posts, &posts[1]).unwrap();
        assert!(single.prev.is_none() && single.next.is_none());
        assert_eq!(single.series.total_count, 1);
    }

    #[test]
    fn test_gaps_are_not_bridged() {
        let posts = vec![post("a", Some(("s", 1))), post("c", Some(("s", 3)))];
        let nav = resolve(&posts, &posts[1]).unwrap();
        assert!(nav.prev.is_none());
        assert!(nav.next.is_none());
    }

    #[test]
    fn test_order_zero_has_no_prev() {
        let posts = vec![post("zero", Some(("s", 0))), post("one", Some(("s", 1)))];
        let nav = resolve(&posts, &posts[0]).unwrap();
        assert!(nav.prev.is_none());
        assert_eq!(nav.next.map(|p| p.slug.as_str()), Some("one"));
        assert_eq!(nav.series.progress(), 0);
    }

    #[test]
    fn test_collect_all() {
        let posts = sample();
        let all = collect_all(&posts);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "go");
        assert_eq!(all[1].name, "rust");
        let orders: Vec<u32> = all[1].entries.iter().map(|e| e.0).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(all[1].entries[0].2, "Title rust-1");
    }
}
