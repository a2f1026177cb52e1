//! Series navigation box shown on posts that belong to a series

use crate::config::SiteConfig;
use crate::content::SeriesNavigation;
use crate::helpers::{html_escape, url_for};
use crate::i18n::I18n;

const PREV_ARROW: &str = r#"<svg class="icon" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M15 19l-7-7 7-7"/></svg>"#;
const NEXT_ARROW: &str = r#"<svg class="icon" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M9 5l7 7-7 7"/></svg>"#;

pub fn render(nav: &SeriesNavigation<'_>, config: &SiteConfig, i18n: &I18n) -> String {
    let series = &nav.series;
    let mut out = String::new();

    out.push_str("<nav class=\"series-nav\">\n<details class=\"series-list\">\n<summary>");
    out.push_str(&format!(
        r#"<span class="series-title">{}</span><span class="series-count">({}/{})</span>"#,
        html_escape(&i18n.format("series.heading", &[series.name.as_str()])),
        series.current_order,
        series.total_count
    ));
    out.push_str(&format!(
        r#"<span class="series-toggle"><span class="when-closed">{}</span><span class="when-open">{}</span></span>"#,
        html_escape(&i18n.get("series.show_list")),
        html_escape(&i18n.get("series.hide_list"))
    ));
    out.push_str("</summary>\n<ol class=\"series-posts\">\n");

    for post in &series.posts {
        let order = post.series().map(|s| s.order).unwrap_or_default();
        let class = if order == series.current_order {
            "current"
        } else {
            ""
        };
        out.push_str(&format!(
            "<li class=\"{}\"><a href=\"{}\">{}. {}</a></li>\n",
            class,
            url_for(config, &post.path()),
            order,
            html_escape(post.title())
        ));
    }
    out.push_str("</ol>\n</details>\n<div class=\"series-links\">");

    match nav.prev {
        Some(prev) => out.push_str(&format!(
            r#"<a class="series-prev" href="{}">{}{}</a>"#,
            url_for(config, &prev.path()),
            PREV_ARROW,
            html_escape(&i18n.format("series.prev", &[prev.title()]))
        )),
        None => out.push_str("<div></div>"),
    }
    match nav.next {
        Some(next) => out.push_str(&format!(
            r#"<a class="series-next" href="{}">{}{}</a>"#,
            url_for(config, &next.path()),
            html_escape(&i18n.format("series.next", &[next.title()])),
            NEXT_ARROW
        )),
        None => out.push_str("<div></div>"),
    }

    out.push_str(&format!(
        "</div>\n<div class=\"series-progress\"><div class=\"series-progress-bar\" style=\"width: {}%\"></div></div>\n</nav>",
        series.progress()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{series, FrontMatter, Post, SeriesRef};

    fn post(slug: &str, order: u32) -> Post {
        Post::new(
            slug,
            FrontMatter {
                title: Some(format!("Part {}", order)),
                series: Some(SeriesRef {
                    name: "Async Rust".to_string(),
                    order,
                }),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_render_middle_post() {
        let posts = vec![post("one", 1), post("two", 2), post("three", 3), post("four", 4)];
        let nav = series::resolve(&posts, &posts[1]).unwrap();
        let html = render(&nav, &SiteConfig::default(), &I18n::new("en"));

        assert!(html.contains("Async Rust series"));
        assert!(html.contains("(2/4)"));
        assert!(html.contains(r#"<li class="current"><a href="/posts/two/">2. Part 2</a></li>"#));
        assert!(html.contains(r#"href="/posts/one/""#));
        assert!(html.contains("Previous: Part 1"));
        assert!(html.contains("Next: Part 3"));
        assert!(html.contains("width: 50%"));
    }

    #[test]
    fn test_render_last_post_has_placeholder() {
        let posts = vec![post("one", 1), post("two", 2)];
        let nav = series::resolve(&posts, &posts[1]).unwrap();
        let html = render(&nav, &SiteConfig::default(), &I18n::new("ko"));

        assert!(html.contains("이전: Part 1"));
        assert!(!html.contains("series-next"));
        assert!(html.contains("<div></div></div>"));
        assert!(html.contains("width: 100%"));
    }
}
