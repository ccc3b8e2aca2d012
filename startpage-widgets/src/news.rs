// startpage-widgets/src/news.rs
use startpage_core::{ConfigMap, ElementTree, Widget, WidgetBase};

use crate::common::{bool_field, count_field};

/// One card in the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsItem {
    pub title: &'static str,
    pub excerpt: &'static str,
    pub source: &'static str,
    pub url: &'static str,
    pub image_url: &'static str,
}

/// Placeholder feed until real sources are wired in
pub const SAMPLE_NEWS: &[NewsItem] = &[
    NewsItem {
        title: "Sample News Article 1",
        excerpt: "This is a placeholder for actual news content from APIs.",
        source: "Sample Source",
        url: "#",
        image_url: "https://via.placeholder.com/400x200?text=News+1",
    },
    NewsItem {
        title: "Sample News Article 2",
        excerpt: "Another placeholder for news content that will come from configured sources.",
        source: "Sample Source",
        url: "#",
        image_url: "https://via.placeholder.com/400x200?text=News+2",
    },
    NewsItem {
        title: "Integration with News APIs Coming Soon",
        excerpt: "In a future update, this component will connect to actual news sources.",
        source: "Development Update",
        url: "#",
        image_url: "https://via.placeholder.com/400x200?text=Coming+Soon",
    },
];

pub const DEFAULT_MAX_ITEMS: usize = 6;

/// News feed cards
///
/// Config keys: `maxItems` (default 6), `showImages` (default true),
/// `sources` (accepted, not fetched yet).
pub struct NewsWidget {
    base: WidgetBase,
}

impl NewsWidget {
    pub fn new(config: ConfigMap, instance_id: &str) -> Self {
        Self {
            base: WidgetBase::new(config, instance_id),
        }
    }

    pub fn max_items(&self) -> usize {
        count_field(self.base.config(), "maxItems").unwrap_or(DEFAULT_MAX_ITEMS)
    }

    pub fn show_images(&self) -> bool {
        bool_field(self.base.config(), "showImages", true)
    }

    /// Items currently shown
    pub fn items(&self) -> &'static [NewsItem] {
        &SAMPLE_NEWS[..self.max_items().min(SAMPLE_NEWS.len())]
    }
}

impl Widget for NewsWidget {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn render(&mut self, tree: &mut ElementTree) {
        let Some(container) = self.base.clear_container(tree) else {
            return;
        };

        let root = tree.create_child(container, "div", "news-component");
        tree.create_text(root, "h4", "news-heading", "News Feed");
        let feed = tree.create_child(root, "div", "news-feed");

        let show_images = self.show_images();
        for item in self.items() {
            let card = tree.create_child(feed, "div", "news-card");
            if let Some(el) = tree.get_mut(card) {
                el.set_attr("data-url", item.url);
                if show_images && !item.image_url.is_empty() {
                    el.set_style("background-image", format!("url('{}')", item.image_url));
                }
            }

            let body = tree.create_child(card, "div", "news-content");
            tree.create_text(body, "h5", "news-title", item.title);
            tree.create_text(body, "p", "news-excerpt", item.excerpt);
            tree.create_text(body, "div", "news-source", item.source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::render_once;
    use serde_json::json;

    fn widget(config: serde_json::Value) -> NewsWidget {
        NewsWidget::new(config.as_object().unwrap().clone(), "news-1")
    }

    #[test]
    fn test_defaults() {
        let w = widget(json!({"sources": []}));
        assert_eq!(w.max_items(), DEFAULT_MAX_ITEMS);
        assert!(w.show_images());
        assert_eq!(w.items().len(), SAMPLE_NEWS.len());
    }

    #[test]
    fn test_max_items_truncates() {
        let mut w = widget(json!({"maxItems": 2}));
        let (_, snap) = render_once(&mut w);
        let cards = snap.find_all_class("news-card");
        assert_eq!(cards.len(), 2);
        assert_eq!(
            cards[1].find_class("news-title").unwrap().text.as_deref(),
            Some("Sample News Article 2")
        );
    }

    #[test]
    fn test_show_images_controls_background() {
        let mut with = widget(json!({}));
        let (_, snap) = render_once(&mut with);
        let card = snap.find_class("news-card").unwrap();
        assert_eq!(
            card.style["background-image"],
            "url('https://via.placeholder.com/400x200?text=News+1')"
        );

        let mut without = widget(json!({"showImages": false}));
        let (_, snap) = render_once(&mut without);
        assert!(snap.find_all_class("news-card").iter().all(|c| c.style.is_empty()));
    }
}
