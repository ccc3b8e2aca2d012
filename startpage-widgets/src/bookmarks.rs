// startpage-widgets/src/bookmarks.rs
use serde::Deserialize;
use startpage_core::{ConfigMap, ElementTree, Widget, WidgetBase};

use crate::common::list_field;

/// A named group of links
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

/// Categorised bookmark links
///
/// Config keys: `categories`, a list of `{name, links: [{title, url}]}`.
/// Each category gets an "Open All" button carrying its name in
/// `data-category`; [`BookmarksWidget::links_in`] resolves that name back to
/// the URLs to open.
pub struct BookmarksWidget {
    base: WidgetBase,
}

impl BookmarksWidget {
    pub fn new(config: ConfigMap, instance_id: &str) -> Self {
        Self {
            base: WidgetBase::new(config, instance_id),
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        list_field(self.base.config(), "categories")
    }

    /// URLs of every link in the first category named `category`
    pub fn links_in(&self, category: &str) -> Vec<String> {
        self.categories()
            .into_iter()
            .find(|c| c.name == category)
            .map(|c| c.links.into_iter().map(|l| l.url).collect())
            .unwrap_or_default()
    }
}

impl Widget for BookmarksWidget {
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

        let root = tree.create_child(container, "div", "bookmarks-component");
        let content = tree.create_child(root, "div", "bookmarks-content");

        for category in self.categories() {
            let section = tree.create_child(content, "div", "bookmark-category");

            let header = tree.create_child(section, "div", "category-header");
            tree.create_text(header, "h5", "category-title", category.name.as_str());
            let open_all = tree.create_text(header, "button", "category-open-all", "Open All");
            if let Some(el) = tree.get_mut(open_all) {
                el.set_attr("data-category", category.name.as_str());
            }

            let links = tree.create_child(section, "div", "bookmark-links");
            for link in category.links {
                let anchor = tree.create_text(links, "a", "bookmark-link", link.title);
                if let Some(el) = tree.get_mut(anchor) {
                    el.set_attr("href", link.url);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::render_once;
    use serde_json::json;

    fn widget() -> BookmarksWidget {
        let config = json!({
            "categories": [
                {"name": "Coding", "links": [
                    {"title": "GitHub", "url": "https://github.com"},
                    {"title": "ChatGPT", "url": "https://chat.openai.com"}
                ]},
                {"name": "Empty"},
                {"title": "no name"}
            ]
        });
        BookmarksWidget::new(config.as_object().unwrap().clone(), "bookmarks-1")
    }

    #[test]
    fn test_categories_skip_malformed() {
        let names: Vec<_> = widget().categories().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Coding", "Empty"]);
    }

    #[test]
    fn test_links_in() {
        let w = widget();
        assert_eq!(
            w.links_in("Coding"),
            vec!["https://github.com", "https://chat.openai.com"]
        );
        assert!(w.links_in("Empty").is_empty());
        assert!(w.links_in("Missing").is_empty());
    }

    #[test]
    fn test_render_categories_and_links() {
        let mut w = widget();
        let (_, snap) = render_once(&mut w);

        let categories = snap.find_all_class("bookmark-category");
        assert_eq!(categories.len(), 2);

        let button = categories[0].find_class("category-open-all").unwrap();
        assert_eq!(button.attrs["data-category"], "Coding");
        assert_eq!(button.text.as_deref(), Some("Open All"));

        let links = categories[0].find_all_class("bookmark-link");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].tag, "a");
        assert_eq!(links[0].attrs["href"], "https://github.com");
        assert_eq!(links[1].text.as_deref(), Some("ChatGPT"));
        assert!(categories[1].find_class("bookmark-link").is_none());
    }

    #[test]
    fn test_missing_categories_renders_empty_content() {
        let mut w = BookmarksWidget::new(ConfigMap::new(), "b");
        let (_, snap) = render_once(&mut w);
        let content = snap.find_class("bookmarks-content").unwrap();
        assert!(content.children.is_empty());
    }
}
