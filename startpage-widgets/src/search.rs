// startpage-widgets/src/search.rs
use startpage_core::{ConfigMap, ElementTree, Widget, WidgetBase};

use crate::common::{bool_field, str_field};

/// A search backend the form can submit to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchEngine {
    pub name: &'static str,
    /// Query prefix; the encoded query is appended verbatim
    pub url: &'static str,
    pub placeholder: &'static str,
}

pub const ENGINES: &[SearchEngine] = &[
    SearchEngine {
        name: "google",
        url: "https://www.google.com/search?q=",
        placeholder: "Search Google...",
    },
    SearchEngine {
        name: "bing",
        url: "https://www.bing.com/search?q=",
        placeholder: "Search with Bing...",
    },
    SearchEngine {
        name: "duckduckgo",
        url: "https://duckduckgo.com/?q=",
        placeholder: "Search DuckDuckGo...",
    },
    SearchEngine {
        name: "youtube",
        url: "https://www.youtube.com/results?search_query=",
        placeholder: "Search YouTube...",
    },
    SearchEngine {
        name: "github",
        url: "https://github.com/search?q=",
        placeholder: "Search GitHub...",
    },
];

pub const DEFAULT_ENGINE: &str = "bing";

pub fn engine(name: &str) -> Option<&'static SearchEngine> {
    ENGINES.iter().find(|e| e.name == name)
}

/// Search box bound to one of [`ENGINES`]
///
/// Config keys: `engine` (default `bing`), `placeholder`, `autofocus`.
pub struct SearchWidget {
    base: WidgetBase,
}

impl SearchWidget {
    pub fn new(config: ConfigMap, instance_id: &str) -> Self {
        Self {
            base: WidgetBase::new(config, instance_id),
        }
    }

    fn engine_name(&self) -> &str {
        str_field(self.base.config(), "engine").unwrap_or(DEFAULT_ENGINE)
    }

    /// Configured engine. Unknown names submit to Bing.
    pub fn engine(&self) -> &'static SearchEngine {
        engine(self.engine_name())
            .or_else(|| engine(DEFAULT_ENGINE))
            .unwrap_or(&ENGINES[0])
    }

    pub fn placeholder(&self) -> String {
        if let Some(text) = str_field(self.base.config(), "placeholder") {
            return text.to_string();
        }
        engine(self.engine_name())
            .map(|e| e.placeholder)
            .unwrap_or("Search...")
            .to_string()
    }

    /// Where submitting `query` navigates to; `None` for a blank query
    pub fn search_url(&self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(format!(
            "{}{}",
            self.engine().url,
            urlencoding::encode(query)
        ))
    }
}

impl Widget for SearchWidget {
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

        let root = tree.create_child(container, "div", "search-component");
        let form = tree.create_child(root, "form", "search-form");
        if let Some(el) = tree.get_mut(form) {
            el.set_attr("data-engine", self.engine().name);
        }

        let group = tree.create_child(form, "div", "input-group");
        let input = tree.create_child(group, "input", "search-input");
        let placeholder = self.placeholder();
        if let Some(el) = tree.get_mut(input) {
            el.set_attr("type", "text");
            el.set_attr("placeholder", placeholder);
            el.set_attr("aria-label", "Search");
            if bool_field(self.base.config(), "autofocus", false) {
                el.set_attr("autofocus", "true");
            }
        }

        let button = tree.create_text(group, "button", "search-submit", "Search");
        if let Some(el) = tree.get_mut(button) {
            el.set_attr("type", "submit");
        }
    }
}
