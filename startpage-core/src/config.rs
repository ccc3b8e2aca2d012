// startpage-core/src/config.rs
use crate::layout::{
    ComponentNode, ConfigMap, DockPanel, DockRegion, GridPanel, LayoutNode, Node, shallow_merge,
};
use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration format: {0}")]
    Invalid(&'static str),
}

/// Flat option name to value mapping (`theme`, `syncProvider`, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(ConfigMap);

impl Settings {
    pub fn new(values: ConfigMap) -> Self {
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn theme(&self) -> Option<&str> {
        self.0.get("theme").and_then(Value::as_str)
    }

    pub fn sync_provider(&self) -> Option<&str> {
        self.0.get("syncProvider").and_then(Value::as_str)
    }

    /// No provider configured, or explicitly `local`
    pub fn is_local_sync(&self) -> bool {
        matches!(self.sync_provider(), None | Some("local"))
    }

    pub fn merge(&mut self, patch: &ConfigMap) {
        shallow_merge(&mut self.0, patch);
    }
}

/// The canonical document: global settings plus the root of the layout tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub settings: Settings,
    pub layout: Node,
    #[serde(flatten)]
    pub extra: ConfigMap,
}

impl ConfigDocument {
    /// Parse and shallowly validate: both `settings` and `layout` must be present
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: Value = serde_json::from_str(text)?;
        let Some(object) = raw.as_object() else {
            return Err(ConfigError::Invalid("document is not an object"));
        };
        for field in ["settings", "layout"] {
            if object.get(field).is_none_or(Value::is_null) {
                return Err(ConfigError::Invalid(match field {
                    "settings" => "missing settings",
                    _ => "missing layout",
                }));
            }
        }
        Ok(serde_json::from_value(raw)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        default_document()
    }
}

fn object(value: Value) -> ConfigMap {
    match value {
        Value::Object(map) => map,
        _ => ConfigMap::new(),
    }
}

/// Built-in document: search on top, bookmarks left, news at the bottom and
/// a weather/clock grid in the center
pub fn default_document() -> ConfigDocument {
    let search = LayoutNode::from(ComponentNode::new("search", "search-1").with_config(object(
        json!({
            "engine": "bing",
            "placeholder": "Search with Bing...",
            "autofocus": true
        }),
    )))
    .docked(DockRegion::Top);

    let bookmarks = LayoutNode::from(
        ComponentNode::new("bookmarks", "bookmarks-1")
            .with_class("bookmarks-panel")
            .with_config(object(json!({
                "categories": [
                    {
                        "name": "Coding",
                        "links": [
                            {"title": "GitHub", "url": "https://github.com"},
                            {"title": "ChatGPT", "url": "https://chat.openai.com"}
                        ]
                    },
                    {
                        "name": "Entertainment",
                        "links": [
                            {"title": "Reddit", "url": "https://reddit.com"}
                        ]
                    }
                ]
            }))),
    )
    .docked(DockRegion::Left);

    let news = LayoutNode::from(ComponentNode::new("news", "news-1").with_config(object(json!({
        "sources": [],
        "showImages": true,
        "maxItems": 6
    }))))
    .docked(DockRegion::Bottom);

    let weather = LayoutNode::from(ComponentNode::new("weather", "weather-1").with_config(
        object(json!({"location": "auto", "unit": "celsius"})),
    ))
    .placed(None, Some("1"));

    let clock = LayoutNode::from(
        ComponentNode::new("clock", "clock-1")
            .with_config(object(json!({"format": "24h", "showDate": true}))),
    )
    .placed(None, Some("2"));

    let center = LayoutNode::Grid(GridPanel {
        columns: Some(vec!["1fr".into(), "1fr".into()]),
        rows: Some(vec!["auto".into()]),
        children: Some(vec![weather.into(), clock.into()]),
        ..GridPanel::default()
    })
    .docked(DockRegion::Center);

    ConfigDocument {
        settings: Settings::new(object(json!({
            "theme": "light",
            "syncProvider": "local"
        }))),
        layout: LayoutNode::Dock(DockPanel {
            children: Some(vec![search.into(), bookmarks.into(), news.into(), center.into()]),
            ..DockPanel::default()
        })
        .into(),
        extra: ConfigMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_shape() {
        let doc = default_document();
        assert_eq!(doc.settings.theme(), Some("light"));
        assert!(doc.settings.is_local_sync());

        let ids: Vec<_> = doc
            .layout
            .components()
            .iter()
            .map(|c| c.instance_id.as_str())
            .collect();
        assert_eq!(
            ids,
            ["search-1", "bookmarks-1", "news-1", "weather-1", "clock-1"]
        );
    }

    #[test]
    fn test_default_document_serialises_camel_case() {
        let value = serde_json::to_value(default_document()).unwrap();
        assert_eq!(value["layout"]["type"], "dock");
        let first = &value["layout"]["children"][0];
        assert_eq!(first["dockPosition"], "top");
        assert_eq!(first["componentType"], "search");
        assert_eq!(first["instanceId"], "search-1");
        assert_eq!(value["layout"]["children"][3]["children"][1]["gridColumn"], "2");
    }

    #[test]
    fn test_from_json_requires_settings_and_layout() {
        assert!(matches!(
            ConfigDocument::from_json(r#"{"layout": {"type": "stack"}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ConfigDocument::from_json(r#"{"settings": {}, "layout": null}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ConfigDocument::from_json("[1, 2]"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ConfigDocument::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(ConfigDocument::from_json(r#"{"settings": {}, "layout": {"type": "stack"}}"#).is_ok());
    }

    #[test]
    fn test_unknown_top_level_fields_round_trip() {
        let text = r#"{"settings":{"theme":"dark","fontSize":14},"layout":{"type":"stack"},"version":3}"#;
        let doc = ConfigDocument::from_json(text).unwrap();
        assert_eq!(doc.extra["version"], json!(3));
        assert_eq!(doc.settings.get("fontSize"), Some(&json!(14)));

        let again: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(again, serde_json::from_str::<Value>(text).unwrap());
    }

    #[test]
    fn test_settings_sync_provider() {
        let mut settings = Settings::default();
        assert!(settings.is_local_sync());
        settings.merge(&object(json!({"syncProvider": "google-drive"})));
        assert!(!settings.is_local_sync());
        assert_eq!(settings.sync_provider(), Some("google-drive"));
    }
}
