// startpage-core/src/manager.rs
use crate::builder::LayoutBuilder;
use crate::config::{ConfigDocument, ConfigError, default_document};
use crate::layout::ConfigMap;
use crate::store::ConfigStore;
use crate::sync::{StubSync, SyncProvider};
use serde_json::Value;

/// Themes `toggle_theme` cycles through
pub const THEMES: [&str; 2] = ["light", "dark"];

/// Owns the canonical configuration document and keeps it, the persistent
/// store and the live widget instances consistent.
///
/// Widget code never mutates the document directly; every change goes
/// through one of the `update_*` methods.
pub struct ConfigManager<S: ConfigStore> {
    store: S,
    sync: Box<dyn SyncProvider>,
    document: ConfigDocument,
    applied_theme: Option<String>,
    unsaved: bool,
}

impl<S: ConfigStore> ConfigManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            sync: Box::new(StubSync),
            document: default_document(),
            applied_theme: None,
            unsaved: false,
        }
    }

    pub fn with_sync(mut self, sync: impl SyncProvider + 'static) -> Self {
        self.sync = Box::new(sync);
        self
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Theme most recently applied to the page
    pub fn applied_theme(&self) -> Option<&str> {
        self.applied_theme.as_deref()
    }

    /// Whether the last save failed, leaving the document ahead of the store
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Load the document (or fall back to the default), apply the theme and
    /// signal readiness. With a non-local sync provider readiness waits for
    /// the remote fetch.
    pub fn init<F>(&mut self, on_ready: F)
    where
        F: FnOnce(&ConfigDocument),
    {
        self.document = self.load();
        self.apply_theme();

        if self.document.settings.is_local_sync() {
            on_ready(&self.document);
        } else {
            self.sync_from_cloud(on_ready);
        }
    }

    fn load(&self) -> ConfigDocument {
        match self.store.read() {
            Ok(Some(text)) => match ConfigDocument::from_json(&text) {
                Ok(document) => {
                    tracing::info!("Configuration loaded from local storage");
                    document
                }
                Err(e) => {
                    tracing::error!("Failed to parse saved configuration: {}", e);
                    default_document()
                }
            },
            Ok(None) => {
                tracing::info!("Using default configuration");
                default_document()
            }
            Err(e) => {
                tracing::error!("Failed to read saved configuration: {}", e);
                default_document()
            }
        }
    }

    fn sync_from_cloud<F>(&mut self, on_ready: F)
    where
        F: FnOnce(&ConfigDocument),
    {
        match self.sync.pull() {
            Ok(Some(remote)) => {
                tracing::info!("Configuration loaded from cloud");
                self.document = remote;
                self.apply_theme();
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Cloud sync failed: {}", e),
        }
        on_ready(&self.document);
    }

    /// Persist the document. On failure the previously stored blob stands.
    pub fn save_config(&mut self) -> Result<(), ConfigError> {
        let result = self
            .document
            .to_json()
            .and_then(|blob| Ok(self.store.write(&blob)?));

        self.unsaved = result.is_err();
        match &result {
            Ok(()) => {
                tracing::info!("Configuration saved to local storage");
                if !self.document.settings.is_local_sync()
                    && let Err(e) = self.sync.push(&self.document)
                {
                    tracing::warn!("Cloud sync failed: {}", e);
                }
            }
            Err(e) => tracing::error!("Failed to save configuration: {}", e),
        }
        result
    }

    /// Merge `patch` into the first component (document order) whose
    /// `instanceId` matches, re-render the live instance and persist.
    /// Returns false, touching nothing, when no component matches.
    pub fn update_component_config(
        &mut self,
        builder: &mut LayoutBuilder,
        instance_id: &str,
        patch: &ConfigMap,
    ) -> bool {
        let Some(node) = self.document.layout.find_component_mut(instance_id) else {
            tracing::debug!(instance_id, "No component to update");
            return false;
        };
        node.merge_config(patch);

        builder.update_component(instance_id, patch);
        self.persist();
        true
    }

    /// Shallow-merge into `settings`, reapplying the theme when it changed
    pub fn update_settings(&mut self, patch: &ConfigMap) {
        self.document.settings.merge(patch);

        if patch.get("theme").is_some_and(|t| !t.is_null()) {
            self.apply_theme();
        }

        self.persist();
    }

    /// Save after a change. Failure is logged and surfaces through
    /// [`Self::has_unsaved_changes`], never as an error of the change itself.
    fn persist(&mut self) {
        if self.save_config().is_err() {
            tracing::debug!("Change kept in memory only");
        }
    }

    pub fn apply_theme(&mut self) {
        self.applied_theme = self.document.settings.theme().map(String::from);
        tracing::debug!(theme = ?self.applied_theme, "Theme applied");
    }

    /// Switch to the next theme in [`THEMES`] and persist it
    pub fn toggle_theme(&mut self) -> &'static str {
        let current = self.document.settings.theme();
        let next = match THEMES.iter().position(|t| Some(*t) == current) {
            Some(index) => THEMES[(index + 1) % THEMES.len()],
            None => THEMES[0],
        };

        let mut patch = ConfigMap::new();
        patch.insert("theme".into(), Value::from(next));
        self.update_settings(&patch);
        next
    }

    /// Pretty-printed JSON of the canonical document
    pub fn export_config(&self) -> Result<String, ConfigError> {
        self.document.to_json_pretty()
    }

    /// Replace the document with `text` if it parses and has both `settings`
    /// and `layout`. On failure the current document is untouched.
    ///
    /// A rejected document is the only error; if the accepted document could
    /// not be written, [`Self::has_unsaved_changes`] reports it.
    pub fn import_config(&mut self, text: &str) -> Result<(), ConfigError> {
        let document = ConfigDocument::from_json(text).inspect_err(|e| {
            tracing::error!("Failed to import configuration: {}", e);
        })?;

        self.document = document;
        self.apply_theme();
        self.persist();
        Ok(())
    }

    /// Restore the built-in document; see [`Self::has_unsaved_changes`] for
    /// whether it reached the store
    pub fn reset_to_defaults(&mut self) -> &ConfigDocument {
        self.document = default_document();
        self.apply_theme();
        self.persist();
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ComponentRegistry;
    use crate::store::{MemoryStore, StoreError};
    use crate::sync::SyncError;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn patch(value: Value) -> ConfigMap {
        value.as_object().unwrap().clone()
    }

    /// Store that cannot be read at all
    struct BrokenStore;

    impl ConfigStore for BrokenStore {
        fn read(&self) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }

        fn write(&mut self, _blob: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    /// Store whose writes always fail
    struct ReadOnlyStore(Option<String>);

    impl ConfigStore for ReadOnlyStore {
        fn read(&self) -> Result<Option<String>, StoreError> {
            Ok(self.0.clone())
        }

        fn write(&mut self, _blob: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[derive(Clone, Default)]
    struct CountingSync {
        pulls: Rc<Cell<usize>>,
        pushes: Rc<Cell<usize>>,
        remote: Option<ConfigDocument>,
    }

    impl SyncProvider for CountingSync {
        fn pull(&mut self) -> Result<Option<ConfigDocument>, SyncError> {
            self.pulls.set(self.pulls.get() + 1);
            Ok(self.remote.clone())
        }

        fn push(&mut self, _document: &ConfigDocument) -> Result<(), SyncError> {
            self.pushes.set(self.pushes.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_init_without_saved_config_uses_default() {
        let mut manager = ConfigManager::new(MemoryStore::new());
        let mut ready = 0;
        manager.init(|doc| {
            ready += 1;
            assert_eq!(doc, &default_document());
        });
        assert_eq!(ready, 1);
        assert_eq!(manager.applied_theme(), Some("light"));
        assert_eq!(manager.store().writes(), 0);
    }

    #[test]
    fn test_init_with_corrupt_blob_falls_back() {
        let mut manager = ConfigManager::new(MemoryStore::with_blob("{broken"));
        let mut ready = false;
        manager.init(|_| ready = true);
        assert!(ready);
        assert_eq!(manager.document(), &default_document());
    }

    #[test]
    fn test_init_loads_saved_document() {
        let saved = r#"{"settings":{"theme":"dark"},"layout":{"type":"stack"}}"#;
        let mut manager = ConfigManager::new(MemoryStore::with_blob(saved));
        manager.init(|_| {});
        assert_eq!(manager.applied_theme(), Some("dark"));
        assert_eq!(manager.document().layout.components().len(), 0);
    }

    #[test]
    fn test_non_local_provider_defers_ready_until_pull() {
        let saved = r#"{"settings":{"theme":"light","syncProvider":"google-drive"},"layout":{"type":"stack"}}"#;
        let mut remote = default_document();
        remote.settings.merge(&patch(json!({"theme": "dark", "syncProvider": "google-drive"})));
        let sync = CountingSync {
            remote: Some(remote),
            ..CountingSync::default()
        };
        let pulls = sync.pulls.clone();
        let pushes = sync.pushes.clone();

        let mut manager = ConfigManager::new(MemoryStore::with_blob(saved)).with_sync(sync);
        let mut seen_theme = None;
        manager.init(|doc| seen_theme = doc.settings.theme().map(String::from));

        assert_eq!(pulls.get(), 1);
        assert_eq!(seen_theme.as_deref(), Some("dark"));
        assert_eq!(manager.applied_theme(), Some("dark"));

        manager.save_config().unwrap();
        assert_eq!(pushes.get(), 1);
    }

    #[test]
    fn test_local_provider_never_touches_sync() {
        let sync = CountingSync::default();
        let pulls = sync.pulls.clone();
        let pushes = sync.pushes.clone();
        let mut manager = ConfigManager::new(MemoryStore::new()).with_sync(sync);
        manager.init(|_| {});
        manager.save_config().unwrap();
        assert_eq!((pulls.get(), pushes.get()), (0, 0));
    }

    #[test]
    fn test_update_component_config_merges_and_saves() {
        let mut manager = ConfigManager::new(MemoryStore::new());
        manager.init(|_| {});
        let mut builder = LayoutBuilder::new(ComponentRegistry::new());

        let updated = manager.update_component_config(
            &mut builder,
            "news-1",
            &patch(json!({"maxItems": 2, "sources": ["a"]})),
        );
        assert!(updated);

        let node = manager.document().layout.find_component("news-1").unwrap();
        let config = node.component_config.as_ref().unwrap();
        assert_eq!(config["maxItems"], json!(2));
        assert_eq!(config["sources"], json!(["a"]));
        assert_eq!(config["showImages"], json!(true));
        assert_eq!(manager.store().writes(), 1);
    }

    #[test]
    fn test_update_unknown_component_is_noop() {
        let mut manager = ConfigManager::new(MemoryStore::new());
        manager.init(|_| {});
        let mut builder = LayoutBuilder::new(ComponentRegistry::new());

        assert!(!manager.update_component_config(&mut builder, "nope", &patch(json!({"a": 1}))));
        assert_eq!(manager.document(), &default_document());
        assert_eq!(manager.store().writes(), 0);
    }

    #[test]
    fn test_update_settings_shallow_merge() {
        let mut manager = ConfigManager::new(MemoryStore::new());
        manager.init(|_| {});

        manager.update_settings(&patch(json!({"density": "compact"})));
        assert_eq!(manager.applied_theme(), Some("light"));
        assert_eq!(manager.document().settings.get("density"), Some(&json!("compact")));
        assert_eq!(manager.document().settings.theme(), Some("light"));

        manager.update_settings(&patch(json!({"theme": "dark"})));
        assert_eq!(manager.applied_theme(), Some("dark"));
        assert_eq!(manager.store().writes(), 2);
    }

    #[test]
    fn test_toggle_theme_cycles() {
        let mut manager = ConfigManager::new(MemoryStore::new());
        manager.init(|_| {});
        assert_eq!(manager.toggle_theme(), "dark");
        assert_eq!(manager.toggle_theme(), "light");

        manager.update_settings(&patch(json!({"theme": "solarized"})));
        assert_eq!(manager.toggle_theme(), "light");
        assert_eq!(manager.applied_theme(), Some("light"));
    }

    #[test]
    fn test_import_rejects_and_keeps_document() {
        let mut manager = ConfigManager::new(MemoryStore::new());
        manager.init(|_| {});
        let before = manager.export_config().unwrap();

        assert!(manager.import_config("not json").is_err());
        assert!(manager.import_config(r#"{"settings": {}}"#).is_err());
        assert!(manager.import_config(r#"{"layout": {"type": "dock"}}"#).is_err());

        assert_eq!(manager.export_config().unwrap(), before);
        assert_eq!(manager.store().writes(), 0);
    }

    #[test]
    fn test_import_replaces_applies_theme_and_persists() {
        let mut manager = ConfigManager::new(MemoryStore::new());
        manager.init(|_| {});

        let text = r#"{"settings":{"theme":"dark","syncProvider":"local"},"layout":{"type":"stack","children":[]}}"#;
        manager.import_config(text).unwrap();

        assert_eq!(manager.applied_theme(), Some("dark"));
        let stored: Value = serde_json::from_str(manager.store().blob().unwrap()).unwrap();
        assert_eq!(stored, serde_json::from_str::<Value>(text).unwrap());
    }

    #[test]
    fn test_reset_to_defaults() {
        let saved = r#"{"settings":{"theme":"dark"},"layout":{"type":"stack"}}"#;
        let mut manager = ConfigManager::new(MemoryStore::with_blob(saved));
        manager.init(|_| {});

        let doc = manager.reset_to_defaults().clone();
        assert_eq!(doc, default_document());
        assert_eq!(manager.applied_theme(), Some("light"));
        assert_eq!(manager.store().writes(), 1);
    }

    #[test]
    fn test_save_failure_is_reported_and_state_kept() {
        let saved = r#"{"settings":{"theme":"dark"},"layout":{"type":"stack"}}"#;
        let mut manager = ConfigManager::new(ReadOnlyStore(Some(saved.into())));
        manager.init(|_| {});

        assert!(matches!(manager.save_config(), Err(ConfigError::Store(_))));
        manager.update_settings(&patch(json!({"theme": "light"})));
        assert_eq!(manager.applied_theme(), Some("light"));
        assert_eq!(manager.store().read().unwrap().as_deref(), Some(saved));
    }

    #[test]
    fn test_init_with_unreadable_store_falls_back() {
        let mut manager = ConfigManager::new(BrokenStore);
        let mut seen = None;
        manager.init(|doc| seen = Some(doc.clone()));
        assert_eq!(seen, Some(default_document()));
        assert_eq!(manager.applied_theme(), Some("light"));
    }

    #[test]
    fn test_failed_write_skips_cloud_push() {
        let saved = r#"{"settings":{"theme":"light","syncProvider":"google-drive"},"layout":{"type":"stack"}}"#;
        let sync = CountingSync::default();
        let pushes = sync.pushes.clone();
        let mut manager = ConfigManager::new(ReadOnlyStore(Some(saved.into()))).with_sync(sync);
        manager.init(|_| {});

        assert!(manager.save_config().is_err());
        manager.update_settings(&patch(json!({"theme": "dark"})));
        assert_eq!(pushes.get(), 0);
    }

    #[test]
    fn test_unsaved_changes_track_last_save() {
        let mut manager = ConfigManager::new(ReadOnlyStore(None));
        manager.init(|_| {});
        assert!(!manager.has_unsaved_changes());

        let text = r#"{"settings":{"theme":"dark"},"layout":{"type":"stack"}}"#;
        assert!(manager.import_config(text).is_ok());
        assert!(manager.has_unsaved_changes());
        assert_eq!(manager.applied_theme(), Some("dark"));

        let mut saved = ConfigManager::new(MemoryStore::new());
        saved.init(|_| {});
        saved.reset_to_defaults();
        assert!(!saved.has_unsaved_changes());
    }
}
