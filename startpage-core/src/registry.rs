// startpage-core/src/registry.rs
use crate::diagnostic::Diagnostic;
use crate::layout::ConfigMap;
use crate::widget::Widget;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// Builds a widget instance from its configuration and instance id
pub type WidgetFactory = Arc<dyn Fn(ConfigMap, &str) -> Box<dyn Widget> + Send + Sync>;

/// Name to factory mapping, shared by every layout builder that clones it.
///
/// Registration takes the write lock for the whole insert, so registrations
/// from several initialisation paths never tear the table.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    factories: Arc<RwLock<HashMap<String, WidgetFactory>>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `factory` to `type_name`. Re-registering overwrites the previous
    /// factory and returns a warning diagnostic.
    pub fn register<F>(&self, type_name: &str, factory: F) -> Option<Diagnostic>
    where
        F: Fn(ConfigMap, &str) -> Box<dyn Widget> + Send + Sync + 'static,
    {
        let previous = self
            .factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_name.to_string(), Arc::new(factory));

        previous.map(|_| {
            let diagnostic = Diagnostic::DuplicateRegistration(type_name.to_string());
            diagnostic.log();
            diagnostic
        })
    }

    /// Create a new instance, or `None` if no factory is bound to `type_name`
    pub fn create_component(
        &self,
        type_name: &str,
        config: ConfigMap,
        instance_id: &str,
    ) -> Option<Box<dyn Widget>> {
        // Clone the factory out so it runs without holding the lock
        let factory = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned();

        match factory {
            Some(factory) => Some(factory(config, instance_id)),
            None => {
                tracing::error!("Component type '{}' is not registered", type_name);
                None
            }
        }
    }

    pub fn available_types(&self) -> HashSet<String> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(type_name)
    }
}

#[macro_export]
macro_rules! register_widget {
    ($registry:expr, $name:expr, $widget_type:ty) => {
        $registry.register($name, |config, instance_id| {
            Box::new(<$widget_type>::new(config, instance_id))
        })
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::BaseWidget;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_create_registered_component() {
        let registry = ComponentRegistry::new();
        register_widget!(registry, "base", BaseWidget);

        let config = json!({"a": 1}).as_object().unwrap().clone();
        let widget = registry.create_component("base", config, "b1").unwrap();
        assert_eq!(widget.instance_id(), "b1");
        assert_eq!(widget.config()["a"], json!(1));
    }

    #[test]
    fn test_unregistered_type_returns_none() {
        let registry = ComponentRegistry::new();
        assert!(
            registry
                .create_component("weather", ConfigMap::new(), "w1")
                .is_none()
        );
    }

    #[test]
    fn test_reregistration_last_wins_and_keeps_others() {
        let registry = ComponentRegistry::new();
        assert!(register_widget!(registry, "a", BaseWidget).is_none());
        assert!(register_widget!(registry, "b", BaseWidget).is_none());

        let warning = registry.register("a", |config, id| {
            let mut config = config;
            config.insert("second".into(), json!(true));
            Box::new(BaseWidget::new(config, id))
        });
        assert_eq!(warning, Some(Diagnostic::DuplicateRegistration("a".into())));

        let widget = registry.create_component("a", ConfigMap::new(), "x").unwrap();
        assert_eq!(widget.config()["second"], json!(true));
        assert!(registry.contains("b"));
        assert_eq!(
            registry.available_types(),
            HashSet::from(["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = ComponentRegistry::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for j in 0..50 {
                        registry.register(&format!("w{}", (i * 50 + j) % 100), |config, id| {
                            Box::new(BaseWidget::new(config, id))
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.available_types().len(), 100);
    }
}
