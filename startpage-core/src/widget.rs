// startpage-core/src/widget.rs
use crate::element::{ElementId, ElementTree};
use crate::layout::{ConfigMap, shallow_merge};

/// State every widget instance owns: its id, its own copy of the
/// configuration and the container it was mounted into
#[derive(Debug, Clone)]
pub struct WidgetBase {
    instance_id: String,
    config: ConfigMap,
    container: Option<ElementId>,
}

impl WidgetBase {
    pub fn new(config: ConfigMap, instance_id: &str) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            config,
            container: None,
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    pub fn container(&self) -> Option<ElementId> {
        self.container
    }

    pub fn bind(&mut self, container: ElementId) {
        self.container = Some(container);
    }

    pub fn merge(&mut self, patch: &ConfigMap) {
        shallow_merge(&mut self.config, patch);
    }

    /// Empty the mounted container and hand it back for a fresh render.
    /// `None` when the widget was never initialised or its container is gone.
    pub fn clear_container(&self, tree: &mut ElementTree) -> Option<ElementId> {
        let container = self.container.filter(|c| tree.contains(*c))?;
        tree.clear_children(container);
        Some(container)
    }
}

/// Core widget trait with lifecycle hooks.
///
/// Implementors embed a [`WidgetBase`] and usually override only `render`.
/// `render` must build the container's content purely from the current
/// config; it is called again after every update.
pub trait Widget {
    fn base(&self) -> &WidgetBase;

    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Bind the mount point; no rendering happens yet
    fn init(&mut self, container: ElementId) {
        self.base_mut().bind(container);
    }

    /// Produce visible content. The default marks the widget as unimplemented.
    fn render(&mut self, tree: &mut ElementTree) {
        let base = self.base();
        tracing::warn!(
            instance_id = base.instance_id(),
            "render() not implemented for this component"
        );
        if let Some(container) = base.clear_container(tree) {
            tree.create_text(
                container,
                "div",
                "widget-not-implemented",
                format!("render() not implemented for '{}'", base.instance_id()),
            );
        }
    }

    /// Shallow-merge `patch` over the current config, then re-render
    fn update(&mut self, patch: &ConfigMap, tree: &mut ElementTree) {
        self.base_mut().merge(patch);
        self.render(tree);
    }

    /// Release whatever the instance acquired
    fn destroy(&mut self, _tree: &mut ElementTree) {}

    fn instance_id(&self) -> &str {
        self.base().instance_id()
    }

    fn config(&self) -> &ConfigMap {
        self.base().config()
    }
}

/// Widget with nothing but the default behaviour
#[derive(Debug, Clone)]
pub struct BaseWidget {
    base: WidgetBase,
}

impl BaseWidget {
    pub fn new(config: ConfigMap, instance_id: &str) -> Self {
        Self {
            base: WidgetBase::new(config, instance_id),
        }
    }
}

impl Widget for BaseWidget {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }
}

/// Container for managing widget lifecycle inside a mounted layout
pub struct MountedWidget {
    widget: Box<dyn Widget>,
    component_type: String,
    mounted: bool,
}

impl MountedWidget {
    pub fn new(component_type: &str, widget: Box<dyn Widget>) -> Self {
        Self {
            widget,
            component_type: component_type.to_string(),
            mounted: false,
        }
    }

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// `init` followed by the first `render`
    pub fn mount(&mut self, container: ElementId, tree: &mut ElementTree) {
        if !self.mounted {
            self.widget.init(container);
            self.mounted = true;
            self.widget.render(tree);
        }
    }

    pub fn update(&mut self, patch: &ConfigMap, tree: &mut ElementTree) {
        self.widget.update(patch, tree);
    }

    pub fn unmount(&mut self, tree: &mut ElementTree) {
        if self.mounted {
            self.widget.destroy(tree);
            self.mounted = false;
        }
    }
}
