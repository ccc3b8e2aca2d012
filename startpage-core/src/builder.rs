// startpage-core/src/builder.rs
use crate::diagnostic::Diagnostic;
use crate::element::{ElementId, ElementTree};
use crate::layout::{
    ComponentNode, ConfigMap, DockPanel, DockRegion, GridPanel, LayoutNode, Node, StackPanel,
};
use crate::registry::ComponentRegistry;
use crate::widget::{MountedWidget, Widget};
use serde_json::Value;
use std::collections::HashMap;

/// Outcome of a full layout build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Everything reported while interpreting the tree, in encounter order
    pub diagnostics: Vec<Diagnostic>,
    /// The element appended under the root, if the root node was valid
    pub element: Option<ElementId>,
    /// Live instances after the build
    pub instances: usize,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Interprets layout configuration into the visual tree and owns the
/// live-instance table of the currently mounted layout
pub struct LayoutBuilder {
    registry: ComponentRegistry,
    tree: ElementTree,
    instances: HashMap<String, MountedWidget>,
}

impl LayoutBuilder {
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            tree: ElementTree::new(),
            instances: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn root(&self) -> ElementId {
        self.tree.root()
    }

    pub fn instance(&self, instance_id: &str) -> Option<&dyn Widget> {
        self.instances.get(instance_id).map(MountedWidget::widget)
    }

    pub fn instance_ids(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Replace the whole mounted tree with one built from `layout`
    pub fn build_layout(&mut self, layout: &Node) -> BuildReport {
        self.clear();

        let mut diagnostics = Vec::new();
        let element = self.create_layout_element(layout, &mut diagnostics);
        if let Some(element) = element {
            let root = self.tree.root();
            self.tree.append(root, element);
        }

        tracing::debug!(
            instances = self.instances.len(),
            diagnostics = diagnostics.len(),
            "Layout built"
        );

        BuildReport {
            diagnostics,
            element,
            instances: self.instances.len(),
        }
    }

    /// Merge `patch` into a live instance and re-render it. Unknown ids are ignored.
    pub fn update_component(&mut self, instance_id: &str, patch: &ConfigMap) -> bool {
        match self.instances.get_mut(instance_id) {
            Some(mounted) => {
                mounted.update(patch, &mut self.tree);
                true
            }
            None => false,
        }
    }

    /// Destroy one live instance and empty its container
    pub fn evict(&mut self, instance_id: &str) -> bool {
        let Some(mut mounted) = self.instances.remove(instance_id) else {
            return false;
        };
        let container = mounted.widget().base().container();
        mounted.unmount(&mut self.tree);
        if let Some(container) = container {
            self.tree.clear_children(container);
        }
        true
    }

    /// Destroy every live instance and empty the mount point
    pub fn clear(&mut self) {
        for (_, mut mounted) in self.instances.drain() {
            mounted.unmount(&mut self.tree);
        }
        let root = self.tree.root();
        self.tree.clear_children(root);
    }

    fn create_layout_element(
        &mut self,
        node: &Node,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<ElementId> {
        let node = match node {
            Node::Layout(node) => node,
            Node::Malformed(value) => {
                report(diagnostics, classify_malformed(value));
                return None;
            }
        };

        match node {
            LayoutNode::Grid(grid) => Some(self.create_grid_panel(grid, diagnostics)),
            LayoutNode::Stack(stack) => Some(self.create_stack_panel(stack, diagnostics)),
            LayoutNode::Dock(dock) => Some(self.create_dock_panel(dock, diagnostics)),
            LayoutNode::Component(component) => {
                self.create_component_element(component, diagnostics)
            }
        }
    }

    fn create_grid_panel(
        &mut self,
        grid: &GridPanel,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ElementId {
        let element = self.structural("grid-panel", grid.class_name.as_deref());
        if let Some(panel) = self.tree.get_mut(element) {
            if let Some(rows) = &grid.rows {
                panel.set_style("grid-template-rows", rows.join(" "));
            }
            if let Some(columns) = &grid.columns {
                panel.set_style("grid-template-columns", columns.join(" "));
            }
            if let Some(gap) = &grid.gap {
                panel.set_style("gap", gap.as_str());
            }
        }

        for child in grid.children.as_deref().unwrap_or_default() {
            let Some(child_element) = self.create_layout_element(child, diagnostics) else {
                continue;
            };
            // Placement comes from the child's own declaration
            if let Some(placement) = child.as_layout().map(LayoutNode::placement)
                && let Some(produced) = self.tree.get_mut(child_element)
            {
                if let Some(row) = placement.row_hint() {
                    produced.set_style("grid-row", row);
                }
                if let Some(column) = placement.column_hint() {
                    produced.set_style("grid-column", column);
                }
            }
            self.tree.append(element, child_element);
        }

        element
    }

    fn create_stack_panel(
        &mut self,
        stack: &StackPanel,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ElementId {
        let element = self.tree.create("div");
        if let Some(panel) = self.tree.get_mut(element) {
            panel.add_class("stack-panel");
            panel.add_class(stack.orientation().as_str());
            if let Some(class_name) = &stack.class_name {
                panel.add_class(class_name);
            }
        }

        for child in stack.children.as_deref().unwrap_or_default() {
            if let Some(child_element) = self.create_layout_element(child, diagnostics) {
                self.tree.append(element, child_element);
            }
        }

        element
    }

    fn create_dock_panel(
        &mut self,
        dock: &DockPanel,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ElementId {
        let element = self.structural("dock-panel", dock.class_name.as_deref());
        let children = dock.children.as_deref().unwrap_or_default();

        // Every region exists even when nothing targets it
        for region in DockRegion::ALL {
            let region_element =
                self.tree
                    .create_child(element, "div", &format!("dock-{}", region.as_str()));

            for child in children {
                if child.dock_region() != Some(region) {
                    continue;
                }
                if let Some(child_element) = self.create_layout_element(child, diagnostics) {
                    self.tree.append(region_element, child_element);
                }
            }
        }

        element
    }

    fn create_component_element(
        &mut self,
        component: &ComponentNode,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<ElementId> {
        if component.component_type.is_empty() {
            report(
                diagnostics,
                Diagnostic::MissingComponentField {
                    field: "componentType",
                },
            );
            return None;
        }
        if component.instance_id.is_empty() {
            report(
                diagnostics,
                Diagnostic::MissingComponentField { field: "instanceId" },
            );
            return None;
        }

        let container = self.structural("component-container", component.class_name.as_deref());
        if let Some(element) = self.tree.get_mut(container) {
            element.dom_id = Some(format!("component-{}", component.instance_id));
        }

        let widget = self.registry.create_component(
            &component.component_type,
            component.component_config.clone().unwrap_or_default(),
            &component.instance_id,
        );

        let Some(widget) = widget else {
            // Already logged by the registry; the container stays empty
            diagnostics.push(Diagnostic::RegistryMiss {
                component_type: component.component_type.clone(),
                instance_id: component.instance_id.clone(),
            });
            return Some(container);
        };

        let mut mounted = MountedWidget::new(&component.component_type, widget);
        mounted.mount(container, &mut self.tree);
        if self
            .instances
            .insert(component.instance_id.clone(), mounted)
            .is_some()
        {
            tracing::warn!(
                instance_id = component.instance_id.as_str(),
                "Duplicate instance id, previous instance replaced"
            );
        }

        Some(container)
    }

    /// Detached `div` with its structural class plus the node's own class
    fn structural(&mut self, base_class: &str, class_name: Option<&str>) -> ElementId {
        let element = self.tree.create("div");
        if let Some(el) = self.tree.get_mut(element) {
            el.add_class(base_class);
            if let Some(class_name) = class_name {
                el.add_class(class_name);
            }
        }
        element
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    diagnostic.log();
    diagnostics.push(diagnostic);
}

/// Work out why a raw node failed to parse
fn classify_malformed(value: &Value) -> Diagnostic {
    let kind = match value.get("type").and_then(Value::as_str) {
        None | Some("") => return Diagnostic::MissingNodeType,
        Some(kind) => kind,
    };

    match kind {
        "component" => {
            for field in ["componentType", "instanceId"] {
                let present = value
                    .get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|s| !s.is_empty());
                if !present {
                    return Diagnostic::MissingComponentField { field };
                }
            }
            malformed(kind, value)
        }
        "grid" | "stack" | "dock" => malformed(kind, value),
        other => Diagnostic::UnknownNodeType(other.to_string()),
    }
}

fn malformed(kind: &str, value: &Value) -> Diagnostic {
    let reason = match serde_json::from_value::<LayoutNode>(value.clone()) {
        Err(e) => e.to_string(),
        Ok(_) => "unrecognised shape".to_string(),
    };
    Diagnostic::MalformedNode {
        kind: kind.to_string(),
        reason,
    }
}
