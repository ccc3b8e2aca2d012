// startpage-core/src/layout.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque key/value mapping used for component configuration and settings
pub type ConfigMap = serde_json::Map<String, Value>;

/// Shallow merge: top-level keys of `patch` overwrite those in `target`.
/// Nested objects are replaced wholesale, never merged.
pub fn shallow_merge(target: &mut ConfigMap, patch: &ConfigMap) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

/// One position in the layout tree.
///
/// Anything that does not parse as a [`LayoutNode`] is kept verbatim as
/// `Malformed`, so a bad node neither aborts loading the document nor gets
/// lost when the document is written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Layout(LayoutNode),
    Malformed(Value),
}

/// Layout configuration, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutNode {
    Grid(GridPanel),
    Stack(StackPanel),
    Dock(DockPanel),
    Component(ComponentNode),
}

/// Placement hints a node carries for the container it is declared in.
///
/// Hints are kept as raw values: a hint of an unexpected type is ignored
/// when building, but it never makes the node itself invalid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_row: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_column: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dock_position: Option<Value>,
}

/// Text of a grid line hint; numbers such as `2` count as `"2"`
fn line_hint(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Placement {
    pub fn row_hint(&self) -> Option<String> {
        line_hint(self.grid_row.as_ref())
    }

    pub fn column_hint(&self) -> Option<String> {
        line_hint(self.grid_column.as_ref())
    }

    /// Dock region named by `dockPosition`; `None` when absent or unrecognised
    pub fn dock_region(&self) -> Option<DockRegion> {
        self.dock_position
            .as_ref()
            .and_then(Value::as_str)
            .and_then(DockRegion::parse)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPanel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(flatten)]
    pub extra: ConfigMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackPanel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(flatten)]
    pub extra: ConfigMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockPanel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(flatten)]
    pub extra: ConfigMap,
}

/// Widget leaf: which factory to use and the configuration handed to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    pub component_type: String,
    pub instance_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_config: Option<ConfigMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(flatten)]
    pub extra: ConfigMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

/// Dock regions, in the fixed order they are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockRegion {
    Top,
    Right,
    Bottom,
    Left,
    Center,
}

impl DockRegion {
    pub const ALL: [DockRegion; 5] = [
        DockRegion::Top,
        DockRegion::Right,
        DockRegion::Bottom,
        DockRegion::Left,
        DockRegion::Center,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DockRegion::Top => "top",
            DockRegion::Right => "right",
            DockRegion::Bottom => "bottom",
            DockRegion::Left => "left",
            DockRegion::Center => "center",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

impl StackPanel {
    /// Anything other than `horizontal` stacks vertically
    pub fn orientation(&self) -> Orientation {
        match self.orientation.as_ref().and_then(Value::as_str) {
            Some("horizontal") => Orientation::Horizontal,
            _ => Orientation::Vertical,
        }
    }
}

impl ComponentNode {
    pub fn new(component_type: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            instance_id: instance_id.into(),
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: ConfigMap) -> Self {
        self.component_config = Some(config);
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Shallow-merge `patch` into this node's `componentConfig`, creating it if absent
    pub fn merge_config(&mut self, patch: &ConfigMap) {
        let config = self.component_config.get_or_insert_with(ConfigMap::new);
        shallow_merge(config, patch);
    }
}

impl LayoutNode {
    pub fn placement(&self) -> &Placement {
        match self {
            LayoutNode::Grid(n) => &n.placement,
            LayoutNode::Stack(n) => &n.placement,
            LayoutNode::Dock(n) => &n.placement,
            LayoutNode::Component(n) => &n.placement,
        }
    }

    pub fn placement_mut(&mut self) -> &mut Placement {
        match self {
            LayoutNode::Grid(n) => &mut n.placement,
            LayoutNode::Stack(n) => &mut n.placement,
            LayoutNode::Dock(n) => &mut n.placement,
            LayoutNode::Component(n) => &mut n.placement,
        }
    }

    /// Declared children; components have none
    pub fn children(&self) -> &[Node] {
        let children = match self {
            LayoutNode::Grid(n) => &n.children,
            LayoutNode::Stack(n) => &n.children,
            LayoutNode::Dock(n) => &n.children,
            LayoutNode::Component(_) => return &[],
        };
        children.as_deref().unwrap_or(&[])
    }

    fn children_mut(&mut self) -> &mut [Node] {
        let children = match self {
            LayoutNode::Grid(n) => &mut n.children,
            LayoutNode::Stack(n) => &mut n.children,
            LayoutNode::Dock(n) => &mut n.children,
            LayoutNode::Component(_) => return &mut [],
        };
        children.as_deref_mut().unwrap_or(&mut [])
    }

    /// Set the dock region this node is declared for
    pub fn docked(mut self, region: DockRegion) -> Self {
        self.placement_mut().dock_position = Some(Value::from(region.as_str()));
        self
    }

    /// Set grid placement hints
    pub fn placed(mut self, row: Option<&str>, column: Option<&str>) -> Self {
        let placement = self.placement_mut();
        placement.grid_row = row.map(Value::from);
        placement.grid_column = column.map(Value::from);
        self
    }
}

impl From<ComponentNode> for LayoutNode {
    fn from(node: ComponentNode) -> Self {
        LayoutNode::Component(node)
    }
}

impl From<LayoutNode> for Node {
    fn from(node: LayoutNode) -> Self {
        Node::Layout(node)
    }
}

impl Node {
    pub fn as_layout(&self) -> Option<&LayoutNode> {
        match self {
            Node::Layout(node) => Some(node),
            Node::Malformed(_) => None,
        }
    }

    /// The dock region this node was declared for, well-formed or not
    pub fn dock_region(&self) -> Option<DockRegion> {
        match self {
            Node::Layout(node) => node.placement().dock_region(),
            Node::Malformed(value) => value
                .get("dockPosition")
                .and_then(Value::as_str)
                .and_then(DockRegion::parse),
        }
    }

    /// Depth-first, document-order search for a component; first match wins
    pub fn find_component(&self, instance_id: &str) -> Option<&ComponentNode> {
        match self {
            Node::Layout(LayoutNode::Component(node)) if node.instance_id == instance_id => {
                Some(node)
            }
            Node::Layout(node) => node
                .children()
                .iter()
                .find_map(|child| child.find_component(instance_id)),
            Node::Malformed(_) => None,
        }
    }

    /// Mutable counterpart of [`Node::find_component`]
    pub fn find_component_mut(&mut self, instance_id: &str) -> Option<&mut ComponentNode> {
        match self {
            Node::Layout(LayoutNode::Component(node)) => {
                (node.instance_id == instance_id).then_some(node)
            }
            Node::Layout(node) => node
                .children_mut()
                .iter_mut()
                .find_map(|child| child.find_component_mut(instance_id)),
            Node::Malformed(_) => None,
        }
    }

    /// Flatten the tree to its component leaves, in document order
    pub fn components(&self) -> Vec<&ComponentNode> {
        let mut result = Vec::new();
        collect_components(self, &mut result);
        result
    }
}

fn collect_components<'a>(node: &'a Node, result: &mut Vec<&'a ComponentNode>) {
    match node {
        Node::Layout(LayoutNode::Component(component)) => result.push(component),
        Node::Layout(layout) => {
            for child in layout.children() {
                collect_components(child, result);
            }
        }
        Node::Malformed(_) => {}
    }
}
