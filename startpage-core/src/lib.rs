pub mod builder;
pub mod config;
pub mod diagnostic;
pub mod element;
pub mod layout;
pub mod manager;
pub mod registry;
pub mod store;
pub mod sync;
pub mod widget;

pub use builder::{BuildReport, LayoutBuilder};
pub use config::{ConfigDocument, ConfigError, Settings, default_document};
pub use diagnostic::Diagnostic;
pub use element::{Element, ElementId, ElementSnapshot, ElementTree};
pub use layout::{
    ComponentNode, ConfigMap, DockPanel, DockRegion, GridPanel, LayoutNode, Node, Orientation,
    Placement, StackPanel, shallow_merge,
};
pub use manager::{ConfigManager, THEMES};
pub use registry::{ComponentRegistry, WidgetFactory};
pub use store::{ConfigStore, FileStore, MemoryStore, StoreError};
pub use sync::{StubSync, SyncError, SyncProvider};
pub use widget::{BaseWidget, MountedWidget, Widget, WidgetBase};
