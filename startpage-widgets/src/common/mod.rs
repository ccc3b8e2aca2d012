pub mod config;

pub use config::*;

#[cfg(test)]
pub(crate) mod testing {
    use startpage_core::{ElementSnapshot, ElementTree, Widget};

    /// Mount `widget` into a fresh tree, render once and snapshot its container
    pub fn render_once(widget: &mut dyn Widget) -> (ElementTree, ElementSnapshot) {
        let mut tree = ElementTree::new();
        let container = tree.create_child(tree.root(), "div", "component-container");
        widget.init(container);
        widget.render(&mut tree);
        let snap = tree.snapshot(container).unwrap();
        (tree, snap)
    }
}
