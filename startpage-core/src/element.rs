// startpage-core/src/element.rs
use serde::Serialize;
use std::collections::BTreeMap;

/// Handle to an element inside an [`ElementTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

/// One node of the visual tree produced by the layout builder
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    pub classes: Vec<String>,
    pub dom_id: Option<String>,
    pub style: BTreeMap<String, String>,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Add a class unless it is already present
    pub fn add_class(&mut self, class: &str) {
        if !class.is_empty() && !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.style.insert(property.to_string(), value.into());
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_string(), value.into());
    }
}

/// Arena-backed visual tree with a single fixed root.
///
/// Slots freed by [`ElementTree::clear_children`] are reused, so repeated
/// re-renders of the same widget do not grow the arena.
#[derive(Debug, Clone)]
pub struct ElementTree {
    slots: Vec<Option<Element>>,
    free: Vec<usize>,
    root: ElementId,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    pub fn new() -> Self {
        let mut root = Element::new("div");
        root.add_class("page-root");
        Self {
            slots: vec![Some(root)],
            free: Vec::new(),
            root: ElementId(0),
        }
    }

    /// The mount point every produced element descends from
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Create a detached element
    pub fn create(&mut self, tag: &str) -> ElementId {
        let element = Element::new(tag);
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(element);
                ElementId(slot)
            }
            None => {
                self.slots.push(Some(element));
                ElementId(self.slots.len() - 1)
            }
        }
    }

    /// Create an element with a class and append it under `parent`
    pub fn create_child(&mut self, parent: ElementId, tag: &str, class: &str) -> ElementId {
        let id = self.create(tag);
        if let Some(element) = self.get_mut(id) {
            element.add_class(class);
        }
        self.append(parent, id);
        id
    }

    /// Create a child element holding only text
    pub fn create_text(
        &mut self,
        parent: ElementId,
        tag: &str,
        class: &str,
        text: impl Into<String>,
    ) -> ElementId {
        let id = self.create_child(parent, tag, class);
        if let Some(element) = self.get_mut(id) {
            element.text = Some(text.into());
        }
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first. Returns false if either handle is stale.
    pub fn append(&mut self, parent: ElementId, child: ElementId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }

        if let Some(old_parent) = self.get(child).and_then(Element::parent)
            && let Some(element) = self.get_mut(old_parent)
        {
            element.children.retain(|c| *c != child);
        }

        if let Some(element) = self.get_mut(child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.get_mut(parent) {
            element.children.push(child);
        }
        true
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(Element::children).unwrap_or(&[])
    }

    /// Remove and free every descendant of `id`
    pub fn clear_children(&mut self, id: ElementId) {
        let children = match self.get_mut(id) {
            Some(element) => std::mem::take(&mut element.children),
            None => return,
        };
        for child in children {
            self.release(child);
        }
    }

    fn release(&mut self, id: ElementId) {
        let Some(element) = self.slots.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        self.free.push(id.0);
        for child in element.children {
            self.release(child);
        }
    }

    /// Number of live elements, root included
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Depth-first search for the element carrying the given `id` attribute
    pub fn find_by_id(&self, dom_id: &str) -> Option<ElementId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let element = self.get(id)?;
            if element.dom_id.as_deref() == Some(dom_id) {
                return Some(id);
            }
            stack.extend(element.children.iter().rev().copied());
        }
        None
    }

    /// Concatenated text of an element and its descendants, in document order
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: ElementId, out: &mut String) {
        if let Some(element) = self.get(id) {
            if let Some(text) = &element.text {
                out.push_str(text);
            }
            for child in &element.children {
                self.collect_text(*child, out);
            }
        }
    }

    /// Owned copy of the subtree rooted at `id`
    pub fn snapshot(&self, id: ElementId) -> Option<ElementSnapshot> {
        let element = self.get(id)?;
        Some(ElementSnapshot {
            tag: element.tag.clone(),
            classes: element.classes.clone(),
            id: element.dom_id.clone(),
            style: element.style.clone(),
            attrs: element.attrs.clone(),
            text: element.text.clone(),
            children: element
                .children
                .iter()
                .filter_map(|child| self.snapshot(*child))
                .collect(),
        })
    }
}

/// Detached, serialisable view of part of an [`ElementTree`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSnapshot>,
}

impl ElementSnapshot {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// First descendant (or self) carrying `class`, depth-first
    pub fn find_class(&self, class: &str) -> Option<&ElementSnapshot> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_class(class))
    }

    /// Every descendant (or self) carrying `class`, in document order
    pub fn find_all_class<'a>(&'a self, class: &str) -> Vec<&'a ElementSnapshot> {
        let mut found = Vec::new();
        self.collect_class(class, &mut found);
        found
    }

    fn collect_class<'a>(&'a self, class: &str, found: &mut Vec<&'a ElementSnapshot>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_class(class, found);
        }
    }

    pub fn find_id(&self, id: &str) -> Option<&ElementSnapshot> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_id(id))
    }
}
