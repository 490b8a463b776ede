//! Headless document the binder works against.
//!
//! Markup is parsed with `scraper`; everything the binder changes at runtime
//! (current value, `dir`, class list, bound marker) lives in a per-element
//! overlay keyed by node id, so the parsed tree itself only ever grows or
//! loses subtrees.

use std::collections::HashMap;

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{ElementRef, Html, Node, Selector};
use smartbidi_text::TextDir;

#[derive(Debug, Clone, Default)]
struct ElementState {
    value: Option<String>,
    dir: Option<String>,
    classes: Vec<String>,
    bound: bool,
}

pub struct Document {
    html: Html,
    state: HashMap<NodeId, ElementState>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.html.tree.root().descendants().count())
            .field("touched", &self.state.len())
            .finish()
    }
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            state: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.html.tree.root().id()
    }

    pub fn body(&self) -> Option<NodeId> {
        let selector = Selector::parse("body").ok()?;
        self.html.select(&selector).next().map(|body| body.id())
    }

    fn node(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(id)
    }

    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.node(id).and_then(ElementRef::wrap)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Whether `id` is still reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let root = self.root();
        match self.node(id) {
            Some(node) => node.id() == root || node.ancestors().any(|a| a.id() == root),
            None => false,
        }
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        match self.node(id) {
            Some(node) => node.id() == ancestor || node.ancestors().any(|a| a.id() == ancestor),
            None => false,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.value().name())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.value().attr(name))
    }

    /// Elements matching `selector` at or below `root`, in document order.
    pub fn select(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let Some(node) = self.node(root) else {
            return Vec::new();
        };
        node.descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| selector.matches(el))
            .map(|el| el.id())
            .collect()
    }

    pub fn text_content(&self, id: NodeId) -> String {
        self.element(id)
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    pub fn is_content_editable(&self, id: NodeId) -> bool {
        self.attr(id, "contenteditable") == Some("true")
    }

    /// Current text of an editable: text content for contenteditable
    /// elements and textareas, the `value` otherwise.
    pub fn text_value(&self, id: NodeId) -> Option<String> {
        let el = self.element(id)?;
        if let Some(value) = self.state.get(&id).and_then(|s| s.value.clone()) {
            return Some(value);
        }
        if self.is_content_editable(id) || el.value().name() == "textarea" {
            return Some(self.text_content(id));
        }
        Some(el.value().attr("value").unwrap_or_default().to_string())
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> bool {
        match self.state_mut(id) {
            Some(state) => {
                state.value = Some(value.into());
                true
            }
            None => false,
        }
    }

    /// Current `dir` attribute value.
    pub fn dir(&self, id: NodeId) -> Option<&str> {
        match self.state.get(&id) {
            Some(state) => state.dir.as_deref(),
            None => self.attr(id, "dir"),
        }
    }

    pub fn set_dir(&mut self, id: NodeId, dir: TextDir) -> bool {
        match self.state_mut(id) {
            Some(state) => {
                state.dir = Some(dir.as_str().to_string());
                true
            }
            None => false,
        }
    }

    pub fn classes(&self, id: NodeId) -> Vec<String> {
        match self.state.get(&id) {
            Some(state) => state.classes.clone(),
            None => self.element(id).map(markup_classes).unwrap_or_default(),
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(state) = self.state_mut(id) {
            if !state.classes.iter().any(|c| c == class) {
                state.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(state) = self.state_mut(id) {
            state.classes.retain(|c| c != class);
        }
    }

    pub fn is_bound(&self, id: NodeId) -> bool {
        self.state.get(&id).is_some_and(|s| s.bound)
    }

    /// Set the bound marker. Returns false if it was already set or `id` is
    /// not an element.
    pub fn mark_bound(&mut self, id: NodeId) -> bool {
        match self.state_mut(id) {
            Some(state) if !state.bound => {
                state.bound = true;
                true
            }
            _ => false,
        }
    }

    pub fn clear_bound(&mut self, id: NodeId) {
        if let Some(state) = self.state.get_mut(&id) {
            state.bound = false;
        }
    }

    /// Parse `fragment` and append its top-level nodes under `parent`.
    ///
    /// Returns the ids of the appended top-level nodes.
    pub fn insert_html(&mut self, parent: NodeId, fragment: &str) -> Vec<NodeId> {
        if self.node(parent).is_none() {
            return Vec::new();
        }
        let parsed = Html::parse_fragment(fragment);
        parsed
            .root_element()
            .children()
            .filter_map(|child| graft(&mut self.html.tree, parent, child))
            .collect()
    }

    /// Detach `id` and its subtree. Returns the detached element ids.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == self.root() {
            return Vec::new();
        }
        let removed: Vec<NodeId> = match self.node(id) {
            Some(node) if self.is_connected(id) => node
                .descendants()
                .filter(|n| n.value().is_element())
                .map(|n| n.id())
                .collect(),
            _ => return Vec::new(),
        };
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
        for node in &removed {
            self.state.remove(node);
        }
        removed
    }

    fn state_mut(&mut self, id: NodeId) -> Option<&mut ElementState> {
        let el = self.element(id)?;
        let initial = ElementState {
            value: None,
            dir: el.value().attr("dir").map(str::to_string),
            classes: markup_classes(el),
            bound: false,
        };
        Some(self.state.entry(id).or_insert(initial))
    }
}

/// Class list as written in the `class` attribute, first occurrence kept.
fn markup_classes(el: ElementRef<'_>) -> Vec<String> {
    let mut classes: Vec<String> = Vec::new();
    for class in el.value().attr("class").unwrap_or_default().split_ascii_whitespace() {
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }
    classes
}

fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) -> Option<NodeId> {
    let id = tree.get_mut(parent)?.append(source.value().clone()).id();
    for child in source.children() {
        graft(tree, id, child);
    }
    Some(id)
}
