//! The document handle the probe runs against.
//!
//! A Page owns the parsed tree, the listeners inferred from its markup,
//! and the hiding rules from its embedded styles. Lookups return owned
//! snapshots, never live references: every step of a probe re-resolves
//! its elements against the current tree.

use crate::behavior::{self, Action, Anchor, Behavior, EventContext, EventKind};
use crate::dom::{self, DomNode, NodeType};
use crate::query;
use crate::style::Stylesheet;
use serde::Serialize;

#[derive(Debug)]
pub struct Page {
    root: DomNode,
    behaviors: Vec<Behavior>,
    styles: Stylesheet,
}

/// An owned view of a single element, valid at lookup time only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    pub checked: bool,
}

impl ElementSnapshot {
    fn of(node: &DomNode) -> Self {
        Self {
            tag: node.tag.clone(),
            id: node.get_attr("id").map(String::from),
            name: node.get_attr("name").map(String::from),
            input_type: if node.tag == "input" {
                node.get_attr("type").map(String::from)
            } else {
                None
            },
            classes: node.class_list().iter().map(|c| c.to_string()).collect(),
            checked: node.attributes.contains_key("checked"),
        }
    }
}

impl Page {
    /// Parse HTML, infer its listeners, and scan its embedded styles.
    pub fn from_html(html: &str) -> Self {
        let root = dom::parse_html(html);
        let behaviors = behavior::detect(&root);
        let styles = Stylesheet::from_document(&root);
        Self {
            root,
            behaviors,
            styles,
        }
    }

    pub fn root(&self) -> &DomNode {
        &self.root
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Look up an element by its id attribute.
    pub fn element_by_id(&self, id: &str) -> Option<ElementSnapshot> {
        self.root.find_by_id(id).map(ElementSnapshot::of)
    }

    /// Look up the first element matching a CSS selector.
    pub fn query_selector(&self, selector: &str) -> Option<ElementSnapshot> {
        let path = query::select_first(&self.root, selector)?;
        self.root.node_at(&path).map(ElementSnapshot::of)
    }

    /// Activate an element by id, applying any click listener inferred
    /// for it. Returns false when no such element exists; an element
    /// without a listener still "clicks" (to no visible effect), as a
    /// real one would.
    pub fn click(&mut self, id: &str) -> bool {
        let (snapshot, ctx) = match self.root.find_by_id(id) {
            Some(node) => (ElementSnapshot::of(node), event_context(node)),
            None => return false,
        };
        self.fire(&snapshot, EventKind::Click, ctx);
        true
    }

    /// Set a checkbox's checked state by selector. Returns false when the
    /// selector resolves to nothing.
    pub fn set_checked(&mut self, selector: &str, checked: bool) -> bool {
        let path = match query::select_first(&self.root, selector) {
            Some(p) => p,
            None => return false,
        };
        if let Some(node) = self.root.node_at_mut(&path) {
            if checked {
                node.attributes.insert("checked".to_string(), String::new());
            } else {
                node.attributes.remove("checked");
            }
            return true;
        }
        false
    }

    /// Dispatch a change event on the element matching the selector,
    /// applying any change listener inferred for it. Returns false when
    /// the selector resolves to nothing.
    pub fn dispatch_change(&mut self, selector: &str) -> bool {
        let (snapshot, ctx) = match query::select_first(&self.root, selector)
            .and_then(|path| self.root.node_at(&path))
        {
            Some(node) => (ElementSnapshot::of(node), event_context(node)),
            None => return false,
        };
        self.fire(&snapshot, EventKind::Change, ctx);
        true
    }

    /// Whether the element with this id is hidden (hiding class, inline
    /// display:none, or the hidden attribute). None if the element is
    /// absent.
    pub fn is_hidden(&self, id: &str) -> Option<bool> {
        self.root.find_by_id(id).map(|node| self.styles.hides(node))
    }

    /// All form controls in document order (for inspection output).
    pub fn form_controls(&self) -> Vec<ElementSnapshot> {
        let mut controls = Vec::new();
        collect_controls(&self.root, &mut controls);
        controls
    }

    fn fire(&mut self, snapshot: &ElementSnapshot, event: EventKind, ctx: EventContext) {
        let actions: Vec<Action> = self
            .behaviors
            .iter()
            .filter(|b| b.event == event && anchors_element(&b.anchor, snapshot))
            .map(|b| b.action.clone())
            .collect();
        for action in &actions {
            self.root = behavior::apply(&self.root, action, &ctx);
        }
    }
}

fn anchors_element(anchor: &Anchor, el: &ElementSnapshot) -> bool {
    match anchor {
        Anchor::Id(id) => el.id.as_deref() == Some(id.as_str()),
        Anchor::Name(name) => el.name.as_deref() == Some(name.as_str()),
    }
}

fn event_context(node: &DomNode) -> EventContext {
    let is_checkable = node.tag == "input"
        && matches!(node.get_attr("type"), Some("checkbox") | Some("radio"));
    EventContext {
        checked: is_checkable.then(|| node.attributes.contains_key("checked")),
    }
}

fn collect_controls(node: &DomNode, out: &mut Vec<ElementSnapshot>) {
    if node.node_type == NodeType::Element
        && matches!(node.tag.as_str(), "input" | "select" | "textarea")
    {
        out.push(ElementSnapshot::of(node));
    }
    for child in &node.children {
        collect_controls(child, out);
    }
}
