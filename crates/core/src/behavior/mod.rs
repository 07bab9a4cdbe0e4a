//! Pattern-based listener inference.
//!
//! Instead of running a JS engine, we detect common handler patterns
//! (inline onclick/onchange snippets, declarative toggle attributes) and
//! simulate their effects on the DOM. The page's own listeners stay an
//! external collaborator: the probe only observes what they do, and this
//! module is what stands in for them.

use crate::dom::{DomNode, NodeType};
use serde::Serialize;

/// A detected listener on the page.
#[derive(Debug, Clone, Serialize)]
pub struct Behavior {
    /// How the listening element is addressed.
    pub anchor: Anchor,
    /// The event that fires the listener.
    pub event: EventKind,
    /// What the listener does.
    pub action: Action,
}

/// Stable address of the element carrying the listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Anchor {
    /// The element's id attribute.
    Id(String),
    /// The element's form-field name attribute.
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Click,
    Change,
}

/// An inferred listener effect. Targets are element ids.
#[derive(Debug, Clone, Serialize)]
pub enum Action {
    /// Add a class to the target.
    AddClass { target: String, class: String },
    /// Remove a class from the target.
    RemoveClass { target: String, class: String },
    /// Unconditionally flip a class on the target.
    ToggleClass { target: String, class: String },
    /// Keep class presence in lockstep with the control's checked state:
    /// the class is present iff checked == when_checked.
    SyncClass {
        target: String,
        class: String,
        when_checked: bool,
    },
    /// Set the target's inline display.
    SetDisplay { target: String, visible: bool },
    /// Flip the target's inline display.
    ToggleDisplay { target: String },
}

/// State of the control at dispatch time, available to state-driven
/// actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventContext {
    pub checked: Option<bool>,
}

/// Analyze the DOM for listener patterns and return detected behaviors.
pub fn detect(dom: &DomNode) -> Vec<Behavior> {
    let mut behaviors = Vec::new();
    detect_recursive(dom, &mut behaviors);
    behaviors
}

fn detect_recursive(node: &DomNode, behaviors: &mut Vec<Behavior>) {
    if node.node_type == NodeType::Element {
        if let Some(anchor) = anchor_for(node) {
            if let Some(onclick) = node.get_attr("onclick") {
                if let Some(action) = parse_handler(onclick) {
                    behaviors.push(Behavior {
                        anchor: anchor.clone(),
                        event: EventKind::Click,
                        action,
                    });
                }
            }

            if let Some(onchange) = node.get_attr("onchange") {
                if let Some(action) = parse_handler(onchange) {
                    behaviors.push(Behavior {
                        anchor: anchor.clone(),
                        event: EventKind::Change,
                        action,
                    });
                }
            }

            // Bootstrap-style declarative toggles
            if node.get_attr("data-toggle").is_some() {
                if let Some(target) = node
                    .get_attr("data-target")
                    .or_else(|| node.get_attr("href"))
                {
                    if let Some(id) = target.strip_prefix('#') {
                        behaviors.push(Behavior {
                            anchor: anchor.clone(),
                            event: EventKind::Click,
                            action: Action::ToggleDisplay {
                                target: id.to_string(),
                            },
                        });
                    }
                }
            }

            // Accessibility pattern: aria-controls + aria-expanded
            if let Some(controls) = node.get_attr("aria-controls") {
                if node.get_attr("aria-expanded").is_some() {
                    behaviors.push(Behavior {
                        anchor,
                        event: EventKind::Click,
                        action: Action::ToggleDisplay {
                            target: controls.to_string(),
                        },
                    });
                }
            }
        }
    }

    for child in &node.children {
        detect_recursive(child, behaviors);
    }
}

fn anchor_for(node: &DomNode) -> Option<Anchor> {
    if let Some(id) = node.get_attr("id") {
        return Some(Anchor::Id(id.to_string()));
    }
    if let Some(name) = node.get_attr("name") {
        return Some(Anchor::Name(name.to_string()));
    }
    None
}

/// Parse an inline handler snippet into an Action.
fn parse_handler(snippet: &str) -> Option<Action> {
    let snippet = snippet.trim();
    let target = extract_element_id(snippet)?;

    // classList operations (checked before display assignment: a snippet
    // doing both is rare and the class op is the visibility carrier)
    if let Some(rest) = after(snippet, "classList.add(") {
        let (class, _) = extract_quoted(rest)?;
        return Some(Action::AddClass { target, class });
    }
    if let Some(rest) = after(snippet, "classList.remove(") {
        let (class, _) = extract_quoted(rest)?;
        return Some(Action::RemoveClass { target, class });
    }
    if let Some(rest) = after(snippet, "classList.toggle(") {
        let (class, remainder) = extract_quoted(rest)?;
        let args_end = remainder.find(')').unwrap_or(remainder.len());
        let second_arg = &remainder[..args_end];
        if second_arg.contains("this.checked") {
            // toggle('c', this.checked) keeps the class while checked;
            // toggle('c', !this.checked) keeps it while unchecked.
            let when_checked = !second_arg.contains("!this.checked");
            return Some(Action::SyncClass {
                target,
                class,
                when_checked,
            });
        }
        return Some(Action::ToggleClass { target, class });
    }

    // style.display assignment
    if let Some(rest) = after(snippet, "style.display") {
        let rest = rest.trim_start().strip_prefix('=')?;
        let (value, _) = extract_quoted(rest.trim_start())?;
        let visible = !value.eq_ignore_ascii_case("none");
        return Some(Action::SetDisplay { target, visible });
    }

    None
}

/// Extract element ID from a getElementById('id') call.
fn extract_element_id(s: &str) -> Option<String> {
    let rest = after(s, "getElementById(")?;
    extract_quoted(rest).map(|(id, _)| id)
}

fn after<'a>(s: &'a str, pattern: &str) -> Option<&'a str> {
    s.find(pattern).map(|start| &s[start + pattern.len()..])
}

/// Extract a quoted string (single or double quotes) and return it with
/// the remainder after the closing quote.
fn extract_quoted(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    let quote = s.chars().next()?;
    if quote != '\'' && quote != '"' {
        return None;
    }
    let rest = &s[1..];
    let end = rest.find(quote)?;
    Some((rest[..end].to_string(), &rest[end + 1..]))
}

/// Apply a listener effect to a DOM tree, returning the modified tree.
pub fn apply(dom: &DomNode, action: &Action, ctx: &EventContext) -> DomNode {
    match action {
        Action::AddClass { target, class } => set_class_present(dom, target, class, true),
        Action::RemoveClass { target, class } => set_class_present(dom, target, class, false),
        Action::ToggleClass { target, class } => toggle_class(dom, target, class),
        Action::SyncClass {
            target,
            class,
            when_checked,
        } => match ctx.checked {
            Some(checked) => set_class_present(dom, target, class, checked == *when_checked),
            None => dom.clone(),
        },
        Action::SetDisplay { target, visible } => set_display(dom, target, *visible),
        Action::ToggleDisplay { target } => toggle_display(dom, target),
    }
}

/// Ensure a class is present or absent on an element by ID.
fn set_class_present(node: &DomNode, target_id: &str, class: &str, present: bool) -> DomNode {
    let mut result = node.clone();

    if result.node_type == NodeType::Element && result.get_attr("id") == Some(target_id) {
        let current_classes = result
            .attributes
            .get("class")
            .map(|s| s.to_string())
            .unwrap_or_default();
        let mut class_list: Vec<&str> = current_classes.split_whitespace().collect();
        let has = class_list.contains(&class);

        if present && !has {
            class_list.push(class);
            result
                .attributes
                .insert("class".to_string(), class_list.join(" "));
        } else if !present && has {
            class_list.retain(|c| *c != class);
            result
                .attributes
                .insert("class".to_string(), class_list.join(" "));
        }
        return result;
    }

    result.children = result
        .children
        .iter()
        .map(|c| set_class_present(c, target_id, class, present))
        .collect();

    result
}

/// Flip a class on an element by ID.
fn toggle_class(node: &DomNode, target_id: &str, class: &str) -> DomNode {
    let mut result = node.clone();

    if result.node_type == NodeType::Element && result.get_attr("id") == Some(target_id) {
        let present = result.has_class(class);
        return set_class_present(&result, target_id, class, !present);
    }

    result.children = result
        .children
        .iter()
        .map(|c| toggle_class(c, target_id, class))
        .collect();

    result
}

/// Set the inline display of an element by ID.
fn set_display(node: &DomNode, target_id: &str, visible: bool) -> DomNode {
    let mut result = node.clone();

    if result.node_type == NodeType::Element && result.get_attr("id") == Some(target_id) {
        if visible {
            result.attributes.remove("hidden");
            if let Some(style) = result.attributes.get_mut("style") {
                *style = style
                    .replace("display: none", "")
                    .replace("display:none", "")
                    .trim_matches(';')
                    .trim()
                    .to_string();
            }
        } else {
            let current = result
                .attributes
                .get("style")
                .map(|s| s.to_string())
                .unwrap_or_default();
            if current.is_empty() {
                result
                    .attributes
                    .insert("style".to_string(), "display: none".to_string());
            } else if !current.contains("display: none") && !current.contains("display:none") {
                result
                    .attributes
                    .insert("style".to_string(), format!("{}; display: none", current));
            }
        }
        return result;
    }

    result.children = result
        .children
        .iter()
        .map(|c| set_display(c, target_id, visible))
        .collect();

    result
}

/// Flip the inline display of an element by ID.
fn toggle_display(node: &DomNode, target_id: &str) -> DomNode {
    let mut result = node.clone();

    if result.node_type == NodeType::Element && result.get_attr("id") == Some(target_id) {
        let is_hidden = result
            .get_attr("style")
            .map(|s| s.contains("display: none") || s.contains("display:none"))
            .unwrap_or(false)
            || result.attributes.contains_key("hidden");
        return set_display(&result, target_id, is_hidden);
    }

    result.children = result
        .children
        .iter()
        .map(|c| toggle_display(c, target_id))
        .collect();

    result
}
