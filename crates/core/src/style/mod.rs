//! Embedded stylesheet scanning, reduced to the one question visibility
//! checks need answered: which simple selectors imply `display: none`.

use crate::dom::{DomNode, NodeType};
use std::collections::HashSet;

/// Hiding rules gathered from a document's `<style>` blocks.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// Classes whose rule declares `display: none` (e.g. `.hidden`).
    pub hidden_classes: HashSet<String>,
    /// IDs whose rule declares `display: none`.
    pub hidden_ids: HashSet<String>,
}

impl Stylesheet {
    /// Scan every `<style>` element under the document root.
    pub fn from_document(root: &DomNode) -> Self {
        let mut css = String::new();
        collect_style_text(root, &mut css);
        Self::from_css(&css)
    }

    /// Parse a raw CSS string.
    pub fn from_css(css: &str) -> Self {
        let mut sheet = Stylesheet::default();
        let css = strip_comments(css);

        // Simple scan: selector { declarations }
        let mut chars = css.chars().peekable();
        let mut current = String::new();

        while let Some(&ch) = chars.peek() {
            match ch {
                '{' => {
                    chars.next();
                    let selector_str = current.trim().to_string();
                    current.clear();

                    // Read until the matching closing brace
                    let mut depth = 1;
                    let mut declarations = String::new();
                    while let Some(&c) = chars.peek() {
                        chars.next();
                        if c == '{' {
                            depth += 1;
                        } else if c == '}' {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        declarations.push(c);
                    }

                    if !selector_str.is_empty()
                        && !selector_str.starts_with('@')
                        && declares_display_none(&declarations)
                    {
                        for sel in selector_str.split(',') {
                            record_hiding_selector(sel.trim(), &mut sheet);
                        }
                    }
                }
                _ => {
                    current.push(ch);
                    chars.next();
                }
            }
        }

        sheet
    }

    /// Whether an element is hidden under these rules: a hiding class, a
    /// hiding id, an inline `display: none`, or the `hidden` attribute.
    pub fn hides(&self, node: &DomNode) -> bool {
        if node.attributes.contains_key("hidden") {
            return true;
        }
        if let Some(style) = node.get_attr("style") {
            if declares_display_none(style) {
                return true;
            }
        }
        if let Some(id) = node.get_attr("id") {
            if self.hidden_ids.contains(id) {
                return true;
            }
        }
        node.class_list().iter().any(|c| self.hidden_classes.contains(*c))
    }
}

/// Record a selector only when it is a bare `.class` or `#id` — compound
/// and combinator selectors are conditional and cannot be answered
/// per-element, so they are ignored.
fn record_hiding_selector(sel: &str, sheet: &mut Stylesheet) {
    if let Some(class) = sel.strip_prefix('.') {
        if is_ident(class) {
            sheet.hidden_classes.insert(class.to_string());
        }
    } else if let Some(id) = sel.strip_prefix('#') {
        if is_ident(id) {
            sheet.hidden_ids.insert(id.to_string());
        }
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Check a declaration block (or inline style string) for `display: none`.
pub fn declares_display_none(declarations: &str) -> bool {
    for declaration in declarations.split(';') {
        let mut parts = declaration.splitn(2, ':');
        let property = match parts.next() {
            Some(p) => p.trim().to_lowercase(),
            None => continue,
        };
        let value = match parts.next() {
            Some(v) => v.trim().to_lowercase(),
            None => continue,
        };
        if property == "display" && value == "none" {
            return true;
        }
    }
    false
}

fn collect_style_text(node: &DomNode, out: &mut String) {
    if node.node_type == NodeType::Element && node.tag == "style" {
        for child in &node.children {
            if child.node_type == NodeType::Text {
                out.push_str(&child.text);
                out.push('\n');
            }
        }
        return;
    }
    for child in &node.children {
        collect_style_text(child, out);
    }
}

fn strip_comments(css: &str) -> String {
    let mut result = String::with_capacity(css.len());
    let mut chars = css.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c == '/' {
            chars.next();
            if chars.peek() == Some(&'*') {
                chars.next();
                // Skip until */
                loop {
                    match chars.next() {
                        Some('*') if chars.peek() == Some(&'/') => {
                            chars.next();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
            } else {
                result.push('/');
            }
        } else {
            result.push(c);
            chars.next();
        }
    }
    result
}
