/// Minimal CSS selector engine for element lookup.
/// Supports: tag, .class, #id, [attr] / [attr="value"], combinators
/// (descendant, child), and the universal selector.
use crate::dom::{DomNode, NodePath, NodeType};

/// A parsed selector.
#[derive(Debug, Clone)]
pub struct Selector {
    pub parts: Vec<SelectorPart>,
}

/// A component of a selector chain.
#[derive(Debug, Clone)]
pub enum SelectorPart {
    /// Matches a tag name: `div`, `input`, etc.
    Tag(String),
    /// Matches a class: `.foo`
    Class(String),
    /// Matches an ID: `#bar`
    Id(String),
    /// Matches an attribute: `[name="es_pep"]`
    Attribute(String, Option<String>),
    /// Descendant combinator (space)
    Descendant,
    /// Child combinator (>)
    Child,
    /// Universal selector (*)
    Universal,
}

/// Parse a selector string. Returns None for empty or unusable input.
pub fn parse_selector(input: &str) -> Option<Selector> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            '.' => {
                flush_tag(&mut current, &mut parts);
                chars.next();
                let class_name = read_ident(&mut chars);
                if !class_name.is_empty() {
                    parts.push(SelectorPart::Class(class_name));
                }
            }
            '#' => {
                flush_tag(&mut current, &mut parts);
                chars.next();
                let id_name = read_ident(&mut chars);
                if !id_name.is_empty() {
                    parts.push(SelectorPart::Id(id_name));
                }
            }
            '[' => {
                flush_tag(&mut current, &mut parts);
                chars.next();
                let mut attr = String::new();
                let mut value = None;
                while let Some(&c) = chars.peek() {
                    if c == ']' {
                        chars.next();
                        break;
                    }
                    if c == '=' {
                        chars.next();
                        let mut val = String::new();
                        // Skip optional quotes
                        let quote = chars.peek().copied();
                        if quote == Some('"') || quote == Some('\'') {
                            chars.next();
                            while let Some(&vc) = chars.peek() {
                                if Some(vc) == quote {
                                    chars.next();
                                    break;
                                }
                                val.push(vc);
                                chars.next();
                            }
                        } else {
                            while let Some(&vc) = chars.peek() {
                                if vc == ']' {
                                    break;
                                }
                                val.push(vc);
                                chars.next();
                            }
                        }
                        value = Some(val);
                    } else {
                        attr.push(c);
                        chars.next();
                    }
                }
                parts.push(SelectorPart::Attribute(attr.trim().to_string(), value));
            }
            '>' => {
                flush_tag(&mut current, &mut parts);
                chars.next();
                skip_whitespace(&mut chars);
                parts.push(SelectorPart::Child);
            }
            ' ' | '\t' | '\n' | '\r' => {
                flush_tag(&mut current, &mut parts);
                chars.next();
                skip_whitespace(&mut chars);
                // Check if next char is a combinator
                if let Some(&next) = chars.peek() {
                    if next != '>' && next != ',' {
                        parts.push(SelectorPart::Descendant);
                    }
                }
            }
            '*' => {
                flush_tag(&mut current, &mut parts);
                chars.next();
                parts.push(SelectorPart::Universal);
            }
            _ => {
                current.push(ch);
                chars.next();
            }
        }
    }

    flush_tag(&mut current, &mut parts);

    if parts.is_empty() {
        None
    } else {
        Some(Selector { parts })
    }
}

fn flush_tag(current: &mut String, parts: &mut Vec<SelectorPart>) {
    let tag = current.trim().to_string();
    if !tag.is_empty() {
        parts.push(SelectorPart::Tag(tag.to_lowercase()));
        current.clear();
    }
}

fn read_ident(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars>) {
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else {
            break;
        }
    }
}

/// Find the first element matching the selector string.
/// Returns the child-index path to the match.
pub fn select_first(root: &DomNode, selector: &str) -> Option<NodePath> {
    let selector = parse_selector(selector)?;
    let mut ancestors: Vec<&DomNode> = Vec::new();
    let mut path = Vec::new();
    find_match(root, &selector, &mut ancestors, &mut path)
}

/// Find every element matching the selector string, in document order.
pub fn select_all(root: &DomNode, selector: &str) -> Vec<NodePath> {
    let mut results = Vec::new();
    if let Some(selector) = parse_selector(selector) {
        let mut ancestors: Vec<&DomNode> = Vec::new();
        let mut path = Vec::new();
        collect_matches(root, &selector, &mut ancestors, &mut path, &mut results);
    }
    results
}

fn find_match<'a>(
    node: &'a DomNode,
    selector: &Selector,
    ancestors: &mut Vec<&'a DomNode>,
    path: &mut NodePath,
) -> Option<NodePath> {
    if node.node_type == NodeType::Element && matches_node(selector, node, ancestors) {
        return Some(path.clone());
    }
    ancestors.push(node);
    for (idx, child) in node.children.iter().enumerate() {
        path.push(idx);
        if let Some(found) = find_match(child, selector, ancestors, path) {
            ancestors.pop();
            path.pop();
            return Some(found);
        }
        path.pop();
    }
    ancestors.pop();
    None
}

fn collect_matches<'a>(
    node: &'a DomNode,
    selector: &Selector,
    ancestors: &mut Vec<&'a DomNode>,
    path: &mut NodePath,
    results: &mut Vec<NodePath>,
) {
    if node.node_type == NodeType::Element && matches_node(selector, node, ancestors) {
        results.push(path.clone());
    }
    ancestors.push(node);
    for (idx, child) in node.children.iter().enumerate() {
        path.push(idx);
        collect_matches(child, selector, ancestors, path, results);
        path.pop();
    }
    ancestors.pop();
}

/// Check if a selector matches an element, given its ancestor chain
/// (root first, parent last).
pub fn matches_node(selector: &Selector, node: &DomNode, ancestors: &[&DomNode]) -> bool {
    // Split into segments separated by combinators. The rightmost
    // segment must match the element itself; earlier segments walk the
    // ancestor chain right to left.
    let parts = &selector.parts;
    if parts.is_empty() {
        return false;
    }

    let mut segments: Vec<(Vec<&SelectorPart>, Option<&SelectorPart>)> = Vec::new();
    let mut current_segment: Vec<&SelectorPart> = Vec::new();

    for part in parts {
        match part {
            SelectorPart::Descendant | SelectorPart::Child => {
                if !current_segment.is_empty() {
                    segments.push((current_segment, Some(part)));
                    current_segment = Vec::new();
                }
            }
            _ => {
                current_segment.push(part);
            }
        }
    }
    if !current_segment.is_empty() {
        segments.push((current_segment, None));
    }

    if segments.is_empty() {
        return false;
    }

    let last_segment = &segments.last().unwrap().0;
    if !segment_matches(last_segment, node) {
        return false;
    }

    if segments.len() == 1 {
        return true;
    }

    let mut seg_idx = segments.len() - 2;
    let mut anc_idx = ancestors.len();

    loop {
        let (segment, _) = &segments[seg_idx];
        let combinator_of_next = &segments[seg_idx + 1].1;
        let is_child = matches!(combinator_of_next, Some(SelectorPart::Child));

        let mut found = false;
        while anc_idx > 0 {
            anc_idx -= 1;
            if segment_matches(segment, ancestors[anc_idx]) {
                found = true;
                break;
            }
            if is_child {
                // Child combinator: must be the direct parent
                return false;
            }
        }

        if !found {
            return false;
        }

        if seg_idx == 0 {
            return true;
        }
        seg_idx -= 1;
    }
}

fn segment_matches(segment: &[&SelectorPart], node: &DomNode) -> bool {
    for part in segment {
        match part {
            SelectorPart::Tag(t) => {
                if t != &node.tag.to_lowercase() {
                    return false;
                }
            }
            SelectorPart::Class(c) => {
                if !node.has_class(c) {
                    return false;
                }
            }
            SelectorPart::Id(i) => {
                if node.get_attr("id") != Some(i.as_str()) {
                    return false;
                }
            }
            SelectorPart::Attribute(attr_name, expected_value) => match expected_value {
                Some(val) => {
                    if node.get_attr(attr_name) != Some(val.as_str()) {
                        return false;
                    }
                }
                None => {
                    if !node.attributes.contains_key(attr_name.as_str()) {
                        return false;
                    }
                }
            },
            SelectorPart::Universal => {}
            SelectorPart::Descendant | SelectorPart::Child => {} // handled elsewhere
        }
    }
    true
}
