//! Name resolution between Rust field names and document names.
//!
//! Field names rarely match element names exactly in the documents this
//! decoder targets, so every lookup runs a fixed fallback chain: exact name,
//! lowercase, camelCase, then a breadth-first scan over all descendants that
//! ignores underscores and dashes (first case-sensitively, then
//! case-insensitively). Element lookups additionally honor the `Value`
//! self-reference, which lets a field read the text of the element being
//! mapped.

use std::collections::VecDeque;

use crate::tree::{Attribute, Element};

/// Find the element that should supply the value for `name`.
///
/// `namespace` is the expected namespace URI for direct-child matches, or
/// `None` when names are unqualified. The descendant scan compares local
/// names only.
pub(crate) fn find_element<'a>(
    node: &'a Element,
    name: &str,
    namespace: Option<&str>,
) -> Option<&'a Element> {
    if let Some(found) = direct_child(node, name, namespace) {
        return Some(found);
    }
    let lower = name.to_lowercase();
    if lower != name {
        if let Some(found) = direct_child(node, &lower, namespace) {
            return Some(found);
        }
    }
    let camel = camel_case(name);
    if camel != name && camel != lower {
        if let Some(found) = direct_child(node, &camel, namespace) {
            return Some(found);
        }
    }

    // A field named `Value` (or `value`) reads the mapped element itself,
    // provided the element actually has text.
    if namespace.is_none() && (name == "Value" || name == "value") && !node.value().is_empty() {
        return Some(node);
    }

    let target = sanitize(name);
    let target_relaxed = target.to_lowercase();
    let mut queue: VecDeque<&Element> = node.children.iter().collect();
    let mut relaxed = None;
    while let Some(candidate) = queue.pop_front() {
        let observed = sanitize(&candidate.name.local);
        if observed == target {
            return Some(candidate);
        }
        if relaxed.is_none() && observed.to_lowercase() == target_relaxed {
            relaxed = Some(candidate);
        }
        queue.extend(candidate.children.iter());
    }
    relaxed
}

/// Find the attribute of `node` that should supply the value for `name`.
///
/// Runs the same chain as [`find_element`] minus the self-reference and
/// with the sanitized scan restricted to the node's own attributes.
pub(crate) fn find_attribute<'a>(
    node: &'a Element,
    name: &str,
    namespace: Option<&str>,
) -> Option<&'a Attribute> {
    if let Some(found) = direct_attribute(node, name, namespace) {
        return Some(found);
    }
    let lower = name.to_lowercase();
    if lower != name {
        if let Some(found) = direct_attribute(node, &lower, namespace) {
            return Some(found);
        }
    }
    let camel = camel_case(name);
    if camel != name && camel != lower {
        if let Some(found) = direct_attribute(node, &camel, namespace) {
            return Some(found);
        }
    }

    let target = sanitize(name);
    let target_relaxed = target.to_lowercase();
    let mut relaxed = None;
    for attr in &node.attributes {
        let observed = sanitize(&attr.name.local);
        if observed == target {
            return Some(attr);
        }
        if relaxed.is_none() && observed.to_lowercase() == target_relaxed {
            relaxed = Some(attr);
        }
    }
    relaxed
}

fn direct_child<'a>(
    node: &'a Element,
    wanted: &str,
    namespace: Option<&str>,
) -> Option<&'a Element> {
    node.children
        .iter()
        .find(|child| child.name.local == wanted && child.name.namespace.as_deref() == namespace)
}

fn direct_attribute<'a>(
    node: &'a Element,
    wanted: &str,
    namespace: Option<&str>,
) -> Option<&'a Attribute> {
    node.attributes
        .iter()
        .find(|attr| attr.name.local == wanted && attr.name.namespace.as_deref() == namespace)
}

/// Lowercase the first character, leaving the rest untouched.
fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Remove underscores and dashes.
fn sanitize(name: &str) -> String {
    name.chars().filter(|c| *c != '_' && *c != '-').collect()
}
