//! Sidebar menu tree and its permission filter.

use fmconsole_core::{Permission, PermissionSet};
use serde::Serialize;

/// A node in the static menu tree.
///
/// `key` is the route path the node opens (or, for a grouping node, the
/// path prefix its children share).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Any one of these grants visibility. Empty on pass-through groups.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<Permission>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// A page entry gated by a single permission.
    pub fn leaf(key: &str, label: &str, permission: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            icon: None,
            required: vec![Permission::new(permission)],
            children: vec![],
        }
    }

    /// A grouping node with no permission of its own.
    pub fn group(key: &str, label: &str, children: Vec<MenuNode>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            icon: None,
            required: vec![],
            children,
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Add another permission that also grants this node.
    pub fn or_requires(mut self, permission: &str) -> Self {
        self.required.push(Permission::new(permission));
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Visible subset of `tree` for the held permissions.
///
/// A node with its own requirements is kept iff one of them is held, and
/// then carries only its visible children. A node without requirements is
/// a pass-through group: kept iff at least one child survives. Sibling
/// order is preserved and `tree` is not modified.
pub fn filter_menu(tree: &[MenuNode], held: &PermissionSet) -> Vec<MenuNode> {
    tree.iter().filter_map(|node| filter_node(node, held)).collect()
}

fn filter_node(node: &MenuNode, held: &PermissionSet) -> Option<MenuNode> {
    if !node.required.is_empty() && !held.intersects(&node.required) {
        return None;
    }
    let children = filter_menu(&node.children, held);
    if node.required.is_empty() && children.is_empty() {
        return None;
    }
    Some(MenuNode {
        key: node.key.clone(),
        label: node.label.clone(),
        icon: node.icon.clone(),
        required: node.required.clone(),
        children,
    })
}

/// Depth-first lookup by key.
pub fn find<'a>(tree: &'a [MenuNode], key: &str) -> Option<&'a MenuNode> {
    for node in tree {
        if node.key == key {
            return Some(node);
        }
        if let Some(found) = find(&node.children, key) {
            return Some(found);
        }
    }
    None
}

/// Chain of nodes from a root down to `key`, inclusive. Empty if absent.
pub fn trail<'a>(tree: &'a [MenuNode], key: &str) -> Vec<&'a MenuNode> {
    let mut path = Vec::new();
    if walk(tree, key, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn walk<'a>(tree: &'a [MenuNode], key: &str, path: &mut Vec<&'a MenuNode>) -> bool {
    for node in tree {
        path.push(node);
        if node.key == key || walk(&node.children, key, path) {
            return true;
        }
        path.pop();
    }
    false
}
