use serde::Serialize;

use crate::menu::{trail, MenuNode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub path: String,
    pub label: String,
}

/// Breadcrumb for `path`: the menu trail from the top-level group down.
///
/// Empty when the path is not in the menu.
pub fn breadcrumb(menu: &[MenuNode], path: &str) -> Vec<Crumb> {
    trail(menu, path)
        .into_iter()
        .map(|node| Crumb { path: node.key.clone(), label: node.label.clone() })
        .collect()
}
