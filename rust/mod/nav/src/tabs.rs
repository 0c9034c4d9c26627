//! Open-page tabs, kept in step with the active route.

use serde::Serialize;

use crate::menu::{find, MenuNode};
use crate::routes::GeneratedRoutes;
use crate::HOME_PATH;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Route path.
    pub key: String,
    pub label: String,
    pub closable: bool,
}

/// Result of a tab operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabChange {
    /// Path the router should move to, when the active tab changed.
    pub navigate_to: Option<String>,
    /// Whether the tab list or active key changed at all.
    pub changed: bool,
}

impl TabChange {
    fn none() -> Self {
        Self::default()
    }
}

/// Tab list plus the active key.
///
/// The first tab is the home tab. It is never closable and is never
/// removed, so the previous-tab fallback on close always has a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabState {
    tabs: Vec<Tab>,
    active: String,
}

impl TabState {
    pub fn new(home_path: &str, home_label: &str) -> Self {
        Self {
            tabs: vec![Tab {
                key: home_path.to_string(),
                label: home_label.to_string(),
                closable: false,
            }],
            active: home_path.to_string(),
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn active_tab(&self) -> &Tab {
        self.tabs
            .iter()
            .find(|t| t.key == self.active)
            .unwrap_or(&self.tabs[0])
    }

    pub fn home(&self) -> &Tab {
        &self.tabs[0]
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tabs.iter().any(|t| t.key == key)
    }

    /// Menu click: add a tab for `path` if needed and activate it.
    pub fn open(&mut self, path: &str, label: &str) -> TabChange {
        let added = self.upsert(path, label);
        let activated = self.activate(path);
        TabChange {
            navigate_to: activated.then(|| path.to_string()),
            changed: added || activated,
        }
    }

    /// Location change: follow the route if it is a page in the menu,
    /// otherwise fall back to the home tab. Group keys are not pages.
    pub fn sync_location(&mut self, path: &str, menu: &[MenuNode]) -> TabChange {
        if path == self.home().key {
            return TabChange { navigate_to: None, changed: self.activate(path) };
        }
        match find(menu, path).filter(|node| node.is_leaf()) {
            Some(node) => {
                let added = self.upsert(path, &node.label);
                let activated = self.activate(path);
                TabChange { navigate_to: None, changed: added || activated }
            }
            None => {
                tracing::debug!(path, "location is not a menu page, falling back to home tab");
                let home = self.home().key.clone();
                let changed = self.activate(&home);
                TabChange { navigate_to: Some(home), changed }
            }
        }
    }

    /// Activate an existing tab. Unknown keys are ignored.
    pub fn select(&mut self, key: &str) -> TabChange {
        if !self.contains(key) {
            return TabChange::none();
        }
        let activated = self.activate(key);
        TabChange {
            navigate_to: activated.then(|| key.to_string()),
            changed: activated,
        }
    }

    /// Close one tab. Closing the active tab activates the tab before it.
    pub fn close(&mut self, key: &str) -> TabChange {
        let Some(index) = self.tabs.iter().position(|t| t.key == key) else {
            return TabChange::none();
        };
        if !self.tabs[index].closable {
            return TabChange::none();
        }
        self.tabs.remove(index);
        if self.active != key {
            return TabChange { navigate_to: None, changed: true };
        }
        let next = self.tabs[index - 1].key.clone();
        self.active = next.clone();
        TabChange { navigate_to: Some(next), changed: true }
    }

    /// Keep only the home tab and `key`, and activate `key`.
    pub fn close_others(&mut self, key: &str) -> TabChange {
        if !self.contains(key) {
            return TabChange::none();
        }
        let before = self.tabs.len();
        self.tabs.retain(|t| !t.closable || t.key == key);
        let activated = self.activate(key);
        TabChange {
            navigate_to: activated.then(|| key.to_string()),
            changed: activated || self.tabs.len() != before,
        }
    }

    /// Keep only the home tab and activate it.
    pub fn close_all(&mut self) -> TabChange {
        let before = self.tabs.len();
        self.tabs.retain(|t| !t.closable);
        let home = self.home().key.clone();
        let activated = self.activate(&home);
        TabChange {
            navigate_to: activated.then_some(home),
            changed: activated || self.tabs.len() != before,
        }
    }

    /// Drop tabs whose route is no longer generated, e.g. after the
    /// permission set shrank.
    pub fn prune(&mut self, routes: &GeneratedRoutes) -> TabChange {
        let before = self.tabs.len();
        self.tabs.retain(|t| !t.closable || routes.contains(&t.key));
        if self.tabs.len() == before {
            return TabChange::none();
        }
        if self.contains(&self.active) {
            return TabChange { navigate_to: None, changed: true };
        }
        let home = self.home().key.clone();
        self.active = home.clone();
        TabChange { navigate_to: Some(home), changed: true }
    }

    fn upsert(&mut self, path: &str, label: &str) -> bool {
        match self.tabs.iter_mut().find(|t| t.key == path) {
            Some(tab) => {
                if tab.label != label && tab.closable {
                    tab.label = label.to_string();
                }
                false
            }
            None => {
                self.tabs.push(Tab {
                    key: path.to_string(),
                    label: label.to_string(),
                    closable: true,
                });
                true
            }
        }
    }

    fn activate(&mut self, key: &str) -> bool {
        if self.active == key {
            return false;
        }
        self.active = key.to_string();
        true
    }
}

impl Default for TabState {
    fn default() -> Self {
        Self::new(HOME_PATH, "Dashboard")
    }
}
