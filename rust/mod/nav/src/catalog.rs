//! Static route descriptors, page registry and menu tree.

use std::collections::HashMap;

use fmconsole_core::{ConsoleError, Permission, PermissionSet};
use serde::Serialize;

use crate::menu::{filter_menu, MenuNode};
use crate::routes::{generate_routes, GeneratedRoutes, MissingRoutePolicy, PageRegistry};

/// Where a permission leads and how it is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub path: String,
    pub label: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Menu group the page sits under, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
}

impl RouteDescriptor {
    pub fn new(path: &str, label: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            icon: None,
            parent_path: None,
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn under(mut self, parent: &str) -> Self {
        self.parent_path = Some(parent.to_string());
        self
    }
}

/// Permission → descriptor. One descriptor per permission.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    by_permission: HashMap<Permission, RouteDescriptor>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the descriptor this replaced, if any.
    pub fn insert(
        &mut self,
        permission: impl Into<Permission>,
        descriptor: RouteDescriptor,
    ) -> Option<RouteDescriptor> {
        self.by_permission.insert(permission.into(), descriptor)
    }

    pub fn get(&self, permission: &Permission) -> Option<&RouteDescriptor> {
        self.by_permission.get(permission)
    }

    pub fn len(&self) -> usize {
        self.by_permission.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_permission.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Permission, &RouteDescriptor)> {
        self.by_permission.iter()
    }
}

/// Routes and menu visible to one permission set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Navigation {
    pub routes: GeneratedRoutes,
    pub menu: Vec<MenuNode>,
}

/// Everything the console could ever show, independent of any user.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub routes: RouteTable,
    pub pages: PageRegistry,
    pub menu: Vec<MenuNode>,
}

/// permission, path, label, description, icon, group
type Entry = (&'static str, &'static str, &'static str, &'static str, &'static str, Option<&'static str>);

const ENTRIES: &[Entry] = &[
    ("dashboard.read", "/dashboard", "Dashboard", "Portfolio overview", "gauge", None),
    ("tenants.list.read", "/tenants/list", "Tenants", "Tenant directory", "users-three", Some("/tenants")),
    ("tenants.onboarding.read", "/tenants/onboarding", "Onboarding", "Move-in pipeline", "door-open", Some("/tenants")),
    ("billing.invoices.read", "/billing/invoices", "Invoices", "Issued invoices", "receipt", Some("/billing")),
    ("billing.payments.read", "/billing/payments", "Payments", "Received payments", "credit-card", Some("/billing")),
    ("energy.overview.read", "/energy/overview", "Energy overview", "Consumption dashboards", "lightning", Some("/energy")),
    ("energy.meters.read", "/energy/meters", "Meters", "Meter registry", "plug", Some("/energy")),
    ("users.list.read", "/auth/users", "Users", "Console accounts", "user", Some("/auth")),
    ("roles.list.read", "/auth/roles", "Roles", "Role assignments", "shield", Some("/auth")),
    ("permissions.list.read", "/auth/permissions", "Permissions", "Permission catalog", "key", Some("/auth")),
];

const GROUPS: &[(&str, &str, &str)] = &[
    ("/tenants", "Tenants", "buildings"),
    ("/billing", "Billing", "currency-circle-dollar"),
    ("/energy", "Energy", "lightning"),
    ("/auth", "Authorization center", "lock"),
];

impl Catalog {
    /// The built-in facility-management catalog.
    ///
    /// Every descriptor has a page; page ids are the path with `/` as `.`
    /// (`/auth/users` → `auth.users`).
    pub fn standard() -> Self {
        let mut routes = RouteTable::new();
        let mut pages = PageRegistry::new();
        let mut menu: Vec<MenuNode> = Vec::new();

        for &(permission, path, label, description, icon, group) in ENTRIES {
            let mut descriptor = RouteDescriptor::new(path, label, description).with_icon(icon);
            if let Some(group) = group {
                descriptor = descriptor.under(group);
            }
            routes.insert(permission, descriptor);
            pages.register(path, path.trim_start_matches('/').replace('/', "."));

            let leaf = MenuNode::leaf(path, label, permission).with_icon(icon);
            match group {
                None => menu.push(leaf),
                Some(group) => {
                    if let Some(parent) = menu.iter_mut().find(|n| n.key == group) {
                        parent.children.push(leaf);
                    } else {
                        let (_, group_label, group_icon) = GROUPS
                            .iter()
                            .find(|(key, _, _)| *key == group)
                            .copied()
                            .unwrap_or((group, group, ""));
                        let mut node = MenuNode::group(group, group_label, vec![leaf]);
                        if !group_icon.is_empty() {
                            node = node.with_icon(group_icon);
                        }
                        menu.push(node);
                    }
                }
            }
        }

        Self { routes, pages, menu }
    }

    /// Routes and filtered menu for `held`.
    pub fn navigation(
        &self,
        held: &PermissionSet,
        policy: MissingRoutePolicy,
    ) -> Result<Navigation, ConsoleError> {
        let routes = generate_routes(held, &self.routes, &self.pages, policy)?;
        let menu = filter_menu(&self.menu, held);
        Ok(Navigation { routes, menu })
    }

    /// Label for `path`, from the menu first, then from the descriptors.
    pub fn label_for(&self, path: &str) -> Option<&str> {
        if let Some(node) = crate::menu::find(&self.menu, path) {
            return Some(&node.label);
        }
        self.routes
            .iter()
            .find(|(_, d)| d.path == path)
            .map(|(_, d)| d.label.as_str())
    }
}
