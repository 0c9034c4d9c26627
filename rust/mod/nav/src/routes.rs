//! Permission-to-route generation and guarded resolution.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use fmconsole_core::{ConsoleConfig, ConsoleError, Permission, PermissionSet};
use serde::Serialize;

use crate::catalog::RouteTable;
use crate::LOGIN_PATH;

/// Identifier of a renderable page component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pages the rendering layer knows how to draw, keyed by route path.
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    pages: HashMap<String, PageId>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the page for `path`.
    pub fn register(&mut self, path: &str, page: impl Into<String>) {
        self.pages.insert(path.to_string(), PageId::new(page));
    }

    pub fn get(&self, path: &str) -> Option<&PageId> {
        self.pages.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.pages.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// What to do with a held permission that has no descriptor or no page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRoutePolicy {
    /// Skip it and log a warning.
    #[default]
    Warn,
    /// Abort generation with [`ConsoleError::Config`].
    Fail,
}

impl MissingRoutePolicy {
    pub fn from_config(config: &ConsoleConfig) -> Self {
        if config.strict_routes {
            MissingRoutePolicy::Fail
        } else {
            MissingRoutePolicy::Warn
        }
    }
}

/// Re-checks the route's permission whenever the route is resolved.
///
/// A route tree built for an earlier permission set may outlive a refresh;
/// the guard keeps such a tree from granting access on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteGuard {
    permission: Permission,
}

impl RouteGuard {
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }

    pub fn permission(&self) -> &Permission {
        &self.permission
    }

    pub fn allows(&self, held: &PermissionSet) -> bool {
        held.contains(&self.permission)
    }

    pub fn check(&self, held: &PermissionSet) -> Result<(), ConsoleError> {
        if self.allows(held) {
            Ok(())
        } else {
            Err(ConsoleError::PermissionDenied(format!(
                "missing permission {}",
                self.permission
            )))
        }
    }
}

/// One reachable page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub path: String,
    pub label: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub page: PageId,
    pub guard: RouteGuard,
}

/// Outcome of resolving a path against the generated routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The sign-in page, reachable without permissions.
    Public,
    Page(PageId),
    /// The route exists but its guard rejects the current permissions.
    Forbidden,
    NotFound,
    /// No route was generated at all.
    Unauthorized,
}

/// Router table generated for one permission set, keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GeneratedRoutes {
    entries: BTreeMap<String, RouteEntry>,
}

impl GeneratedRoutes {
    pub fn get(&self, path: &str) -> Option<&RouteEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, path: &str, held: &PermissionSet) -> Resolution {
        if path == LOGIN_PATH {
            return Resolution::Public;
        }
        if self.entries.is_empty() {
            return Resolution::Unauthorized;
        }
        match self.entries.get(path) {
            Some(entry) if entry.guard.allows(held) => Resolution::Page(entry.page.clone()),
            Some(_) => Resolution::Forbidden,
            None => Resolution::NotFound,
        }
    }
}

/// Build the router table for `permissions`.
///
/// Walks permissions in order. Each one needs a descriptor in `table` and a
/// page registered for the descriptor's path; otherwise it is handled per
/// `policy`. When two permissions share a path, the first one guards it.
pub fn generate_routes(
    permissions: &PermissionSet,
    table: &RouteTable,
    pages: &PageRegistry,
    policy: MissingRoutePolicy,
) -> Result<GeneratedRoutes, ConsoleError> {
    let mut routes = GeneratedRoutes::default();

    for permission in permissions.iter() {
        let Some(descriptor) = table.get(permission) else {
            skip(policy, permission, None, "no route descriptor")?;
            continue;
        };
        let Some(page) = pages.get(&descriptor.path) else {
            skip(policy, permission, Some(&descriptor.path), "no page registered")?;
            continue;
        };
        if routes.contains(&descriptor.path) {
            tracing::debug!(%permission, path = %descriptor.path, "path already routed");
            continue;
        }
        routes.entries.insert(
            descriptor.path.clone(),
            RouteEntry {
                path: descriptor.path.clone(),
                label: descriptor.label.clone(),
                description: descriptor.description.clone(),
                icon: descriptor.icon.clone(),
                page: page.clone(),
                guard: RouteGuard::new(permission.clone()),
            },
        );
    }

    tracing::debug!(held = permissions.len(), routes = routes.len(), "routes generated");
    Ok(routes)
}

fn skip(
    policy: MissingRoutePolicy,
    permission: &Permission,
    path: Option<&str>,
    reason: &str,
) -> Result<(), ConsoleError> {
    match policy {
        MissingRoutePolicy::Warn => {
            tracing::warn!(%permission, path, reason, "permission skipped");
            Ok(())
        }
        MissingRoutePolicy::Fail => Err(ConsoleError::Config(match path {
            Some(path) => format!("permission {permission} ({path}): {reason}"),
            None => format!("permission {permission}: {reason}"),
        })),
    }
}
