//! Navigation state derived from the session's permissions.

use fmconsole_nav::{Crumb, GeneratedRoutes, MenuNode, TabState};
use serde::Serialize;

/// Generated router table. Stored at `nav/routes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteTree(pub GeneratedRoutes);

impl RouteTree {
    pub const PATH: &'static str = "nav/routes";
}

/// Filtered sidebar. Stored at `nav/menu`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SidebarMenu(pub Vec<MenuNode>);

impl SidebarMenu {
    pub const PATH: &'static str = "nav/menu";
}

/// Open tabs. Stored at `nav/tabs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OpenTabs(pub TabState);

impl OpenTabs {
    pub const PATH: &'static str = "nav/tabs";
}

/// Breadcrumb of the active route. Stored at `nav/breadcrumb`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Breadcrumbs(pub Vec<Crumb>);

impl Breadcrumbs {
    pub const PATH: &'static str = "nav/breadcrumb";
}
