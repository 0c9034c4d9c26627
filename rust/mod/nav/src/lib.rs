//! Permission-driven navigation: routes, sidebar menu, tabs and breadcrumbs.
//!
//! Everything here is a pure function of the held permission set and the
//! static catalog. Nothing touches the network or the state store.

pub mod breadcrumb;
pub mod catalog;
pub mod menu;
pub mod routes;
pub mod tabs;

pub use breadcrumb::{breadcrumb, Crumb};
pub use catalog::{Catalog, Navigation, RouteDescriptor, RouteTable};
pub use menu::{filter_menu, find, trail, MenuNode};
pub use routes::{
    generate_routes, GeneratedRoutes, MissingRoutePolicy, PageId, PageRegistry, Resolution,
    RouteEntry, RouteGuard,
};
pub use tabs::{Tab, TabChange, TabState};

/// Always-public sign-in page.
pub const LOGIN_PATH: &str = "/login";

/// Landing page and path of the fixed home tab.
pub const HOME_PATH: &str = "/dashboard";
