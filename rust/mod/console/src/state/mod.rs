//! State definitions.
//!
//! Each type lives at one well-known path, given by its `PATH` const.
//! The rendering layer reads these and nothing else.

pub mod app;
pub mod auth;
pub mod nav;

pub use app::{AppRoute, ErrorBanner};
pub use auth::{AuthPhase, AuthState, SessionPermissions, UserProfile};
pub use nav::{Breadcrumbs, OpenTabs, RouteTree, SidebarMenu};
