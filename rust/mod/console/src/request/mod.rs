//! Request definitions.
//!
//! A request is emitted at its `PATH` with the struct as payload.

pub mod app;
pub mod auth;
pub mod nav;
pub mod tabs;

pub use app::{DismissErrorReq, InitializeReq, ReportErrorReq};
pub use auth::{LoginReq, LogoutReq, RefreshPermissionsReq};
pub use nav::{LocationReq, MenuClickReq};
pub use tabs::{CloseAllTabsReq, CloseOtherTabsReq, CloseTabReq, SelectTabReq};
