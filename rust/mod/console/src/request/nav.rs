//! Navigation requests.

/// Sidebar entry clicked.
#[derive(Debug, Clone)]
pub struct MenuClickReq {
    pub path: String,
}

impl MenuClickReq {
    pub const PATH: &'static str = "nav/menu-click";
}

/// The location changed outside the menu (address bar, history, deep link).
#[derive(Debug, Clone)]
pub struct LocationReq {
    pub path: String,
}

impl LocationReq {
    pub const PATH: &'static str = "nav/location";
}
