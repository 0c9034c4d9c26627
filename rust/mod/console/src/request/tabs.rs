//! Tab bar requests. `key` is the tab's route path.

#[derive(Debug, Clone)]
pub struct SelectTabReq {
    pub key: String,
}

impl SelectTabReq {
    pub const PATH: &'static str = "tabs/select";
}

#[derive(Debug, Clone)]
pub struct CloseTabReq {
    pub key: String,
}

impl CloseTabReq {
    pub const PATH: &'static str = "tabs/close";
}

#[derive(Debug, Clone)]
pub struct CloseOtherTabsReq {
    pub key: String,
}

impl CloseOtherTabsReq {
    pub const PATH: &'static str = "tabs/close-others";
}

#[derive(Debug, Clone)]
pub struct CloseAllTabsReq;

impl CloseAllTabsReq {
    pub const PATH: &'static str = "tabs/close-all";
}
