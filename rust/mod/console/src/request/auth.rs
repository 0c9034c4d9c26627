//! Auth requests.

#[derive(Debug, Clone)]
pub struct LoginReq {
    pub account: String,
    pub password: String,
}

impl LoginReq {
    pub const PATH: &'static str = "auth/login";
}

/// End the session and return to sign-in.
#[derive(Debug, Clone)]
pub struct LogoutReq;

impl LogoutReq {
    pub const PATH: &'static str = "auth/logout";
}

/// Refetch permissions and rebuild navigation.
#[derive(Debug, Clone)]
pub struct RefreshPermissionsReq;

impl RefreshPermissionsReq {
    pub const PATH: &'static str = "auth/refresh-permissions";
}
