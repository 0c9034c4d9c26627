//! Auth and session state.

use fmconsole_auth::Session;
use fmconsole_core::PermissionSet;
use serde::Serialize;

/// Authentication state. Stored at `auth/state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub phase: AuthPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthState {
    pub const PATH: &'static str = "auth/state";

    pub fn signed_out(error: Option<String>) -> Self {
        Self { phase: AuthPhase::Unauthenticated, user: None, busy: false, error }
    }

    pub fn signed_in(user: UserProfile) -> Self {
        Self { phase: AuthPhase::Authenticated, user: Some(user), busy: false, error: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthPhase {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub account: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Credential expiry, unix seconds.
    pub expires_at: i64,
}

impl From<&Session> for UserProfile {
    fn from(session: &Session) -> Self {
        let claims = session.credential.claims();
        Self {
            account: session.account().to_string(),
            display_name: session.display_name().to_string(),
            tenant: claims.tenant.clone(),
            expires_at: claims.exp,
        }
    }
}

/// Permissions held by the current session. Stored at `session/permissions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionPermissions(pub PermissionSet);

impl SessionPermissions {
    pub const PATH: &'static str = "session/permissions";
}
