//! Credential and permission endpoints.

use fmconsole_core::ConsoleError;
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;

pub const LOGIN_PATH: &str = "/auth/login";
pub const PERMISSIONS_PATH: &str = "/auth/permissions";

/// The backend's authentication surface, as the console sees it.
///
/// `ApiClient` implements it over HTTP; tests and offline shells can
/// substitute their own.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync + 'static {
    /// Exchange account + password for a signed session credential.
    async fn login(&self, account: &str, password: &str) -> Result<String, ConsoleError>;

    /// Flat permission list for the current credential.
    async fn permissions(&self) -> Result<Vec<String>, ConsoleError>;
}

#[derive(Serialize)]
struct LoginBody<'a> {
    account: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginData {
    token: String,
}

#[async_trait::async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, account: &str, password: &str) -> Result<String, ConsoleError> {
        let data: LoginData = self.post(LOGIN_PATH, &LoginBody { account, password }).await?;
        if data.token.is_empty() {
            return Err(ConsoleError::Decode("login returned an empty token".into()));
        }
        Ok(data.token)
    }

    async fn permissions(&self) -> Result<Vec<String>, ConsoleError> {
        self.get(PERMISSIONS_PATH).await
    }
}
