use std::sync::Arc;

use chrono::{DateTime, Utc};
use fmconsole_core::{ConsoleConfig, ConsoleError, PermissionSet};

use crate::credential::Credential;
use crate::storage::{FileStorage, MemoryStorage, SessionStorage};

/// Storage key for the raw credential.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the JSON permission list.
pub const PERMISSIONS_KEY: &str = "permissions";

/// A logged-in session: credential plus the permissions it grants.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub credential: Credential,
    pub permissions: PermissionSet,
}

impl Session {
    pub fn new(credential: Credential, permissions: PermissionSet) -> Self {
        Self { credential, permissions }
    }

    pub fn account(&self) -> &str {
        &self.credential.claims().sub
    }

    pub fn display_name(&self) -> &str {
        let name = &self.credential.claims().name;
        if name.is_empty() {
            self.account()
        } else {
            name.as_str()
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.credential.is_expired(now)
    }
}

/// Persists, restores and clears the session.
///
/// The credential and the permission list are written under two keys and
/// always cleared together. A restore succeeds only when both are present
/// and the credential has not expired; anything else wipes both keys.
pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
    secret: Option<String>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage, secret: None }
    }

    /// Verify credentials with this HMAC secret instead of only decoding.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// File storage when `session_file` is set, memory otherwise.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let storage: Arc<dyn SessionStorage> = match &config.session_file {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        let manager = Self::new(storage);
        Ok(match &config.jwt_secret {
            Some(secret) => manager.with_secret(secret.clone()),
            None => manager,
        })
    }

    /// Read a freshly issued token into a credential.
    pub fn open_credential(&self, token: &str) -> Result<Credential, ConsoleError> {
        match &self.secret {
            Some(secret) => Credential::verify(token, secret),
            None => Credential::decode(token),
        }
    }

    pub fn persist(&self, session: &Session) -> Result<(), ConsoleError> {
        let permissions = serde_json::to_string(&session.permissions)?;
        self.storage.set(TOKEN_KEY, session.credential.token())?;
        self.storage.set(PERMISSIONS_KEY, &permissions)?;
        tracing::debug!(account = session.account(), "session persisted");
        Ok(())
    }

    /// Rebuild the session from storage without re-authenticating.
    pub fn restore(&self, now: DateTime<Utc>) -> Result<Option<Session>, ConsoleError> {
        let token = self.storage.get(TOKEN_KEY)?;
        let permissions = self.storage.get(PERMISSIONS_KEY)?;

        let (token, permissions) = match (token, permissions) {
            (Some(t), Some(p)) => (t, p),
            (None, None) => return Ok(None),
            _ => {
                tracing::warn!("partial session in storage, clearing");
                self.clear()?;
                return Ok(None);
            }
        };

        let credential = match self.open_credential(&token) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "stored credential rejected, clearing");
                self.clear()?;
                return Ok(None);
            }
        };
        if credential.is_expired(now) {
            tracing::info!(account = %credential.claims().sub, "stored credential expired");
            self.clear()?;
            return Ok(None);
        }

        let permissions: PermissionSet = match serde_json::from_str(&permissions) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "stored permissions unreadable, clearing");
                self.clear()?;
                return Ok(None);
            }
        };

        Ok(Some(Session::new(credential, permissions)))
    }

    /// Remove both keys together.
    pub fn clear(&self) -> Result<(), ConsoleError> {
        self.storage.remove_all(&[TOKEN_KEY, PERMISSIONS_KEY])
    }
}
