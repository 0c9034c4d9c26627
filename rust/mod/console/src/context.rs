use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fmconsole_auth::SessionManager;
use fmconsole_client::{ApiClient, AuthApi, SharedToken};
use fmconsole_core::{ConsoleConfig, ConsoleError};
use fmconsole_nav::{Catalog, MissingRoutePolicy};

/// Everything the handlers need besides the state store.
pub struct ConsoleContext {
    pub api: Arc<dyn AuthApi>,
    pub sessions: SessionManager,
    /// Bearer token the API client sends; swapped on login, restore and logout.
    pub token: SharedToken,
    pub catalog: Catalog,
    pub policy: MissingRoutePolicy,
    pub home_path: String,
    epoch: AtomicU64,
}

impl ConsoleContext {
    pub fn new(
        api: Arc<dyn AuthApi>,
        sessions: SessionManager,
        token: SharedToken,
        catalog: Catalog,
    ) -> Self {
        Self {
            api,
            sessions,
            token,
            catalog,
            policy: MissingRoutePolicy::Warn,
            home_path: fmconsole_nav::HOME_PATH.to_string(),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn with_policy(mut self, policy: MissingRoutePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_home(mut self, home_path: impl Into<String>) -> Self {
        self.home_path = home_path.into();
        self
    }

    /// HTTP-backed context with the standard catalog.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let token = SharedToken::new();
        let api = ApiClient::from_config(config, Arc::new(token.clone()))?;
        Self::with_api(config, Arc::new(api), token)
    }

    /// Same as [`from_config`](Self::from_config) with a caller-supplied
    /// auth backend. `token` must be the one that backend sends.
    pub fn with_api(
        config: &ConsoleConfig,
        api: Arc<dyn AuthApi>,
        token: SharedToken,
    ) -> Result<Self, ConsoleError> {
        let sessions = SessionManager::from_config(config)?;
        Ok(Self::new(api, sessions, token, Catalog::standard())
            .with_policy(MissingRoutePolicy::from_config(config))
            .with_home(config.home_path.clone()))
    }

    /// Current session epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Start a new epoch. Responses tagged with an older one are stale.
    pub fn next_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch() == epoch
    }

    /// Label of the home tab.
    pub fn home_label(&self) -> String {
        self.catalog
            .label_for(&self.home_path)
            .unwrap_or("Home")
            .to_string()
    }
}
