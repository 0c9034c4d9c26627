use std::sync::{Arc, RwLock};

use fmconsole_core::ConsoleError;

/// Where [`ApiClient`](crate::ApiClient) gets its bearer credential.
///
/// Consulted once per attempt, so a retry after logout goes out
/// unauthenticated. `Ok(None)` omits the Authorization header.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ConsoleError>;
}

/// Credential slot of the signed-in session.
///
/// Login and restore fill it, logout and forced sign-out empty it. All
/// clones see the same slot, so the console context and every client
/// built from it stay in step.
#[derive(Clone, Default)]
pub struct SharedToken {
    slot: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    /// Empty slot: requests go out anonymous until [`set`](Self::set).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let shared = Self::new();
        shared.set(token);
        shared
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.slot.write().unwrap() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.slot.write().unwrap() = None;
    }

    pub fn current(&self) -> Option<String> {
        self.slot.read().unwrap().clone()
    }
}

impl std::fmt::Debug for SharedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.current().is_some() { "set" } else { "empty" };
        f.debug_tuple("SharedToken").field(&state).finish()
    }
}

#[async_trait::async_trait]
impl TokenSource for SharedToken {
    async fn token(&self) -> Result<Option<String>, ConsoleError> {
        Ok(self.current())
    }
}
