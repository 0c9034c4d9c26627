use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use crate::router::{Payload, Router};
use crate::store::StateStore;
use crate::value::{StateValue, SubscriptionId};

/// Flux: state store plus request router.
///
/// Three primitives, all path-based:
/// - `get(path)`: read state
/// - `emit(path, payload)`: send a request to the matching handler(s)
/// - `subscribe(pattern)`: observe state changes
///
/// ```ignore
/// let flux = Flux::new();
/// flux.on("auth/logout", |_, _, store| async move {
///     store.set("app/route", "/login".to_string());
/// });
/// flux.subscribe("app/#", |path, _| tracing::info!(path, "changed"));
/// flux.emit("auth/logout", ()).await;
/// ```
pub struct Flux {
    store: Arc<StateStore>,
    router: Router,
}

impl Flux {
    pub fn new() -> Self {
        Self {
            store: Arc::new(StateStore::new()),
            router: Router::new(),
        }
    }

    // ====================================================================
    // State
    // ====================================================================

    pub fn get(&self, path: &str) -> Option<StateValue> {
        self.store.get(path)
    }

    /// Typed read, see [`StateStore::get_as`].
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.store.get_as(path)
    }

    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        self.store.subscribe(pattern, handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    // ====================================================================
    // Requests
    // ====================================================================

    /// Emit a request and wait for its handler(s) to finish.
    ///
    /// Unmatched paths are a silent no-op.
    pub async fn emit<T: Any + Send + Sync>(&self, path: &str, payload: T) {
        self.emit_arc(path, Arc::new(payload)).await;
    }

    pub async fn emit_arc(&self, path: &str, payload: Payload) {
        self.router
            .dispatch(path, payload, Arc::clone(&self.store))
            .await;
    }

    /// Register an async handler for a path pattern.
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Payload, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.router.on(pattern, handler);
    }

    pub fn has_handler(&self, path: &str) -> bool {
        self.router.matches(path)
    }
}

impl Default for Flux {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn emit_updates_state_seen_by_subscribers() {
        let flux = Flux::new();
        let routes = Arc::new(Mutex::new(Vec::<String>::new()));
        let routes_c = routes.clone();

        flux.on("auth/logout", |_, _, store| async move {
            store.set("app/route", "/login".to_string());
        });
        flux.subscribe("app/route", move |_, v| {
            if let Some(r) = v.downcast_ref::<String>() {
                routes_c.lock().unwrap().push(r.clone());
            }
        });

        flux.emit("auth/logout", ()).await;

        assert_eq!(flux.get_as::<String>("app/route").as_deref(), Some("/login"));
        assert_eq!(*routes.lock().unwrap(), vec!["/login"]);
        assert!(flux.has_handler("auth/logout"));
        assert!(!flux.has_handler("auth/login"));
    }

    #[tokio::test]
    async fn emit_unknown_path_leaves_state_untouched() {
        let flux = Flux::default();
        flux.emit("nothing/here", 1u32).await;
        assert!(flux.store().is_empty());
    }
}
