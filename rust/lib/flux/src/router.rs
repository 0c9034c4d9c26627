use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use crate::store::StateStore;
use crate::topic::TopicFilter;

/// A boxed, `Send`-able future returned by request handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type-erased request payload.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// Type-erased handler. Takes owned values so the future can be `'static`:
/// the request path, the payload and the store.
type ErasedHandler = Arc<dyn Fn(String, Payload, Arc<StateStore>) -> BoxFuture + Send + Sync>;

/// Request router: maps path patterns to async handlers.
///
/// Several handlers may match one path; they run sequentially, in
/// registration order.
pub struct Router {
    routes: RwLock<Vec<(TopicFilter, ErasedHandler)>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: RwLock::new(Vec::new()) }
    }

    /// Register an async handler for a path pattern (`+` / `#` wildcards).
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Payload, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: ErasedHandler = Arc::new(
            move |path: String, payload: Payload, store: Arc<StateStore>| -> BoxFuture {
                Box::pin(handler(path, payload, store))
            },
        );
        let mut routes = self.routes.write().unwrap();
        routes.push((TopicFilter::parse(pattern), handler));
    }

    /// Run every handler matching `path`. Returns how many ran.
    pub async fn dispatch(&self, path: &str, payload: Payload, store: Arc<StateStore>) -> usize {
        let handlers: Vec<ErasedHandler> = {
            let routes = self.routes.read().unwrap();
            routes
                .iter()
                .filter(|(filter, _)| filter.matches(path))
                .map(|(_, h)| h.clone())
                .collect()
        };
        if handlers.is_empty() {
            tracing::debug!(path, "no handler for request");
        }
        let count = handlers.len();
        for handler in handlers {
            handler(path.to_string(), Arc::clone(&payload), Arc::clone(&store)).await;
        }
        count
    }

    /// Whether any handler would match `path`.
    pub fn matches(&self, path: &str) -> bool {
        let routes = self.routes.read().unwrap();
        routes.iter().any(|(filter, _)| filter.matches(path))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
