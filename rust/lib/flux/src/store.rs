use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::topic::TopicFilter;
use crate::value::{StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Path-addressed state store and single owner of console state.
///
/// - `set(path, value)` stores a value and notifies matching subscribers.
/// - `update(path, init, f)` is a read-modify-write done under the write
///   lock, so two updates to the same path never interleave.
/// - `get(path)` / `get_as::<T>(path)` read the current value.
/// - `scan(prefix)` lists children under a prefix.
/// - `subscribe(pattern, handler)` registers a change handler.
///
/// Subscribers run synchronously on the writing thread, after the lock is
/// released, so a handler may read the store.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
}

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    filter: TopicFilter,
    handler: ChangeHandler,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Set a typed value at the given path and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    /// Set a pre-built StateValue and notify matching subscribers.
    pub fn set_value(&self, path: &str, value: StateValue) {
        {
            let mut values = self.values.write().unwrap();
            values.insert(path.to_string(), value.clone());
        }
        self.notify(path, &value);
    }

    /// Serialized read-modify-write of a typed value.
    ///
    /// Reads the value at `path` (or `init()` if absent or of another type),
    /// applies `f`, stores the result and notifies subscribers. The write
    /// lock is held from read to store.
    pub fn update<T, R>(
        &self,
        path: &str,
        init: impl FnOnce() -> T,
        f: impl FnOnce(&mut T) -> R,
    ) -> R
    where
        T: Any + Clone + Send + Sync,
    {
        let (result, value) = {
            let mut values = self.values.write().unwrap();
            let mut current = match values.get(path) {
                Some(v) => v.cloned::<T>().unwrap_or_else(|| {
                    tracing::warn!(
                        path,
                        stored = v.type_name(),
                        wanted = std::any::type_name::<T>(),
                        "replacing value of another type"
                    );
                    init()
                }),
                None => init(),
            };
            let result = f(&mut current);
            let value = StateValue::new(current);
            values.insert(path.to_string(), value.clone());
            (result, value)
        };
        self.notify(path, &value);
        result
    }

    /// Get the current value at `path`. Cheap `Arc` clone.
    pub fn get(&self, path: &str) -> Option<StateValue> {
        let values = self.values.read().unwrap();
        values.get(path).cloned()
    }

    /// Get a clone of the typed value at `path`.
    ///
    /// Returns `None` if nothing is stored or the stored type differs.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.cloned::<T>())
    }

    /// Remove the value at `path`. Does NOT notify subscribers.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        let mut values = self.values.write().unwrap();
        values.remove(path)
    }

    /// Entries strictly under `{prefix}/`, ordered by path.
    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        let values = self.values.read().unwrap();
        let scan_prefix = format!("{}/", prefix);
        values
            .range(scan_prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&scan_prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        let values = self.values.read().unwrap();
        values.contains_key(path)
    }

    pub fn len(&self) -> usize {
        let values = self.values.read().unwrap();
        values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored paths, ordered.
    pub fn paths(&self) -> Vec<String> {
        let values = self.values.read().unwrap();
        values.keys().cloned().collect()
    }

    /// Subscribe to changes on paths matching `pattern` (`+` / `#` wildcards).
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subscribers = self.subscribers.write().unwrap();
        subscribers.push(Subscriber {
            id,
            filter: TopicFilter::parse(pattern),
            handler: Arc::new(handler),
        });
        id
    }

    /// Remove a subscription. Returns `false` if the id is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write().unwrap();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() < before
    }

    fn notify(&self, path: &str, value: &StateValue) {
        let matched: Vec<ChangeHandler> = {
            let subscribers = self.subscribers.read().unwrap();
            subscribers
                .iter()
                .filter(|s| s.filter.matches(path))
                .map(|s| s.handler.clone())
                .collect()
        };
        for handler in matched {
            handler(path, value);
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // ========================================================================
    // get / set / remove
    // ========================================================================

    #[test]
    fn set_and_get_typed() {
        let store = StateStore::new();
        store.set("app/route", "/dashboard".to_string());
        assert_eq!(store.get_as::<String>("app/route"), Some("/dashboard".to_string()));
        assert_eq!(store.get_as::<u32>("app/route"), None);
        assert!(store.get("nav/tabs").is_none());
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = StateStore::new();
        store.set("counter", 1u32);
        store.set("counter", 2u32);
        assert_eq!(store.get_as::<u32>("counter"), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_does_not_notify() {
        let store = StateStore::new();
        let seen = Arc::new(AtomicU64::new(0));
        let seen_c = seen.clone();
        store.subscribe("#", move |_, _| {
            seen_c.fetch_add(1, Ordering::Relaxed);
        });

        store.set("auth/state", 1u32);
        assert!(store.remove("auth/state").is_some());
        assert!(store.remove("auth/state").is_none());
        assert_eq!(seen.load(Ordering::Relaxed), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn scan_lists_children_only() {
        let store = StateStore::new();
        store.set("nav", 0u32);
        store.set("nav/tabs", 1u32);
        store.set("nav/menu", 2u32);
        store.set("navigation/x", 3u32);

        let paths: Vec<String> = store.scan("nav").into_iter().map(|(k, _)| k).collect();
        assert_eq!(paths, vec!["nav/menu", "nav/tabs"]);
    }

    // ========================================================================
    // update
    // ========================================================================

    #[test]
    fn update_initializes_missing_value() {
        let store = StateStore::new();
        let len = store.update("nav/tabs", Vec::<String>::new, |tabs| {
            tabs.push("/dashboard".into());
            tabs.len()
        });
        assert_eq!(len, 1);
        assert_eq!(store.get_as::<Vec<String>>("nav/tabs").unwrap(), vec!["/dashboard"]);
    }

    #[test]
    fn update_replaces_value_of_other_type() {
        let store = StateStore::new();
        store.set("x", "text".to_string());
        store.update("x", || 10u32, |v| *v += 1);
        assert_eq!(store.get_as::<u32>("x"), Some(11));
    }

    #[test]
    fn concurrent_updates_are_serialized() {
        let store = Arc::new(StateStore::new());
        let mut threads = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            threads.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    store.update("counter", || 0u64, |n| *n += 1);
                }
            }));
        }
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(store.get_as::<u64>("counter"), Some(800));
    }

    #[test]
    fn update_notifies_with_new_value() {
        let store = StateStore::new();
        let last = Arc::new(Mutex::new(None::<u32>));
        let last_c = last.clone();
        store.subscribe("counter", move |_, v| {
            *last_c.lock().unwrap() = v.downcast_ref::<u32>().copied();
        });
        store.update("counter", || 41u32, |n| *n += 1);
        assert_eq!(*last.lock().unwrap(), Some(42));
    }

    // ========================================================================
    // subscribe
    // ========================================================================

    #[test]
    fn subscribe_wildcards() {
        let store = StateStore::new();
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen_c = seen.clone();
        store.subscribe("nav/+", move |path, _| {
            seen_c.lock().unwrap().push(path.to_string());
        });

        store.set("nav/tabs", 1u32);
        store.set("nav/menu", 2u32);
        store.set("auth/state", 3u32);

        assert_eq!(*seen.lock().unwrap(), vec!["nav/tabs", "nav/menu"]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = StateStore::new();
        let count = Arc::new(AtomicU64::new(0));
        let count_c = count.clone();
        let id = store.subscribe("app/route", move |_, _| {
            count_c.fetch_add(1, Ordering::Relaxed);
        });

        store.set("app/route", 1u32);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set("app/route", 2u32);
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn handler_can_read_store() {
        let store = Arc::new(StateStore::new());
        let observed = Arc::new(Mutex::new(None::<u32>));
        let (store_c, observed_c) = (store.clone(), observed.clone());
        store.subscribe("a", move |_, _| {
            *observed_c.lock().unwrap() = store_c.get_as::<u32>("a");
        });
        store.set("a", 5u32);
        assert_eq!(*observed.lock().unwrap(), Some(5));
    }
}
