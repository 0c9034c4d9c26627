use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One value held at a store path.
///
/// The payload is shared, so handing a value to every subscriber of a
/// path costs one reference count each. The concrete type name is kept
/// for diagnostics when a reader asks for the wrong type.
#[derive(Clone)]
pub struct StateValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl StateValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Owned copy of the payload, if it is a `T`.
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateValue<{}>", self.type_name)
    }
}

/// Returned by `StateStore::subscribe`, accepted by `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Route(String);

    #[test]
    fn cloned_yields_the_stored_type_only() {
        let v = StateValue::new(Route("/auth/users".into()));
        assert_eq!(v.cloned::<Route>(), Some(Route("/auth/users".into())));
        assert_eq!(v.cloned::<String>(), None);
        assert!(v.type_name().ends_with("Route"));
    }

    #[test]
    fn subscribers_share_one_payload() {
        let v1 = StateValue::new(vec!["/dashboard".to_string(); 64]);
        let v2 = v1.clone();
        let p1 = v1.downcast_ref::<Vec<String>>().unwrap().as_ptr();
        let p2 = v2.downcast_ref::<Vec<String>>().unwrap().as_ptr();
        assert_eq!(p1, p2);
    }

    #[test]
    fn debug_names_the_payload_type() {
        let shown = format!("{:?}", StateValue::new(7u32));
        assert_eq!(shown, "StateValue<u32>");
    }
}
