use std::marker::PhantomData;
use std::sync::Arc;

use fmconsole_core::{ConsoleError, ListParams, Page};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::ApiClient;

/// A REST resource managed from the console (users, roles, tenants, ...).
///
/// Only the collection path is fixed here; field contracts belong to the
/// backend.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection path, e.g. `/tenants`.
    const PATH: &'static str;
}

/// CRUD client for one [`Resource`], sharing the console's [`ApiClient`].
pub struct ResourceClient<T: Resource> {
    api: Arc<ApiClient>,
    _phantom: PhantomData<T>,
}

impl<T: Resource> ResourceClient<T> {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api, _phantom: PhantomData }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", T::PATH.trim_end_matches('/'), id)
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page<T>, ConsoleError> {
        self.api.get_query(T::PATH, params).await
    }

    pub async fn get(&self, id: &str) -> Result<T, ConsoleError> {
        self.api.get(&Self::item_path(id)).await
    }

    pub async fn create(&self, item: &T) -> Result<T, ConsoleError> {
        self.api.post(T::PATH, item).await
    }

    pub async fn update(&self, id: &str, item: &T) -> Result<T, ConsoleError> {
        self.api.put(&Self::item_path(id), item).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ConsoleError> {
        self.api.delete(&Self::item_path(id)).await
    }
}
