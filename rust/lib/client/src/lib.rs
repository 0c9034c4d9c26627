//! Console HTTP client.
//!
//! One [`ApiClient`] per console instance carries the timeout, retry policy
//! and credential; [`AuthApi`] and [`ResourceClient`] sit on top of it.
//!
//! ```ignore
//! let token = SharedToken::new();
//! let api = Arc::new(ApiClient::from_config(&config, Arc::new(token.clone()))?);
//! token.set(api.login("ops", "secret").await?);
//! let perms = api.permissions().await?;
//! let tenants = ResourceClient::<Tenant>::new(api.clone()).list(&ListParams::default()).await?;
//! ```

pub mod api;
pub mod auth;
pub mod resource;
pub mod retry;
pub mod token;

pub use api::ApiClient;
pub use auth::AuthApi;
pub use resource::{Resource, ResourceClient};
pub use retry::RetryPolicy;
pub use token::{SharedToken, TokenSource};
