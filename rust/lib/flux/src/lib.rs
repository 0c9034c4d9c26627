//! Flux: path-addressed state engine for the console.
//!
//! Rust owns all console state (session, navigation, tabs); the rendering
//! layer only draws what is stored here and emits requests back.
//!
//! - `get(path)`: read state at a path
//! - `emit(path, payload)`: send a request, routed to handler(s)
//! - `subscribe(pattern)`: observe state changes
//!
//! Paths use `/` as separator (`auth/state`, `nav/tabs`). Patterns accept
//! `+` for one level and `#` for the rest.

pub mod app;
pub mod router;
pub mod store;
pub mod topic;
pub mod value;

pub use app::Flux;
pub use router::{BoxFuture, Payload, Router};
pub use store::{ChangeHandler, StateStore};
pub use topic::TopicFilter;
pub use value::{StateValue, SubscriptionId};
