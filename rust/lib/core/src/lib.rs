pub mod config;
pub mod envelope;
pub mod error;
pub mod permission;

pub use config::ConsoleConfig;
pub use envelope::{Envelope, ListParams, Page};
pub use error::ConsoleError;
pub use permission::{Permission, PermissionSet};
