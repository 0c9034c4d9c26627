//! Console session: credential decoding, persistence and restore.

pub mod credential;
pub mod session;
pub mod storage;

pub use credential::{Claims, Credential};
pub use session::{Session, SessionManager, PERMISSIONS_KEY, TOKEN_KEY};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
