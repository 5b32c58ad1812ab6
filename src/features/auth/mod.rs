//! Authentication: credentials, the current identity, and the session store
//! that owns them. Passwords are wrapped in `SecretString` and exposed only
//! while the login body is serialized; nothing here logs secrets.

pub mod client;
pub mod state;
pub mod types;

pub use state::{SessionState, SessionStore};
pub use types::{Credentials, Identity};
