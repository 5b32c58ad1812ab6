//! Transport layer: configuration, the HTTP gateway with session renewal,
//! response envelopes and the shared error type.

pub mod api;
pub mod config;
pub mod envelope;
pub mod errors;

pub use api::{ApiRequest, Gateway, SessionExpiry};
pub use config::{ConfigOverrides, ConsoleConfig};
pub use envelope::{ListQuery, Page};
pub use errors::AppError;
