//! Helpers shared by unit tests that talk to a local mock server.

use crate::client::{ConfigOverrides, ConsoleConfig, Gateway, SessionExpiry};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::MockServer;

/// Sandboxed runners may forbid binding sockets; tests skip when they do.
pub(crate) fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

#[derive(Debug, Default)]
pub(crate) struct RecordingExpiry {
    pub(crate) calls: AtomicUsize,
}

impl SessionExpiry for RecordingExpiry {
    fn session_expired(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) fn config_for(server: &MockServer) -> ConsoleConfig {
    ConsoleConfig::load(ConfigOverrides {
        api_base_url: Some(server.uri()),
        timeout_seconds: Some(5),
    })
}

#[allow(clippy::unwrap_used)]
pub(crate) fn gateway_for(server: &MockServer) -> (Gateway, Arc<RecordingExpiry>) {
    let expiry = Arc::new(RecordingExpiry::default());
    let gateway = Gateway::new(config_for(server), expiry.clone()).unwrap();
    (gateway, expiry)
}
