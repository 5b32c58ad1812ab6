//! Session state for the console. `SessionStore` is the single source of truth
//! for who is signed in; it is built once at startup and handed to every
//! consumer. Only non-sensitive identity metadata is held in memory; the
//! session itself lives in the gateway's cookie jar.
//!
//! Overlapping calls are not coordinated: each one writes the identity when it
//! finishes and the last write wins.

use crate::{
    client::{AppError, ConsoleConfig, Gateway, SessionExpiry},
    features::auth::{
        client,
        types::{Credentials, Identity},
    },
};
use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicBool, Ordering},
};
use tracing::{debug, info, warn};

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

/// Identity slot and flags shared between the store and the gateway's
/// renewal hook.
#[derive(Debug)]
pub struct SessionState {
    identity: RwLock<Option<Identity>>,
    loading: AtomicBool,
    login_required: AtomicBool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            identity: RwLock::new(None),
            loading: AtomicBool::new(true),
            login_required: AtomicBool::new(false),
        }
    }
}

impl SessionState {
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_identity(&self, identity: Option<Identity>) {
        *self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = identity;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::SeqCst);
    }

    /// Returns `true` once after a failed renewal forced the operator back to
    /// login.
    pub fn take_login_redirect(&self) -> bool {
        self.login_required.swap(false, Ordering::SeqCst)
    }
}

impl SessionExpiry for SessionState {
    fn session_expired(&self) {
        self.set_identity(None);
        self.login_required.store(true, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct SessionStore {
    gateway: Arc<Gateway>,
    state: Arc<SessionState>,
}

impl SessionStore {
    /// Builds the gateway and wires its renewal hook to a fresh session state.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(config: ConsoleConfig) -> Result<Self, AppError> {
        let state = Arc::new(SessionState::default());
        let gateway = Gateway::new(config, state.clone())?;
        Ok(Self::with_parts(Arc::new(gateway), state))
    }

    #[must_use]
    pub fn with_parts(gateway: Arc<Gateway>, state: Arc<SessionState>) -> Self {
        Self { gateway, state }
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.state.identity()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.identity().is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn take_login_redirect(&self) -> bool {
        self.state.take_login_redirect()
    }

    /// Asks the server who is signed in. Any failure means anonymous. Never
    /// fails and always ends with `is_loading() == false`.
    pub async fn check_auth(&self) {
        match client::current_user(&self.gateway).await {
            Ok(identity) => {
                debug!(user_id = %identity.id, "session is authenticated");
                self.state.set_identity(Some(identity));
            }
            Err(err) => {
                debug!(error = %err, "session is anonymous");
                self.state.set_identity(None);
            }
        }
        self.state.set_loading(false);
    }

    /// Signs in, then re-reads the identity from the server.
    ///
    /// # Errors
    /// Returns `AppError::Validation` for blank credentials (no request is
    /// sent) or the login error. The identity is not set on failure.
    pub async fn login(&self, credentials: Credentials) -> Result<(), AppError> {
        credentials.validate()?;

        self.state.set_loading(true);
        let result = client::login(&self.gateway, &credentials).await;
        drop(credentials);

        if result.is_ok() {
            self.check_auth().await;
            info!("login succeeded");
        }
        self.state.set_loading(false);
        result
    }

    /// Ends the session. The network outcome is ignored; the local identity is
    /// always cleared.
    pub async fn logout(&self) {
        if let Err(err) = client::logout(&self.gateway).await {
            warn!(error = %err, "logout request failed; clearing local session anyway");
        }
        self.state.set_identity(None);
        info!("logged out");
    }
}
