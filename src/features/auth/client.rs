//! Auth endpoints. The backend sets and rotates the session cookies; these
//! helpers only trigger the calls.

use crate::{
    client::{AppError, Gateway},
    features::auth::types::{Credentials, Identity},
};

const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";
const ME_PATH: &str = "/users/me";

/// Submits credentials. The response body is ignored; identity comes from
/// `current_user`.
pub async fn login(gateway: &Gateway, credentials: &Credentials) -> Result<(), AppError> {
    gateway.post_discard(LOGIN_PATH, &credentials.request()).await
}

pub async fn logout(gateway: &Gateway) -> Result<(), AppError> {
    gateway.post_empty(LOGOUT_PATH).await
}

pub async fn current_user(gateway: &Gateway) -> Result<Identity, AppError> {
    gateway.get(ME_PATH).await
}
