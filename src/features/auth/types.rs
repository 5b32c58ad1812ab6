use crate::{
    client::{AppError, envelope::null_as_default},
    features::users::types::UserStatus,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// The signed-in operator as reported by `GET /users/me`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: UserStatus,
    #[serde(default)]
    pub mfa_enabled: bool,
}

/// Login credentials. Consumed by `SessionStore::login` and never stored.
#[derive(Debug)]
pub struct Credentials {
    username_or_email: String,
    password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username_or_email: impl Into<String>, password: SecretString) -> Self {
        Self {
            username_or_email: username_or_email.into(),
            password,
        }
    }

    #[must_use]
    pub fn username_or_email(&self) -> &str {
        self.username_or_email.trim()
    }

    /// # Errors
    /// Returns `AppError::Validation` when either field is blank.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.username_or_email().is_empty() {
            return Err(AppError::Validation(
                "Username or email is required.".to_string(),
            ));
        }
        if self.password.expose_secret().is_empty() {
            return Err(AppError::Validation(
                "Password is required.".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn request(&self) -> LoginRequest<'_> {
        LoginRequest {
            username_or_email: self.username_or_email(),
            password: self.password.expose_secret(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    pub username_or_email: &'a str,
    pub password: &'a str,
}
