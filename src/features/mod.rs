//! Console features. Each area keeps its endpoint helpers (`client`), wire
//! types (`types`) and screen or flow state apart so the CLI stays a thin
//! presentation layer.

use crate::client::AppError;
use tracing::warn;

pub mod assignment;
pub mod auth;
pub mod dashboard;
pub mod mfa;
pub mod permissions;
pub mod roles;
pub mod users;

/// Outcome of a mutation the server accepted. `refreshed` holds the re-fetch
/// that follows it; a failed re-fetch leaves the mutation committed.
#[must_use]
#[derive(Debug)]
pub struct Committed<T = ()> {
    pub refreshed: Result<T, AppError>,
}

impl<T> Committed<T> {
    pub(crate) fn new(refreshed: Result<T, AppError>) -> Self {
        if let Err(err) = &refreshed {
            warn!(error = %err, "re-fetch after committed change failed");
        }
        Self { refreshed }
    }

    #[must_use]
    pub fn refresh_error(&self) -> Option<&AppError> {
        self.refreshed.as_ref().err()
    }
}

/// Rejects blank or dot-segment identifiers and percent-encodes the rest, so
/// an id always lands in exactly one path segment.
pub(crate) fn path_id(id: &str) -> Result<String, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("An id is required.".to_string()));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(AppError::Validation(format!("'{trimmed}' is not a valid id.")));
    }
    Ok(urlencoding::encode(trimmed).into_owned())
}
