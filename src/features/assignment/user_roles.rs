use crate::{
    client::{AppError, Gateway, ListQuery},
    features::{
        Committed,
        roles::types::Role,
        users::{self, types::UserSummary},
    },
};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

pub const ASSIGN_FAILED: &str = "Failed to assign role";
pub const REMOVE_FAILED: &str = "Failed to remove role";

/// Per-operation role editor for one user. Each assign or remove is its own
/// request followed by a full user-list re-fetch. A submitting flag refuses a
/// second change while one is in flight.
#[derive(Debug)]
pub struct UserRoleEditor {
    user_id: String,
    submitting: AtomicBool,
}

/// Clears the submitting flag when the operation ends, however it ends.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl UserRoleEditor {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            submitting: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Grants `role_id`; the committed result carries the refreshed user list.
    ///
    /// # Errors
    /// Returns `AppError::Busy` while another change is in flight, otherwise
    /// the gateway error of the grant itself.
    pub async fn assign(
        &self,
        gateway: &Gateway,
        role_id: &str,
    ) -> Result<Committed<Vec<UserSummary>>, AppError> {
        let _guard = self.begin()?;
        users::client::assign_role(gateway, &self.user_id, role_id).await?;
        info!(user_id = %self.user_id, role_id = %role_id, "role assigned");
        Ok(Committed::new(refreshed_users(gateway).await))
    }

    /// Revokes `role_id`; the committed result carries the refreshed user list.
    ///
    /// # Errors
    /// Returns `AppError::Busy` while another change is in flight, otherwise
    /// the gateway error of the revoke itself.
    pub async fn remove(
        &self,
        gateway: &Gateway,
        role_id: &str,
    ) -> Result<Committed<Vec<UserSummary>>, AppError> {
        let _guard = self.begin()?;
        users::client::remove_role(gateway, &self.user_id, role_id).await?;
        info!(user_id = %self.user_id, role_id = %role_id, "role removed");
        Ok(Committed::new(refreshed_users(gateway).await))
    }

    fn begin(&self) -> Result<SubmittingGuard<'_>, AppError> {
        if self.submitting.swap(true, Ordering::SeqCst) {
            Err(AppError::Busy(
                "Another role change is still in progress.".to_string(),
            ))
        } else {
            Ok(SubmittingGuard(&self.submitting))
        }
    }
}

async fn refreshed_users(gateway: &Gateway) -> Result<Vec<UserSummary>, AppError> {
    Ok(users::client::list_users(gateway, &ListQuery::default())
        .await?
        .content)
}

/// Splits `catalog` into roles the user holds and roles still available. A
/// user's role entry may be a role id or a role name.
#[must_use]
pub fn partition_roles<'a>(user: &UserSummary, catalog: &'a [Role]) -> (Vec<&'a Role>, Vec<&'a Role>) {
    catalog.iter().partition(|role| {
        user.roles
            .iter()
            .any(|held| *held == role.id || *held == role.name)
    })
}
